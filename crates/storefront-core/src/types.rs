//! Domain types exchanged with the product search backend.

use serde::{Deserialize, Serialize};
use std::fmt;

pub use rust_decimal::Decimal;

pub type ProductId = String;

pub const DEFAULT_CURRENCY: &str = "USD";

/// Label shown for facet buckets whose value is missing or empty.
pub const UNLABELLED_FACET: &str = "Others";

/// A single autocomplete candidate returned by the suggest endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(deserialize_with = "de::id")]
    pub id: ProductId,
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
}

/// A product as shown in the results grid.
///
/// - `price`: absent when the catalog has no price for the item
/// - `currency`/`image_link`: optional; see [`Product::currency`] and [`Product::image_or`]
/// - `tags`: ordered, rendered as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "de::id")]
    pub id: ProductId,
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub brand: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub tags: Vec<String>,
}

impl Product {
    pub fn currency(&self) -> &str {
        currency_or_default(self.currency.as_deref())
    }

    pub fn image_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        non_empty(self.image_link.as_deref()).unwrap_or(placeholder)
    }

    pub fn display_price(&self) -> String {
        display_price(self.currency(), self.price)
    }
}

/// Full record loaded by the detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(deserialize_with = "de::id")]
    pub id: ProductId,
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub brand: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    /// 0 to 5 when the catalog carries a rating.
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub tag_list: Vec<String>,
}

impl ProductDetail {
    pub fn currency(&self) -> &str {
        currency_or_default(self.currency.as_deref())
    }

    pub fn image_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        non_empty(self.image_link.as_deref()).unwrap_or(placeholder)
    }

    pub fn display_price(&self) -> String {
        display_price(self.currency(), self.price)
    }
}

/// One value of a facet dimension with the number of matching products.
///
/// The backend names the value field after its group (`category`,
/// `product_type`, `brand`); all three land in `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetBucket {
    #[serde(default, alias = "category", alias = "product_type", alias = "brand")]
    pub value: Option<String>,
    #[serde(default)]
    pub count: u64,
}

impl FacetBucket {
    pub fn new(value: impl Into<String>, count: u64) -> Self {
        Self { value: Some(value.into()), count }
    }

    pub fn label(&self) -> &str {
        non_empty(self.value.as_deref()).unwrap_or(UNLABELLED_FACET)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCounts {
    #[serde(default, deserialize_with = "de::nullable")]
    pub categories: Vec<FacetBucket>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub product_types: Vec<FacetBucket>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub brands: Vec<FacetBucket>,
}

/// Version stamp of the parameters currently in flight.
///
/// Each new request bumps it; a completion only applies when its stamp still
/// matches the latest one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn currency_or_default(currency: Option<&str>) -> &str {
    non_empty(currency).unwrap_or(DEFAULT_CURRENCY)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn display_price(currency: &str, price: Option<Decimal>) -> String {
    match price {
        Some(price) => format!("{currency} {:.2}", price.round_dp(2)),
        None => format!("{currency} -"),
    }
}

mod de {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    /// Ids come back as JSON strings or numbers depending on how a document was ingested.
    pub(super) fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => s,
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        })
    }

    pub(super) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}
