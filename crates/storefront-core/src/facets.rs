//! Multi-select facet state and the parameter tuple every refresh depends on.
//!
//! Selections are values: toggling returns a new [`FacetSelection`] and leaves
//! the original untouched, so callers can compare before/after snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetGroup {
    Categories,
    ProductTypes,
    Brands,
}

impl FacetGroup {
    /// Display order of the filter panel.
    pub const ALL: [FacetGroup; 3] = [FacetGroup::Categories, FacetGroup::Brands, FacetGroup::ProductTypes];

    /// Repeated query-string key understood by the search and facets endpoints.
    pub fn query_key(self) -> &'static str {
        match self {
            FacetGroup::Categories => "selectedCategories[]",
            FacetGroup::ProductTypes => "selectedProductTypes[]",
            FacetGroup::Brands => "selectedBrands[]",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FacetGroup::Categories => "Categories",
            FacetGroup::ProductTypes => "Types",
            FacetGroup::Brands => "Brands",
        }
    }
}

impl fmt::Display for FacetGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FacetGroup::Categories => "category",
            FacetGroup::ProductTypes => "type",
            FacetGroup::Brands => "brand",
        })
    }
}

impl FromStr for FacetGroup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" | "categories" => Ok(FacetGroup::Categories),
            "type" | "types" | "product_type" | "product_types" => Ok(FacetGroup::ProductTypes),
            "brand" | "brands" => Ok(FacetGroup::Brands),
            other => Err(Error::Operation(format!("unknown facet group '{other}'"))),
        }
    }
}

/// Selected ids per facet group, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacetSelection {
    pub categories: Vec<String>,
    pub product_types: Vec<String>,
    pub brands: Vec<String>,
}

impl FacetSelection {
    pub fn group(&self, group: FacetGroup) -> &[String] {
        match group {
            FacetGroup::Categories => &self.categories,
            FacetGroup::ProductTypes => &self.product_types,
            FacetGroup::Brands => &self.brands,
        }
    }

    fn group_mut(&mut self, group: FacetGroup) -> &mut Vec<String> {
        match group {
            FacetGroup::Categories => &mut self.categories,
            FacetGroup::ProductTypes => &mut self.product_types,
            FacetGroup::Brands => &mut self.brands,
        }
    }

    /// Removes `id` from `group` if present, appends it otherwise.
    #[must_use]
    pub fn toggle(&self, group: FacetGroup, id: &str) -> Self {
        let mut next = self.clone();
        let ids = next.group_mut(group);
        if let Some(pos) = ids.iter().position(|v| v == id) {
            ids.remove(pos);
        } else {
            ids.push(id.to_string());
        }
        next
    }

    pub fn is_selected(&self, group: FacetGroup, id: &str) -> bool {
        self.group(group).iter().any(|v| v == id)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.product_types.is_empty() && self.brands.is_empty()
    }

    pub fn clear(&mut self) {
        self.categories.clear();
        self.product_types.clear();
        self.brands.clear();
    }
}

/// Everything a refresh depends on. Two equal values produce the same request pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub selection: FacetSelection,
    pub hybrid: bool,
}

impl SearchParams {
    pub fn new(query: impl Into<String>, selection: FacetSelection, hybrid: bool) -> Self {
        Self { query: query.into(), selection, hybrid }
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("query", self.query.clone())];
        for group in [FacetGroup::Categories, FacetGroup::ProductTypes, FacetGroup::Brands] {
            pairs.extend(self.selection.group(group).iter().map(|id| (group.query_key(), id.clone())));
        }
        pairs.push(("hybrid", self.hybrid.to_string()));
        pairs
    }
}
