//! Read-only composition of every component state, for rendering.

use storefront_core::facets::{FacetGroup, FacetSelection};
use storefront_core::theme::Theme;
use storefront_core::types::{FacetCounts, Generation, Product, Suggestion};

use crate::detail::DetailState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetRow {
    /// Raw value sent back on toggle; empty when the backend had none.
    pub value: String,
    pub label: String,
    pub count: u64,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub term: String,
    pub selection: FacetSelection,
    pub hybrid: bool,
    pub theme: Theme,

    pub buffer: String,
    pub suggestions: Vec<Suggestion>,
    pub suggestions_visible: bool,
    pub active_suggestion: Option<usize>,

    pub generation: Generation,
    pub loading: bool,
    pub products: Vec<Product>,
    pub facets: FacetCounts,

    pub detail: DetailState,
    pub placeholder_image: String,
}

impl ViewModel {
    pub fn facet_rows(&self, group: FacetGroup) -> Vec<FacetRow> {
        let buckets = match group {
            FacetGroup::Categories => &self.facets.categories,
            FacetGroup::ProductTypes => &self.facets.product_types,
            FacetGroup::Brands => &self.facets.brands,
        };
        buckets
            .iter()
            .map(|bucket| {
                let value = bucket.value.clone().unwrap_or_default();
                FacetRow {
                    selected: self.selection.is_selected(group, &value),
                    label: bucket.label().to_string(),
                    count: bucket.count,
                    value,
                }
            })
            .collect()
    }

    /// "No products found" applies only once nothing is loading.
    pub fn no_results(&self) -> bool {
        !self.loading && self.products.is_empty()
    }

    /// Resolves a 1-based card number or a literal product id.
    pub fn resolve_product(&self, reference: &str) -> Option<&Product> {
        if let Ok(n) = reference.parse::<usize>() {
            if let Some(product) = n.checked_sub(1).and_then(|i| self.products.get(i)) {
                return Some(product);
            }
        }
        self.products.iter().find(|p| p.id == reference)
    }
}
