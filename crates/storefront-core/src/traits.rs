use async_trait::async_trait;

use crate::analytics::AnalyticsEvent;
use crate::error::Result;
use crate::facets::SearchParams;
use crate::theme::Theme;
use crate::types::{FacetCounts, Product, ProductDetail, Suggestion};

/// The remote catalog. Implementations only fetch; they never touch client state.
#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn suggest(&self, prefix: &str, limit: usize) -> Result<Vec<Suggestion>>;
    async fn search(&self, params: &SearchParams) -> Result<Vec<Product>>;
    async fn facets(&self, params: &SearchParams) -> Result<FacetCounts>;
    async fn product(&self, id: &str) -> Result<ProductDetail>;
}

/// Receives observational events. Must not block the caller.
pub trait AnalyticsSink: Send + Sync {
    fn track(&self, event: &AnalyticsEvent) -> Result<()>;
}

pub trait ThemeStore: Send + Sync {
    fn load(&self) -> Result<Option<Theme>>;
    fn save(&self, theme: Theme) -> Result<()>;
}
