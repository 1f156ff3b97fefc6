//! Behavioral analytics events and the fire-and-forget dispatcher.
//!
//! Events are observational: emitting one never fails the caller and never
//! gates a state transition. Sink errors are logged at debug level and dropped.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::Result;
use crate::traits::AnalyticsSink;
use crate::types::{Product, ProductId};

pub const HOME_PAGE_TITLE: &str = "home-page";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    PageView { title: String },
    SearchPerformed { query: String, result_ids: Vec<ProductId>, total: usize },
    ResultClicked { id: ProductId, query: String, page_size: usize, total: usize },
}

impl AnalyticsEvent {
    pub fn page_view() -> Self {
        AnalyticsEvent::PageView { title: HOME_PAGE_TITLE.to_string() }
    }

    pub fn search_performed(query: &str, results: &[Product]) -> Self {
        AnalyticsEvent::SearchPerformed {
            query: query.to_string(),
            result_ids: results.iter().map(|p| p.id.clone()).collect(),
            total: results.len(),
        }
    }

    pub fn result_clicked(id: &str, query: &str, results: &[Product]) -> Self {
        AnalyticsEvent::ResultClicked {
            id: id.to_string(),
            query: query.to_string(),
            page_size: results.len(),
            total: results.len(),
        }
    }

    /// Event type segment used by the collector endpoint.
    pub fn event_type(&self) -> &'static str {
        match self {
            AnalyticsEvent::PageView { .. } => "page_view",
            AnalyticsEvent::SearchPerformed { .. } => "search",
            AnalyticsEvent::ResultClicked { .. } => "search_click",
        }
    }

    /// Collector payload. The shape is fixed by the collector, not by this crate.
    pub fn payload(&self, ctx: &AnalyticsContext) -> Value {
        let document = |id: &str| json!({ "document": { "id": id, "index": ctx.index } });
        match self {
            AnalyticsEvent::PageView { title } => json!({ "page": { "title": title } }),
            AnalyticsEvent::SearchPerformed { query, result_ids, total } => json!({
                "search": {
                    "query": query,
                    "results": {
                        "items": result_ids.iter().map(|id| document(id.as_str())).collect::<Vec<_>>(),
                        "total_results": total,
                    },
                },
            }),
            AnalyticsEvent::ResultClicked { id, query, page_size, total } => json!({
                "document": { "id": id, "index": ctx.index },
                "search": {
                    "query": query,
                    "page": { "current": 1, "size": page_size },
                    "results": {
                        "items": [document(id.as_str())],
                        "total_results": total,
                    },
                    "search_application": ctx.search_application,
                },
            }),
        }
    }
}

/// Static labels stamped onto every payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsContext {
    pub index: String,
    pub search_application: String,
}

impl Default for AnalyticsContext {
    fn default() -> Self {
        Self { index: "products-catalog".to_string(), search_application: "app-product-store".to_string() }
    }
}

/// Cloneable handle that swallows sink failures.
#[derive(Clone)]
pub struct Analytics {
    sink: Arc<dyn AnalyticsSink>,
}

impl Analytics {
    pub fn new(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self { sink }
    }

    pub fn disabled() -> Self {
        Self::new(Arc::new(NoopSink))
    }

    pub fn emit(&self, event: &AnalyticsEvent) {
        if let Err(err) = self.sink.track(event) {
            tracing::debug!(event = event.event_type(), error = %err, "analytics event dropped");
        }
    }
}

impl std::fmt::Debug for Analytics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analytics").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl AnalyticsSink for NoopSink {
    fn track(&self, _event: &AnalyticsEvent) -> Result<()> {
        Ok(())
    }
}

/// Writes every event to the log instead of a collector.
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    ctx: AnalyticsContext,
}

impl TracingSink {
    pub fn new(ctx: AnalyticsContext) -> Self {
        Self { ctx }
    }
}

impl AnalyticsSink for TracingSink {
    fn track(&self, event: &AnalyticsEvent) -> Result<()> {
        tracing::info!(target: "storefront::analytics", event = event.event_type(), payload = %event.payload(&self.ctx));
        Ok(())
    }
}
