#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use storefront_core::analytics::{Analytics, AnalyticsEvent};
use storefront_core::error::{Error, Result};
use storefront_core::facets::SearchParams;
use storefront_core::traits::{AnalyticsSink, SearchApi};
use storefront_core::types::{FacetBucket, FacetCounts, Product, ProductDetail, Suggestion};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Suggest { prefix: String, limit: usize },
    Search(SearchParams),
    Facets(SearchParams),
    Product(String),
}

/// Canned reply: wait `delay` (virtual time under a paused clock), then answer.
#[derive(Clone)]
pub struct Reply<T> {
    pub delay: Duration,
    pub outcome: std::result::Result<T, u16>,
}

impl<T> Reply<T> {
    pub fn ok(value: T) -> Self {
        Self { delay: Duration::ZERO, outcome: Ok(value) }
    }

    pub fn fail(status: u16) -> Self {
        Self { delay: Duration::ZERO, outcome: Err(status) }
    }

    pub fn after(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }
}

/// In-memory catalog keyed by prefix / query / id. Unscripted lookups answer
/// immediately with an empty list (or 404 for details).
#[derive(Default)]
pub struct ScriptedApi {
    calls: Mutex<Vec<Call>>,
    suggest: Mutex<HashMap<String, Reply<Vec<Suggestion>>>>,
    search: Mutex<HashMap<String, Reply<Vec<Product>>>>,
    facets: Mutex<HashMap<String, Reply<FacetCounts>>>,
    products: Mutex<HashMap<String, Reply<ProductDetail>>>,
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on_suggest(&self, prefix: &str, reply: Reply<Vec<Suggestion>>) {
        self.suggest.lock().unwrap().insert(prefix.to_string(), reply);
    }

    pub fn on_search(&self, query: &str, reply: Reply<Vec<Product>>) {
        self.search.lock().unwrap().insert(query.to_string(), reply);
    }

    pub fn on_facets(&self, query: &str, reply: Reply<FacetCounts>) {
        self.facets.lock().unwrap().insert(query.to_string(), reply);
    }

    pub fn on_product(&self, id: &str, reply: Reply<ProductDetail>) {
        self.products.lock().unwrap().insert(id.to_string(), reply);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn suggest_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Suggest { prefix, .. } => Some(prefix),
                _ => None,
            })
            .collect()
    }

    pub fn search_calls(&self) -> Vec<SearchParams> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Search(params) => Some(params),
                _ => None,
            })
            .collect()
    }

    pub fn facet_calls(&self) -> Vec<SearchParams> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Facets(params) => Some(params),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

async fn answer<T: Clone>(reply: Option<Reply<T>>, fallback: impl FnOnce() -> Result<T>) -> Result<T> {
    let Some(reply) = reply else {
        return fallback();
    };
    tokio::time::sleep(reply.delay).await;
    reply.outcome.map_err(|status| Error::Status { status, body: "scripted failure".into() })
}

#[async_trait]
impl SearchApi for ScriptedApi {
    async fn suggest(&self, prefix: &str, limit: usize) -> Result<Vec<Suggestion>> {
        self.record(Call::Suggest { prefix: prefix.to_string(), limit });
        let reply = self.suggest.lock().unwrap().get(prefix).cloned();
        answer(reply, || Ok(Vec::new())).await
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Product>> {
        self.record(Call::Search(params.clone()));
        let reply = self.search.lock().unwrap().get(&params.query).cloned();
        answer(reply, || Ok(Vec::new())).await
    }

    async fn facets(&self, params: &SearchParams) -> Result<FacetCounts> {
        self.record(Call::Facets(params.clone()));
        let reply = self.facets.lock().unwrap().get(&params.query).cloned();
        answer(reply, || Ok(FacetCounts::default())).await
    }

    async fn product(&self, id: &str) -> Result<ProductDetail> {
        self.record(Call::Product(id.to_string()));
        let reply = self.products.lock().unwrap().get(id).cloned();
        answer(reply, || Err(Error::NotFound(format!("product {id}")))).await
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn analytics(self: &Arc<Self>) -> Analytics {
        Analytics::new(Arc::clone(self) as Arc<dyn AnalyticsSink>)
    }
}

impl AnalyticsSink for RecordingSink {
    fn track(&self, event: &AnalyticsEvent) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

pub fn suggestion(id: &str, name: &str, brand: Option<&str>) -> Suggestion {
    Suggestion { id: id.to_string(), name: name.to_string(), brand: brand.map(str::to_string) }
}

pub fn product(id: &str, name: &str) -> Product {
    serde_json::from_value(json!({ "id": id, "name": name, "brand": "Acme", "price": "10.00", "tags": [] }))
        .expect("product fixture")
}

pub fn detail(id: &str, name: &str) -> ProductDetail {
    serde_json::from_value(json!({ "id": id, "name": name, "brand": "Acme", "price": 10, "rating": 4 }))
        .expect("detail fixture")
}

pub fn brand_counts(pairs: &[(&str, u64)]) -> FacetCounts {
    FacetCounts {
        brands: pairs.iter().map(|(b, n)| FacetBucket::new(*b, *n)).collect(),
        ..FacetCounts::default()
    }
}

/// Lets spawned tasks run to completion under a paused clock.
pub async fn settle() {
    tokio::time::sleep(Duration::from_secs(5)).await;
}

pub async fn advance(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}
