//! Query execution: one refresh = facet counts + product results for a single
//! [`SearchParams`] value, applied together under a generation stamp.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use storefront_core::analytics::{Analytics, AnalyticsEvent};
use storefront_core::facets::SearchParams;
use storefront_core::traits::SearchApi;
use storefront_core::types::{FacetCounts, Generation, Product};

use crate::state::update;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsState {
    /// Stamp of the latest refresh issued.
    pub generation: Generation,
    pub params: Option<SearchParams>,
    /// True exactly while the latest refresh has fetches outstanding.
    pub loading: bool,
    pub products: Vec<Product>,
    pub facets: FacetCounts,
    /// Number of refreshes that settled and were applied.
    pub settled: u64,
}

pub struct QueryCoordinator {
    api: Arc<dyn SearchApi>,
    state: Arc<watch::Sender<ResultsState>>,
    analytics: Analytics,
    inflight: Option<CancellationToken>,
}

impl QueryCoordinator {
    pub fn new(api: Arc<dyn SearchApi>, analytics: Analytics) -> Self {
        let (tx, _rx) = watch::channel(ResultsState::default());
        Self { api, state: Arc::new(tx), analytics, inflight: None }
    }

    pub fn set_analytics(&mut self, analytics: Analytics) {
        self.analytics = analytics;
    }

    pub fn subscribe(&self) -> watch::Receiver<ResultsState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ResultsState {
        self.state.borrow().clone()
    }

    /// Starts a refresh for `params`, superseding whatever was in flight.
    pub fn refresh(&mut self, params: SearchParams) -> Generation {
        self.cancel();
        let generation = update(&self.state, |s| {
            s.generation = s.generation.next();
            s.params = Some(params.clone());
            s.loading = true;
            s.generation
        });
        tracing::debug!(%generation, query = %params.query, hybrid = params.hybrid, "refresh started");

        let token = CancellationToken::new();
        self.inflight = Some(token.clone());
        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let analytics = self.analytics.clone();

        tokio::spawn(async move {
            let both = futures::future::join(api.facets(&params), api.search(&params));
            let (facets, products) = tokio::select! {
                biased;
                () = token.cancelled() => {
                    tracing::debug!(%generation, "refresh superseded before settling");
                    return;
                }
                settled = both => settled,
            };

            if let Err(err) = &facets {
                tracing::warn!(%generation, error = %err, "facet fetch failed; keeping previous counts");
            }
            if let Err(err) = &products {
                tracing::warn!(%generation, error = %err, "product fetch failed; keeping previous results");
            }

            let mut performed = None;
            let applied = state.send_if_modified(|s| {
                if s.generation != generation {
                    return false;
                }
                s.loading = false;
                s.settled += 1;
                if let Ok(counts) = facets {
                    s.facets = counts;
                }
                if let Ok(list) = products {
                    performed = Some(AnalyticsEvent::search_performed(&params.query, &list));
                    s.products = list;
                }
                true
            });

            if !applied {
                tracing::debug!(%generation, "discarding results of a superseded refresh");
            } else if let Some(event) = performed {
                analytics.emit(&event);
            }
        });
        generation
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.inflight.take() {
            token.cancel();
        }
    }
}

impl Drop for QueryCoordinator {
    fn drop(&mut self) {
        self.cancel();
    }
}
