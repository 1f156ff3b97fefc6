use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use storefront_core::traits::SearchApi;
use storefront_core::types::{Generation, ProductDetail, ProductId};

use crate::state::update;

pub const DETAIL_ERROR_MESSAGE: &str = "Failed to load product details";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    pub open: bool,
    pub active_id: Option<ProductId>,
    pub loading: bool,
    pub entity: Option<ProductDetail>,
    pub error: Option<String>,
    request: Generation,
}

impl DetailState {
    /// Stamp of the most recent open or close.
    pub fn request(&self) -> Generation {
        self.request
    }
}

/// Loads one product on demand. Only the latest request may write the view.
pub struct DetailController {
    api: Arc<dyn SearchApi>,
    state: Arc<watch::Sender<DetailState>>,
    inflight: Option<CancellationToken>,
}

impl DetailController {
    pub fn new(api: Arc<dyn SearchApi>) -> Self {
        let (tx, _rx) = watch::channel(DetailState::default());
        Self { api, state: Arc::new(tx), inflight: None }
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> DetailState {
        self.state.borrow().clone()
    }

    pub fn open(&mut self, id: &str) -> Generation {
        self.cancel();
        let request = update(&self.state, |s| {
            s.request = s.request.next();
            s.open = true;
            s.active_id = Some(id.to_string());
            s.loading = true;
            s.entity = None;
            s.error = None;
            s.request
        });

        let token = CancellationToken::new();
        self.inflight = Some(token.clone());
        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let id = id.to_string();

        tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                () = token.cancelled() => return,
                outcome = api.product(&id) => outcome,
            };
            let applied = state.send_if_modified(|s| {
                if s.request != request || !s.open {
                    return false;
                }
                s.loading = false;
                match outcome {
                    Ok(entity) => s.entity = Some(entity),
                    Err(err) => {
                        tracing::debug!(%id, error = %err, "product detail fetch failed");
                        s.error = Some(DETAIL_ERROR_MESSAGE.to_string());
                    }
                }
                true
            });
            if !applied {
                tracing::debug!(%id, %request, "discarding detail for a superseded request");
            }
        });
        request
    }

    pub fn close(&mut self) {
        self.cancel();
        self.state.send_modify(|s| {
            s.request = s.request.next();
            s.open = false;
            s.active_id = None;
            s.loading = false;
            s.entity = None;
            s.error = None;
        });
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.inflight.take() {
            token.cancel();
        }
    }
}

impl Drop for DetailController {
    fn drop(&mut self) {
        self.cancel();
    }
}
