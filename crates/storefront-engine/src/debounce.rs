use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use storefront_core::traits::SearchApi;

use crate::search_box::{InputChange, SearchBoxState};

/// Turns buffer edits into at most one suggestion lookup per quiet period.
///
/// Only one schedule is ever pending: each edit cancels the previous one, and
/// a lookup that is already in flight for an older revision is dropped by the
/// revision check in [`SearchBoxState::apply_suggestions`].
pub struct SuggestionFetcher {
    api: Arc<dyn SearchApi>,
    state: Arc<watch::Sender<SearchBoxState>>,
    debounce: Duration,
    limit: usize,
    pending: Option<CancellationToken>,
}

impl SuggestionFetcher {
    pub fn new(
        api: Arc<dyn SearchApi>,
        state: Arc<watch::Sender<SearchBoxState>>,
        debounce: Duration,
        limit: usize,
    ) -> Self {
        Self { api, state, debounce, limit, pending: None }
    }

    pub fn on_input(&mut self, change: InputChange) {
        self.cancel_pending();
        let InputChange::Lookup { prefix, revision } = change else {
            return;
        };

        let token = CancellationToken::new();
        self.pending = Some(token.clone());
        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let (debounce, limit) = (self.debounce, self.limit);

        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => return,
                () = tokio::time::sleep(debounce) => {}
            }
            let outcome = tokio::select! {
                biased;
                () = token.cancelled() => return,
                outcome = api.suggest(&prefix, limit) => outcome,
            };
            let applied = state.send_if_modified(|s| match outcome {
                Ok(list) => s.apply_suggestions(revision, list),
                Err(err) => {
                    tracing::debug!(%prefix, error = %err, "suggestion lookup failed");
                    s.fail_suggestions(revision)
                }
            });
            if !applied {
                tracing::debug!(%prefix, revision, "discarding suggestions for a stale buffer");
            }
        });
    }

    pub fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for SuggestionFetcher {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
