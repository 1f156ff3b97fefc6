//! Composition root. The session owns every input (submitted term, facet
//! selection, hybrid flag, theme); background tasks only ever write results.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use storefront_core::analytics::{Analytics, AnalyticsEvent};
use storefront_core::config::StorefrontConfig;
use storefront_core::facets::{FacetGroup, FacetSelection, SearchParams};
use storefront_core::theme::{MemoryThemeStore, Theme};
use storefront_core::traits::{SearchApi, ThemeStore};
use storefront_core::types::Generation;

use crate::coordinator::{QueryCoordinator, ResultsState};
use crate::debounce::SuggestionFetcher;
use crate::detail::{DetailController, DetailState};
use crate::search_box::{Key, KeyOutcome, SearchBoxState};
use crate::state::update;
use crate::view::ViewModel;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionInputs {
    pub term: String,
    pub selection: FacetSelection,
    pub hybrid: bool,
    pub theme: Theme,
}

impl SessionInputs {
    pub fn params(&self) -> SearchParams {
        SearchParams::new(self.term.clone(), self.selection.clone(), self.hybrid)
    }
}

/// Receivers for reactive rendering.
#[derive(Debug, Clone)]
pub struct SessionWatch {
    pub inputs: watch::Receiver<SessionInputs>,
    pub search_box: watch::Receiver<SearchBoxState>,
    pub results: watch::Receiver<ResultsState>,
    pub detail: watch::Receiver<DetailState>,
}

pub struct Session {
    inputs: watch::Sender<SessionInputs>,
    search_box: Arc<watch::Sender<SearchBoxState>>,
    fetcher: SuggestionFetcher,
    coordinator: QueryCoordinator,
    detail: DetailController,
    analytics: Analytics,
    theme_store: Arc<dyn ThemeStore>,
    last_issued: Option<SearchParams>,
    mounted: bool,
    blur_close: Duration,
    placeholder_image: String,
    shutdown: CancellationToken,
}

impl Session {
    pub fn new(api: Arc<dyn SearchApi>, config: &StorefrontConfig) -> Self {
        let (inputs, _rx) = watch::channel(SessionInputs { theme: config.ui.theme, ..SessionInputs::default() });
        let (search_box, _rx) = watch::channel(SearchBoxState::default());
        let search_box = Arc::new(search_box);
        let analytics = Analytics::disabled();

        Self {
            fetcher: SuggestionFetcher::new(
                Arc::clone(&api),
                Arc::clone(&search_box),
                config.suggest.debounce(),
                config.suggest.limit,
            ),
            coordinator: QueryCoordinator::new(Arc::clone(&api), analytics.clone()),
            detail: DetailController::new(api),
            inputs,
            search_box,
            analytics,
            theme_store: Arc::new(MemoryThemeStore::default()),
            last_issued: None,
            mounted: false,
            blur_close: config.suggest.blur_close(),
            placeholder_image: config.ui.placeholder_image.clone(),
            shutdown: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_analytics(mut self, analytics: Analytics) -> Self {
        self.coordinator.set_analytics(analytics.clone());
        self.analytics = analytics;
        self
    }

    /// Installs the preference store and adopts its saved theme, if any.
    #[must_use]
    pub fn with_theme_store(mut self, store: Arc<dyn ThemeStore>) -> Self {
        match store.load() {
            Ok(Some(theme)) => self.inputs.send_modify(|i| i.theme = theme),
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "could not load saved theme; using default"),
        }
        self.theme_store = store;
        self
    }

    /// First render: page view plus the initial match-all refresh. Later calls do nothing.
    pub fn mount(&mut self) -> Option<Generation> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        self.analytics.emit(&AnalyticsEvent::page_view());
        self.refresh_if_changed()
    }

    pub fn input(&mut self, text: &str) {
        let change = update(&self.search_box, |s| s.set_buffer(text));
        self.fetcher.on_input(change);
    }

    pub fn key(&mut self, key: Key) -> KeyOutcome {
        let outcome = update(&self.search_box, |s| s.key(key));
        self.after_outcome(&outcome);
        outcome
    }

    pub fn hover(&mut self, index: usize) {
        self.search_box.send_if_modified(|s| s.hover(index));
    }

    pub fn select(&mut self, index: usize) -> KeyOutcome {
        let outcome = update(&self.search_box, |s| s.select(index));
        self.after_outcome(&outcome);
        outcome
    }

    pub fn press_search(&mut self) -> KeyOutcome {
        let outcome = update(&self.search_box, SearchBoxState::submit_plain);
        self.after_outcome(&outcome);
        outcome
    }

    pub fn focus(&mut self) {
        self.search_box.send_modify(SearchBoxState::focus);
    }

    /// Hides the panel after the blur delay unless focus returns first.
    pub fn blur(&mut self) {
        let ticket = update(&self.search_box, SearchBoxState::blur);
        let state = Arc::clone(&self.search_box);
        let shutdown = self.shutdown.child_token();
        let delay = self.blur_close;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    state.send_if_modified(|s| s.close_after_blur(ticket));
                }
            }
        });
    }

    pub fn toggle_facet(&mut self, group: FacetGroup, id: &str) -> Option<Generation> {
        self.inputs.send_modify(|i| i.selection = i.selection.toggle(group, id));
        self.refresh_if_changed()
    }

    pub fn clear_facets(&mut self) -> Option<Generation> {
        self.inputs.send_if_modified(|i| {
            let had_any = !i.selection.is_empty();
            i.selection.clear();
            had_any
        });
        self.refresh_if_changed()
    }

    pub fn set_hybrid(&mut self, hybrid: bool) -> Option<Generation> {
        self.inputs.send_if_modified(|i| std::mem::replace(&mut i.hybrid, hybrid) != hybrid);
        self.refresh_if_changed()
    }

    /// Card activation: click event first, then the detail view.
    pub fn activate_result(&mut self, id: &str) -> Generation {
        let products = self.coordinator.snapshot().products;
        let event = AnalyticsEvent::result_clicked(id, &self.inputs.borrow().term, &products);
        self.analytics.emit(&event);
        self.detail.open(id)
    }

    pub fn close_detail(&mut self) {
        self.detail.close();
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let theme = update(&self.inputs, |i| {
            i.theme = i.theme.toggled();
            i.theme
        });
        if let Err(err) = self.theme_store.save(theme) {
            tracing::warn!(%theme, error = %err, "could not persist theme");
        }
        theme
    }

    pub fn theme(&self) -> Theme {
        self.inputs.borrow().theme
    }

    pub fn is_loading(&self) -> bool {
        self.coordinator.snapshot().loading
    }

    pub fn snapshot(&self) -> ViewModel {
        let inputs = self.inputs.borrow().clone();
        let search_box = self.search_box.borrow().clone();
        let results = self.coordinator.snapshot();
        ViewModel {
            term: inputs.term,
            selection: inputs.selection,
            hybrid: inputs.hybrid,
            theme: inputs.theme,
            suggestions_visible: search_box.panel_visible(),
            active_suggestion: search_box.active,
            buffer: search_box.buffer,
            suggestions: search_box.suggestions,
            generation: results.generation,
            loading: results.loading,
            products: results.products,
            facets: results.facets,
            detail: self.detail.snapshot(),
            placeholder_image: self.placeholder_image.clone(),
        }
    }

    pub fn watch(&self) -> SessionWatch {
        SessionWatch {
            inputs: self.inputs.subscribe(),
            search_box: self.search_box.subscribe(),
            results: self.coordinator.subscribe(),
            detail: self.detail.subscribe(),
        }
    }

    /// Invalidates every pending timer and in-flight fetch. Idempotent.
    pub fn shutdown(&mut self) {
        self.shutdown.cancel();
        self.fetcher.cancel_pending();
        self.coordinator.cancel();
        self.detail.cancel();
    }

    fn after_outcome(&mut self, outcome: &KeyOutcome) {
        if let Some(term) = &outcome.submit {
            self.submit(term);
        }
    }

    fn submit(&mut self, term: &str) {
        self.fetcher.cancel_pending();
        self.inputs.send_if_modified(|i| {
            if i.term == term {
                return false;
            }
            i.term = term.to_string();
            true
        });
        self.refresh_if_changed();
    }

    /// Issues a refresh only when the dependency tuple moved since the last one.
    fn refresh_if_changed(&mut self) -> Option<Generation> {
        if !self.mounted {
            return None;
        }
        let params = self.inputs.borrow().params();
        if self.last_issued.as_ref() == Some(&params) {
            return None;
        }
        self.last_issued = Some(params.clone());
        Some(self.coordinator.refresh(params))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
