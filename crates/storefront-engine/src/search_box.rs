//! Live input buffer and the suggestion panel's navigation state.
//!
//! Everything here is synchronous. Timers and lookups live in
//! [`crate::debounce`] and the session; they report back through
//! [`SearchBoxState::apply_suggestions`] and friends, tagged with the
//! revision they were started for.

use storefront_core::types::Suggestion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Other,
}

/// What the front end should do after a key or pointer event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    /// Suppress the key's default behaviour (caret movement, blur).
    pub prevent_default: bool,
    /// Trimmed term to submit, if the event was a submit.
    pub submit: Option<String>,
}

impl KeyOutcome {
    fn prevented() -> Self {
        Self { prevent_default: true, submit: None }
    }
}

/// Result of editing the buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputChange {
    /// Buffer is blank; list and panel were cleared synchronously.
    #[default]
    Cleared,
    /// A lookup for `prefix` should fire once input goes quiet.
    Lookup { prefix: String, revision: u64 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchBoxState {
    pub buffer: String,
    pub suggestions: Vec<Suggestion>,
    pub open: bool,
    pub active: Option<usize>,
    pub focused: bool,
    revision: u64,
    settled: u64,
    blur_ticket: u64,
}

impl SearchBoxState {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Numeric view of the active row, `-1` when nothing is highlighted.
    pub fn active_index(&self) -> isize {
        self.active.and_then(|i| isize::try_from(i).ok()).unwrap_or(-1)
    }

    pub fn panel_visible(&self) -> bool {
        self.open && !self.suggestions.is_empty()
    }

    /// No lookup is outstanding for the current buffer.
    pub fn is_settled(&self) -> bool {
        self.settled == self.revision
    }

    pub fn set_buffer(&mut self, text: &str) -> InputChange {
        self.buffer = text.trim_start().to_string();
        self.revision += 1;
        let prefix = self.buffer.trim();
        if prefix.is_empty() {
            self.clear_list();
            self.settled = self.revision;
            return InputChange::Cleared;
        }
        InputChange::Lookup { prefix: prefix.to_string(), revision: self.revision }
    }

    /// Applies a lookup result. Returns false when the buffer moved on since `revision`.
    pub fn apply_suggestions(&mut self, revision: u64, list: Vec<Suggestion>) -> bool {
        if revision != self.revision {
            return false;
        }
        self.suggestions = list;
        self.open = true;
        self.active = None;
        self.settled = revision;
        true
    }

    pub fn fail_suggestions(&mut self, revision: u64) -> bool {
        if revision != self.revision {
            return false;
        }
        self.suggestions.clear();
        self.active = None;
        self.settled = revision;
        true
    }

    pub fn key(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::ArrowDown => {
                let last = self.suggestions.len().checked_sub(1);
                self.active = last.map(|last| self.active.map_or(0, |i| (i + 1).min(last)));
                KeyOutcome::prevented()
            }
            Key::ArrowUp => {
                if !self.suggestions.is_empty() {
                    self.active = Some(self.active.map_or(0, |i| i.saturating_sub(1)));
                }
                KeyOutcome::prevented()
            }
            Key::Escape => {
                self.open = false;
                KeyOutcome::default()
            }
            Key::Enter => match self.active {
                Some(i) if self.open && i < self.suggestions.len() => self.pick(i),
                _ => self.submit_plain(),
            },
            Key::Other => KeyOutcome::default(),
        }
    }

    pub fn hover(&mut self, index: usize) -> bool {
        if index >= self.suggestions.len() {
            return false;
        }
        self.active = Some(index);
        true
    }

    /// Pointer press on a candidate. Suppresses the blur the press would cause.
    pub fn select(&mut self, index: usize) -> KeyOutcome {
        if index >= self.suggestions.len() {
            return KeyOutcome::default();
        }
        KeyOutcome { prevent_default: true, ..self.pick(index) }
    }

    /// Enter without a highlighted candidate, or the search button.
    pub fn submit_plain(&mut self) -> KeyOutcome {
        self.clear_list();
        self.buffer = self.buffer.trim().to_string();
        self.revision += 1;
        self.settled = self.revision;
        KeyOutcome { prevent_default: false, submit: Some(self.buffer.clone()) }
    }

    pub fn focus(&mut self) {
        self.focused = true;
        self.blur_ticket += 1;
        if !self.suggestions.is_empty() {
            self.open = true;
        }
    }

    /// Returns the ticket a delayed [`SearchBoxState::close_after_blur`] must present.
    pub fn blur(&mut self) -> u64 {
        self.focused = false;
        self.blur_ticket += 1;
        self.blur_ticket
    }

    pub fn close_after_blur(&mut self, ticket: u64) -> bool {
        if ticket != self.blur_ticket || self.focused || !self.open {
            return false;
        }
        self.open = false;
        true
    }

    fn pick(&mut self, index: usize) -> KeyOutcome {
        let name = self.suggestions.get(index).map(|s| s.name.trim().to_string()).unwrap_or_default();
        self.buffer = name.clone();
        self.clear_list();
        // Invalidates any lookup still pending for the old buffer.
        self.revision += 1;
        self.settled = self.revision;
        KeyOutcome { prevent_default: false, submit: Some(name) }
    }

    fn clear_list(&mut self) {
        self.suggestions.clear();
        self.open = false;
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn suggestion(id: &str, name: &str) -> Suggestion {
        Suggestion { id: id.to_string(), name: name.to_string(), brand: None }
    }

    fn open_with(names: &[&str]) -> SearchBoxState {
        let mut state = SearchBoxState::default();
        let InputChange::Lookup { revision, .. } = state.set_buffer("sh") else {
            panic!("expected a lookup");
        };
        let list = names.iter().enumerate().map(|(i, n)| suggestion(&i.to_string(), n)).collect();
        assert!(state.apply_suggestions(revision, list));
        state
    }

    #[test]
    fn leading_whitespace_is_stripped_and_blank_clears() {
        let mut state = open_with(&["Shoe"]);
        assert_eq!(state.set_buffer("   red "), InputChange::Lookup { prefix: "red".into(), revision: 2 });
        assert_eq!(state.buffer, "red ", "trailing whitespace survives until submit");

        assert_eq!(state.set_buffer("   "), InputChange::Cleared);
        assert!(state.suggestions.is_empty());
        assert!(!state.panel_visible());
    }

    #[test]
    fn stale_lookup_results_are_ignored() {
        let mut state = SearchBoxState::default();
        let InputChange::Lookup { revision: old, .. } = state.set_buffer("re") else { panic!() };
        state.set_buffer("red");

        assert!(!state.apply_suggestions(old, vec![suggestion("1", "Red")]));
        assert!(!state.fail_suggestions(old));
        assert!(state.suggestions.is_empty());
        assert!(!state.is_settled(), "lookup for the current buffer still outstanding");
    }

    #[test]
    fn arrows_clamp_to_list_bounds() {
        let mut state = open_with(&["a", "b"]);
        assert_eq!(state.active_index(), -1);

        assert!(state.key(Key::ArrowDown).prevent_default);
        assert_eq!(state.active, Some(0));
        state.key(Key::ArrowDown);
        state.key(Key::ArrowDown);
        assert_eq!(state.active, Some(1), "clamped at last row");

        state.key(Key::ArrowUp);
        state.key(Key::ArrowUp);
        assert!(state.key(Key::ArrowUp).prevent_default);
        assert_eq!(state.active, Some(0), "clamped at first row");
    }

    #[test]
    fn arrow_up_from_nothing_lands_on_first_row() {
        let mut state = open_with(&["a", "b"]);
        state.key(Key::ArrowUp);
        assert_eq!(state.active, Some(0));
    }

    #[test]
    fn arrows_on_empty_list_keep_no_selection() {
        let mut state = SearchBoxState::default();
        state.key(Key::ArrowDown);
        state.key(Key::ArrowUp);
        assert_eq!(state.active, None);
    }

    #[test]
    fn escape_closes_but_keeps_list_for_focus() {
        let mut state = open_with(&["a"]);
        assert!(!state.key(Key::Escape).prevent_default);
        assert!(!state.panel_visible());
        assert_eq!(state.suggestions.len(), 1);

        state.focus();
        assert!(state.panel_visible());
    }

    #[test]
    fn enter_with_highlight_submits_candidate_name() {
        let mut state = open_with(&["  Red Shoes ", "Red Socks"]);
        state.key(Key::ArrowDown);

        let outcome = state.key(Key::Enter);
        assert_eq!(outcome.submit.as_deref(), Some("Red Shoes"));
        assert_eq!(state.buffer, "Red Shoes");
        assert!(state.suggestions.is_empty());
        assert!(!state.open);
    }

    #[test]
    fn enter_without_highlight_trims_and_submits_buffer() {
        let mut state = open_with(&["Red Shoes"]);
        state.set_buffer("red shoe  ");
        let outcome = state.key(Key::Enter);
        assert_eq!(outcome, KeyOutcome { prevent_default: false, submit: Some("red shoe".into()) });
        assert_eq!(state.buffer, "red shoe");
    }

    #[test]
    fn enter_after_escape_submits_buffer_not_highlight() {
        let mut state = open_with(&["Red Shoes"]);
        state.key(Key::ArrowDown);
        state.key(Key::Escape);
        assert_eq!(state.key(Key::Enter).submit.as_deref(), Some("sh"));
    }

    #[test]
    fn hover_sets_highlight_without_closing() {
        let mut state = open_with(&["a", "b", "c"]);
        assert!(state.hover(2));
        assert!(!state.hover(3));
        assert_eq!(state.active, Some(2));
        assert!(state.panel_visible());
    }

    #[test]
    fn select_prevents_blur_and_submits() {
        let mut state = open_with(&["a", "b"]);
        let outcome = state.select(1);
        assert!(outcome.prevent_default);
        assert_eq!(outcome.submit.as_deref(), Some("b"));
        assert_eq!(state.select(5), KeyOutcome::default());
    }

    #[test]
    fn refocus_invalidates_pending_blur_close() {
        let mut state = open_with(&["a"]);
        state.focus();
        let ticket = state.blur();
        state.focus();
        assert!(!state.close_after_blur(ticket));
        assert!(state.panel_visible());

        let ticket = state.blur();
        assert!(state.close_after_blur(ticket));
        assert!(!state.panel_visible());
    }
}
