//! storefront-engine
//!
//! Search-state coordination: debounced suggestions, keyboard/mouse navigation
//! of the suggestion panel, generation-guarded result refreshes and the detail
//! view, composed behind a single [`Session`].
#![deny(unused_imports)]

pub mod coordinator;
pub mod debounce;
pub mod detail;
pub mod search_box;
pub mod session;
mod state;
pub mod view;

pub use coordinator::{QueryCoordinator, ResultsState};
pub use debounce::SuggestionFetcher;
pub use detail::{DetailController, DetailState, DETAIL_ERROR_MESSAGE};
pub use search_box::{InputChange, Key, KeyOutcome, SearchBoxState};
pub use session::{Session, SessionInputs, SessionWatch};
pub use view::{FacetRow, ViewModel};
