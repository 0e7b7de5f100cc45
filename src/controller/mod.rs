//! Search state management
//!
//! - **`debounce`**: explicit, clock-driven quiet-period timer
//! - **`state`**: phases and the render decision
//! - **`controller`**: the state machine tying input, catalog and trend store together

pub mod controller;
pub mod debounce;
pub mod state;

pub use controller::{run_fetch, BgMessage, SearchController};
pub use debounce::Debouncer;
pub use state::{Phase, ResultsView, SearchState};
