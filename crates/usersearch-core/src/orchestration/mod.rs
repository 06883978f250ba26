pub mod controller;
pub mod debounce;
pub mod orchestrator;
pub mod state;

pub use controller::SearchController;
pub use debounce::{DEFAULT_QUIET_PERIOD, QueryDebouncer};
pub use orchestrator::{DEFAULT_PAGE_SIZE, SearchOrchestrator};
pub use state::{
    Notification, RunId, RunOutcome, RunToken, SearchSnapshot, SharedSearchState,
};

use crate::models::CoreError;

pub type OrchestrationResult<T> = Result<T, CoreError>;
