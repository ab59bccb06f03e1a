//! Lead enricher core: pure form state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, Notification, Severity};
pub use msg::{Msg, RunFailure, RunOutcome};
pub use state::{EnrichmentResult, ErrorKind, FormError, FormState, RunId, RunState};
pub use update::{
    update, EMPTY_QUERY_DESCRIPTION, EMPTY_QUERY_MESSAGE, FAILURE_TITLE, SUCCESS_TITLE,
};
pub use view_model::FormViewModel;
