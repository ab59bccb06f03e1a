use crate::{ErrorKind, RunState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormViewModel {
    pub query: String,
    /// True while a run is outstanding; drives the "Enriching..." indicator.
    pub loading: bool,
    pub result: Option<String>,
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,
    /// Submit control availability. Front ends must not submit while false
    /// because of `loading`; the core does not guard against overlapping runs.
    pub submit_enabled: bool,
    pub run_state: RunState,
    pub dirty: bool,
}
