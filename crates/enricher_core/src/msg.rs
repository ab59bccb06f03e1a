use crate::{EnrichmentResult, ErrorKind, RunId};

/// Outcome of one agent run as reported back to the form.
pub type RunOutcome = Result<EnrichmentResult, RunFailure>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl RunFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the lead identifier input.
    QueryChanged(String),
    /// User asked to enrich the current query.
    SubmitClicked,
    /// Engine settled a run, successfully or not.
    RunFinished { run_id: RunId, outcome: RunOutcome },
}
