use std::fmt;

use crate::view_model::FormViewModel;

pub type RunId = u64;

/// Text returned by the agent for a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentResult {
    pub result: String,
}

impl EnrichmentResult {
    pub fn new(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Query was blank; no request was made.
    EmptyInput,
    /// The request never produced an HTTP response.
    Transport,
    /// The agent answered with a non-success status.
    RunFailed,
    /// The agent answered 2xx with a body of the wrong shape.
    InvalidOutputFormat,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::EmptyInput => write!(f, "empty input"),
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::RunFailed => write!(f, "run failed"),
            ErrorKind::InvalidOutputFormat => write!(f, "invalid output format"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormError {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Completed,
}

/// State owned by the lead enrichment form.
///
/// `result` and `error` are never both populated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    query: String,
    in_flight: bool,
    result: Option<EnrichmentResult>,
    error: Option<FormError>,
    last_run_id: RunId,
    dirty: bool,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> FormViewModel {
        FormViewModel {
            query: self.query.clone(),
            loading: self.in_flight,
            result: self.result.as_ref().map(|r| r.result.clone()),
            error: self.error.as_ref().map(|e| e.message.clone()),
            error_kind: self.error.as_ref().map(|e| e.kind),
            submit_enabled: !self.in_flight && !self.query.trim().is_empty(),
            run_state: self.run_state(),
            dirty: self.dirty,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn result(&self) -> Option<&EnrichmentResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&FormError> {
        self.error.as_ref()
    }

    pub fn run_state(&self) -> RunState {
        if self.in_flight {
            RunState::Running
        } else if self.result.is_some() || self.error.is_some() {
            RunState::Completed
        } else {
            RunState::Idle
        }
    }

    /// Returns whether the state changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_query(&mut self, text: String) {
        if self.query != text {
            self.query = text;
            self.dirty = true;
        }
        if self.error.take().is_some() {
            self.dirty = true;
        }
    }

    pub(crate) fn set_error(&mut self, kind: ErrorKind, message: impl Into<String>) {
        self.result = None;
        self.error = Some(FormError {
            kind,
            message: message.into(),
        });
        self.dirty = true;
    }

    /// Marks a run in flight and clears the previous outcome.
    pub(crate) fn begin_run(&mut self) -> RunId {
        self.in_flight = true;
        self.error = None;
        self.result = None;
        self.last_run_id += 1;
        self.dirty = true;
        self.last_run_id
    }

    pub(crate) fn set_result(&mut self, result: EnrichmentResult) {
        self.error = None;
        self.result = Some(result);
        self.dirty = true;
    }

    pub(crate) fn finish_run(&mut self) {
        self.in_flight = false;
        self.dirty = true;
    }
}
