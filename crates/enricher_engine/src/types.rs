use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type RunId = u64;

/// Request body for `POST /api/v1/agents/{id}/run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRequest {
    pub input_data: InputData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputData {
    pub start_input: StartInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartInput {
    pub input: String,
}

impl RunRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            input_data: InputData {
                start_input: StartInput {
                    input: query.into(),
                },
            },
        }
    }
}

/// Success body. Anything without a string `output_data.result` is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunResponse {
    pub output_data: AgentOutput,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentOutput {
    pub result: String,
}

/// Optional error body on non-success statuses. `message` may be any JSON value.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) message: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Message text when `message` is truthy: non-empty string, non-zero
    /// number, `true`, or any object or array (rendered as JSON).
    pub(crate) fn message_text(&self) -> Option<String> {
        use serde_json::Value;

        match self.message.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::Bool(true) => Some("true".to_string()),
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(text.clone()),
            Value::Number(number) if number.as_f64() == Some(0.0) => None,
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// The request could not be sent or its body could not be read.
    #[error("{0}")]
    Transport(String),
    /// The agent answered with a non-success status.
    #[error("Agent run failed: {message}")]
    RunFailed { status: u16, message: String },
    /// The agent answered 2xx with a body that is not `{"output_data":{"result":"..."}}`.
    #[error("Invalid agent output format.")]
    InvalidOutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    RunCompleted {
        run_id: RunId,
        result: Result<AgentOutput, RunError>,
    },
}
