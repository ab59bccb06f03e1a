use std::error::Error as _;

use engine_logging::{engine_debug, engine_error, engine_info};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::settings::AgentSettings;
use crate::types::ErrorBody;
use crate::{AgentOutput, RunError, RunRequest, RunResponse};

/// Runs the enrichment agent for one query.
#[async_trait::async_trait]
pub trait AgentRunner: Send + Sync {
    async fn run(&self, query: &str) -> Result<AgentOutput, RunError>;
}

/// `AgentRunner` backed by the remote agent HTTP API.
///
/// One POST per call: no retries, no timeouts.
#[derive(Debug, Clone)]
pub struct ReqwestAgentClient {
    settings: AgentSettings,
}

impl ReqwestAgentClient {
    pub fn new(settings: AgentSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    fn build_client(&self) -> Result<reqwest::Client, RunError> {
        reqwest::Client::builder()
            .user_agent(concat!("lead-enricher/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| RunError::Transport(describe(&err)))
    }
}

#[async_trait::async_trait]
impl AgentRunner for ReqwestAgentClient {
    async fn run(&self, query: &str) -> Result<AgentOutput, RunError> {
        let endpoint = self.settings.endpoint();
        let client = self.build_client()?;
        let body = serde_json::to_vec(&RunRequest::new(query))
            .map_err(|err| RunError::Transport(err.to_string()))?;

        engine_debug!("POST {} body_len={}", endpoint, body.len());
        let response = client
            .post(&endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.settings.api_key))
            .body(body)
            .send()
            .await
            .map_err(|err| {
                let message = describe(&err);
                engine_error!("Lead enrichment error: {}", message);
                RunError::Transport(message)
            })?;

        let status = response.status();
        if !status.is_success() {
            // An unreadable or malformed error body is treated as empty.
            let bytes = response.bytes().await.unwrap_or_default();
            let error = run_failed(status, &bytes);
            engine_error!("Lead enrichment error: {}", error);
            return Err(error);
        }

        let bytes = response.bytes().await.map_err(|err| {
            let message = describe(&err);
            engine_error!("Lead enrichment error: {}", message);
            RunError::Transport(message)
        })?;

        match serde_json::from_slice::<RunResponse>(&bytes) {
            Ok(parsed) => {
                engine_info!("Agent run ok status={} bytes={}", status.as_u16(), bytes.len());
                Ok(parsed.output_data)
            }
            Err(err) => {
                engine_error!("Lead enrichment error: invalid output ({})", err);
                Err(RunError::InvalidOutputFormat)
            }
        }
    }
}

fn run_failed(status: StatusCode, body: &[u8]) -> RunError {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let message = parsed
        .message_text()
        .unwrap_or_else(|| status_text(status));
    RunError::RunFailed {
        status: status.as_u16(),
        message,
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| status.as_str().to_owned())
}

/// Formats an error with its source chain, e.g. `error sending request: connection refused`.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_message_wins_over_status_text() {
        let err = run_failed(
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"message":"rate limited"}"#,
        );
        assert_eq!(err.to_string(), "Agent run failed: rate limited");
    }

    #[test]
    fn malformed_error_body_falls_back_to_status_text() {
        for body in [
            &b"not json"[..],
            b"",
            br#""oops""#,
            br#"{"message":""}"#,
            br#"{"message":null}"#,
            br#"{"message":0}"#,
            br#"{"message":false}"#,
        ] {
            let err = run_failed(StatusCode::BAD_GATEWAY, body);
            assert_eq!(err.to_string(), "Agent run failed: Bad Gateway");
        }
    }

    #[test]
    fn non_string_message_is_stringified() {
        let err = run_failed(StatusCode::INTERNAL_SERVER_ERROR, br#"{"message":42}"#);
        assert_eq!(err.to_string(), "Agent run failed: 42");

        let err = run_failed(StatusCode::INTERNAL_SERVER_ERROR, br#"{"message":true}"#);
        assert_eq!(err.to_string(), "Agent run failed: true");

        let err = run_failed(
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"message":{"code":"quota"}}"#,
        );
        assert_eq!(err.to_string(), r#"Agent run failed: {"code":"quota"}"#);
    }

    #[test]
    fn error_body_without_message_uses_status_text() {
        let err = run_failed(StatusCode::NOT_FOUND, br#"{"error":"nope"}"#);
        assert_eq!(
            err,
            RunError::RunFailed {
                status: 404,
                message: "Not Found".to_string(),
            }
        );
    }
}
