use std::fmt;

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.crossnode.ai";
pub const DEFAULT_AGENT_ID: &str = "9e471e8b-7835-451c-acf3-bc6d628a06b2";

pub const API_URL_VAR: &str = "CROSSNODE_API_URL";
pub const API_KEY_VAR: &str = "CROSSNODE_API_KEY";
pub const AGENT_ID_VAR: &str = "CROSSNODE_AGENT_ID";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{0} is set but empty")]
    Empty(&'static str),
}

/// Where and as whom the agent is invoked. Opaque to the form.
#[derive(Clone, PartialEq, Eq)]
pub struct AgentSettings {
    pub base_url: String,
    pub agent_id: String,
    pub api_key: String,
}

impl AgentSettings {
    pub fn new(
        base_url: impl Into<String>,
        agent_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            agent_id: agent_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    ///
    /// The API key is required; URL and agent id fall back to the defaults
    /// when unset or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR).ok_or(ConfigError::Missing(API_KEY_VAR))?;
        if api_key.trim().is_empty() {
            return Err(ConfigError::Empty(API_KEY_VAR));
        }
        let base_url = non_blank(lookup(API_URL_VAR)).unwrap_or_else(|| DEFAULT_API_URL.into());
        let agent_id = non_blank(lookup(AGENT_ID_VAR)).unwrap_or_else(|| DEFAULT_AGENT_ID.into());

        Ok(Self {
            base_url,
            agent_id,
            api_key,
        })
    }

    /// Full run endpoint: `{base_url}/api/v1/agents/{agent_id}/run`.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/api/v1/agents/{}/run",
            self.base_url.trim_end_matches('/'),
            self.agent_id
        )
    }
}

impl fmt::Debug for AgentSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentSettings")
            .field("base_url", &self.base_url)
            .field("agent_id", &self.agent_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
