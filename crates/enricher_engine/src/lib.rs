//! Lead enricher engine: agent API client and effect execution.
mod client;
mod engine;
mod settings;
mod types;

pub use client::{AgentRunner, ReqwestAgentClient};
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use settings::{
    AgentSettings, ConfigError, API_KEY_VAR, API_URL_VAR, AGENT_ID_VAR, DEFAULT_AGENT_ID,
    DEFAULT_API_URL,
};
pub use types::{
    AgentOutput, EngineEvent, InputData, RunError, RunId, RunRequest, RunResponse, StartInput,
};
