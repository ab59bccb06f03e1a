use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use engine_logging::{LevelFilter, LogDestination};
use enricher_engine::AgentSettings;

#[derive(Parser, Debug)]
#[command(
    name = "lead-enricher",
    version,
    about = "Enrich a lead (email or company domain) through the remote enrichment agent",
    after_help = "The API key is read from CROSSNODE_API_KEY. CROSSNODE_API_URL and \
                  CROSSNODE_AGENT_ID override the default endpoint."
)]
pub struct Cli {
    /// Lead to enrich; omit to read one lead per line from stdin
    pub query: Option<String>,

    /// Base URL of the agent API
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Agent identifier to run
    #[arg(long, value_name = "ID")]
    pub agent_id: Option<String>,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log_to: LogTarget,

    /// Log file used by the `file` and `both` targets
    #[arg(long, value_name = "PATH", default_value = "lead_enricher.log")]
    pub log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
    Off,
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        match self.log_to {
            LogTarget::File => LogDestination::File(self.log_file.clone()),
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both(self.log_file.clone()),
            LogTarget::Off => LogDestination::Off,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// Environment settings with command line overrides applied.
    pub fn agent_settings(&self) -> Result<AgentSettings> {
        let settings = AgentSettings::from_env().context("agent API is not configured")?;
        Ok(self.apply_overrides(settings))
    }

    fn apply_overrides(&self, mut settings: AgentSettings) -> AgentSettings {
        if let Some(url) = &self.api_url {
            settings.base_url = url.clone();
        }
        if let Some(agent_id) = &self.agent_id {
            settings.agent_id = agent_id.clone();
        }
        settings
    }
}
