use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub assistant: AssistantConfig,
    pub store: StoreConfig,
    pub tools: ToolsConfig,
    pub runtime: RuntimeConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub mongodb_uri: String,
    /// Messaging-channel credentials for downloading media (optional).
    #[serde(default)]
    pub channel_account_sid: Option<String>,
    #[serde(default)]
    pub channel_auth_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    pub assistant_id: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_tool_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_run_max_wait_seconds")]
    pub run_max_wait_seconds: u64,
    #[serde(default = "default_max_tool_cycles")]
    pub max_tool_cycles: usize,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_tool_timeout_seconds() -> u64 {
    60
}

fn default_run_max_wait_seconds() -> u64 {
    60
}

fn default_max_tool_cycles() -> usize {
    5
}

impl Settings {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (with ASSISTANT_, STORE_, etc. prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::default()
                    .prefix("ASSISTANT")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("STORE")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("TOOLS")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("RUNTIME")
                    .separator("_")
                    .try_parsing(true),
            );

        let config = builder.build()?;

        let mut settings: Settings = config.try_deserialize()?;

        // Load secrets from ENV (not in TOML)
        settings.openai_api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ConfigError::Message("OPENAI_API_KEY environment variable is required".to_string())
        })?;
        settings.mongodb_uri = std::env::var("MONGODB_URI").map_err(|_| {
            ConfigError::Message("MONGODB_URI environment variable is required".to_string())
        })?;
        settings.channel_account_sid = std::env::var("CHANNEL_ACCOUNT_SID").ok();
        settings.channel_auth_token = std::env::var("CHANNEL_AUTH_TOKEN").ok();

        Ok(settings)
    }

    /// Load settings from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }
}
