//! Controller configuration.
//!
//! Layered with figment: built-in defaults, then an optional TOML file, then
//! `TODO_*` environment variables (`TODO_BASE_URL`, `TODO_API_PREFIX`,
//! `TODO_ADD_STRATEGY`, `TODO_TIMEOUT_SECS`).

use std::path::Path;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::TodoClient;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// How `add` reaches the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddStrategy {
    /// Append the server's todo once the create call succeeds.
    Confirmed,
    /// Show a provisional entry at the top immediately, reconcile later.
    #[default]
    Optimistic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub base_url: String,
    /// Path segment in front of `/todos`, e.g. `"api"`.
    #[serde(default)]
    pub api_prefix: String,
    #[serde(default)]
    pub add_strategy: AddStrategy,
    /// Per-request timeout for `HttpTodoService`. None leaves it to the agent.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: String::new(),
            add_strategy: AddStrategy::default(),
            timeout_secs: None,
        }
    }
}

impl ControllerConfig {
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(ControllerConfig::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed("TODO_"))
    }

    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let config: ControllerConfig = Self::figment(file).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Validation {
                field: "base_url".into(),
                reason: format!("expected an http(s) URL, got '{}'", self.base_url),
            });
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Validation {
                field: "timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn client(&self) -> TodoClient {
        TodoClient::with_prefix(&self.base_url, &self.api_prefix)
    }
}
