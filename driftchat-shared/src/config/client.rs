use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};
use thiserror::Error;
use url::Url;

/// Errors raised while loading the client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid {name} value: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// The client-side configuration for DriftChat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the chat API, e.g. `http://localhost:3000/api/`.
    pub api_base_url: Url,

    /// Model preselected for new conversations.
    pub default_model: Option<String>,

    /// Logging level filter passed to the subscriber.
    pub log_level: String,

    /// Whether partial assistant text stays visible after a failed stream.
    pub keep_partial_on_error: bool,
}

impl ClientConfig {
    /// Generates a default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: Url::parse("http://localhost:3000/api/").expect("static URL"),
            default_model: None,
            log_level: "info".to_string(),
            keep_partial_on_error: true,
        }
    }

    /// Loads the configuration from a TOML file, environment variables, or defaults.
    ///
    /// Precedence: file values, then `DRIFTCHAT_*` environment variables for
    /// anything the file left at its default, then built-in defaults.
    pub fn load_config(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let defaults = Self::with_defaults();
        let mut config = defaults.clone();

        if let Some(path) = config_path {
            let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        }

        config.apply_env_overrides(&defaults, |name| env::var(name).ok())?;

        if config.api_base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                name: "api_base_url".to_string(),
                reason: "must be an HTTP(S) base URL".to_string(),
            });
        }

        Ok(config)
    }

    /// Applies `DRIFTCHAT_*` overrides to every field still at its
    /// default, so explicit file values always win. The lookup is
    /// injected to keep the merge testable without touching the process
    /// environment.
    fn apply_env_overrides(
        &mut self,
        defaults: &Self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if self.api_base_url == defaults.api_base_url {
            if let Some(raw) = lookup("DRIFTCHAT_API_BASE_URL") {
                self.api_base_url =
                    Url::parse(&raw).map_err(|err| ConfigError::InvalidValue {
                        name: "DRIFTCHAT_API_BASE_URL".to_string(),
                        reason: err.to_string(),
                    })?;
            }
        }
        if self.default_model.is_none() {
            if let Some(model) = lookup("DRIFTCHAT_DEFAULT_MODEL") {
                self.default_model = Some(model);
            }
        }
        if self.log_level == defaults.log_level {
            if let Some(level) = lookup("DRIFTCHAT_LOG_LEVEL") {
                self.log_level = level;
            }
        }
        if self.keep_partial_on_error == defaults.keep_partial_on_error {
            if let Some(raw) = lookup("DRIFTCHAT_KEEP_PARTIAL_ON_ERROR") {
                self.keep_partial_on_error =
                    raw.parse().map_err(|_| ConfigError::InvalidValue {
                        name: "DRIFTCHAT_KEEP_PARTIAL_ON_ERROR".to_string(),
                        reason: format!("expected true or false, got {raw:?}"),
                    })?;
            }
        }
        Ok(())
    }

    /// Renders the configuration as a TOML document, e.g. for the `config` subcommand.
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).expect("config serializes")
    }
}
