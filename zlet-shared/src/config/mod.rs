//! # Configuration
//!
//! Client settings shared by the browser and terminal front ends. Native
//! builds can load them from YAML, JSON or TOML files with environment
//! overrides; the browser build only ever uses the defaults plus its
//! compile-time API URL.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::program::{CANCEL_DEADLINE_UNIX, CancellationPolicy, EXCURSION_NAME, PROGRAM_DAYS};

#[cfg(not(target_arch = "wasm32"))]
use std::{env, fs, path::Path};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("unsupported configuration format `{0}`; use yaml, json or toml")]
    UnsupportedFormat(String),

    #[error("invalid {var} value `{value}`")]
    InvalidEnv { var: &'static str, value: String },

    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// On-disk formats understood by [`ClientConfig::load_config`] and
/// [`ClientConfig::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// Maps a file extension or a format name.
    ///
    /// # Errors
    /// [`ConfigError::UnsupportedFormat`] for anything else.
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the registration API.
    pub api_base_url: String,

    /// Days offered by the morning and afternoon pickers, in display order.
    pub program_days: Vec<String>,

    /// Afternoon applications can be cancelled strictly before this instant.
    pub cancel_deadline: DateTime<FixedOffset>,

    /// Offering that can never be cancelled and collapses the roster.
    pub excursion_name: String,

    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ClientConfig {
    pub fn with_defaults() -> Self {
        let cest = FixedOffset::east_opt(2 * 3600).unwrap_or_else(|| Utc.fix());
        let deadline = DateTime::from_timestamp(CANCEL_DEADLINE_UNIX, 0)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
            .with_timezone(&cest);
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            program_days: PROGRAM_DAYS.iter().map(ToString::to_string).collect(),
            cancel_deadline: deadline,
            excursion_name: EXCURSION_NAME.to_string(),
            log_level: "info".to_string(),
        }
    }

    #[must_use]
    pub fn cancellation_policy(&self) -> CancellationPolicy {
        CancellationPolicy {
            deadline: self.cancel_deadline.with_timezone(&Utc),
            non_cancellable: self.excursion_name.clone(),
        }
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// Environment variables only apply to values the file left at their
    /// defaults; `server_override` wins over both.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when the file cannot be read or parsed, an
    /// environment value is malformed, or the result fails [`Self::validate`].
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_config(
        config_path: Option<&Path>,
        server_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::with_defaults();
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => defaults.clone(),
        };

        if config.api_base_url == defaults.api_base_url
            && let Ok(url) = env::var("ZLET_API_URL")
        {
            config.api_base_url = url;
        }
        if config.log_level == defaults.log_level
            && let Ok(level) = env::var("ZLET_LOG_LEVEL")
        {
            config.log_level = level;
        }
        if config.cancel_deadline == defaults.cancel_deadline
            && let Ok(value) = env::var("ZLET_CANCEL_DEADLINE")
        {
            config.cancel_deadline = DateTime::parse_from_rfc3339(value.trim()).map_err(|_| {
                ConfigError::InvalidEnv {
                    var: "ZLET_CANCEL_DEADLINE",
                    value,
                }
            })?;
        }

        if let Some(server) = server_override {
            config.api_base_url = server.to_string();
        }

        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let format = ConfigFormat::parse(extension)?;
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, format)
    }

    /// # Errors
    /// [`ConfigError::Parse`] when `content` is not valid in `format`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Yaml => {
                serde_yml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
            }
            ConfigFormat::Json => {
                serde_json::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
            }
            ConfigFormat::Toml => {
                toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
            }
        }
    }

    /// Serializes the configuration for writing to disk.
    ///
    /// # Errors
    /// [`ConfigError::Parse`] if serialization fails.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn render(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        match format {
            ConfigFormat::Yaml => {
                serde_yml::to_string(self).map_err(|err| ConfigError::Parse(err.to_string()))
            }
            ConfigFormat::Json => {
                serde_json::to_string_pretty(self).map_err(|err| ConfigError::Parse(err.to_string()))
            }
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|err| ConfigError::Parse(err.to_string()))
            }
        }
    }

    /// # Errors
    /// Every problem found, one message each.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        match url::Url::parse(&self.api_base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(format!(
                "API base URL must use http or https, got `{}`",
                url.scheme()
            )),
            Err(err) => errors.push(format!("invalid API base URL `{}`: {err}", self.api_base_url)),
        }

        if self.program_days.is_empty() {
            errors.push("at least one program day is required".to_string());
        }
        for (index, day) in self.program_days.iter().enumerate() {
            if day.trim().is_empty() {
                errors.push(format!("program day #{} is blank", index + 1));
            } else if self.program_days[..index].contains(day) {
                errors.push(format!("program day `{day}` is listed twice"));
            }
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            errors.push(format!("unknown log level `{}`", self.log_level));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
