//! Frontend configuration module
//!
//! Values are baked in at compile time; the browser has no config file.

use shared::config::ClientConfig;

/// Settings the browser build resolves at compile time.
#[derive(Debug, Clone)]
pub struct FrontendConfig {
    pub api_base_url: String,
    pub log_level: String,
    pub client: ClientConfig,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        let client = ClientConfig::with_defaults();
        Self {
            api_base_url: option_env!("ZLET_API_URL")
                .map_or_else(|| client.api_base_url.clone(), ToString::to_string),
            log_level: option_env!("ZLET_LOG_LEVEL")
                .map_or_else(|| client.log_level.clone(), ToString::to_string),
            client,
        }
    }
}

impl FrontendConfig {
    pub fn log_level(&self) -> log::Level {
        match self.log_level.to_ascii_lowercase().as_str() {
            "trace" => log::Level::Trace,
            "debug" => log::Level::Debug,
            "warn" => log::Level::Warn,
            "error" => log::Level::Error,
            _ => log::Level::Info,
        }
    }

    pub fn program_days(&self) -> Vec<String> {
        self.client.program_days.clone()
    }
}
