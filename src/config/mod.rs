pub mod cli;

use crate::adapters::http::{REASONING_API_KEY_VAR, VISION_API_KEY_VAR};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use std::env;

pub const DEFAULT_API_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4/chat/completions";
pub const DEFAULT_VISION_MODEL: &str = "glm-4v-flash";
pub const DEFAULT_REASONING_MODEL: &str = "glm-4-flash";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 60;

/// Generation-service settings, read from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub api_base_url: String,
    pub vision_api_key: Option<String>,
    pub reasoning_api_key: Option<String>,
    pub vision_model: String,
    pub reasoning_model: String,
    pub request_timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            vision_api_key: None,
            reasoning_api_key: None,
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            reasoning_model: DEFAULT_REASONING_MODEL.to_string(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 以任意查詢函式建立設定，空字串視為未設定
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let request_timeout_seconds = match get("REQUEST_TIMEOUT_SECONDS") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "REQUEST_TIMEOUT_SECONDS={:?} is not a number, using {}",
                    raw,
                    DEFAULT_REQUEST_TIMEOUT_SECONDS
                );
                DEFAULT_REQUEST_TIMEOUT_SECONDS
            }),
            None => defaults.request_timeout_seconds,
        };

        Self {
            api_base_url: get("API_BASE_URL").unwrap_or(defaults.api_base_url),
            vision_api_key: get(VISION_API_KEY_VAR),
            reasoning_api_key: get(REASONING_API_KEY_VAR),
            vision_model: get("VISION_MODEL").unwrap_or(defaults.vision_model),
            reasoning_model: get("REASONING_MODEL").unwrap_or(defaults.reasoning_model),
            request_timeout_seconds,
        }
    }

    /// Logs a warning for every missing credential.
    pub fn warn_missing_credentials(&self) {
        if self.vision_api_key.is_none() {
            tracing::warn!("{} not found in environment variables", VISION_API_KEY_VAR);
        }
        if self.reasoning_api_key.is_none() {
            tracing::warn!("{} not found in environment variables", REASONING_API_KEY_VAR);
        }
    }
}

impl ConfigProvider for ServiceConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn vision_api_key(&self) -> Option<&str> {
        self.vision_api_key.as_deref()
    }

    fn reasoning_api_key(&self) -> Option<&str> {
        self.reasoning_api_key.as_deref()
    }

    fn vision_model(&self) -> &str {
        &self.vision_model
    }

    fn reasoning_model(&self) -> &str {
        &self.reasoning_model
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.request_timeout_seconds
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        validate_url("API_BASE_URL", &self.api_base_url)?;
        validate_non_empty_string("VISION_MODEL", &self.vision_model)?;
        validate_non_empty_string("REASONING_MODEL", &self.reasoning_model)?;
        validate_range("REQUEST_TIMEOUT_SECONDS", self.request_timeout_seconds, 1, 600)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "menu-advisor")]
#[command(about = "Turn a photographed menu into a priced, health-scored recommendation")]
pub struct CliConfig {
    /// Path to the menu photo
    pub image: String,

    /// Directory to write menu_report.json and recommended_dishes.csv into
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override API_BASE_URL
    #[arg(long)]
    pub api_base_url: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Log CPU and memory per stage")]
    pub monitor: bool,
}
