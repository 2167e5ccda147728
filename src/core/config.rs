//! Application configuration management
//!
//! This module handles loading and validating configuration from TOML files.
//! All configuration is validated at startup so a bad file fails fast
//! instead of surfacing as a retry storm later.

use crate::core::client::RetryPolicy;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default Gaia node URL
const DEFAULT_BASE_URL: &str = "https://tejumola.gaia.domains";

/// Default model served by the node
const DEFAULT_MODEL: &str = "qwen2-0.5b-instruct";

/// Default sampling temperature
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT: u64 = 60;

/// Default attempt budget per question, large enough to act as "forever"
const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Default first backoff delay in seconds
const DEFAULT_BASE_DELAY: u64 = 5;

/// Default backoff growth factor
const DEFAULT_BACKOFF_MULTIPLIER: u32 = 2;

/// Default pause after a successful question in seconds
const DEFAULT_QUESTION_DELAY: u64 = 1;

/// Default config file name, looked up in the working directory
const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            request_timeout: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// First backoff delay in seconds
    #[serde(default = "default_base_delay")]
    pub base_delay: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay: default_base_delay(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_question_delay")]
    pub question_delay: u64,
    /// Replaces the built-in question list when present
    #[serde(default)]
    pub questions: Option<Vec<String>>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            question_delay: default_question_delay(),
            questions: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: default_log_file(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_base_delay() -> u64 {
    DEFAULT_BASE_DELAY
}

fn default_backoff_multiplier() -> u32 {
    DEFAULT_BACKOFF_MULTIPLIER
}

fn default_question_delay() -> u64 {
    DEFAULT_QUESTION_DELAY
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "chatbot.log".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Application configuration
///
/// Loaded once at startup. The API key is not part of the file; it is read
/// interactively by `main`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Node base URL, without the `/v1/...` path
    pub base_url: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Sampling temperature sent with every request
    pub temperature: f32,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Attempts per question before giving up
    pub max_attempts: u32,

    /// First backoff delay in seconds
    pub base_delay: u64,

    /// Backoff growth factor
    pub backoff_multiplier: u32,

    /// Pause after each answered question in seconds
    pub question_delay: u64,

    /// Question list override
    pub questions: Option<Vec<String>>,

    /// Logging level
    pub log_level: String,

    /// Log file path
    pub log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default())
    }
}

impl Config {
    fn from_toml(config: TomlConfig) -> Self {
        Config {
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            model: config.api.model,
            temperature: config.api.temperature,
            request_timeout: config.api.request_timeout,
            max_attempts: config.retry.max_attempts,
            base_delay: config.retry.base_delay,
            backoff_multiplier: config.retry.backoff_multiplier,
            question_delay: config.bot.question_delay,
            questions: config.bot.questions,
            log_level: config.logging.log_level,
            log_file: config.logging.log_file,
        }
    }

    /// Load configuration from TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The TOML file cannot be read or parsed
    /// - Configuration values are invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read configuration file")?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig =
            toml::from_str(content).context("Failed to parse TOML configuration")?;
        let config = Self::from_toml(config);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment and config file
    ///
    /// Uses `CONFIG_PATH` when set, which must then exist. Otherwise looks
    /// for config.toml in the current directory and falls back to defaults
    /// when it is missing.
    pub fn from_env() -> Result<Self> {
        match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::from_file(path),
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        if self.model.is_empty() {
            bail!("api.model must not be empty");
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            bail!("api.temperature must be between 0.0 and 2.0");
        }
        if self.request_timeout == 0 {
            bail!("api.request_timeout must be at least 1 second");
        }
        if self.max_attempts == 0 {
            bail!("retry.max_attempts must be at least 1");
        }
        if self.backoff_multiplier == 0 {
            bail!("retry.backoff_multiplier must be at least 1");
        }
        if let Some(questions) = &self.questions {
            if questions.is_empty() {
                bail!("bot.questions must not be empty when set");
            }
        }
        Ok(())
    }

    /// Retry policy for the request client
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_secs(self.base_delay),
            backoff_multiplier: self.backoff_multiplier,
        }
    }

    /// Pause after each answered question
    pub fn question_delay(&self) -> Duration {
        Duration::from_secs(self.question_delay)
    }
}
