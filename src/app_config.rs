use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::language_utils::LanguagePair;
use crate::providers::khaya::DEFAULT_BASE_URL;
use crate::translation::chunker::{
    ChunkerConfig, DEFAULT_CONTEXT_WINDOW, DEFAULT_MAX_CHUNK_SIZE, default_sentence_terminators,
};
use crate::translation::{ContextStrategy, DispatchOptions, RetryPolicy, TranslatorOptions};

/// Environment variable holding the API key
pub const API_KEY_ENV_VAR: &str = "KHAYA_API_KEY";

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Language pair, e.g. "en-tw"
    #[serde(default = "default_language_pair")]
    pub language_pair: String,

    /// Chunking settings
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Dispatch settings
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Retry settings
    #[serde(default)]
    pub retry: RetryConfig,

    /// Translation service settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// How text is split into chunks
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChunkingConfig {
    /// Maximum words per chunk
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,

    /// Context words borrowed from each neighbouring chunk
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Characters that end a sentence
    #[serde(default = "default_sentence_terminators")]
    pub sentence_terminators: Vec<char>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: default_max_chunk_size(),
            context_window: default_context_window(),
            sentence_terminators: default_sentence_terminators(),
        }
    }
}

/// How chunks are sent to the service
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DispatchConfig {
    /// Maximum number of concurrent requests
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-request timeout in seconds, 0 disables it
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Whether neighbouring context is sent with each chunk
    #[serde(default)]
    pub context_strategy: ContextStrategy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            request_timeout_secs: default_timeout_secs(),
            context_strategy: ContextStrategy::default(),
        }
    }
}

/// Retry settings for failed chunks
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RetryConfig {
    /// Additional attempts per failed chunk
    #[serde(default = "default_retry_count")]
    pub max_attempts: u32,

    /// Delay before the first retry wave (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub base_delay_ms: u64,

    /// Backoff growth factor per wave
    #[serde(default = "default_retry_multiplier")]
    pub multiplier: f64,

    /// Upper bound for a single backoff delay (in milliseconds)
    #[serde(default = "default_retry_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_retry_count(),
            base_delay_ms: default_retry_backoff_ms(),
            multiplier: default_retry_multiplier(),
            max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Service base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key, falls back to the KHAYA_API_KEY environment variable
    #[serde(default = "String::new")]
    pub api_key: String,

    /// HTTP client timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_language_pair() -> String {
    "en-tw".to_string()
}

fn default_max_chunk_size() -> usize {
    DEFAULT_MAX_CHUNK_SIZE
}

fn default_context_window() -> usize {
    DEFAULT_CONTEXT_WINDOW
}

fn default_concurrency() -> usize {
    5
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each wave
}

fn default_retry_multiplier() -> f64 {
    2.0
}

fn default_retry_max_delay_ms() -> u64 {
    30_000
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Config {
    /// Load a configuration file, writing a default one when it does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file not found at '{}', creating default config.", path.display());
            let config = Config::default();
            config.save(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Fill an empty API key from the environment
    pub fn apply_env_overrides(&mut self) {
        if self.provider.api_key.is_empty() {
            if let Ok(api_key) = std::env::var(API_KEY_ENV_VAR) {
                self.provider.api_key = api_key;
            }
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.language_pair
            .parse::<LanguagePair>()
            .context("Invalid language pair")?;

        if self.chunking.max_chunk_size == 0 {
            return Err(anyhow!("chunking.max_chunk_size must be greater than 0"));
        }
        if self.dispatch.concurrency == 0 {
            return Err(anyhow!("dispatch.concurrency must be greater than 0"));
        }
        if !self.retry.multiplier.is_finite() || self.retry.multiplier < 1.0 {
            return Err(anyhow!("retry.multiplier must be at least 1.0"));
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(anyhow!("provider.base_url cannot be empty"));
        }

        Ok(())
    }

    /// Options for the translation core
    pub fn translator_options(&self) -> TranslatorOptions {
        let request_timeout = match self.dispatch.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        TranslatorOptions {
            chunker: ChunkerConfig {
                max_chunk_size: self.chunking.max_chunk_size,
                context_window: self.chunking.context_window,
                sentence_terminators: self.chunking.sentence_terminators.clone(),
            },
            dispatch: DispatchOptions {
                concurrency: self.dispatch.concurrency,
                language_pair: self.language_pair.clone(),
                context_strategy: self.dispatch.context_strategy,
                request_timeout,
            },
            retry: RetryPolicy {
                max_attempts: self.retry.max_attempts,
                base_delay: Duration::from_millis(self.retry.base_delay_ms),
                multiplier: self.retry.multiplier,
                max_delay: Duration::from_millis(self.retry.max_delay_ms),
            },
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language_pair: default_language_pair(),
            chunking: ChunkingConfig::default(),
            dispatch: DispatchConfig::default(),
            retry: RetryConfig::default(),
            provider: ProviderConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
