use anyhow::{Context, Result, anyhow};
use log::info;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::language_utils;
use crate::providers::ModelLoader;
use crate::providers::mock::{MockLoader, MockModel};
use crate::providers::ollama::OllamaLoader;
use crate::translation::{CoordinatorSettings, Style};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.

/// Native language of the user, as a display name
pub const DEFAULT_NATIVE_LANGUAGE: &str = "English";

/// Foreign language targeted first, as a display name
pub const DEFAULT_PRIMARY_FOREIGN_LANGUAGE: &str = "Español";

/// Token budget per generation
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Model requested from the backend
pub const DEFAULT_MODEL: &str = "translategemma:12b";

/// Directory and file name of the configuration under the user config dir
const CONFIG_DIR_NAME: &str = "livetrans";
const CONFIG_FILE_NAME: &str = "conf.json";

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Native language display name
    #[serde(default = "default_native_language")]
    pub native_language: String,

    /// First foreign language display name
    #[serde(default = "default_primary_foreign_language")]
    pub primary_foreign_language: String,

    /// Style used when none is given
    #[serde(default)]
    pub default_style: Style,

    /// Model backend settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Model backend type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    // @backend: Ollama
    #[default]
    Ollama,
    // @backend: In-process mock that echoes the prompt
    Mock,
}

impl ModelBackend {
    // @returns: Capitalized backend name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ollama => "Ollama",
            Self::Mock => "Mock",
        }
    }
}

impl std::fmt::Display for ModelBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

impl std::str::FromStr for ModelBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid backend type: {}", s)),
        }
    }
}

/// Model configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ModelConfig {
    /// Backend serving the model
    #[serde(default)]
    pub backend: ModelBackend,

    /// Model name (e.g., "translategemma:12b")
    #[serde(default = "default_model")]
    pub model: String,

    /// Service endpoint URL
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    /// How long the server keeps the model loaded (e.g., "30m")
    #[serde(default = "default_keep_alive")]
    pub keep_alive: String,

    /// Sampling temperature; the server default when unset
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Token budget per generation
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::default(),
            model: default_model(),
            endpoint: default_ollama_endpoint(),
            keep_alive: default_keep_alive(),
            temperature: None,
            max_tokens: default_max_tokens(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_native_language() -> String {
    DEFAULT_NATIVE_LANGUAGE.to_string()
}

fn default_primary_foreign_language() -> String {
    DEFAULT_PRIMARY_FOREIGN_LANGUAGE.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_keep_alive() -> String {
    "30m".to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        for name in [&self.native_language, &self.primary_foreign_language] {
            if !language_utils::is_supported_display_name(name) {
                return Err(anyhow!("Unsupported language: {}", name));
            }
        }

        if self.model.model.trim().is_empty() {
            return Err(anyhow!("Model name must not be empty"));
        }

        if self.model.backend == ModelBackend::Ollama {
            Url::parse(&self.model.endpoint)
                .with_context(|| format!("Invalid model endpoint: {}", self.model.endpoint))?;
        }

        if self.model.max_tokens == 0 {
            return Err(anyhow!("max_tokens must be greater than 0"));
        }

        Ok(())
    }

    /// Load the configuration at `path`, writing defaults there if it does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Creating default configuration at {}", path.display());
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Default configuration path, `./conf.json` when there is no user config dir
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Settings for the request coordinator
    pub fn coordinator_settings(&self) -> CoordinatorSettings {
        CoordinatorSettings {
            model_ref: self.model.model.clone(),
            max_tokens: self.model.max_tokens,
            native_language: self.native_language.clone(),
        }
    }

    /// Build the model loader for the configured backend
    pub fn build_loader(&self) -> Arc<dyn ModelLoader> {
        match self.model.backend {
            ModelBackend::Ollama => Arc::new(OllamaLoader::new(
                &self.model.endpoint,
                Duration::from_secs(self.model.connect_timeout_secs),
                self.model.keep_alive.clone(),
                self.model.temperature,
            )),
            ModelBackend::Mock => {
                Arc::new(MockLoader::new(MockModel::echo().with_chunk_delay(Duration::from_millis(40))))
            }
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            native_language: default_native_language(),
            primary_foreign_language: default_primary_foreign_language(),
            default_style: Style::default(),
            model: ModelConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
