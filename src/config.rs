//! Configuration management for the resume matcher

use crate::error::{MatcherError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    pub endpoint: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub show_raw_response: bool,
    pub include_next_steps: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Text,
    Json,
    Markdown,
    Html,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                name: "gemini-1.5-pro".to_string(),
                endpoint: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
                temperature: 0.2,
                max_output_tokens: 4096,
                timeout_secs: 60,
                max_retries: 3,
                api_key_env: "GOOGLE_API_KEY".to_string(),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
                show_raw_response: false,
                include_next_steps: true,
            },
        }
    }
}

impl Config {
    /// Load from the user config directory, writing defaults on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MatcherError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| MatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| MatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-matcher")
            .join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(MatcherError::Configuration(format!(
                "model.temperature must be between 0.0 and 2.0, got {}",
                self.model.temperature
            )));
        }
        if self.model.max_output_tokens == 0 {
            return Err(MatcherError::Configuration(
                "model.max_output_tokens must be positive".to_string(),
            ));
        }
        if self.model.timeout_secs == 0 {
            return Err(MatcherError::Configuration(
                "model.timeout_secs must be positive".to_string(),
            ));
        }
        if self.model.name.trim().is_empty() || self.model.api_key_env.trim().is_empty() {
            return Err(MatcherError::Configuration(
                "model.name and model.api_key_env must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Set a dotted key such as `model.temperature`, validating the value.
    ///
    /// The configuration is left untouched when the key or value is rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |e: &dyn fmt::Display| {
            MatcherError::Configuration(format!("Invalid value '{}' for {}: {}", value, key, e))
        };

        let mut updated = self.clone();
        let model = &mut updated.model;
        let output = &mut updated.output;
        match key {
            "model.name" => model.name = value.to_string(),
            "model.endpoint" => model.endpoint = value.to_string(),
            "model.temperature" => model.temperature = value.parse::<f32>().map_err(|e| invalid(&e))?,
            "model.max_output_tokens" => {
                model.max_output_tokens = value.parse::<u32>().map_err(|e| invalid(&e))?
            }
            "model.timeout_secs" => model.timeout_secs = value.parse::<u64>().map_err(|e| invalid(&e))?,
            "model.max_retries" => model.max_retries = value.parse::<u32>().map_err(|e| invalid(&e))?,
            "model.api_key_env" => model.api_key_env = value.to_string(),
            "output.format" => {
                output.format = crate::cli::parse_output_format(value).map_err(|e| invalid(&e))?
            }
            "output.color_output" => output.color_output = value.parse::<bool>().map_err(|e| invalid(&e))?,
            "output.show_raw_response" => {
                output.show_raw_response = value.parse::<bool>().map_err(|e| invalid(&e))?
            }
            "output.include_next_steps" => {
                output.include_next_steps = value.parse::<bool>().map_err(|e| invalid(&e))?
            }
            _ => {
                return Err(MatcherError::Configuration(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

/// API credential for the model service. Never printed.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Startup precondition: load `.env` if present, then require `var_name`.
pub fn require_api_key(var_name: &str) -> Result<ApiKey> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            log::warn!("Ignoring unreadable .env file: {}", e);
        }
    }

    match std::env::var(var_name) {
        Ok(key) if !key.trim().is_empty() => Ok(ApiKey(key)),
        _ => Err(MatcherError::MissingCredential(var_name.to_string())),
    }
}
