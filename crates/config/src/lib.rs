//! Configuration loading, validation, and embedded assets for ConnectSense.
//!
//! Loads configuration from `connectsense.toml` in the working directory
//! with environment variable overrides (a `.env` file is honored via
//! `dotenvy`). Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod prompts;

/// The root configuration structure.
///
/// Maps directly to `connectsense.toml`. Every field has a default so a
/// missing file yields a runnable configuration (API keys come from the
/// environment).
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Groq API key (primary chat provider). Env: `GROQ_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groq_api_key: Option<String>,

    /// Google API key (Gemini chat fallback + embeddings). Env: `GOOGLE_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_api_key: Option<String>,

    /// Chat model served by Groq.
    #[serde(default = "default_groq_model")]
    pub groq_model: String,

    /// Chat model served by Gemini.
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Embedding model (always Gemini).
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Sampling temperature for both chat backends.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// How many index chunks to retrieve per query.
    #[serde(default = "default_top_k")]
    pub similarity_top_k: usize,

    /// Retrieval index configuration.
    #[serde(default)]
    pub index: IndexConfig,

    /// Gateway configuration.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_groq_model() -> String {
    "llama-3.3-70b-versatile".into()
}
fn default_gemini_model() -> String {
    "models/gemini-2.0-flash".into()
}
fn default_embedding_model() -> String {
    "models/embedding-001".into()
}
fn default_temperature() -> f32 {
    0.5
}
fn default_top_k() -> usize {
    3
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("groq_api_key", &redact(&self.groq_api_key))
            .field("google_api_key", &redact(&self.google_api_key))
            .field("groq_model", &self.groq_model)
            .field("gemini_model", &self.gemini_model)
            .field("embedding_model", &self.embedding_model)
            .field("temperature", &self.temperature)
            .field("similarity_top_k", &self.similarity_top_k)
            .field("index", &self.index)
            .field("gateway", &self.gateway)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Path to the prebuilt index artifact, relative to the working directory.
    #[serde(default = "default_index_path")]
    pub path: PathBuf,
}

fn default_index_path() -> PathBuf {
    PathBuf::from("vector_db/full_index.json")
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Optional decorative logo served at /static/logo.png. Missing file
    /// degrades to a warning, never an error.
    #[serde(default = "default_logo_path")]
    pub logo_path: PathBuf,
}

fn default_port() -> u16 {
    8501
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_logo_path() -> PathBuf {
    PathBuf::from("assets/logo.png")
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            logo_path: default_logo_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `connectsense.toml` in the working directory.
    ///
    /// A `.env` file is loaded first (if present), then API keys are read
    /// from the environment when not set in the file:
    /// - `GROQ_API_KEY`
    /// - `GOOGLE_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        // Missing .env is the common case, not an error.
        let _ = dotenvy::dotenv();

        let mut config = Self::load_from(Path::new("connectsense.toml"))?;

        if config.groq_api_key.is_none() {
            config.groq_api_key = non_empty_env("GROQ_API_KEY");
        }
        if config.google_api_key.is_none() {
            config.google_api_key = non_empty_env("GOOGLE_API_KEY");
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::Validation(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.similarity_top_k == 0 {
            return Err(ConfigError::Validation(
                "similarity_top_k must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            google_api_key: None,
            groq_model: default_groq_model(),
            gemini_model: default_gemini_model(),
            embedding_model: default_embedding_model(),
            temperature: default_temperature(),
            similarity_top_k: default_top_k(),
            index: IndexConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Read an environment variable, treating empty values as unset.
fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.groq_model, "llama-3.3-70b-versatile");
        assert_eq!(config.gemini_model, "models/gemini-2.0-flash");
        assert_eq!(config.embedding_model, "models/embedding-001");
        assert_eq!(config.similarity_top_k, 3);
        assert_eq!(config.gateway.port, 8501);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.groq_model, config.groq_model);
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(parsed.index.path, config.index.path);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_top_k_rejected() {
        let config = AppConfig {
            similarity_top_k: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/connectsense.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().similarity_top_k, 3);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "temperature = 0.2\n[gateway]\nport = 9000").unwrap();
        let config = AppConfig::load_from(file.path()).unwrap();
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.gateway.port, 9000);
        assert_eq!(config.groq_model, "llama-3.3-70b-versatile");
    }

    #[test]
    fn debug_redacts_keys() {
        let config = AppConfig {
            groq_api_key: Some("gsk_secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("gsk_secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
