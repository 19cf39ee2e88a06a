//! Configuration management utilities
//!
//! Settings are layered: built-in defaults, then an optional JSON file, then
//! environment variables. The CLI applies its flags on top.
//!
//! ```json
//! {
//!   "app_name": "agent-rs",
//!   "agent": {
//!     "backend": "ollama",
//!     "model": "llama3.1",
//!     "stop_sequence": "<|eot_id|>"
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for [`Config`]
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A setting has an unusable value
    #[error("Invalid setting {key}: {detail}")]
    Invalid { key: String, detail: String },
}

/// Text-generation backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Local Ollama server
    #[default]
    Ollama,
    /// OpenAI or an OpenAI-compatible server
    OpenAI,
}

impl Backend {
    /// Model used when none is configured
    pub fn default_model(&self) -> &'static str {
        match self {
            Backend::Ollama => "llama3.1",
            Backend::OpenAI => "gpt-3.5-turbo",
        }
    }

    /// Stop sequence used when none is configured
    pub fn default_stop_sequence(&self) -> Option<&'static str> {
        match self {
            Backend::Ollama => Some("<|eot_id|>"),
            Backend::OpenAI => None,
        }
    }

    /// Temperature used when none is configured
    pub fn default_temperature(&self) -> f32 {
        match self {
            Backend::Ollama => 0.1,
            Backend::OpenAI => 0.0,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Ollama => f.write_str("ollama"),
            Backend::OpenAI => f.write_str("openai"),
        }
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Backend::Ollama),
            "openai" => Ok(Backend::OpenAI),
            other => Err(ConfigError::Invalid {
                key: "backend".to_string(),
                detail: format!("unknown backend '{other}' (expected 'ollama' or 'openai')"),
            }),
        }
    }
}

/// Agent and backend settings
///
/// Unset optional fields resolve to per-backend defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Which backend generates decisions
    pub backend: Backend,
    /// Model identifier
    pub model: Option<String>,
    /// Backend base URL
    pub api_base: Option<String>,
    /// API key (OpenAI only)
    pub api_key: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Stop sequence; an empty string disables the backend default
    pub stop_sequence: Option<String>,
    /// Maximum tokens per decision
    pub max_tokens: usize,
    /// HTTP request timeout
    pub timeout_secs: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            model: None,
            api_base: None,
            api_key: None,
            temperature: None,
            stop_sequence: None,
            max_tokens: 1024,
            timeout_secs: 120,
        }
    }
}

impl AgentSettings {
    /// Effective model
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.backend.default_model())
    }

    /// Effective temperature
    pub fn temperature(&self) -> f32 {
        self.temperature
            .unwrap_or_else(|| self.backend.default_temperature())
    }

    /// Effective stop sequence
    pub fn stop_sequence(&self) -> Option<String> {
        match self.stop_sequence.as_deref() {
            Some("") => None,
            Some(stop) => Some(stop.to_string()),
            None => self.backend.default_stop_sequence().map(str::to_string),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (dev, prod, etc.)
    pub environment: String,
    /// Agent settings
    pub agent: AgentSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "agent-rs".to_string(),
            environment: "development".to_string(),
            agent: AgentSettings::default(),
        }
    }
}

impl Config {
    /// Load a JSON config file; missing keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Defaults, optionally overlaid by a file, then by the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_from(|key| std::env::var(key).ok())?;
        debug!(
            file = ?path,
            backend = %config.agent.backend,
            model = %config.agent.model(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Overlay settings from environment-style lookups
    ///
    /// Recognized keys: `AGENT_BACKEND`, `AGENT_MODEL`, `AGENT_API_BASE`,
    /// `OPENAI_API_KEY`, `AGENT_TEMPERATURE`, `AGENT_STOP`, `AGENT_ENV`.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("AGENT_BACKEND") {
            self.agent.backend = backend.parse()?;
        }
        if let Some(model) = lookup("AGENT_MODEL") {
            self.agent.model = Some(model);
        }
        if let Some(api_base) = lookup("AGENT_API_BASE") {
            self.agent.api_base = Some(api_base);
        }
        if let Some(api_key) = lookup("OPENAI_API_KEY") {
            self.agent.api_key = Some(api_key);
        }
        if let Some(temperature) = lookup("AGENT_TEMPERATURE") {
            let value = temperature.parse().map_err(|_| ConfigError::Invalid {
                key: "AGENT_TEMPERATURE".to_string(),
                detail: format!("'{temperature}' is not a number"),
            })?;
            self.agent.temperature = Some(value);
        }
        if let Some(stop) = lookup("AGENT_STOP") {
            self.agent.stop_sequence = Some(stop);
        }
        if let Some(environment) = lookup("AGENT_ENV") {
            self.environment = environment;
        }
        Ok(())
    }
}
