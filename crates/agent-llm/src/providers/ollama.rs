//! Ollama provider implementation
//!
//! Talks to a local Ollama server through its generate endpoint, asking for
//! JSON-formatted output. See: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, Result, Role,
    StopReason, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_OLLAMA_API_BASE: &str = "http://localhost:11434/api";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for Ollama provider
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL of the Ollama API (default: "http://localhost:11434/api")
    pub api_base: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,

    /// Ask Ollama to constrain output to JSON (default: true)
    pub json_format: bool,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_OLLAMA_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            json_format: true,
        }
    }
}

impl OllamaConfig {
    /// Create config from environment, reading `OLLAMA_API_BASE` if set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(api_base) = std::env::var("OLLAMA_API_BASE") {
            config.api_base = api_base;
        }
        config
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Ollama provider
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

impl OllamaProvider {
    /// Create a provider for the default local server
    pub fn new() -> Result<Self> {
        Self::with_config(OllamaConfig::default())
    }

    /// Create a provider with custom configuration
    pub fn with_config(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    #[instrument(skip(self, request), fields(model = %request.model, api_base = %self.config.api_base))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let ollama_request = build_request(request, self.config.json_format);
        let model = ollama_request.model.clone();
        debug!("Sending request to Ollama at {}", self.config.api_base);

        let response = self
            .client
            .post(format!("{}/generate", self.config.api_base))
            .header("Content-Type", "application/json")
            .json(&ollama_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                400 => LLMError::InvalidRequest(error_text),
                404 => LLMError::ModelNotFound(model),
                _ => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let ollama_response: OllamaResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        parse_response(ollama_response)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

// ============================================================================
// Ollama-specific request/response types
// ============================================================================

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
    num_predict: usize,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

// ============================================================================
// Conversion functions
// ============================================================================

/// The generate endpoint takes one prompt string; user turns are joined
fn build_request(request: CompletionRequest, json_format: bool) -> OllamaRequest {
    let prompt = request
        .messages
        .iter()
        .filter(|m| m.role == Role::User)
        .map(Message::text)
        .collect::<Vec<_>>()
        .join("\n\n");

    OllamaRequest {
        model: request.model,
        prompt,
        system: request.system,
        format: json_format.then_some("json"),
        stream: false,
        options: OllamaOptions {
            temperature: request.temperature,
            stop: request.stop_sequences,
            num_predict: request.max_tokens,
        },
    }
}

fn parse_response(response: OllamaResponse) -> Result<CompletionResponse> {
    if let Some(error) = response.error {
        return Err(LLMError::ProviderError(error));
    }

    let stop_reason = match response.done_reason.as_deref() {
        Some("length") => StopReason::MaxTokens,
        _ => StopReason::EndTurn,
    };
    debug!(
        "Received response - done_reason: {:?}, tokens: {}/{}",
        response.done_reason, response.prompt_eval_count, response.eval_count
    );

    Ok(CompletionResponse {
        message: Message::assistant(response.response),
        stop_reason,
        usage: TokenUsage {
            input_tokens: response.prompt_eval_count,
            output_tokens: response.eval_count,
        },
    })
}
