//! Model gateway contract
//!
//! The decision engine depends only on [`ModelGateway`]: given a user prompt
//! and a [`GenerationConfig`], return the model's decision already parsed
//! into a [`GatewayReply`]. Locating JSON inside free-form generated text is
//! the gateway's job, not the engine's.

use crate::extract::{json_object_candidates, preview};
use crate::{CompletionRequest, LLMError, LLMProvider, Message, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Default completion budget for one decision
pub const DEFAULT_MAX_TOKENS: usize = 1024;

/// Per-cycle generation settings
///
/// One struct for every backend; each backend uses the fields it supports
/// and ignores the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// System prompt carrying the tool descriptions
    pub system_prompt: String,

    /// Sampling temperature; kept low for near-deterministic decisions
    pub temperature: f32,

    /// Optional stop sequence (e.g. `<|eot_id|>` for Llama 3 chat templates)
    pub stop_sequence: Option<String>,

    /// Maximum tokens to generate
    pub max_tokens: usize,
}

impl GenerationConfig {
    /// Create a config with the given system prompt and default sampling
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            temperature: 0.1,
            stop_sequence: None,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the stop sequence
    pub fn with_stop_sequence(mut self, stop: Option<String>) -> Self {
        self.stop_sequence = stop;
        self
    }

    /// Set the maximum tokens
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// What the gateway hands back for one prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayReply {
    /// A well-formed `{tool_choice, tool_input}` decision
    Decision {
        /// Tool name or "no tool"
        tool_choice: String,
        /// Tool input or direct answer
        tool_input: String,
    },

    /// The backend signalled an error instead of a decision
    Error {
        /// Error text as reported
        error: String,
    },
}

impl GatewayReply {
    /// Interpret a parsed JSON object as a reply
    ///
    /// An `error` key wins over everything else. Otherwise both
    /// `tool_choice` (a string) and `tool_input` must be present and non-null;
    /// a non-string `tool_input` is kept as its compact JSON text.
    pub fn from_object(object: &Map<String, Value>) -> Result<Self> {
        if let Some(error) = object.get("error") {
            let error = match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Ok(Self::Error { error });
        }

        let tool_choice = match object.get("tool_choice") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(LLMError::UnexpectedResponse(format!(
                    "tool_choice must be a string, got {other}"
                )));
            }
            None => {
                return Err(LLMError::UnexpectedResponse(
                    "missing required key 'tool_choice'".to_string(),
                ));
            }
        };

        let tool_input = match object.get("tool_input") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => {
                return Err(LLMError::UnexpectedResponse(
                    "missing required key 'tool_input'".to_string(),
                ));
            }
            Some(other) => other.to_string(),
        };

        Ok(Self::Decision {
            tool_choice,
            tool_input,
        })
    }

    /// Extract and interpret the reply contained in generated text
    ///
    /// The first JSON object that reads as a reply wins; objects of any other
    /// shape around it are skipped. When none qualifies, the error for the
    /// first object found is returned.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut first_error = None;
        for object in json_object_candidates(text)? {
            match Self::from_object(&object) {
                Ok(reply) => return Ok(reply),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        Err(first_error.unwrap_or_else(|| {
            LLMError::MalformedResponse(format!("no JSON object found in: {}", preview(text.trim())))
        }))
    }
}

/// Text-generation capability consumed by the decision engine
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Generate a decision for `user_prompt`
    ///
    /// Returns `Err` when no usable reply could be produced (transport
    /// failure, timeout, no JSON object, missing keys).
    async fn generate(&self, user_prompt: &str, config: &GenerationConfig) -> Result<GatewayReply>;

    /// Gateway name for logging
    fn name(&self) -> &str;
}

/// Adapts an [`LLMProvider`] to the [`ModelGateway`] contract
///
/// # Example
///
/// ```ignore
/// use agent_llm::{GenerationConfig, ModelGateway, ProviderGateway};
/// use agent_llm::providers::OllamaProvider;
/// use std::sync::Arc;
///
/// # async fn example() -> agent_llm::Result<()> {
/// let provider = Arc::new(OllamaProvider::new()?);
/// let gateway = ProviderGateway::new(provider, "llama3.1");
///
/// let config = GenerationConfig::new("You are an agent with access to a toolbox.")
///     .with_stop_sequence(Some("<|eot_id|>".to_string()));
/// let reply = gateway.generate("What is 2+2?", &config).await?;
/// # Ok(())
/// # }
/// ```
pub struct ProviderGateway {
    provider: Arc<dyn LLMProvider>,
    model: String,
}

impl ProviderGateway {
    /// Create a gateway generating with `model` on `provider`
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Model identifier used for generation
    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, user_prompt: &str, config: &GenerationConfig) -> CompletionRequest {
        let mut builder = CompletionRequest::builder(&self.model)
            .add_message(Message::user(user_prompt))
            .system(config.system_prompt.clone())
            .max_tokens(config.max_tokens)
            .temperature(config.temperature);

        if let Some(stop) = &config.stop_sequence {
            builder = builder.stop_sequences(vec![stop.clone()]);
        }

        builder.build()
    }
}

#[async_trait]
impl ModelGateway for ProviderGateway {
    #[instrument(skip(self, user_prompt, config), fields(provider = %self.provider.name(), model = %self.model))]
    async fn generate(&self, user_prompt: &str, config: &GenerationConfig) -> Result<GatewayReply> {
        let request = self.build_request(user_prompt, config);
        let response = self.provider.complete(request).await?;

        let text = response.message.text();
        debug!(
            stop_reason = ?response.stop_reason,
            output_tokens = response.usage.output_tokens,
            response_preview = %preview(text),
            "Model text received"
        );

        GatewayReply::from_text(text)
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompletionResponse, StopReason, TokenUsage};
    use serde_json::json;
    use std::sync::Mutex;

    /// Provider that returns canned text and records the last request
    struct ScriptedProvider {
        reply: Result<String>,
        last_request: Mutex<Option<CompletionRequest>>,
    }

    impl ScriptedProvider {
        fn text(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                last_request: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(LLMError::RequestFailed("connection refused".to_string())),
                last_request: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
            *self.last_request.lock().unwrap() = Some(request);
            match &self.reply {
                Ok(text) => Ok(CompletionResponse {
                    message: Message::assistant(text.clone()),
                    stop_reason: StopReason::EndTurn,
                    usage: TokenUsage::default(),
                }),
                Err(e) => Err(LLMError::RequestFailed(e.to_string())),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_reply_from_decision_object() {
        let reply = GatewayReply::from_object(&object(
            json!({"tool_choice": "basic_calculator", "tool_input": "2+2"}),
        ))
        .unwrap();
        assert_eq!(
            reply,
            GatewayReply::Decision {
                tool_choice: "basic_calculator".into(),
                tool_input: "2+2".into(),
            }
        );
    }

    #[test]
    fn test_error_key_wins() {
        let reply = GatewayReply::from_object(&object(
            json!({"error": "model overloaded", "tool_choice": "no tool", "tool_input": "x"}),
        ))
        .unwrap();
        assert_eq!(
            reply,
            GatewayReply::Error {
                error: "model overloaded".into()
            }
        );
    }

    #[test]
    fn test_missing_keys_are_rejected() {
        let missing_input = GatewayReply::from_object(&object(json!({"tool_choice": "no tool"})));
        assert!(matches!(missing_input, Err(LLMError::UnexpectedResponse(_))));

        let missing_choice = GatewayReply::from_object(&object(json!({"tool_input": "abc"})));
        assert!(matches!(missing_choice, Err(LLMError::UnexpectedResponse(_))));

        let null_input =
            GatewayReply::from_object(&object(json!({"tool_choice": "no tool", "tool_input": null})));
        assert!(null_input.is_err());

        let numeric_choice =
            GatewayReply::from_object(&object(json!({"tool_choice": 3, "tool_input": "abc"})));
        assert!(numeric_choice.is_err());
    }

    #[test]
    fn test_reply_skips_unrelated_objects() {
        let reply = GatewayReply::from_text(
            r#"Input format is {} so: {"tool_choice": "reverse_string", "tool_input": "abc"}"#,
        )
        .unwrap();
        assert_eq!(
            reply,
            GatewayReply::Decision {
                tool_choice: "reverse_string".into(),
                tool_input: "abc".into(),
            }
        );

        let reply =
            GatewayReply::from_text(r#"Config {"retries": 2} failed: {"error": "model busy"}"#)
                .unwrap();
        assert_eq!(
            reply,
            GatewayReply::Error {
                error: "model busy".into()
            }
        );
    }

    #[test]
    fn test_reply_reports_first_bad_object() {
        let result = GatewayReply::from_text(r#"{"tool_choice": "no tool"} and {"other": 1}"#);
        assert!(
            matches!(result, Err(LLMError::UnexpectedResponse(msg)) if msg.contains("tool_input"))
        );

        let result = GatewayReply::from_text("I cannot decide.");
        assert!(matches!(result, Err(LLMError::MalformedResponse(_))));
    }

    #[test]
    fn test_non_string_input_is_stringified() {
        let reply = GatewayReply::from_object(&object(json!({
            "tool_choice": "basic_calculator",
            "tool_input": {"num1": 2, "num2": 2, "operation": "add"}
        })))
        .unwrap();
        match reply {
            GatewayReply::Decision { tool_input, .. } => {
                let parsed: Value = serde_json::from_str(&tool_input).unwrap();
                assert_eq!(parsed, json!({"num1": 2, "num2": 2, "operation": "add"}));
            }
            GatewayReply::Error { .. } => panic!("expected decision"),
        }
    }

    #[tokio::test]
    async fn test_provider_gateway_parses_wrapped_json() {
        let provider = Arc::new(ScriptedProvider::text(
            "Sure!\n```json\n{\"tool_choice\": \"reverse_string\", \"tool_input\": \"hello\"}\n```",
        ));
        let gateway = ProviderGateway::new(provider.clone(), "llama3.1");

        let config = GenerationConfig::new("system text")
            .with_stop_sequence(Some("<|eot_id|>".to_string()));
        let reply = gateway.generate("reverse hello", &config).await.unwrap();

        assert_eq!(
            reply,
            GatewayReply::Decision {
                tool_choice: "reverse_string".into(),
                tool_input: "hello".into(),
            }
        );

        let request = provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, "llama3.1");
        assert_eq!(request.system.as_deref(), Some("system text"));
        assert_eq!(request.temperature, Some(0.1));
        assert_eq!(request.last_user_text(), Some("reverse hello"));
        assert_eq!(request.stop_sequences, Some(vec!["<|eot_id|>".to_string()]));
    }

    #[tokio::test]
    async fn test_provider_gateway_without_stop() {
        let provider = Arc::new(ScriptedProvider::text(
            r#"{"tool_choice": "no tool", "tool_input": "hi"}"#,
        ));
        let gateway = ProviderGateway::new(provider.clone(), "gpt-3.5-turbo");
        let config = GenerationConfig::new("sys").with_temperature(0.0);

        gateway.generate("hello", &config).await.unwrap();

        let request = provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.stop_sequences, None);
        assert_eq!(request.temperature, Some(0.0));
    }

    #[tokio::test]
    async fn test_provider_gateway_propagates_faults() {
        let gateway = ProviderGateway::new(Arc::new(ScriptedProvider::failing()), "m");
        let result = gateway.generate("hi", &GenerationConfig::new("sys")).await;
        assert!(matches!(result, Err(LLMError::RequestFailed(_))));

        let gateway = ProviderGateway::new(Arc::new(ScriptedProvider::text("no json here")), "m");
        let result = gateway.generate("hi", &GenerationConfig::new("sys")).await;
        assert!(matches!(result, Err(LLMError::MalformedResponse(_))));
    }
}
