//! Decision engine
//!
//! One call to [`DecisionEngine::decide`] runs one generation cycle:
//!
//! 1. Render the system prompt from the registry's tool descriptions
//! 2. Call the model gateway once (no retry)
//! 3. Validate the reply into a [`Decision`]
//!
//! Any fault along the way (template error, transport failure, malformed
//! reply, gateway-reported error) becomes a "no tool" decision whose input is
//! the diagnostic text, so `decide` always returns a decision.

use crate::prompt::{DEFAULT_SYSTEM_TEMPLATE, render_system_prompt};
use agent_core::{Decision, Error, Result, is_no_tool};
use agent_llm::{GatewayReply, GenerationConfig, ModelGateway};
use agent_llm::gateway::DEFAULT_MAX_TOKENS;
use agent_tools::ToolRegistry;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Configuration for decision generation
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// MiniJinja template with a `tool_descriptions` slot
    pub system_template: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Stop sequence passed to the backend, if any
    pub stop_sequence: Option<String>,

    /// Max tokens per decision
    pub max_tokens: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            system_template: DEFAULT_SYSTEM_TEMPLATE.to_string(),
            temperature: 0.1,
            stop_sequence: None,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl EngineConfig {
    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the stop sequence
    pub fn with_stop_sequence(mut self, stop: Option<String>) -> Self {
        self.stop_sequence = stop;
        self
    }

    /// Set the max tokens per decision
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Replace the system prompt template
    pub fn with_system_template(mut self, template: impl Into<String>) -> Self {
        self.system_template = template.into();
        self
    }
}

/// Turns a user prompt into a validated [`Decision`]
pub struct DecisionEngine {
    gateway: Arc<dyn ModelGateway>,
    registry: Arc<ToolRegistry>,
    config: EngineConfig,
}

impl DecisionEngine {
    /// Create a new decision engine
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        registry: Arc<ToolRegistry>,
        config: EngineConfig,
    ) -> Self {
        Self {
            gateway,
            registry,
            config,
        }
    }

    /// Get the engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Render the system prompt for the current tool set
    ///
    /// Descriptions are regenerated on every call.
    pub fn system_prompt(&self) -> Result<String> {
        render_system_prompt(&self.config.system_template, &self.registry.describe())
    }

    /// Build the per-cycle generation config
    pub fn generation_config(&self) -> Result<GenerationConfig> {
        Ok(GenerationConfig::new(self.system_prompt()?)
            .with_temperature(self.config.temperature)
            .with_stop_sequence(self.config.stop_sequence.clone())
            .with_max_tokens(self.config.max_tokens))
    }

    /// Ask the model for a decision; never fails
    #[instrument(skip(self, prompt), fields(gateway = %self.gateway.name()))]
    pub async fn decide(&self, prompt: &str) -> Decision {
        let config = match self.generation_config() {
            Ok(config) => config,
            Err(fault) => {
                warn!(error = %fault, "Could not build system prompt");
                return Decision::no_tool(fault.to_string());
            }
        };

        debug!(
            tool_count = self.registry.len(),
            temperature = config.temperature,
            stop_sequence = ?config.stop_sequence,
            "Awaiting generation"
        );

        let reply = match self.gateway.generate(prompt, &config).await {
            Ok(reply) => reply,
            Err(err) => {
                let fault = Error::from(err);
                warn!(
                    error = %fault,
                    recoverable = fault.is_recoverable(),
                    "Generation faulted"
                );
                return Decision::no_tool(fault.to_string());
            }
        };

        match reply {
            GatewayReply::Error { error } => {
                warn!(error = %error, "Gateway reported an error");
                Decision::no_tool(error)
            }
            GatewayReply::Decision {
                tool_choice,
                tool_input,
            } => self.validate(&tool_choice, tool_input),
        }
    }

    /// Keep the choice only if it is the sentinel or a registered tool
    fn validate(&self, tool_choice: &str, tool_input: String) -> Decision {
        let choice = tool_choice.trim();

        if is_no_tool(choice) {
            info!("Model chose no tool");
            return Decision::no_tool(tool_input);
        }

        if self.registry.contains(choice) {
            info!(tool_choice = %choice, "Model chose tool");
            return Decision::new(choice, tool_input);
        }

        warn!(tool_choice = %choice, "Model chose an unregistered tool, answering directly");
        Decision::no_tool(tool_input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_llm::LLMError;
    use agent_tools::builtin::default_tools;
    use async_trait::async_trait;
    use std::sync::Mutex;

    enum Script {
        Reply(GatewayReply),
        Fail,
        Malformed,
    }

    struct ScriptedGateway {
        script: Script,
        calls: Mutex<Vec<(String, GenerationConfig)>>,
    }

    impl ScriptedGateway {
        fn new(script: Script) -> Arc<Self> {
            Arc::new(Self {
                script,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn decision(choice: &str, input: &str) -> Arc<Self> {
            Self::new(Script::Reply(GatewayReply::Decision {
                tool_choice: choice.to_string(),
                tool_input: input.to_string(),
            }))
        }
    }

    #[async_trait]
    impl ModelGateway for ScriptedGateway {
        async fn generate(
            &self,
            user_prompt: &str,
            config: &GenerationConfig,
        ) -> agent_llm::Result<GatewayReply> {
            self.calls
                .lock()
                .unwrap()
                .push((user_prompt.to_string(), config.clone()));
            match &self.script {
                Script::Reply(reply) => Ok(reply.clone()),
                Script::Fail => Err(LLMError::RequestFailed("connection refused".to_string())),
                Script::Malformed => Err(LLMError::MalformedResponse("no JSON".to_string())),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn engine(gateway: Arc<ScriptedGateway>) -> DecisionEngine {
        DecisionEngine::new(
            gateway,
            Arc::new(ToolRegistry::with_tools(default_tools())),
            EngineConfig::default().with_stop_sequence(Some("<|eot_id|>".to_string())),
        )
    }

    #[tokio::test]
    async fn test_valid_tool_decision() {
        let gateway = ScriptedGateway::decision("basic_calculator", "2+2");
        let decision = engine(gateway.clone()).decide("What is 2+2?").await;
        assert_eq!(decision, Decision::new("basic_calculator", "2+2"));

        let calls = gateway.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (prompt, config) = &calls[0];
        assert_eq!(prompt, "What is 2+2?");
        assert!(config.system_prompt.contains("basic_calculator("));
        assert!(config.system_prompt.contains("reverse_string("));
        assert_eq!(config.stop_sequence.as_deref(), Some("<|eot_id|>"));
        assert!(config.temperature <= 0.2);
    }

    #[tokio::test]
    async fn test_gateway_error_becomes_no_tool() {
        let gateway = ScriptedGateway::new(Script::Reply(GatewayReply::Error {
            error: "x".to_string(),
        }));
        let decision = engine(gateway).decide("anything").await;
        assert_eq!(decision, Decision::no_tool("x"));
    }

    #[tokio::test]
    async fn test_gateway_fault_is_recovered() {
        let decision = engine(ScriptedGateway::new(Script::Fail)).decide("hi").await;
        assert!(decision.is_no_tool());
        assert!(decision.tool_input.starts_with("Generation failed:"));
        assert!(decision.tool_input.contains("connection refused"));

        let decision = engine(ScriptedGateway::new(Script::Malformed)).decide("hi").await;
        assert!(decision.is_no_tool());
        assert!(decision.tool_input.starts_with("Malformed decision:"));
        assert!(decision.tool_input.contains("no JSON"));
    }

    #[tokio::test]
    async fn test_one_attempt_per_call() {
        let gateway = ScriptedGateway::new(Script::Fail);
        engine(gateway.clone()).decide("hi").await;
        assert_eq!(gateway.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unregistered_choice_is_normalized() {
        let gateway = ScriptedGateway::decision("weather_lookup", "Oslo");
        let decision = engine(gateway).decide("Weather in Oslo?").await;
        assert_eq!(decision, Decision::no_tool("Oslo"));
    }

    #[tokio::test]
    async fn test_choice_is_trimmed_and_sentinel_case_insensitive() {
        let decision = engine(ScriptedGateway::decision(" reverse_string ", "abc"))
            .decide("reverse abc")
            .await;
        assert_eq!(decision, Decision::new("reverse_string", "abc"));

        let decision = engine(ScriptedGateway::decision("No Tool", "Paris"))
            .decide("Capital of France?")
            .await;
        assert_eq!(decision, Decision::no_tool("Paris"));
    }

    #[tokio::test]
    async fn test_decisions_are_always_valid() {
        let registry = Arc::new(ToolRegistry::with_tools(default_tools()));
        let scripts = vec![
            ScriptedGateway::decision("basic_calculator", "1+1"),
            ScriptedGateway::decision("no tool", "hello"),
            ScriptedGateway::decision("", "empty"),
            ScriptedGateway::decision("rm -rf", "/"),
            ScriptedGateway::new(Script::Fail),
            ScriptedGateway::new(Script::Malformed),
            ScriptedGateway::new(Script::Reply(GatewayReply::Error {
                error: "boom".to_string(),
            })),
        ];

        for gateway in scripts {
            let engine = DecisionEngine::new(gateway, registry.clone(), EngineConfig::default());
            let decision = engine.decide("prompt").await;
            assert!(decision.is_no_tool() || registry.contains(&decision.tool_choice));
        }
    }

    #[tokio::test]
    async fn test_bad_template_is_recovered() {
        let gateway = ScriptedGateway::decision("basic_calculator", "2+2");
        let engine = DecisionEngine::new(
            gateway.clone(),
            Arc::new(ToolRegistry::new()),
            EngineConfig::default().with_system_template("{% for %}"),
        );

        let decision = engine.decide("hi").await;
        assert!(decision.is_no_tool());
        assert!(decision.tool_input.starts_with("Configuration error:"));
        assert!(gateway.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_system_prompt_tracks_registry() {
        let registry = Arc::new(ToolRegistry::with_tools(default_tools()));
        let engine = DecisionEngine::new(
            ScriptedGateway::new(Script::Fail),
            registry.clone(),
            EngineConfig::default(),
        );
        assert!(engine.system_prompt().unwrap().contains("reverse_string("));

        registry.register(Vec::new());
        assert!(!engine.system_prompt().unwrap().contains("reverse_string("));
    }
}
