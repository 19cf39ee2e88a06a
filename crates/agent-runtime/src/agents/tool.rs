//! Tool agent implementation (decision engine + dispatcher)

use crate::dispatcher::Dispatcher;
use crate::engine::{DecisionEngine, EngineConfig};
use crate::prompt::render_system_prompt;
use agent_core::{Agent, Decision, Error, Outcome, Result};
use agent_llm::ModelGateway;
use agent_tools::{Tool, ToolRegistry};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// A single-turn agent: one prompt, one decision, at most one tool call
///
/// Holds no state between calls apart from the read-only tool registry, so
/// independent agents may share a registry.
///
/// # Example
///
/// ```ignore
/// use agent_core::Agent;
/// use agent_runtime::ToolAgent;
/// use agent_tools::builtin::default_tools;
///
/// # async fn example(gateway: std::sync::Arc<dyn agent_llm::ModelGateway>) -> agent_core::Result<()> {
/// let agent = ToolAgent::builder()
///     .gateway(gateway)
///     .tools(default_tools())
///     .build()?;
///
/// let outcome = agent.run("What is 2+2?").await?;
/// println!("{outcome}");
/// # Ok(())
/// # }
/// ```
pub struct ToolAgent {
    name: String,
    engine: DecisionEngine,
    dispatcher: Dispatcher,
    registry: Arc<ToolRegistry>,
}

impl ToolAgent {
    /// Create a tool agent from its parts
    pub fn new(
        name: impl Into<String>,
        gateway: Arc<dyn ModelGateway>,
        registry: Arc<ToolRegistry>,
        config: EngineConfig,
    ) -> Self {
        Self {
            name: name.into(),
            engine: DecisionEngine::new(gateway, Arc::clone(&registry), config),
            dispatcher: Dispatcher::new(Arc::clone(&registry)),
            registry,
        }
    }

    /// Create a new builder
    pub fn builder() -> ToolAgentBuilder {
        ToolAgentBuilder::new()
    }

    /// Get the tool registry
    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Get the decision engine
    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Execute an already-made decision
    pub async fn execute(&self, decision: &Decision) -> Result<Outcome> {
        self.dispatcher.execute(decision).await
    }
}

#[async_trait]
impl Agent for ToolAgent {
    async fn decide(&self, prompt: &str) -> Decision {
        self.engine.decide(prompt).await
    }

    async fn run(&self, prompt: &str) -> Result<Outcome> {
        let decision = self.decide(prompt).await;
        info!(
            agent = %self.name,
            tool_choice = %decision.tool_choice,
            "Decision made"
        );
        self.execute(&decision).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`ToolAgent`]
pub struct ToolAgentBuilder {
    name: String,
    gateway: Option<Arc<dyn ModelGateway>>,
    registry: Option<Arc<ToolRegistry>>,
    config: EngineConfig,
}

impl Default for ToolAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolAgentBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            name: "tool-agent".to_string(),
            gateway: None,
            registry: None,
            config: EngineConfig::default(),
        }
    }

    /// Set the agent name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the model gateway
    pub fn gateway(mut self, gateway: Arc<dyn ModelGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Use an existing (possibly shared) tool registry
    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Register the given tools in a fresh registry
    pub fn tools(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        self.registry = Some(Arc::new(ToolRegistry::with_tools(tools)));
        self
    }

    /// Set the engine configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the agent
    ///
    /// Fails if no gateway was given or the system template does not render.
    pub fn build(self) -> Result<ToolAgent> {
        let gateway = self
            .gateway
            .ok_or_else(|| Error::Configuration("Model gateway is required".to_string()))?;
        let registry = self.registry.unwrap_or_default();

        render_system_prompt(&self.config.system_template, "")?;

        Ok(ToolAgent::new(self.name, gateway, registry, self.config))
    }
}
