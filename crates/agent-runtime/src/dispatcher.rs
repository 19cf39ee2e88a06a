//! Decision dispatcher

use agent_core::{Decision, Error, Outcome, Result};
use agent_tools::ToolRegistry;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Executes a [`Decision`] against a tool registry
///
/// A registered `tool_choice` runs that tool once with `tool_input`. Any
/// other choice, "no tool" included, yields `tool_input` as literal text.
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    /// Create a dispatcher over `registry`
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Execute a decision
    ///
    /// Tool faults are returned as [`Error::ToolExecution`] and not retried.
    pub async fn execute(&self, decision: &Decision) -> Result<Outcome> {
        let Some(tool) = self.registry.lookup(&decision.tool_choice) else {
            debug!(tool_choice = %decision.tool_choice, "No matching tool, returning text");
            return Ok(Outcome::literal(decision.tool_input.clone()));
        };

        let input_preview: String = decision.tool_input.chars().take(500).collect();
        info!(
            tool_name = %tool.name(),
            input_preview = %input_preview,
            "Executing tool"
        );

        let start_time = Instant::now();
        let value = tool
            .invoke(&decision.tool_input)
            .await
            .map_err(|e| Error::tool_execution(tool.name(), e))?;

        info!(
            tool_name = %tool.name(),
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Tool execution succeeded"
        );

        Ok(Outcome::Tool {
            tool: tool.name().to_string(),
            value,
        })
    }
}
