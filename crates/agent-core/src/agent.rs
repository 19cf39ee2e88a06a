//! Core Agent trait definition

use crate::{Decision, Outcome, Result};
use async_trait::async_trait;

/// Host-facing surface of a single-turn tool-calling agent
///
/// One call handles one user prompt: the agent asks the model for a
/// [`Decision`], then dispatches it. Nothing is remembered between calls.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Ask the model which tool to use for `prompt`
    ///
    /// Total: generation and parsing faults are turned into a "no tool"
    /// decision carrying a diagnostic, never into an error.
    async fn decide(&self, prompt: &str) -> Decision;

    /// Decide, then execute the decision
    ///
    /// The only error surfaced here is a fault raised by the selected tool.
    async fn run(&self, prompt: &str) -> Result<Outcome>;

    /// Get the agent's name
    fn name(&self) -> &str;
}
