//! Agent runtime for single-turn tool calling
//!
//! This crate turns one user prompt into one tool invocation:
//!
//! - [`DecisionEngine`] renders the system prompt from the tool registry,
//!   calls the model gateway, and validates the returned decision, falling
//!   back to a "no tool" decision on any fault
//! - [`Dispatcher`] runs the chosen tool, or surfaces the decision text
//! - [`ToolAgent`] wires both behind the [`agent_core::Agent`] trait

pub mod agents;
pub mod dispatcher;
pub mod engine;
pub mod prompt;

// Re-export key types
pub use agents::{ToolAgent, ToolAgentBuilder};
pub use dispatcher::Dispatcher;
pub use engine::{DecisionEngine, EngineConfig};
pub use prompt::{DEFAULT_SYSTEM_TEMPLATE, render_system_prompt};
