//! Concrete agent implementations
//!
//! - ToolAgent: single-turn agent that picks at most one tool per prompt

pub mod tool;

pub use tool::{ToolAgent, ToolAgentBuilder};
