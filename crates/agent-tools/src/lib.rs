//! Tool management framework for agent-rs
//!
//! This crate provides the [`Tool`] trait, the [`ToolRegistry`] that stores
//! tools and renders their descriptions for the system prompt, and a pair of
//! builtin example tools.

pub mod builtin;
pub mod registry;
pub mod tool;

pub use builtin::{BasicCalculator, ReverseString};
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolDescription};
