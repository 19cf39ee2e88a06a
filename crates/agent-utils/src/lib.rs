//! Shared utilities for agent-rs
//!
//! This crate provides common functionality used across the agent-rs workspace,
//! including logging setup and configuration management.

pub mod config;
pub mod logging;

pub use config::{AgentSettings, Backend, Config, ConfigError};
pub use logging::{init_tracing, init_tracing_with_level};
