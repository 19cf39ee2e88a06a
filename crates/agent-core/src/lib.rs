//! Core abstractions for agent-rs
//!
//! This crate defines the types shared by every part of the single-turn
//! tool-calling agent: the [`Decision`] produced by the model, the [`Outcome`]
//! shown to the user, the host-facing [`Agent`] trait, and the error taxonomy.

pub mod agent;
pub mod decision;
pub mod error;

pub use agent::Agent;
pub use decision::{Decision, NO_TOOL, Outcome, is_no_tool};
pub use error::{Error, Result};
