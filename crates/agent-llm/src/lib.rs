//! Model gateway layer for agent-rs
//!
//! This crate sits between the decision engine and the text-generation
//! backends. It includes:
//!
//! - Message and completion request/response types
//! - The [`LLMProvider`] trait for raw text generation
//! - The [`ModelGateway`] contract: prompt in, [`GatewayReply`] out
//! - [`ProviderGateway`], which adapts any provider to the gateway contract
//!   by extracting the decision JSON from generated text
//! - Concrete provider implementations (behind feature flags)

pub mod completion;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use gateway::{GatewayReply, GenerationConfig, ModelGateway, ProviderGateway};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(any(feature = "openai", feature = "ollama"))]
pub mod providers;
