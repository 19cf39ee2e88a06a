//! Tool trait definition

use agent_core::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Default signature shown for single-argument tools
pub const DEFAULT_SIGNATURE: &str = "input: str";

/// Trait for tools that agents can execute
///
/// A tool is a named, single-argument capability: it takes the model's
/// `tool_input` string and returns a displayable JSON value.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Invoke the tool with the model-provided input
    ///
    /// # Arguments
    ///
    /// * `input` - Free-form text produced by the model as `tool_input`
    ///
    /// # Returns
    ///
    /// Tool output as JSON value
    async fn invoke(&self, input: &str) -> Result<Value>;

    /// Get the tool's name
    ///
    /// Must be unique within a ToolRegistry; the model selects tools by it
    fn name(&self) -> &str;

    /// Get the tool's description
    ///
    /// Used verbatim in the system prompt, so it should tell the model what
    /// input format the tool expects
    fn description(&self) -> &str;

    /// Get the tool's parameter signature
    fn signature(&self) -> &str {
        DEFAULT_SIGNATURE
    }

    /// Render this tool's prompt description
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: self.name().to_string(),
            signature: self.signature().to_string(),
            docstring: self.description().to_string(),
        }
    }
}

/// Prompt-ready description of a tool
///
/// Rendered as `name(signature): docstring`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescription {
    /// Tool name
    pub name: String,

    /// Parameter signature
    pub signature: String,

    /// Human-readable purpose of the tool
    pub docstring: String,
}

impl fmt::Display for ToolDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}): {}", self.name, self.signature, self.docstring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        async fn invoke(&self, input: &str) -> Result<Value> {
            Ok(json!(input))
        }

        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Returns its input unchanged."
        }
    }

    #[test]
    fn test_describe_uses_default_signature() {
        let description = Echo.describe();
        assert_eq!(description.signature, DEFAULT_SIGNATURE);
        assert_eq!(
            description.to_string(),
            "echo(input: str): Returns its input unchanged."
        );
    }

    #[tokio::test]
    async fn test_invoke() {
        assert_eq!(Echo.invoke("hi").await.unwrap(), json!("hi"));
    }
}
