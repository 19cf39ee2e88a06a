use crate::Tool;
use agent_core::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Reverses a string character by character
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseString;

#[async_trait]
impl Tool for ReverseString {
    async fn invoke(&self, input: &str) -> Result<Value> {
        Ok(Value::String(input.chars().rev().collect()))
    }

    fn name(&self) -> &str {
        "reverse_string"
    }

    fn description(&self) -> &str {
        "Reverses the order of characters in a string. \
         Use it only when the user explicitly asks to reverse text. \
         tool_input is the exact text to reverse."
    }
}
