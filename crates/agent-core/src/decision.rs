//! Decision and outcome types
//!
//! A [`Decision`] is the structured result of one generation cycle. It is
//! created per request, consumed once by the dispatcher, and discarded. The
//! [`Outcome`] is what the dispatcher hands back to the host for display.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Sentinel tool choice meaning "answer directly, invoke nothing"
pub const NO_TOOL: &str = "no tool";

/// Whether `tool_choice` names the [`NO_TOOL`] sentinel
///
/// Surrounding whitespace and ASCII case are ignored, so `" No Tool "`
/// matches. Tool names themselves are always compared exactly.
pub fn is_no_tool(tool_choice: &str) -> bool {
    tool_choice.trim().eq_ignore_ascii_case(NO_TOOL)
}

/// The model's choice of tool and the input to give it
///
/// # Example
///
/// ```
/// use agent_core::{Decision, NO_TOOL};
///
/// let decision = Decision::no_tool("Paris is the capital of France.");
/// assert_eq!(decision.tool_choice, NO_TOOL);
/// assert!(decision.is_no_tool());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Either [`NO_TOOL`] or the name of a registered tool
    pub tool_choice: String,

    /// Free-form input for the tool, or the direct answer when no tool is used
    pub tool_input: String,
}

impl Decision {
    /// Create a decision selecting the named tool
    pub fn new(tool_choice: impl Into<String>, tool_input: impl Into<String>) -> Self {
        Self {
            tool_choice: tool_choice.into(),
            tool_input: tool_input.into(),
        }
    }

    /// Create a decision that answers directly without a tool
    pub fn no_tool(tool_input: impl Into<String>) -> Self {
        Self::new(NO_TOOL, tool_input)
    }

    /// Whether this decision carries the "no tool" sentinel
    pub fn is_no_tool(&self) -> bool {
        is_no_tool(&self.tool_choice)
    }
}

/// Final value shown to the user after dispatch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// A tool was invoked and returned this value
    Tool {
        /// Name of the tool that produced the value
        tool: String,
        /// Value returned by the tool
        value: Value,
    },

    /// No tool matched; the decision's input is surfaced verbatim
    Literal {
        /// Text shown as-is
        text: String,
    },
}

impl Outcome {
    /// Create a literal outcome
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal { text: text.into() }
    }

    /// Name of the tool that produced this outcome, if any
    pub fn tool(&self) -> Option<&str> {
        match self {
            Self::Tool { tool, .. } => Some(tool),
            Self::Literal { .. } => None,
        }
    }

    /// The outcome as a JSON value
    pub fn value(&self) -> Value {
        match self {
            Self::Tool { value, .. } => value.clone(),
            Self::Literal { text } => Value::String(text.clone()),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Strings print without JSON quotes
            Self::Tool {
                value: Value::String(s),
                ..
            } => f.write_str(s),
            Self::Tool { value, .. } => write!(f, "{value}"),
            Self::Literal { text } => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_tool_decision() {
        let decision = Decision::no_tool("hello");
        assert!(decision.is_no_tool());
        assert_eq!(decision.tool_input, "hello");

        let decision = Decision::new("reverse_string", "abc");
        assert!(!decision.is_no_tool());
    }

    #[test]
    fn test_sentinel_matching_is_tolerant() {
        for choice in ["no tool", "No Tool", "NO TOOL", "  no tool\n"] {
            assert!(is_no_tool(choice), "expected sentinel match for {choice:?}");
        }
        for choice in ["", "notool", "no_tool", "no tools", "reverse_string"] {
            assert!(!is_no_tool(choice), "unexpected sentinel match for {choice:?}");
        }
        assert!(Decision::new("No Tool", "hi").is_no_tool());
    }

    #[test]
    fn test_decision_deserialization() {
        let decision: Decision =
            serde_json::from_str(r#"{"tool_choice": "basic_calculator", "tool_input": "2+2"}"#)
                .unwrap();
        assert_eq!(decision, Decision::new("basic_calculator", "2+2"));
    }

    #[test]
    fn test_decision_missing_key_is_rejected() {
        let result: std::result::Result<Decision, _> =
            serde_json::from_str(r#"{"tool_choice": "basic_calculator"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_outcome_display() {
        let number = Outcome::Tool {
            tool: "basic_calculator".into(),
            value: json!(4),
        };
        assert_eq!(number.to_string(), "4");

        let text = Outcome::Tool {
            tool: "reverse_string".into(),
            value: json!("olleh"),
        };
        assert_eq!(text.to_string(), "olleh");

        let literal = Outcome::literal("Paris is the capital of France.");
        assert_eq!(literal.to_string(), "Paris is the capital of France.");
        assert_eq!(literal.tool(), None);
    }

    #[test]
    fn test_outcome_value() {
        let outcome = Outcome::Tool {
            tool: "basic_calculator".into(),
            value: json!(4),
        };
        assert_eq!(outcome.tool(), Some("basic_calculator"));
        assert_eq!(outcome.value(), json!(4));
        assert_eq!(Outcome::literal("abc").value(), json!("abc"));
    }
}
