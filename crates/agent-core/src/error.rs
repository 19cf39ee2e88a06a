//! Error types for agent-core

use thiserror::Error;

/// Result type alias for agent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent operations
#[derive(Error, Debug)]
pub enum Error {
    /// The model gateway could not produce any response
    #[error("Generation failed: {0}")]
    Generation(String),

    /// The model responded, but not with a `{tool_choice, tool_input}` object
    #[error("Malformed decision: {0}")]
    MalformedDecision(String),

    /// A selected tool faulted while running
    #[error("Tool '{tool}' failed: {message}")]
    ToolExecution {
        /// Name of the tool that failed
        tool: String,
        /// Failure description
        message: String,
    },

    /// Input handed to a tool could not be interpreted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Agent or backend configuration is invalid
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Wrap any error raised by a tool as a [`Error::ToolExecution`]
    ///
    /// Errors that already carry a tool name are passed through untouched.
    pub fn tool_execution(tool: impl Into<String>, source: Error) -> Self {
        match source {
            Error::ToolExecution { .. } => source,
            other => Error::ToolExecution {
                tool: tool.into(),
                message: other.to_string(),
            },
        }
    }

    /// Whether this error is recovered inside the decision step
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Generation(_) | Error::MalformedDecision(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_execution_wraps_message() {
        let err = Error::tool_execution("basic_calculator", Error::InvalidInput("1/0".into()));
        assert_eq!(
            err.to_string(),
            "Tool 'basic_calculator' failed: Invalid input: 1/0"
        );
    }

    #[test]
    fn test_tool_execution_is_not_rewrapped() {
        let inner = Error::ToolExecution {
            tool: "reverse_string".into(),
            message: "boom".into(),
        };
        let err = Error::tool_execution("other", inner);
        assert!(matches!(err, Error::ToolExecution { tool, .. } if tool == "reverse_string"));
    }

    #[test]
    fn test_recoverable() {
        assert!(Error::Generation("timeout".into()).is_recoverable());
        assert!(Error::MalformedDecision("no json".into()).is_recoverable());
        assert!(!Error::InvalidInput("x".into()).is_recoverable());
    }
}
