//! Builtin example tools
//!
//! - [`BasicCalculator`]: arithmetic on an infix expression or a JSON operand object
//! - [`ReverseString`]: reverses its input text

mod calculator;
mod reverse;

pub use calculator::BasicCalculator;
pub use reverse::ReverseString;

use crate::Tool;
use std::sync::Arc;

/// All builtin tools, in the order they are presented to the model
pub fn default_tools() -> Vec<Arc<dyn Tool>> {
    vec![Arc::new(BasicCalculator), Arc::new(ReverseString)]
}
