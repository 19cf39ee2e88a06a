//! System prompt template
//!
//! The template is rendered with MiniJinja; the only variable is
//! `tool_descriptions`, the registry's description block.

use agent_core::{Error, Result};
use minijinja::{Environment, context};

/// Default system prompt; asks for exactly one `{tool_choice, tool_input}` object
pub const DEFAULT_SYSTEM_TEMPLATE: &str = r#"You are an agent with access to a toolbox. Given a user query, decide which tool, if any, is best suited to answer it. It is fine if no tool fits.

Respond with exactly one JSON object and nothing else:
{"tool_choice": "name_of_the_tool", "tool_input": "inputs_to_the_tool"}

tool_choice: the name of a tool from your toolbox, or "no tool" if you do not use a tool.
tool_input: the input the selected tool needs. With "no tool", put your direct answer to the query here.

Your tools and their descriptions:
{{ tool_descriptions }}

Base your decision on the user query and the tools above. Make sure the response is a valid JSON object."#;

/// Render a system prompt template with the given tool descriptions
pub fn render_system_prompt(template: &str, tool_descriptions: &str) -> Result<String> {
    let env = Environment::new();
    env.render_str(template, context! { tool_descriptions => tool_descriptions })
        .map_err(|e| Error::Configuration(format!("Failed to render system prompt: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_renders_descriptions() {
        let descriptions = "basic_calculator(input: str): math\nreverse_string(input: str): reverse";
        let prompt = render_system_prompt(DEFAULT_SYSTEM_TEMPLATE, descriptions).unwrap();

        assert!(prompt.contains(descriptions));
        assert!(prompt.contains(r#""tool_choice""#));
        assert!(prompt.contains(r#""no tool""#));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_descriptions_are_not_escaped() {
        let prompt = render_system_prompt("{{ tool_descriptions }}", r#"calc: {"num1": 1} & <x>"#)
            .unwrap();
        assert_eq!(prompt, r#"calc: {"num1": 1} & <x>"#);
    }

    #[test]
    fn test_invalid_template() {
        let result = render_system_prompt("{% if %}", "");
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
