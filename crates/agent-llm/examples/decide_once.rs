//! Ask a local Ollama model for one tool decision
//!
//! # Usage
//!
//! ```bash
//! export OLLAMA_API_BASE="http://localhost:11434/api"   # optional
//! cargo run --example decide_once --features ollama -p agent-llm -- "What is 12 * 7?"
//! ```

use agent_llm::providers::{OllamaConfig, OllamaProvider};
use agent_llm::{GatewayReply, GenerationConfig, ModelGateway, ProviderGateway};
use std::env;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = r#"You are an agent with access to a toolbox.
Respond with exactly one JSON object: {"tool_choice": "...", "tool_input": "..."}.
Use "no tool" as tool_choice when no tool fits, and put your answer in tool_input.

Your tools:
basic_calculator(input: str): Performs basic arithmetic on an expression such as "2 + 3 * 4".
reverse_string(input: str): Reverses the order of characters in a string."#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let prompt = env::args()
        .nth(1)
        .unwrap_or_else(|| "What is 12 * 7?".to_string());
    let model = env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.1".to_string());

    let provider = Arc::new(OllamaProvider::with_config(OllamaConfig::from_env())?);
    let gateway = ProviderGateway::new(provider, model);

    let config = GenerationConfig::new(SYSTEM_PROMPT)
        .with_stop_sequence(Some("<|eot_id|>".to_string()));

    println!("Prompt: {prompt}");
    match gateway.generate(&prompt, &config).await? {
        GatewayReply::Decision {
            tool_choice,
            tool_input,
        } => println!("tool_choice: {tool_choice}\ntool_input: {tool_input}"),
        GatewayReply::Error { error } => println!("Model reported an error: {error}"),
    }

    Ok(())
}
