//! Interactive loop and outcome printing

use agent_core::{Agent, Outcome};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

const PROMPT: &str = "Write 'exit' to exit. Ask me anything: ";

/// Answer one prompt and print the outcome
///
/// Tool faults are reported on stderr; they never abort the session.
pub async fn answer(agent: &dyn Agent, prompt: &str, json: bool) {
    match agent.run(prompt).await {
        Ok(outcome) => println!("{}", render(&outcome, json)),
        Err(err) => eprintln!("Error: {err}"),
    }
}

/// Read prompts from stdin until `exit` or end of input
pub async fn run(agent: &dyn Agent, json: bool) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            debug!("End of input");
            break;
        };

        let prompt = line.trim();
        if is_exit(prompt) {
            break;
        }
        if prompt.is_empty() {
            continue;
        }

        answer(agent, prompt, json).await;
    }

    Ok(())
}

fn is_exit(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit")
}

fn render(outcome: &Outcome, json: bool) -> String {
    if json {
        serde_json::to_string(outcome).unwrap_or_else(|_| outcome.to_string())
    } else {
        outcome.to_string()
    }
}
