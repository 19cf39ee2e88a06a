//! Command-line host for the single-turn tool agent

mod repl;

use agent_core::Agent;
use agent_llm::providers::{OllamaConfig, OllamaProvider, OpenAIConfig, OpenAIProvider};
use agent_llm::{LLMProvider, ModelGateway, ProviderGateway};
use agent_runtime::{EngineConfig, ToolAgent};
use agent_tools::builtin::default_tools;
use agent_utils::{AgentSettings, Backend, Config};
use anyhow::Context as _;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "tool-agent")]
#[command(about = "Ask a model to pick a tool, then run it", long_about = None)]
struct Args {
    /// Prompt to answer once; starts an interactive session when omitted
    #[arg(short, long)]
    prompt: Option<String>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend: ollama or openai
    #[arg(short, long)]
    backend: Option<Backend>,

    /// Model name
    #[arg(short, long)]
    model: Option<String>,

    /// Backend base URL
    #[arg(long)]
    api_base: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,

    /// Stop sequence (empty string disables the backend default)
    #[arg(long)]
    stop: Option<String>,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    /// Flags override file and environment settings
    fn apply(&self, settings: &mut AgentSettings) {
        if let Some(backend) = self.backend {
            settings.backend = backend;
        }
        if let Some(model) = &self.model {
            settings.model = Some(model.clone());
        }
        if let Some(api_base) = &self.api_base {
            settings.api_base = Some(api_base.clone());
        }
        if let Some(temperature) = self.temperature {
            settings.temperature = Some(temperature);
        }
        if let Some(stop) = &self.stop {
            settings.stop_sequence = Some(stop.clone());
        }
    }
}

fn build_provider(settings: &AgentSettings) -> anyhow::Result<Arc<dyn LLMProvider>> {
    let provider: Arc<dyn LLMProvider> = match settings.backend {
        Backend::Ollama => {
            let mut config = OllamaConfig::from_env().with_timeout(settings.timeout_secs);
            if let Some(api_base) = &settings.api_base {
                config = config.with_api_base(api_base);
            }
            Arc::new(OllamaProvider::with_config(config)?)
        }
        Backend::OpenAI => {
            let api_key = settings
                .api_key
                .clone()
                .context("OPENAI_API_KEY must be set for the openai backend")?;
            let mut config = OpenAIConfig::new(api_key).with_timeout(settings.timeout_secs);
            if let Some(api_base) = &settings.api_base {
                config = config.with_api_base(api_base);
            }
            Arc::new(OpenAIProvider::with_config(config)?)
        }
    };
    Ok(provider)
}

fn build_agent(settings: &AgentSettings) -> anyhow::Result<ToolAgent> {
    let provider = build_provider(settings)?;
    let gateway: Arc<dyn ModelGateway> =
        Arc::new(ProviderGateway::new(provider, settings.model()));

    let engine_config = EngineConfig::default()
        .with_temperature(settings.temperature())
        .with_stop_sequence(settings.stop_sequence())
        .with_max_tokens(settings.max_tokens);

    let agent = ToolAgent::builder()
        .gateway(gateway)
        .tools(default_tools())
        .config(engine_config)
        .build()?;
    Ok(agent)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    agent_utils::init_tracing_with_level(&args.log_level);

    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config.agent);

    info!(
        backend = %config.agent.backend,
        model = %config.agent.model(),
        "Starting tool-agent"
    );

    let agent = build_agent(&config.agent)?;
    info!(tools = ?agent.tools().names(), agent = %agent.name(), "Agent ready");

    match &args.prompt {
        Some(prompt) => repl::answer(&agent, prompt, args.json).await,
        None => repl::run(&agent, args.json).await?,
    }

    Ok(())
}
