use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use devagent_cli::app;
use devagent_core::{Orchestrator, Settings, TiktokenTokenizer};

#[derive(Parser)]
#[command(name = "devagent")]
#[command(about = "devagent - feed source files to a chat model in token-sized parts")]
#[command(version)]
struct Cli {
    /// Send this prompt once and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// File to send with the prompt (repeatable)
    #[arg(short, long = "file")]
    files: Vec<String>,

    /// Model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Approximate maximum tokens per file chunk
    #[arg(long)]
    max_tokens: Option<usize>,

    /// Conversation history file
    #[arg(long)]
    history: Option<PathBuf>,

    /// Settings file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = match cli.config {
        Some(ref path) => Settings::load_from(path),
        None => Settings::load(),
    };

    if let Some(ref model) = cli.model {
        settings.llm.model = model.clone();
    }
    if let Some(max_tokens) = cli.max_tokens {
        settings.chunking.max_tokens = max_tokens;
    }
    if let Some(ref history) = cli.history {
        settings.history.path = history.clone();
    }

    let tokenizer = TiktokenTokenizer::for_model(&settings.llm.model)?;
    let client = settings.build_completion_client()?;
    let mut orchestrator = Orchestrator::new(
        settings.orchestrator_config(),
        Box::new(tokenizer),
        Box::new(client),
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if cli.prompt.is_some() || !cli.files.is_empty() {
        let prompt = cli.prompt.unwrap_or_default();
        let ok = app::run_single_prompt(&mut orchestrator, &cli.files, &prompt, &mut out)?;
        if !ok {
            std::process::exit(1);
        }
    } else {
        let stdin = std::io::stdin();
        app::run_interactive(&mut orchestrator, stdin.lock(), &mut out)?;
    }

    Ok(())
}
