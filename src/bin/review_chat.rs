//! Line-oriented console for the review analyst.
//!
//! ```bash
//! OPENAI_API_KEY=sk-... cargo run --bin review-chat
//! RUST_LOG=debug cargo run --bin review-chat -- --reviews data/summarized_reviews.csv --trace
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use clap::Parser;
use reviewsm::{AgentConfig, AnalystSession, RetryingLlmCaller, ReviewConfig, ReviewStore};
use reviewsm::llm::OpenAiCaller;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "review-chat", about = "Ask questions about customer reviews")]
struct Args {
    /// Summarized review CSV (overrides REVIEWS_CSV)
    #[arg(long)]
    reviews: Option<PathBuf>,

    /// Chat model (overrides CHAT_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Print the agent trace after every answer
    #[arg(long)]
    trace: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = ReviewConfig::from_env()?;
    if let Some(path) = args.reviews { config.reviews_csv = path; }
    if let Some(model) = args.model  { config.chat_model = model; }

    let store = Arc::new(ReviewStore::from_path(&config.reviews_csv)?);
    let llm = Arc::new(RetryingLlmCaller::new(Arc::new(OpenAiCaller::new()), config.llm_max_retries));

    let mut agent_config = AgentConfig { max_steps: config.agent_max_steps, ..AgentConfig::default() };
    agent_config.models.insert("default".to_string(), config.chat_model.clone());

    let session = AnalystSession::new(store, llm, agent_config);
    tracing::info!(session = %session.id(), model = %config.chat_model, "review chat ready");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"\nEnter query> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else { break };
        let query = line.trim();
        if query.is_empty() { continue; }
        if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") { break; }

        match session.ask(query).await {
            Ok(reply) => {
                println!("\n{}", reply.answer);
                if args.trace {
                    println!("\n{}", reply.trace.render());
                }
            }
            Err(e) => eprintln!("Analyst failed: {}", e),
        }
    }

    Ok(())
}
