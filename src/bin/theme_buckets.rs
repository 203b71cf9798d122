//! Buckets the first N reviews into themes and sub-themes, writes
//! `theme_buckets.json` and prints the hierarchy.
//!
//! ```bash
//! GEMINI_API_KEY=... cargo run --bin theme-buckets -- --limit 10
//! CLASSIFIER_PROVIDER=openai OPENAI_API_KEY=sk-... CLASSIFIER_MODEL=gpt-4o-mini cargo run --bin theme-buckets
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use clap::Parser;
use reviewsm::{ClassifierProvider, RetryingLlmCaller, ReviewConfig};
use reviewsm::dataset::read_review_texts;
use reviewsm::llm::OpenAiCaller;
use reviewsm::themes::{render_hierarchy, run_theming, Classifier, GeminiClassifier, LlmClassifier};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "theme-buckets", about = "Classify reviews into themes and sub-themes")]
struct Args {
    /// Review CSV with a `Text` column (overrides THEME_CSV)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Snapshot path (overrides THEME_OUTPUT)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of reviews to process (overrides THEME_REVIEW_LIMIT)
    #[arg(long)]
    limit: Option<usize>,

    /// Classifications in flight (overrides THEME_CONCURRENCY)
    #[arg(long)]
    concurrency: Option<usize>,
}

fn build_classifier(config: &ReviewConfig) -> anyhow::Result<Box<dyn Classifier>> {
    Ok(match config.classifier_provider {
        ClassifierProvider::Gemini => Box::new(GeminiClassifier::from_env(&config.classifier_model)?),
        ClassifierProvider::OpenAi => {
            let llm = RetryingLlmCaller::new(Arc::new(OpenAiCaller::new()), config.llm_max_retries);
            Box::new(LlmClassifier::new(Arc::new(llm), &config.classifier_model))
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = ReviewConfig::from_env()?;
    if let Some(input) = args.input             { config.theme_csv = input; }
    if let Some(output) = args.output           { config.theme_output = output; }
    if let Some(limit) = args.limit             { config.theme_review_limit = limit; }
    if let Some(concurrency) = args.concurrency { config.theme_concurrency = concurrency.max(1); }

    let reviews = read_review_texts(&config.theme_csv, config.theme_review_limit)?;
    let classifier = build_classifier(&config)?;

    let run = run_theming(
        &reviews,
        config.theme_review_limit,
        classifier.as_ref(),
        &config.theme_output,
        config.theme_concurrency,
    ).await;

    if run.written {
        println!("Results saved to {}", config.theme_output.display());
    } else if let Some(e) = &run.persist_error {
        eprintln!("Warning: Could not save to JSON file: {}", e);
    }

    let report = &run.report;
    tracing::info!(
        succeeded = report.succeeded.len(),
        skipped   = report.skipped.len(),
        failed    = report.failed.len(),
        "theming finished"
    );
    for failure in &report.failed {
        eprintln!("Review {} failed: {}", failure.index + 1, failure.error);
    }

    print!("{}", render_hierarchy(&report.themes));
    Ok(())
}
