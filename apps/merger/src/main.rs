mod config;
mod discovery;
mod document;
mod errors;
mod llm_client;
mod pipeline;
mod sections;
mod summarizer;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::summarizer::build_summarizer;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Structured logging on stderr; stdout carries only the completion line
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resume merger v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Input: {} -> output: {}",
        config.input_dir.display(),
        config.output_file.display()
    );

    let summarizer = build_summarizer(&config)?;

    let report =
        pipeline::run(&config.input_dir, &config.output_file, summarizer.as_ref()).await?;
    info!(
        "Merged {} files into {} sections ({} summarized)",
        report.files, report.headings, report.summarized
    );

    println!("Final resume written to {}", report.output.display());
    Ok(())
}
