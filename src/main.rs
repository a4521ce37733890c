//! # News Summarizer
//!
//! Fetches news articles for a topic, summarizes each one with an LLM, and
//! renders the results as a PDF report.
//!
//! ## Usage
//!
//! ```sh
//! news_summarizer -t "electric vehicles" -o ./reports
//! ```
//!
//! Without `--topic`, topics are read from stdin one per line; repeating a
//! topic in the same session reuses the earlier result.
//!
//! ## Architecture
//!
//! The application runs a linear pipeline per topic:
//! 1. **get_news**: search the news backend and keep up to 5 relevant articles
//! 2. **summarize_news**: ask the LLM for a headline, summary and tags per article
//! 3. **generate_pdf**: lay out and render the PDF report
//!
//! Results are cached per topic for the session, printed as cards, and the
//! report is written to the output directory.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod models;
mod news;
mod outputs;
mod pipeline;
mod session;
mod summarize;
mod text;
mod utils;

use api::ChatClient;
use cli::Cli;
use config::Config;
use news::NewsApiClient;
use outputs::{cards, graph, json};
use pipeline::{Pipeline, STAGES};
use session::SessionCache;
use utils::{ensure_writable_dir, report_filename};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("news_summarizer starting up");

    let args = Cli::parse();
    debug!(?args.topic, %args.pdf_output_dir, ?args.json_output_dir, "Parsed CLI arguments");

    if let Some(dir) = &args.graph_output_dir {
        let path = graph::write_dot(&STAGES, dir).await?;
        println!("Graph saved to {}", path.display());
        return Ok(());
    }

    let config = Config::load(&args).await?;

    if let Err(e) = ensure_writable_dir(&args.pdf_output_dir).await {
        error!(
            path = %args.pdf_output_dir,
            error = %e,
            "PDF output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let news = NewsApiClient::new(config.news.clone());
    let llm = ChatClient::new(config.llm.clone());
    let pipeline = Pipeline::new(&news, &llm);
    let mut session = SessionCache::new();

    match &args.topic {
        Some(topic) => {
            handle_topic(&pipeline, &mut session, &args, topic).await?;
        }
        None => {
            eprintln!("Enter a topic to search for news articles (Ctrl-D to quit):");
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                let topic = line.trim();
                if topic.is_empty() {
                    continue;
                }
                if let Err(e) = handle_topic(&pipeline, &mut session, &args, topic).await {
                    error!(%topic, error = %e, "Failed to produce report");
                }
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        topics = session.len(),
        "Execution complete"
    );
    Ok(())
}

/// Run (or reuse) the pipeline for one topic, print the cards and persist the report.
#[instrument(level = "info", skip_all, fields(%topic))]
async fn handle_topic<S, L>(
    pipeline: &Pipeline<'_, S, L>,
    session: &mut SessionCache,
    args: &Cli,
    topic: &str,
) -> Result<(), Box<dyn Error>>
where
    S: news::NewsSource,
    L: api::AskAsync,
{
    if session.get(topic).is_some() {
        info!("Reusing result from this session");
    }
    let state = session
        .get_or_compute(topic, |t| async move { pipeline.run(&t).await })
        .await?;

    print!("{}", cards::render_cards(state));
    if state.articles.is_empty() {
        warn!("No relevant articles found");
        return Ok(());
    }

    let filename = report_filename(topic, Local::now().naive_local());
    let pdf_path = Path::new(&args.pdf_output_dir).join(&filename);
    tokio::fs::write(&pdf_path, &state.report).await?;
    info!(path = %pdf_path.display(), bytes = state.report.len(), "Wrote PDF report");
    println!("PDF report: {}", pdf_path.display());

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = json::write_state(state, dir, &filename).await {
            error!(error = %e, "Failed to write JSON");
        }
    }

    Ok(())
}
