//! The fetch → summarize → render pipeline.
//!
//! The pipeline is a fixed, linear sequence of stages over one
//! [`PipelineState`]. Each stage reads the fields it needs and writes only
//! its own: `get_news` fills `articles`, `summarize_news` fills `summaries`,
//! `generate_pdf` fills `report`. Stages run one after another; within the
//! summarize stage articles are sent to the model one at a time.

use crate::api::AskAsync;
use crate::error::Result;
use crate::models::PipelineState;
use crate::news::{NewsSource, fetch_articles};
use crate::outputs::pdf::render_report;
use crate::summarize::summarize_articles;
use std::time::Instant;
use tracing::{info, instrument};

/// Stage names in execution order.
pub const STAGES: [&str; 3] = ["get_news", "summarize_news", "generate_pdf"];

/// Backends shared by every run.
#[derive(Debug)]
pub struct Pipeline<'a, S, L> {
    news: &'a S,
    llm: &'a L,
}

impl<'a, S: NewsSource, L: AskAsync> Pipeline<'a, S, L> {
    pub fn new(news: &'a S, llm: &'a L) -> Self {
        Self { news, llm }
    }

    /// Run every stage for `topic` and return the finished state.
    ///
    /// Backend failures degrade inside their stage; only a failure to
    /// produce the PDF is returned as an error.
    #[instrument(level = "info", skip_all, fields(%topic))]
    pub async fn run(&self, topic: &str) -> Result<PipelineState> {
        let t0 = Instant::now();
        let mut state = PipelineState::new(topic);

        self.get_news(&mut state).await;
        self.summarize_news(&mut state).await;
        generate_pdf(&mut state)?;

        info!(
            articles = state.articles.len(),
            summaries = state.summaries.len(),
            report_bytes = state.report.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            "Pipeline complete"
        );
        Ok(state)
    }

    async fn get_news(&self, state: &mut PipelineState) {
        state.articles = fetch_articles(self.news, &state.topic).await;
    }

    async fn summarize_news(&self, state: &mut PipelineState) {
        state.summaries = summarize_articles(self.llm, &state.articles).await;
    }
}

fn generate_pdf(state: &mut PipelineState) -> Result<()> {
    state.report = render_report(&state.articles, &state.summaries, &state.topic)?;
    Ok(())
}
