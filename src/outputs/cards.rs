//! Terminal rendering of a pipeline result.
//!
//! Each article is shown as a pair of cards: the original article and its
//! AI summary. An empty result renders as a single hint line.

use crate::models::{Article, PipelineState, Summary};
use crate::text::combine_and_trim;
use itertools::Itertools;
use std::fmt::Write;

pub const NO_ARTICLES: &str =
    "No relevant articles found for this topic. Try a different search term.";

const RULE: &str = "---";

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}

fn write_pair(out: &mut String, i: usize, article: &Article, summary: &Summary) {
    let _ = writeln!(out, "Original Article {i}");
    let _ = writeln!(out, "  Title: {}", or_default(&article.title, "No title available"));
    let _ = writeln!(
        out,
        "  Description: {}",
        combine_and_trim(&article.description, &article.content)
    );
    let _ = writeln!(out, "  Source: {}", or_default(&article.source, "Unknown"));
    let _ = writeln!(out, "  Published: {}", summary.date);
    let _ = writeln!(out, "  Read Full Article: {}", or_default(&article.url, "#"));
    let _ = writeln!(out);

    let _ = writeln!(out, "Summary {i}");
    let _ = writeln!(out, "  {}", or_default(&summary.headline, "No headline available"));
    let _ = writeln!(
        out,
        "  Summary: {}",
        or_default(&summary.summary, "No summary available")
    );
    let _ = writeln!(out, "  Source: {}", or_default(&summary.source, "Unknown"));
    let _ = writeln!(out, "  Published: {}", or_default(&summary.date, "Unknown"));
    let _ = writeln!(
        out,
        "  Tags: {}",
        summary.tags.iter().map(|t| format!("[{t}]")).join(" ")
    );
    let _ = writeln!(out);
}

/// Render the result for `state.topic` as plain text.
pub fn render_cards(state: &PipelineState) -> String {
    if state.articles.is_empty() {
        return format!("{NO_ARTICLES}\n");
    }

    let mut out = String::new();
    let _ = writeln!(out, "Results for: {}", state.topic);
    let _ = writeln!(out, "Found {} relevant articles", state.articles.len());
    let _ = writeln!(out, "{RULE}");

    for (i, (article, summary)) in state.articles.iter().zip(&state.summaries).enumerate() {
        write_pair(&mut out, i + 1, article, summary);
    }
    let _ = writeln!(out, "{RULE}");
    out
}
