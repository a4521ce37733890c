//! Article summarization through the LLM backend.
//!
//! Each article is cleaned, truncated, wrapped in a fixed instruction
//! template and sent to the model. The reply is free-form text that is
//! expected (but not guaranteed) to look like:
//!
//! ```text
//! Headline: <headline>
//! Summary: <summary>
//! Tags: <tag1, tag2, tag3>
//! ```
//!
//! [`parse_response`] is the only place that reads that format. Its rules:
//!
//! | Field | Taken from | When missing |
//! |-------|------------|--------------|
//! | headline | between `Headline:` and `Summary:` | `Headline unavailable` |
//! | summary | after `Summary:`, cut at `Tag:`/`Tags:` and at any trailing `tags:` label | `Summary unavailable` |
//! | tags | after `Tags:`, comma separated, at most 3 | `["General"]` |
//!
//! A reply with none of the three markers, or a failed request, yields
//! [`GeneratedSummary::fallback`].

use crate::api::AskAsync;
use crate::models::{Article, Summary};
use crate::utils::truncate_for_log;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument, warn};

/// Number of characters of article text sent to the model.
pub const MAX_PROMPT_CHARS: usize = 1500;
pub const MAX_TAGS: usize = 3;

pub const HEADLINE_UNAVAILABLE: &str = "Headline unavailable";
pub const SUMMARY_UNAVAILABLE: &str = "Summary unavailable";
pub const SUMMARY_FAILED: &str = "Summary unavailable due to content filter or formatting issue.";
pub const DEFAULT_TAG: &str = "General";

const HEADLINE_MARKER: &str = "Headline:";
const SUMMARY_MARKER: &str = "Summary:";
const TAG_MARKER: &str = "Tag:";
const TAGS_MARKER: &str = "Tags:";

const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y at %I:%M %p";

const PROMPT_TEMPLATE: &str = "Please write a clear, neutral, and informative 4-5 word headline, \
a short summary (2-3 sentences), and provide 2-3 specific and relevant tags based on the key \
topics, companies, technologies, or concepts mentioned in this article. Tags should be specific \
(e.g., 'Google Photos', 'AI Editor', 'Meta AI') rather than generic categories. Separate multiple \
tags with commas.\n\n{article_text}\n\n\
Format:\nHeadline: <headline>\nSummary: <summary>\nTags: <tag1, tag2, tag3>";

static NON_PROMPT_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s.,!?]").unwrap());

/// A `tags:` label (any case) and everything after it.
static TRAILING_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)\s*\btags?\s*:.*$").unwrap());

/// The model-generated part of a [`Summary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSummary {
    pub headline: String,
    pub summary: String,
    pub tags: Vec<String>,
}

impl GeneratedSummary {
    /// Placeholder used when the model call fails or its reply is unusable.
    pub fn fallback() -> Self {
        Self {
            headline: HEADLINE_UNAVAILABLE.to_string(),
            summary: SUMMARY_FAILED.to_string(),
            tags: vec![DEFAULT_TAG.to_string()],
        }
    }
}

/// Remove everything except word characters, whitespace and `.,!?`.
pub fn clean_input(text: &str) -> String {
    NON_PROMPT_CHARS.replace_all(text, "").into_owned()
}

/// Article text as sent to the model: cleaned fields joined by `". "`,
/// capped at [`MAX_PROMPT_CHARS`] characters.
pub fn article_text(title: &str, description: &str, content: &str) -> String {
    let full = format!(
        "{}. {}. {}",
        clean_input(title),
        clean_input(description),
        clean_input(content)
    );
    full.trim().chars().take(MAX_PROMPT_CHARS).collect()
}

pub fn render_prompt(article_text: &str) -> String {
    PROMPT_TEMPLATE.replace("{article_text}", article_text)
}

/// Extract headline, summary and tags from a model reply.
pub fn parse_response(reply: &str) -> GeneratedSummary {
    let has_marker = [HEADLINE_MARKER, SUMMARY_MARKER, TAGS_MARKER]
        .iter()
        .any(|m| reply.contains(m));
    if !has_marker {
        return GeneratedSummary::fallback();
    }

    GeneratedSummary {
        headline: extract_headline(reply),
        summary: extract_summary(reply),
        tags: extract_tags(reply),
    }
}

fn extract_headline(reply: &str) -> String {
    reply
        .split_once(HEADLINE_MARKER)
        .and_then(|(_, rest)| rest.split_once(SUMMARY_MARKER))
        .map(|(headline, _)| headline.trim())
        .filter(|headline| !headline.is_empty())
        .unwrap_or(HEADLINE_UNAVAILABLE)
        .to_string()
}

fn extract_summary(reply: &str) -> String {
    let Some((_, rest)) = reply.split_once(SUMMARY_MARKER) else {
        return SUMMARY_UNAVAILABLE.to_string();
    };

    let end = [TAG_MARKER, TAGS_MARKER]
        .iter()
        .filter_map(|m| rest.find(m))
        .min()
        .unwrap_or(rest.len());
    let summary = TRAILING_TAGS.replace(&rest[..end], "");
    let summary = summary.trim();

    if summary.is_empty() {
        SUMMARY_UNAVAILABLE.to_string()
    } else {
        summary.to_string()
    }
}

fn extract_tags(reply: &str) -> Vec<String> {
    let tags: Vec<String> = reply
        .split_once(TAGS_MARKER)
        .map(|(_, rest)| {
            rest.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .take(MAX_TAGS)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    if tags.is_empty() {
        vec![DEFAULT_TAG.to_string()]
    } else {
        tags
    }
}

/// Summarize one article. Never fails: errors become [`GeneratedSummary::fallback`].
#[instrument(level = "info", skip_all, fields(index, %title))]
pub async fn summarize_article<L: AskAsync>(
    llm: &L,
    index: usize,
    title: &str,
    description: &str,
    content: &str,
) -> GeneratedSummary {
    let prompt = render_prompt(&article_text(title, description, content));

    match llm.ask(&prompt).await {
        Ok(reply) => {
            debug!(reply = %truncate_for_log(&reply, 300), "Model reply");
            parse_response(&reply)
        }
        Err(e) => {
            warn!(index, error = %e, "Error in summarization; using fallback summary");
            GeneratedSummary::fallback()
        }
    }
}

/// Summarize stage: one summary per article, in article order, one request at a time.
#[instrument(level = "info", skip_all, fields(count = articles.len()))]
pub async fn summarize_articles<L: AskAsync>(llm: &L, articles: &[Article]) -> Vec<Summary> {
    let summaries: Vec<Summary> = stream::iter(articles.iter().enumerate())
        .then(|(index, article)| async move {
            debug!(index, source = %article.source, "Summarizing article");
            let generated = summarize_article(
                llm,
                index,
                &article.title,
                &article.description,
                &article.content,
            )
            .await;
            Summary {
                headline: generated.headline,
                summary: generated.summary,
                tags: generated.tags,
                source: article.source.clone(),
                date: format_date(&article.published_at),
            }
        })
        .collect()
        .await;

    info!(count = summaries.len(), "Summarized articles");
    summaries
}

/// Format an ISO-8601 timestamp as `March 05, 2024 at 02:30 PM`.
///
/// The time is shown in the timestamp's own offset. Anything that does not
/// parse is returned unchanged.
pub fn format_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format(DISPLAY_DATE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim().replace('Z', "+00:00");

    if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(&s, fmt) {
            return Some(dt.naive_local());
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
