//! Data models for fetched articles, generated summaries, and pipeline state.
//!
//! This module defines the records that flow through the pipeline:
//! - [`Article`]: a relevant article as returned by the news backend
//! - [`Summary`]: the LLM-generated headline, summary, and tags for one article
//! - [`PipelineState`]: the single record threaded through every stage
//! - [`NewsApiResponse`] / [`NewsApiArticle`]: the news backend wire format
//!
//! `summaries[i]` always describes `articles[i]`; the two vectors are paired
//! by position and never reordered independently.

use serde::{Deserialize, Serialize};

/// A news article kept by the relevance filter.
///
/// Missing backend fields are stored as empty strings. The article is never
/// modified after the fetch stage produces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub content: String,
    /// Name of the publishing outlet (`source.name` upstream).
    pub source: String,
    /// ISO-8601 timestamp exactly as the backend sent it.
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    pub url: String,
}

/// Generated summary for exactly one [`Article`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Summary {
    pub headline: String,
    pub summary: String,
    /// At most three tags, in the order the model produced them.
    pub tags: Vec<String>,
    /// Copied from the paired article.
    pub source: String,
    /// Display date, e.g. `March 05, 2024 at 02:30 PM`.
    pub date: String,
}

/// State for a single topic query.
///
/// Each stage writes only its own field: fetch writes `articles`, summarize
/// writes `summaries`, render writes `report`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PipelineState {
    pub topic: String,
    pub articles: Vec<Article>,
    pub summaries: Vec<Summary>,
    /// Rendered PDF. Not serialized with the rest of the state.
    #[serde(skip)]
    pub report: Vec<u8>,
}

impl PipelineState {
    pub fn new(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            ..Default::default()
        }
    }
}

/// Top-level response of the news backend's `/everything` endpoint.
#[derive(Debug, Deserialize)]
pub struct NewsApiResponse {
    pub status: String,
    #[serde(rename = "totalResults")]
    pub total_results: Option<u32>,
    pub articles: Option<Vec<NewsApiArticle>>,
    pub code: Option<String>,
    pub message: Option<String>,
}

/// One article as sent by the news backend. Every field may be null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsApiArticle {
    pub source: Option<NewsApiSource>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsApiSource {
    pub name: Option<String>,
}

impl From<NewsApiArticle> for Article {
    fn from(raw: NewsApiArticle) -> Self {
        Self {
            title: raw.title.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            content: raw.content.unwrap_or_default(),
            source: raw.source.and_then(|s| s.name).unwrap_or_default(),
            published_at: raw.published_at.unwrap_or_default(),
            url: raw.url.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_deserialization_with_nulls() {
        let json = r#"{
            "status": "ok",
            "totalResults": 1,
            "articles": [{
                "source": {"id": null, "name": "Reuters"},
                "author": null,
                "title": "Electric Vehicles surge",
                "description": null,
                "url": "https://example.com/ev",
                "urlToImage": null,
                "publishedAt": "2024-03-05T14:30:00Z",
                "content": null
            }]
        }"#;

        let resp: NewsApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.total_results, Some(1));

        let article: Article = resp.articles.unwrap().remove(0).into();
        assert_eq!(article.title, "Electric Vehicles surge");
        assert_eq!(article.description, "");
        assert_eq!(article.content, "");
        assert_eq!(article.source, "Reuters");
        assert_eq!(article.published_at, "2024-03-05T14:30:00Z");
    }

    #[test]
    fn test_missing_source_defaults_to_empty() {
        let article: Article = NewsApiArticle::default().into();
        assert_eq!(article, Article::default());
    }

    #[test]
    fn test_error_response_deserialization() {
        let json = r#"{"status":"error","code":"apiKeyInvalid","message":"bad key"}"#;
        let resp: NewsApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "error");
        assert!(resp.articles.is_none());
        assert_eq!(resp.code.as_deref(), Some("apiKeyInvalid"));
    }

    #[test]
    fn test_state_serialization_skips_report() {
        let mut state = PipelineState::new("electric vehicles");
        state.report = b"%PDF-1.3".to_vec();
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("electric vehicles"));
        assert!(!json.contains("report"));
    }
}
