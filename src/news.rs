//! Article fetching from the news search backend.
//!
//! The fetch stage asks the backend for up to 20 English articles sorted by
//! relevancy, keeps only those that mention every keyword of the topic as a
//! whole word, and returns at most [`MAX_ARTICLES`] of them in backend order.
//!
//! Backend failures never reach the caller: a non-ok status, a transport
//! error or an unreadable body all produce an empty list.

use crate::config::NewsConfig;
use crate::error::{Error, Result};
use crate::models::{Article, NewsApiResponse};
use regex::Regex;
use std::fmt;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Maximum number of articles the fetch stage returns.
pub const MAX_ARTICLES: usize = 5;

/// A searchable news backend.
pub trait NewsSource {
    /// Run one keyword search for `topic` and return the raw response.
    async fn search(&self, topic: &str) -> Result<NewsApiResponse>;
}

/// Client for the NewsAPI `/everything` endpoint.
pub struct NewsApiClient {
    http: reqwest::Client,
    config: NewsConfig,
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("base_url", &self.config.base_url)
            .field("language", &self.config.language)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl NewsApiClient {
    pub fn new(config: NewsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Search URL for `topic`, with the topic used both as the full-text and the title query.
    pub fn search_url(&self, topic: &str) -> Result<Url> {
        let endpoint = format!("{}/everything", self.config.base_url.trim_end_matches('/'));
        let page_size = self.config.page_size.to_string();
        let url = Url::parse_with_params(
            &endpoint,
            &[
                ("q", topic),
                ("qInTitle", topic),
                ("language", self.config.language.as_str()),
                ("sortBy", "relevancy"),
                ("page", "1"),
                ("pageSize", page_size.as_str()),
            ],
        )?;
        Ok(url)
    }
}

impl NewsSource for NewsApiClient {
    #[instrument(level = "info", skip_all, fields(%topic))]
    async fn search(&self, topic: &str) -> Result<NewsApiResponse> {
        let url = self.search_url(topic)?;
        let response = self
            .http
            .get(url)
            .header("X-Api-Key", &self.config.api_key)
            .header("User-Agent", concat!("news_summarizer/", env!("CARGO_PKG_VERSION")))
            .send()
            .await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Whole-word matchers for every keyword of a topic, compiled once per search.
#[derive(Debug)]
pub struct TopicMatcher {
    keywords: Vec<Regex>,
}

impl TopicMatcher {
    pub fn new(topic: &str) -> Result<Self> {
        let keywords = topic
            .to_lowercase()
            .split_whitespace()
            .map(|word| Regex::new(&format!(r"\b{}\b", regex::escape(word))))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { keywords })
    }

    /// True if every keyword occurs as a whole word in the article's title,
    /// description, or content (case-insensitive).
    pub fn is_relevant(&self, article: &Article) -> bool {
        let combined = format!(
            "{} {} {}",
            article.title, article.description, article.content
        )
        .to_lowercase();

        self.keywords.iter().all(|re| re.is_match(&combined))
    }
}

/// Fetch stage: search, filter by relevance, cap at [`MAX_ARTICLES`].
#[instrument(level = "info", skip_all, fields(%topic))]
pub async fn fetch_articles<S: NewsSource>(source: &S, topic: &str) -> Vec<Article> {
    let response = match source.search(topic).await {
        Ok(resp) => resp,
        Err(e) => {
            warn!(error = %e, "News search failed; continuing with no articles");
            return Vec::new();
        }
    };

    if response.status != "ok" {
        let e = Error::NewsApi {
            code: response.code.unwrap_or_else(|| "unknown".to_string()),
            message: response.message.unwrap_or_else(|| "Unknown error".to_string()),
        };
        warn!(error = %e, "News backend returned non-ok status; continuing with no articles");
        return Vec::new();
    }

    let matcher = match TopicMatcher::new(topic) {
        Ok(matcher) => matcher,
        Err(e) => {
            warn!(error = %e, "Could not build topic matcher; continuing with no articles");
            return Vec::new();
        }
    };

    let total_results = response.total_results.unwrap_or_default();
    let raw = response.articles.unwrap_or_default();
    let received = raw.len();
    let articles: Vec<Article> = raw
        .into_iter()
        .map(Article::from)
        .filter(|article| matcher.is_relevant(article))
        .take(MAX_ARTICLES)
        .collect();

    info!(total_results, received, kept = articles.len(), "Fetched relevant articles");
    debug!(titles = ?articles.iter().map(|a| a.title.as_str()).collect::<Vec<_>>(), "Kept articles");
    articles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewsApiArticle, NewsApiSource};

    struct StubSource {
        response: fn() -> Result<NewsApiResponse>,
    }

    impl NewsSource for StubSource {
        async fn search(&self, _topic: &str) -> Result<NewsApiResponse> {
            (self.response)()
        }
    }

    fn raw(title: &str, description: &str, content: &str) -> NewsApiArticle {
        NewsApiArticle {
            source: Some(NewsApiSource {
                name: Some("Example Wire".to_string()),
            }),
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            content: Some(content.to_string()),
            published_at: Some("2024-03-05T14:30:00Z".to_string()),
            url: Some("https://example.com/story".to_string()),
        }
    }

    fn ok(articles: Vec<NewsApiArticle>) -> Result<NewsApiResponse> {
        Ok(NewsApiResponse {
            status: "ok".to_string(),
            total_results: Some(articles.len() as u32),
            articles: Some(articles),
            code: None,
            message: None,
        })
    }

    fn article(title: &str, description: &str, content: &str) -> Article {
        raw(title, description, content).into()
    }

    fn is_relevant(article: &Article, topic: &str) -> bool {
        TopicMatcher::new(topic).unwrap().is_relevant(article)
    }

    #[test]
    fn test_is_relevant_requires_every_keyword() {
        let a = article("Electric Vehicles surge", "EV sales rise", "... [+120 chars]");
        assert!(is_relevant(&a, "electric vehicles"));
        assert!(is_relevant(&a, "ELECTRIC"));
        assert!(!is_relevant(&a, "electric trucks"));
    }

    #[test]
    fn test_is_relevant_whole_words_only() {
        let a = article("Carmakers expand", "", "");
        assert!(!is_relevant(&a, "car"));
        let a = article("A car for everyone", "", "");
        assert!(is_relevant(&a, "car"));
    }

    #[test]
    fn test_is_relevant_searches_all_fields() {
        let a = article("Markets", "nothing here", "the battery maker grew");
        assert!(is_relevant(&a, "battery markets"));
    }

    #[test]
    fn test_is_relevant_escapes_keywords() {
        let a = article("Learning C++ today", "", "");
        assert!(!is_relevant(&a, "c.."));
        assert!(is_relevant(&a, "learning"));
    }

    #[test]
    fn test_topic_matcher_compiles_each_keyword_once() {
        let matcher = TopicMatcher::new("  Electric   VEHICLES ").unwrap();
        assert_eq!(matcher.keywords.len(), 2);

        let hit = article("Electric vehicles surge", "", "");
        let miss = article("Electric trucks surge", "", "");
        assert!(matcher.is_relevant(&hit));
        assert!(!matcher.is_relevant(&miss));
    }

    #[test]
    fn test_search_url() {
        let client = NewsApiClient::new(NewsConfig::default());
        let url = client.search_url("electric vehicles").unwrap();
        let query = url.query().unwrap();
        assert!(url.as_str().starts_with("https://newsapi.org/v2/everything?"));
        assert!(query.contains("q=electric+vehicles"));
        assert!(query.contains("qInTitle=electric+vehicles"));
        assert!(query.contains("language=en"));
        assert!(query.contains("sortBy=relevancy"));
        assert!(query.contains("page=1"));
        assert!(query.contains("pageSize=20"));
    }

    #[tokio::test]
    async fn test_fetch_filters_and_caps() {
        let source = StubSource {
            response: || {
                let mut articles: Vec<NewsApiArticle> = (0..8)
                    .map(|i| raw(&format!("Electric vehicles story {i}"), "", ""))
                    .collect();
                articles.insert(1, raw("Unrelated gardening tips", "", ""));
                ok(articles)
            },
        };

        let articles = fetch_articles(&source, "electric vehicles").await;
        assert_eq!(articles.len(), MAX_ARTICLES);
        assert!(articles.iter().all(|a| is_relevant(a, "electric vehicles")));
        assert_eq!(articles[0].title, "Electric vehicles story 0");
        assert_eq!(articles[1].title, "Electric vehicles story 1");
        assert_eq!(articles[0].source, "Example Wire");
    }

    #[tokio::test]
    async fn test_fetch_non_ok_status_yields_empty() {
        let source = StubSource {
            response: || {
                Ok(NewsApiResponse {
                    status: "error".to_string(),
                    total_results: None,
                    articles: None,
                    code: Some("rateLimited".to_string()),
                    message: Some("Too many requests".to_string()),
                })
            },
        };
        assert!(fetch_articles(&source, "anything").await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_transport_error_yields_empty() {
        let source = StubSource {
            response: || Err(Error::Config("offline".to_string())),
        };
        assert!(fetch_articles(&source, "anything").await.is_empty());
    }
}
