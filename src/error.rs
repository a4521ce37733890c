//! Crate-wide error type.
//!
//! Backend clients and the PDF painter return [`Result`]. The pipeline stages
//! themselves never surface these to their callers: fetch failures become an
//! empty article list and summarization failures become fallback summaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("News API error ({code}): {message}")]
    NewsApi { code: String, message: String },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;
