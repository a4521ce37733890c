//! LLM chat completions client.
//!
//! # Architecture
//!
//! - [`AskAsync`]: core trait for sending one prompt and receiving the reply text
//! - [`ChatClient`]: implementation over Azure OpenAI or any OpenAI-compatible
//!   `/chat/completions` endpoint
//!
//! Requests are sent exactly once. Callers decide what a failure means; the
//! summarize stage turns every error into a fallback summary.

use crate::config::{LlmConfig, LlmProvider};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Trait for async LLM interaction.
///
/// Implementors send a fully rendered prompt and return the model's reply.
pub trait AskAsync {
    /// Send `prompt` to the model and return the text of its first choice.
    async fn ask(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Chat completions client for the configured provider.
pub struct ChatClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("provider", &self.config.provider)
            .field("api_base", &self.config.api_base)
            .field("deployment", &self.config.deployment)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ChatClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Full URL of the completions endpoint for the configured provider.
    pub fn endpoint(&self) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        match self.config.provider {
            LlmProvider::Azure => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                base, self.config.deployment, self.config.api_version
            ),
            LlmProvider::OpenAi => format!("{}/chat/completions", base),
        }
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        let model = match self.config.provider {
            LlmProvider::Azure => None,
            LlmProvider::OpenAi => Some(self.config.deployment.as_str()),
        };
        ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
        }
    }
}

impl AskAsync for ChatClient {
    #[instrument(level = "info", skip_all, fields(provider = ?self.config.provider))]
    async fn ask(&self, prompt: &str) -> Result<String> {
        let t0 = Instant::now();
        let request = self.http.post(self.endpoint()).json(&self.request_body(prompt));
        let request = match self.config.provider {
            LlmProvider::Azure => request.header("api-key", &self.config.api_key),
            LlmProvider::OpenAi => request.bearer_auth(&self.config.api_key),
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                elapsed_ms = t0.elapsed().as_millis(),
                %status,
                "Chat completion request rejected"
            );
            return Err(Error::Llm(format!("status {}: {}", status, body)));
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| Error::Llm("response has no message content".to_string()))?;

        debug!(
            elapsed_ms = t0.elapsed().as_millis(),
            bytes = content.len(),
            "Chat completion received"
        );
        Ok(content)
    }
}
