//! Backend configuration.
//!
//! Settings come from an optional YAML file and are then overridden by
//! command-line flags or their environment variables.
//!
//! ```yaml
//! news:
//!   api_key: "..."
//! llm:
//!   provider: azure
//!   api_base: "https://my-resource.openai.azure.com"
//!   api_key: "..."
//!   deployment: "gpt-4o-mini"
//! ```

use crate::cli::Cli;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub news: NewsConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsConfig {
    pub api_key: String,
    pub base_url: String,
    pub language: String,
    pub page_size: u32,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://newsapi.org/v2".to_string(),
            language: "en".to_string(),
            page_size: 20,
        }
    }
}

/// Which flavor of chat completions endpoint to call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Azure,
    OpenAi,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_base: String,
    pub api_key: String,
    /// Only used by the Azure provider.
    pub api_version: String,
    /// Azure deployment name, or the model name for OpenAI-compatible endpoints.
    pub deployment: String,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Azure,
            api_base: String::new(),
            api_key: String::new(),
            api_version: "2024-02-01".to_string(),
            deployment: "gpt-4o-mini".to_string(),
            temperature: 0.5,
        }
    }
}

impl Config {
    /// Parse a YAML document. Missing sections and fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load the YAML file named by `--config` (if any) and apply CLI overrides.
    #[instrument(level = "info", skip_all)]
    pub async fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => {
                let yaml = tokio::fs::read_to_string(path).await?;
                info!(path = %path, "Loaded configuration file");
                Self::from_yaml(&yaml)?
            }
            None => Self::default(),
        };
        config.apply_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(key) = &cli.news_api_key {
            self.news.api_key = key.clone();
        }
        if let Some(key) = &cli.llm_api_key {
            self.llm.api_key = key.clone();
        }
        if let Some(base) = &cli.llm_api_base {
            self.llm.api_base = base.clone();
        }
        if let Some(deployment) = &cli.llm_deployment {
            self.llm.deployment = deployment.clone();
        }
    }

    /// Credentials are passed through untouched; only their presence is checked.
    pub fn validate(&self) -> Result<()> {
        if self.news.api_key.is_empty() {
            return Err(Error::Config(
                "news API key is required (--news-api-key or NEWS_API_KEY)".to_string(),
            ));
        }
        if self.llm.api_key.is_empty() {
            return Err(Error::Config(
                "LLM API key is required (--llm-api-key or LLM_API_KEY)".to_string(),
            ));
        }
        if self.llm.api_base.is_empty() {
            return Err(Error::Config(
                "LLM API base URL is required (--llm-api-base or LLM_API_BASE)".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.news.base_url, "https://newsapi.org/v2");
        assert_eq!(config.news.language, "en");
        assert_eq!(config.news.page_size, 20);
        assert_eq!(config.llm.provider, LlmProvider::Azure);
        assert_eq!(config.llm.temperature, 0.5);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
llm:
  provider: openai
  api_base: "http://localhost:11434/v1"
  deployment: "llama3"
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.llm.provider, LlmProvider::OpenAi);
        assert_eq!(config.llm.api_base, "http://localhost:11434/v1");
        assert_eq!(config.llm.deployment, "llama3");
        assert_eq!(config.llm.api_version, "2024-02-01");
        assert_eq!(config.news.page_size, 20);
    }

    #[test]
    fn test_cli_overrides_and_validation() {
        let mut config = Config::default();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let cli = Cli::parse_from([
            "news_summarizer",
            "--news-api-key",
            "news-key",
            "--llm-api-key",
            "llm-key",
            "--llm-api-base",
            "https://example.openai.azure.com",
        ]);
        config.apply_overrides(&cli);
        assert_eq!(config.news.api_key, "news-key");
        assert_eq!(config.llm.api_key, "llm-key");
        assert!(config.validate().is_ok());
    }
}
