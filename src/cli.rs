//! Command-line interface definitions for the news summarizer.
//!
//! Credentials and endpoints can be given as flags or environment variables;
//! everything else in [`crate::config::Config`] comes from the YAML file.

use clap::Parser;

/// Command-line arguments for the news summarizer.
///
/// # Examples
///
/// ```sh
/// # One topic, report written to ./reports
/// news_summarizer -t "electric vehicles" -o ./reports
///
/// # Interactive session: one topic per line on stdin
/// news_summarizer -c config.yaml
///
/// # Export the pipeline diagram and exit
/// news_summarizer --graph-output-dir ./graph_output
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Topic to search for; when omitted, topics are read from stdin
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Output directory for PDF reports
    #[arg(short = 'o', long, default_value = ".")]
    pub pdf_output_dir: String,

    /// Optional output directory for a JSON dump of each result
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// News API key
    #[arg(long, env = "NEWS_API_KEY")]
    pub news_api_key: Option<String>,

    /// LLM API key
    #[arg(long, env = "LLM_API_KEY")]
    pub llm_api_key: Option<String>,

    /// LLM endpoint base URL
    #[arg(long, env = "LLM_API_BASE")]
    pub llm_api_base: Option<String>,

    /// LLM deployment (Azure) or model name
    #[arg(long, env = "LLM_DEPLOYMENT")]
    pub llm_deployment: Option<String>,

    /// Write the pipeline diagram (DOT) to this directory and exit
    #[arg(long)]
    pub graph_output_dir: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(&[
            "news_summarizer",
            "--topic",
            "electric vehicles",
            "--pdf-output-dir",
            "./reports",
        ]);

        assert_eq!(cli.topic.as_deref(), Some("electric vehicles"));
        assert_eq!(cli.pdf_output_dir, "./reports");
        assert!(cli.json_output_dir.is_none());
    }

    #[test]
    fn test_cli_short_flags_and_defaults() {
        let cli = Cli::parse_from(&["news_summarizer", "-t", "AI", "-j", "/tmp/json"]);

        assert_eq!(cli.topic.as_deref(), Some("AI"));
        assert_eq!(cli.pdf_output_dir, ".");
        assert_eq!(cli.json_output_dir.as_deref(), Some("/tmp/json"));
        assert!(cli.graph_output_dir.is_none());
    }

    #[test]
    fn test_cli_short_output_dir() {
        let cli = Cli::parse_from(&[
            "news_summarizer",
            "-t",
            "electric vehicles",
            "-o",
            "./reports",
        ]);

        assert_eq!(cli.topic.as_deref(), Some("electric vehicles"));
        assert_eq!(cli.pdf_output_dir, "./reports");
    }
}
