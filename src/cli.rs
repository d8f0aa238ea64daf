use clap::Parser;
use std::path::PathBuf;

use crate::github::GITHUB_API_URL;
use crate::llm::OPENAI_API_URL;
use crate::models::{Encoding, OutputFormat};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "issue-digest",
    about = "Summarize the comment thread of a GitHub issue with a text-completion model",
    version
)]
pub struct Cli {
    /// JSON file holding the section prompt and title
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Completion model used for every request
    #[arg(long = "model", default_value = "text-davinci-003")]
    pub model: String,

    /// Maximum number of tokens to generate per completion
    #[arg(long = "max-tokens", default_value_t = 256)]
    pub max_tokens: usize,

    /// Add the comment summary section
    #[arg(long = "add-comment-summary-section")]
    pub add_comment_summary_section: bool,

    /// Repository as owner/name (defaults to GITHUB_REPOSITORY)
    #[arg(long = "repo", env = "GITHUB_REPOSITORY")]
    pub repo: Option<String>,

    /// Issue number; the title and body are fetched from the API.
    /// Takes precedence over --event-path
    #[arg(long = "issue")]
    pub issue: Option<u64>,

    /// GitHub Actions event payload describing the issue
    #[arg(long = "event-path", env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Token for the GitHub API
    #[arg(long = "github-token", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Base URL of the GitHub API
    #[arg(long = "github-api-url", env = "GITHUB_API_URL", default_value = GITHUB_API_URL)]
    pub github_api_url: String,

    /// API key for the completion service
    #[arg(long = "api-key")]
    pub api_key: Option<String>,

    /// Read the completion API key from this environment variable
    #[arg(long = "api-key-env", conflicts_with = "api_key")]
    pub api_key_env: Option<String>,

    /// Base URL of the completion API
    #[arg(long = "openai-api-url", default_value = OPENAI_API_URL)]
    pub openai_api_url: String,

    /// Tokenizer vocabulary (defaults to the one matching --model)
    #[arg(long = "encoding", value_enum)]
    pub encoding: Option<Encoding>,

    /// Output format
    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Markdown
    )]
    pub format: OutputFormat,

    /// Output to a file instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output_file: Option<PathBuf>,

    /// Summarize chunks concurrently
    #[arg(long = "parallel")]
    pub parallel: bool,

    /// Show the chunk plan without requesting any completion
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}
