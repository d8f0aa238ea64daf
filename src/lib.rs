use anyhow::{anyhow, Result};
use comfy_table::{ContentArrangement, Table};
use thousands::Separable;
use tracing::info;

pub mod cli;
pub mod config;
pub mod error;
pub mod formatters;
pub mod github;
pub mod llm;
pub mod models;
pub mod sections;
pub mod tokenizers;
pub mod utils;

use crate::config::Config;
use crate::error::SummaryError;
use crate::formatters::{print_sections, Writer};
use crate::github::{CommentSource, GitHubClient};
use crate::llm::{CompletionClient, CompletionRequest, OpenAiClient};
use crate::models::{ChunkReport, Inputs, IssueContext, IssueRef};
use crate::sections::{is_add_section, CommentSummarySection, SummaryOptions};
use crate::tokenizers::{BpeTokenizer, MODEL_MAX_TOKENS};
use crate::utils::{get_api_key, OPENAI_API_KEY_ENV};

/// Logs to stderr, filtered by `RUST_LOG` (default `info`).
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn display_chunk_report(report: &ChunkReport) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Chunk", "Tokens", "Budget used"]);

    for (i, tokens) in report.chunk_tokens.iter().enumerate() {
        let used = if report.budget > 0 {
            *tokens as f64 * 100.0 / report.budget as f64
        } else {
            0.0
        };
        table.add_row(vec![
            (i + 1).to_string(),
            tokens.separate_with_commas(),
            format!("{:.1}%", used),
        ]);
    }

    table.add_row(vec![
        "TOTAL".to_string(),
        report.total_tokens.separate_with_commas(),
        String::new(),
    ]);

    println!("{table}");
    println!("Comments kept: {}", report.comment_count);
    println!(
        "Prompt overhead: {} tokens, chunk budget: {} of {} tokens",
        report.prompt_tokens.separate_with_commas(),
        report.budget.separate_with_commas(),
        MODEL_MAX_TOKENS.separate_with_commas()
    );
    println!("Completion requests: {}", report.completion_requests());
}

/// Works out which issue to summarize from the command line and the
/// GitHub Actions environment.
pub fn resolve_issue_context(cli: &cli::Cli, github: &GitHubClient) -> Result<IssueContext> {
    if let Some(number) = cli.issue {
        let slug = cli.repo.as_deref().ok_or(SummaryError::MissingRepository)?;
        let issue = IssueRef::from_slug(slug, number)?;
        return github.fetch_issue(&issue);
    }

    match &cli.event_path {
        Some(path) => IssueContext::from_event_file(path, cli.repo.as_deref()),
        None => Err(anyhow!(
            "No issue to summarize. Pass --repo and --issue, or run inside a GitHub Actions issue event."
        )),
    }
}

/// Completion client that refuses every request, used by `--dry-run`.
struct NoCompletions;

impl CompletionClient for NoCompletions {
    fn create_completion(&self, request: &CompletionRequest) -> Result<String> {
        Err(anyhow!(
            "completion requested for {} during a dry run",
            request.model
        ))
    }
}

pub fn run(cli: &cli::Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let inputs = Inputs {
        model: cli.model.clone(),
        max_tokens: cli.max_tokens,
        add_comment_summary_section: cli.add_comment_summary_section,
    };

    if !is_add_section(&inputs, &config) {
        eprintln!("Comment summary section is disabled or not configured; nothing to do.");
        return Ok(());
    }

    let tokenizer = match cli.encoding {
        Some(encoding) => BpeTokenizer::new(encoding)?,
        None => BpeTokenizer::for_model(&inputs.model)?,
    };
    info!(model = %inputs.model, encoding = %tokenizer.encoding(), "tokenizer ready");

    let github = GitHubClient::with_api_url(cli.github_token.clone(), &cli.github_api_url)?;
    let context = resolve_issue_context(cli, &github)?;
    let comments: &dyn CommentSource = &github;

    if cli.dry_run {
        let section = CommentSummarySection::new(comments, &NoCompletions, &tokenizer);
        if let Some(plan) = section.plan(&inputs, &config, &context)? {
            display_chunk_report(&plan.report());
        }
        return Ok(());
    }

    let api_key = get_api_key(cli.api_key.as_deref(), cli.api_key_env.as_deref()).ok_or_else(
        || {
            let var = cli.api_key_env.as_deref().unwrap_or(OPENAI_API_KEY_ENV);
            SummaryError::MissingCredential(format!(
                "no completion API key; pass --api-key or set {}",
                var
            ))
        },
    )?;
    let openai = OpenAiClient::with_api_url(&api_key, &cli.openai_api_url)?;

    let options = SummaryOptions {
        parallel: cli.parallel,
        show_progress: atty::is(atty::Stream::Stderr),
    };
    let section = CommentSummarySection::new(comments, &openai, &tokenizer).with_options(options);
    let sections = section.create_section(&inputs, &config, &context)?;

    let mut writer = Writer::new(cli.output_file.clone())?;
    print_sections(&mut writer, &sections, cli.format)?;

    Ok(())
}
