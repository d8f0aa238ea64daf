//! Summary of the discussion thread of an issue.
//!
//! Comments are serialized, split into chunks that fit the model window next
//! to the prompt, summarized chunk by chunk, and the partial summaries are
//! merged by one last completion.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::Config;
use crate::formatters::render_template;
use crate::github::CommentSource;
use crate::llm::{CompletionClient, CompletionRequest};
use crate::models::{
    project_comments, serialize_comments, ChunkReport, Comment, Inputs, IssueContext,
    SummarySection,
};
use crate::tokenizers::{plan_chunks, token_budget, TokenChunk, Tokenizer};

/// Leads the merge prompt, ahead of the per-chunk summaries.
pub const MERGE_INSTRUCTION: &str =
    "Merge all the summarization data into one message. Each data chunk is separated by ---";

pub const CHUNK_SEPARATOR: &str = "---";

/// True when the caller asked for the section and it is fully configured.
pub fn is_add_section(inputs: &Inputs, config: &Config) -> bool {
    inputs.add_comment_summary_section
        && config.sections.comment_summary.prompt_and_title().is_some()
}

pub fn render_prompt(template: &str, context: &IssueContext, comments: &str) -> String {
    let values = HashMap::from([
        ("issueTitle", context.title.as_deref().unwrap_or_default()),
        ("issueBody", context.body.as_deref().unwrap_or_default()),
        ("issueComments", comments),
    ]);
    render_template(template, &values)
}

#[derive(Debug, Clone, Default)]
pub struct SummaryOptions {
    /// Run the per-chunk completions concurrently. Results keep chunk order.
    pub parallel: bool,
    pub show_progress: bool,
}

/// Everything decided before the first completion request.
#[derive(Debug, Clone)]
pub struct SectionPlan {
    /// Prompt rendered with an empty comment list.
    pub prompt: String,
    pub title: String,
    pub template: String,
    pub prompt_tokens: usize,
    pub budget: usize,
    pub comments: Vec<Comment>,
    pub chunks: Vec<TokenChunk>,
}

impl SectionPlan {
    pub fn report(&self) -> ChunkReport {
        let mut report = ChunkReport::new(self.comments.len(), self.prompt_tokens, self.budget);
        for chunk in &self.chunks {
            report.add_chunk(chunk.tokens.len());
        }
        report
    }
}

pub struct CommentSummarySection<'a> {
    comments: &'a dyn CommentSource,
    completions: &'a dyn CompletionClient,
    tokenizer: &'a dyn Tokenizer,
    options: SummaryOptions,
}

impl<'a> CommentSummarySection<'a> {
    pub fn new(
        comments: &'a dyn CommentSource,
        completions: &'a dyn CompletionClient,
        tokenizer: &'a dyn Tokenizer,
    ) -> Self {
        Self {
            comments,
            completions,
            tokenizer,
            options: SummaryOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SummaryOptions) -> Self {
        self.options = options;
        self
    }

    /// Comments on the issue minus the ones the bot wrote itself.
    pub fn fetch_comments(&self, context: &IssueContext, bot_login: &str) -> Result<Vec<Comment>> {
        let raw = self.comments.list_issue_comments(&context.issue)?;
        let total = raw.len();
        let comments = project_comments(raw, bot_login);
        info!(
            issue = %context.issue,
            total,
            kept = comments.len(),
            "fetched issue comments"
        );
        Ok(comments)
    }

    /// Fetches the comments and splits them into prompt-sized chunks.
    /// Returns `None` when the section is not configured.
    pub fn plan(
        &self,
        inputs: &Inputs,
        config: &Config,
        context: &IssueContext,
    ) -> Result<Option<SectionPlan>> {
        let Some((template, title)) = config.sections.comment_summary.prompt_and_title() else {
            return Ok(None);
        };

        let comments = self.fetch_comments(context, &config.bot_login)?;

        let prompt = render_prompt(template, context, "");
        let prompt_tokens = self.tokenizer.count(&prompt);

        // The window has to hold the prompt, the chunk and the completion.
        let reserved = prompt_tokens + inputs.max_tokens;
        let budget = token_budget(reserved)?;

        let payload = serialize_comments(&comments)?;
        let chunks = plan_chunks(self.tokenizer, &payload, reserved)?;
        info!(
            prompt_tokens,
            budget,
            chunks = chunks.len(),
            "planned comment chunks"
        );

        Ok(Some(SectionPlan {
            prompt,
            title: title.to_string(),
            template: template.to_string(),
            prompt_tokens,
            budget,
            comments,
            chunks,
        }))
    }

    pub fn create_section(
        &self,
        inputs: &Inputs,
        config: &Config,
        context: &IssueContext,
    ) -> Result<Vec<SummarySection>> {
        let Some(plan) = self.plan(inputs, config, context)? else {
            return Ok(Vec::new());
        };

        let partials = self.summarize_chunks(inputs, context, &plan)?;

        let mut message_parts = Vec::with_capacity(partials.len() + 1);
        message_parts.push(MERGE_INSTRUCTION.to_string());
        message_parts.extend(partials);

        info!(parts = message_parts.len(), "requesting merged summary");
        let description = self.completions.create_completion(&CompletionRequest {
            model: inputs.model.clone(),
            prompt: message_parts.join(CHUNK_SEPARATOR),
            max_tokens: inputs.max_tokens,
        })?;

        Ok(vec![SummarySection {
            prompt: plan.prompt,
            title: plan.title,
            description,
        }])
    }

    fn summarize_chunks(
        &self,
        inputs: &Inputs,
        context: &IssueContext,
        plan: &SectionPlan,
    ) -> Result<Vec<String>> {
        let progress = self.progress_bar(plan.chunks.len())?;

        let summarize = |(index, chunk): (usize, &TokenChunk)| -> Result<String> {
            debug!(chunk = index, tokens = chunk.tokens.len(), "summarizing chunk");
            let summary = self.completions.create_completion(&CompletionRequest {
                model: inputs.model.clone(),
                prompt: render_prompt(&plan.template, context, &chunk.text),
                max_tokens: inputs.max_tokens,
            })?;
            progress.inc(1);
            Ok(summary)
        };

        let partials = if self.options.parallel {
            plan.chunks
                .par_iter()
                .enumerate()
                .map(summarize)
                .collect::<Result<Vec<_>>>()
        } else {
            plan.chunks
                .iter()
                .enumerate()
                .map(summarize)
                .collect::<Result<Vec<_>>>()
        };

        match &partials {
            Ok(_) => progress.finish_and_clear(),
            Err(_) => progress.abandon(),
        }
        partials
    }

    fn progress_bar(&self, len: usize) -> Result<ProgressBar> {
        if !self.options.show_progress {
            return Ok(ProgressBar::hidden());
        }

        let progress = ProgressBar::new(len as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks {msg}")?
                .progress_chars("#>-"),
        );
        Ok(progress)
    }
}
