use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("no room left for comments: {reserved} reserved tokens leave nothing of the {limit} token window")]
    TokenBudgetExhausted { reserved: usize, limit: usize },

    #[error("{model} returned no completion choices")]
    EmptyCompletion { model: String },

    #[error("{service} API returned {status}: {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("missing credential: {0}")]
    MissingCredential(String),

    #[error("invalid repository '{0}', expected owner/name")]
    InvalidRepository(String),

    #[error("--repo (or GITHUB_REPOSITORY) is required with --issue")]
    MissingRepository,

    #[error("event payload does not describe an issue")]
    MissingIssue,
}
