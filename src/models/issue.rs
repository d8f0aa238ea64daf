use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::error::SummaryError;

/// Identifies one issue on the hosting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl IssueRef {
    /// Builds a reference from an `owner/name` slug.
    pub fn from_slug(slug: &str, number: u64) -> Result<Self> {
        match slug.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                    number,
                })
            }
            _ => Err(SummaryError::InvalidRepository(slug.to_string()).into()),
        }
    }
}

impl fmt::Display for IssueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Everything the pipeline needs to know about the issue being summarized.
#[derive(Debug, Clone)]
pub struct IssueContext {
    pub issue: IssueRef,
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Deserialize)]
struct EventPayload {
    issue: Option<EventIssue>,
    repository: Option<EventRepository>,
}

#[derive(Deserialize)]
struct EventIssue {
    number: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

#[derive(Deserialize)]
struct EventRepository {
    name: String,
    owner: EventOwner,
}

#[derive(Deserialize)]
struct EventOwner {
    login: String,
}

impl IssueContext {
    /// Reads the issue from a GitHub Actions event payload.
    ///
    /// `repository` (the `GITHUB_REPOSITORY` slug) is used when the payload
    /// carries no `repository` object.
    pub fn from_event_payload(json: &str, repository: Option<&str>) -> Result<Self> {
        let payload: EventPayload = serde_json::from_str(json)?;
        let event_issue = payload.issue.ok_or(SummaryError::MissingIssue)?;

        let issue = match (payload.repository, repository) {
            (Some(repo), _) => IssueRef {
                owner: repo.owner.login,
                repo: repo.name,
                number: event_issue.number,
            },
            (None, Some(slug)) => IssueRef::from_slug(slug, event_issue.number)?,
            (None, None) => {
                return Err(SummaryError::InvalidRepository(String::from("<unset>")).into())
            }
        };

        Ok(Self {
            issue,
            title: event_issue.title,
            body: event_issue.body,
        })
    }

    pub fn from_event_file(path: &Path, repository: Option<&str>) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event payload {}", path.display()))?;
        Self::from_event_payload(&json, repository)
    }
}
