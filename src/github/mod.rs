mod client;

pub use client::{GitHubClient, GITHUB_API_URL};

use anyhow::Result;

use crate::models::{IssueRef, RawComment};

/// Source of the comment thread attached to an issue.
pub trait CommentSource: Send + Sync {
    /// Every comment on the issue, in the order the host returns them.
    fn list_issue_comments(&self, issue: &IssueRef) -> Result<Vec<RawComment>>;
}
