use serde::{Deserialize, Serialize};

/// Login the workflow posts as. Its own comments are never summarized.
pub const BOT_LOGIN: &str = "github-actions[bot]";

/// Issue comment as returned by the GitHub REST API. Only the fields we read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawComment {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub user: Option<RawUser>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub login: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl From<RawComment> for Comment {
    fn from(raw: RawComment) -> Self {
        Self {
            body: raw.body,
            created_at: raw.created_at,
            author: raw.user.and_then(|user| user.login),
        }
    }
}

/// Projects raw API records and drops the ones authored by `bot_login`.
/// Relative order of the remaining comments is preserved.
pub fn project_comments(raw: Vec<RawComment>, bot_login: &str) -> Vec<Comment> {
    raw.into_iter()
        .map(Comment::from)
        .filter(|comment| comment.author.as_deref() != Some(bot_login))
        .collect()
}

/// Serializes comments as a JSON array. An empty list becomes an empty
/// string so that it produces no chunks at all.
pub fn serialize_comments(comments: &[Comment]) -> serde_json::Result<String> {
    if comments.is_empty() {
        return Ok(String::new());
    }
    serde_json::to_string(comments)
}
