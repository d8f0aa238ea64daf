//! Section configuration, loaded from a JSON file.
//!
//! ```json
//! {
//!   "botLogin": "github-actions[bot]",
//!   "sections": {
//!     "commentSummary": {
//!       "title": "Discussion summary",
//!       "prompt": "Summarize the discussion on {{issueTitle}}: {{issueComments}}"
//!     }
//!   }
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::BOT_LOGIN;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub sections: Sections,
    /// Comments by this login are left out of the summary.
    #[serde(default = "default_bot_login")]
    pub bot_login: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sections {
    #[serde(default)]
    pub comment_summary: SectionConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionConfig {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

fn default_bot_login() -> String {
    BOT_LOGIN.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sections: Sections::default(),
            bot_login: default_bot_login(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Config = serde_json::from_str(json)?;
        if config.bot_login.trim().is_empty() {
            config.bot_login = default_bot_login();
        }
        Ok(config)
    }
}

impl SectionConfig {
    /// Prompt and title, when both are set and non-empty.
    pub fn prompt_and_title(&self) -> Option<(&str, &str)> {
        let prompt = self.prompt.as_deref().filter(|p| !p.is_empty())?;
        let title = self.title.as_deref().filter(|t| !t.is_empty())?;
        Some((prompt, title))
    }
}
