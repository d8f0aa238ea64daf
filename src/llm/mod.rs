mod models;
mod openai;

pub use models::*;
pub use openai::{OpenAiClient, OPENAI_API_URL};

use anyhow::Result;

/// Parameters of one completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: usize,
}

/// Anything that turns a prompt into generated text.
pub trait CompletionClient: Send + Sync {
    /// Returns the text of the first generated candidate.
    fn create_completion(&self, request: &CompletionRequest) -> Result<String>;
}
