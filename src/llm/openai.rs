use anyhow::Result;
use reqwest::blocking::Client;
use tracing::{debug, warn};

use super::models::{OpenAICompletionRequest, OpenAICompletionResponse};
use super::{CompletionClient, CompletionRequest};
use crate::error::SummaryError;

pub const OPENAI_API_URL: &str = "https://api.openai.com";

pub struct OpenAiClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_api_url(api_key, OPENAI_API_URL)
    }

    pub fn with_api_url(api_key: &str, api_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("issue-digest/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

impl CompletionClient for OpenAiClient {
    fn create_completion(&self, request: &CompletionRequest) -> Result<String> {
        let body = OpenAICompletionRequest {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/v1/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(status = status.as_u16(), model = %request.model, "completion request rejected");
            return Err(SummaryError::Api {
                service: "OpenAI",
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let response = response.json::<OpenAICompletionResponse>()?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SummaryError::EmptyCompletion {
                model: request.model.clone(),
            })?;

        debug!(
            model = %request.model,
            finish_reason = choice.finish_reason.as_deref().unwrap_or("unknown"),
            "completion received"
        );
        Ok(choice.text)
    }
}
