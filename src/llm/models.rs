use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct OpenAICompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: usize,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct OpenAICompletionResponse {
    #[serde(default)]
    pub choices: Vec<OpenAICompletionChoice>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct OpenAICompletionChoice {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub finish_reason: Option<String>,
}
