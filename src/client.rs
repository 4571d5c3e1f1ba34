// src/client.rs

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error};

use crate::settings::{AppSettings, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT, DEFAULT_THINKING_BUDGET};
use crate::types::{
    Content, GeminiRequest, GeminiResponse, GenerationConfig, Part, SystemInstruction,
    ThinkingConfig,
};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Returned in place of an answer when the call succeeds but carries no text.
pub const EMPTY_RESPONSE_FALLBACK: &str =
    "I'm thinking... but I couldn't generate a text response. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("api error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Seam between the conversation controller and the hosted model.
#[async_trait]
pub trait Provider: Send + Sync {
    /// One completion for the full transcript. No retries, no streaming: the
    /// caller gets a complete answer string or an error.
    async fn generate(&self, contents: Vec<Content>) -> Result<String, ApiError>;

    fn name(&self) -> &'static str;
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    system_instruction: String,
    thinking_budget: i32,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            system_instruction: DEFAULT_SYSTEM_PROMPT.to_string(),
            thinking_budget: DEFAULT_THINKING_BUDGET,
        }
    }

    pub fn from_settings(api_key: impl Into<String>, settings: &AppSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: settings.model.clone(),
            system_instruction: settings.system_prompt.clone(),
            thinking_budget: settings.thinking_budget,
        }
    }

    fn build_request(&self, contents: Vec<Content>) -> GeminiRequest {
        GeminiRequest {
            contents,
            system_instruction: Some(SystemInstruction {
                parts: vec![Part::Text {
                    text: self.system_instruction.clone(),
                }],
            }),
            generation_config: Some(GenerationConfig {
                thinking_config: Some(ThinkingConfig {
                    thinking_budget: self.thinking_budget,
                }),
                // No output cap alongside a thinking budget; capped answers
                // come back truncated mid-derivation.
                max_output_tokens: None,
            }),
        }
    }
}

#[async_trait]
impl Provider for GeminiClient {
    async fn generate(&self, contents: Vec<Content>) -> Result<String, ApiError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            GEMINI_API_BASE, self.model, self.api_key
        );
        let request = self.build_request(contents);

        debug!(turns = request.contents.len(), model = %self.model, "sending generateContent request");

        let response = self.http.post(&url).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "{} request rejected: {}", self.name(), body);
            return Err(ApiError::Api { status, body });
        }

        let body = response.text().await?;
        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            error!("malformed {} response: {}", self.name(), e);
            ApiError::Parse(e)
        })?;

        let text = extract_text(&parsed);
        if text.trim().is_empty() {
            return Ok(EMPTY_RESPONSE_FALLBACK.to_string());
        }
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// Concatenate the answer text of the first candidate, skipping internal
/// reasoning parts.
fn extract_text(response: &GeminiResponse) -> String {
    let mut out = String::new();
    if let Some(candidate) = response.candidates.as_ref().and_then(|c| c.first()) {
        for part in &candidate.content.parts {
            if part.thought {
                continue;
            }
            if let Some(text) = &part.text {
                out.push_str(text);
            }
        }
    }
    out
}
