// src/types/gemini.rs

use serde::{Deserialize, Serialize};

// ==================== Request Types ====================

#[derive(Serialize, Debug)]
pub struct GeminiRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Debug)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

/// One role-tagged turn in the request payload.
#[derive(Serialize, Clone, Debug)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Serialize, Clone, Debug)]
#[serde(untagged)]
pub enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    Text {
        text: String,
    },
}

#[derive(Serialize, Clone, Debug)]
pub struct Blob {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Raw base64 payload, without the data-URL prefix.
    pub data: String,
}

#[derive(Serialize, Debug)]
pub struct GenerationConfig {
    #[serde(rename = "thinkingConfig", skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
}

#[derive(Serialize, Debug)]
pub struct ThinkingConfig {
    #[serde(rename = "thinkingBudget")]
    pub thinking_budget: i32,
}

// ==================== Response Types ====================

#[derive(Deserialize, Debug)]
pub struct GeminiResponse {
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize, Debug)]
pub struct Candidate {
    pub content: CandidateContent,
}

#[derive(Deserialize, Debug)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
pub struct ResponsePart {
    pub text: Option<String>,
    /// Set on internal reasoning parts when a thinking budget is in effect.
    #[serde(default)]
    pub thought: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_data_serializes_camel_case() {
        let part = Part::InlineData {
            inline_data: Blob {
                mime_type: "image/png".to_string(),
                data: "QUJD".to_string(),
            },
        };
        assert_eq!(
            serde_json::to_string(&part).unwrap(),
            r#"{"inlineData":{"mimeType":"image/png","data":"QUJD"}}"#
        );
    }

    #[test]
    fn thought_flag_defaults_to_false() {
        let part: ResponsePart = serde_json::from_str(r#"{"text":"4"}"#).unwrap();
        assert!(!part.thought);
        assert_eq!(part.text.as_deref(), Some("4"));
    }
}
