// src/types/chat.rs

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One conversational turn. A message carries text, an image, or both; the
/// system instruction is never stored here, it rides along on every request.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    /// Encoded as a `data:<mime>;base64,<payload>` string, at most one per turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub timestamp: i64,
}

impl Message {
    pub fn user(text: impl Into<String>, image: Option<String>) -> Self {
        let text = text.into();
        debug_assert!(
            !text.trim().is_empty() || image.is_some(),
            "a user message needs text or an image"
        );
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            role: Role::User,
            text,
            image,
            timestamp: unix_ms(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            role: Role::Model,
            text: text.into(),
            image: None,
            timestamp: unix_ms(),
        }
    }
}

pub fn unix_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
    }

    #[test]
    fn messages_get_unique_ids_and_ordered_timestamps() {
        let first = Message::model("a");
        let second = Message::model("b");
        assert_ne!(first.id, second.id);
        assert!(first.timestamp <= second.timestamp);
    }

    #[test]
    fn image_field_is_omitted_when_absent() {
        let msg = Message::model("hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("\"image\""));
    }
}
