// src/message.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// `null` and a missing field both count as no input.
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatRequest {
    pub fn text(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

/// Every body the two endpoints can return. Absent fields are omitted, so a
/// client sees exactly one of the documented shapes.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn reply_with_audio(reply: impl Into<String>, audio_url: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            audio_url: Some(audio_url.into()),
            error: None,
        }
    }

    pub fn audio_only(audio_url: impl Into<String>) -> Self {
        Self {
            audio_url: Some(audio_url.into()),
            ..Default::default()
        }
    }

    pub fn notice(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            ..Default::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }
}
