//! Message Data Structures
//!
//! A message belongs to one conversation and carries text, an optional image
//! url, or both. Reactions, comments and read receipts hang off it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// A message as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub sender_username: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub forwarded: bool,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Users other than the sender who have read the message
    #[serde(default)]
    pub read_by: Vec<String>,
}

impl ChatMessage {
    /// Get a preview of the message text (first N characters)
    pub fn preview(&self, max_len: usize) -> String {
        if self.text.chars().count() <= max_len {
            return self.text.clone();
        }
        let mut preview: String = self.text.chars().take(max_len.saturating_sub(3)).collect();
        preview.push_str("...");
        preview
    }
}

/// An emoji reaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub user_id: String,
    pub emoji: String,
}

/// A comment attached to a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub sender_id: String,
    pub sender_username: String,
    pub text: String,
    pub time: DateTime<Utc>,
}

/// Body of `POST …/messages`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl SendMessageRequest {
    /// A message needs text or an image
    pub fn validate(&self) -> Result<(), SharedError> {
        let has_image = self
            .image_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());
        if self.content.trim().is_empty() && !has_image {
            return Err(SharedError::validation(
                "content",
                "message must have text or an image",
            ));
        }
        Ok(())
    }
}

/// Body of `POST …/forward`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardMessageRequest {
    pub conversation_id: String,
}

/// Body of `POST …/reaction`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionRequest {
    pub emoji: String,
}

/// Response of `POST …/reaction`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReactionResponse {
    /// Whether the reaction is present after the toggle
    pub active: bool,
}

/// Body of `POST …/comments`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub comment: String,
}

/// Response carrying the id of a created resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedResponse {
    pub id: String,
}
