//! Conversation Data Structure
//!
//! Represents a conversation between two or more users. Direct conversations
//! have exactly two participants and no name; groups may be renamed and given
//! a picture.

use serde::{Deserialize, Serialize};

use super::message::ChatMessage;
use super::user::User;

/// A conversation as seen by one of its participants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub is_group: bool,
    pub participants: Vec<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<ChatMessage>,
    /// Messages from others the viewer has not read
    #[serde(default)]
    pub unread_count: i64,
}

impl Conversation {
    /// Check if user is a participant
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|u| u.id == user_id)
    }

    /// Get the other participant (for direct conversations)
    pub fn other_participant(&self, current_user_id: &str) -> Option<&User> {
        self.participants.iter().find(|u| u.id != current_user_id)
    }
}

/// Response of `GET …/conversations/{cid}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDetail {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub messages: Vec<ChatMessage>,
}

/// Body of `POST /users/{id}/conversations`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateConversationRequest {
    /// Other members; the caller is added automatically
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl CreateConversationRequest {
    /// Distinct member ids including the caller, caller first
    pub fn members(&self, caller: &str) -> Vec<String> {
        let mut members = vec![caller.to_string()];
        for id in &self.participants {
            let id = id.trim();
            if !id.is_empty() && !members.iter().any(|m| m == id) {
                members.push(id.to_string());
            }
        }
        members
    }

    /// Trimmed non-empty group name, if any
    pub fn group_name(&self) -> Option<String> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
    }
}

/// Body of `POST …/members`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub user_id: String,
}
