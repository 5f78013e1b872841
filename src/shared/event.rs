/**
 * Real-time Event System
 *
 * This module defines the wire event exchanged over the `/ws` channel.
 * Every frame is a JSON text object with a string `kind` and an arbitrary
 * `payload`:
 *
 * ```json
 * {"kind":"message","payload":{"id":"m1"}}
 * ```
 *
 * Inbound frames may carry `type` instead of `kind`. When both are present
 * `kind` wins. Unknown kinds are kept as `EventKind::Other` and never
 * rejected.
 */
use serde::{Deserialize, Serialize};

/// Kind of real-time event
///
/// Serialized as a plain string so unrecognised kinds round-trip untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    /// A message was persisted
    Message,
    /// A message was deleted by its sender
    MessageDeleted,
    /// A reaction was added to a message
    ReactionAdded,
    /// A reaction was removed from a message
    ReactionRemoved,
    /// Conversation metadata or membership changed
    ConversationUpdated,
    /// Typing indicator fanned out by the hub
    UserTyping,
    /// Client started typing (inbound only)
    TypingStart,
    /// Client stopped typing (inbound only)
    TypingStop,
    /// Any other kind
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Message => "message",
            Self::MessageDeleted => "message_deleted",
            Self::ReactionAdded => "reaction_added",
            Self::ReactionRemoved => "reaction_removed",
            Self::ConversationUpdated => "conversation_updated",
            Self::UserTyping => "user_typing",
            Self::TypingStart => "typing_start",
            Self::TypingStop => "typing_stop",
            Self::Other(kind) => kind.as_str(),
        }
    }
}

impl From<String> for EventKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "message" => Self::Message,
            "message_deleted" => Self::MessageDeleted,
            "reaction_added" => Self::ReactionAdded,
            "reaction_removed" => Self::ReactionRemoved,
            "conversation_updated" => Self::ConversationUpdated,
            "user_typing" => Self::UserTyping,
            "typing_start" => Self::TypingStart,
            "typing_stop" => Self::TypingStop,
            _ => Self::Other(kind),
        }
    }
}

impl From<&str> for EventKind {
    fn from(kind: &str) -> Self {
        Self::from(kind.to_string())
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Real-time event carried over the WebSocket channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "InboundEvent")]
pub struct WsEvent {
    /// Type of event
    pub kind: EventKind,
    /// Event payload (JSON-serializable data)
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Inbound frame before the kind is resolved
#[derive(Deserialize)]
struct InboundEvent {
    kind: Option<EventKind>,
    #[serde(rename = "type")]
    legacy_kind: Option<EventKind>,
    #[serde(default)]
    payload: serde_json::Value,
}

impl TryFrom<InboundEvent> for WsEvent {
    type Error = &'static str;

    fn try_from(inbound: InboundEvent) -> Result<Self, Self::Error> {
        let kind = inbound
            .kind
            .or(inbound.legacy_kind)
            .ok_or("missing field `kind`")?;
        Ok(Self {
            kind,
            payload: inbound.payload,
        })
    }
}

impl WsEvent {
    /// Create a new real-time event
    pub fn new(kind: impl Into<EventKind>, payload: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// Create a message event
    pub fn message(payload: serde_json::Value) -> Self {
        Self::new(EventKind::Message, payload)
    }

    /// Create the typing indicator fanned out for `user_id`
    pub fn user_typing(user_id: &str, typing: bool, conversation_id: Option<&str>) -> Self {
        let mut payload = serde_json::json!({
            "userId": user_id,
            "typing": typing,
        });
        if let Some(conversation_id) = conversation_id {
            payload["conversationId"] = serde_json::Value::from(conversation_id);
        }
        Self::new(EventKind::UserTyping, payload)
    }

    /// Encode as a JSON text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a JSON text frame
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
