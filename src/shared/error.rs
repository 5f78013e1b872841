//! Shared Error Types
//!
//! Error types used by the wire layer and by request validation. They carry
//! no HTTP status; the backend maps them onto responses.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON encode/decode failures on the wire
//! - `ValidationError` - a request field failed a rule (name length, empty body)
//! - `EventError` - an inbound real-time frame could not be interpreted
//!
//! # Usage
//!
//! ```rust
//! use chatline::shared::error::SharedError;
//!
//! let error = SharedError::validation("name", "must be between 3 and 16 characters");
//! assert!(error.to_string().contains("name"));
//! ```
use thiserror::Error;

/// Errors shared by the wire layer and request validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Real-time event error
    #[error("Event error: {message}")]
    EventError {
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new event error
    pub fn event(message: impl Into<String>) -> Self {
        Self::EventError {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
