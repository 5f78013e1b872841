//! Messaging Module
//!
//! Data structures exchanged by the REST API:
//!
//! - `User` - a registered user
//! - `Conversation` - a direct or group conversation
//! - `ChatMessage` - a message with its reactions, comments and read receipts
//! - request/response bodies for every endpoint
//!
//! # Usage
//!
//! ```rust
//! use chatline::shared::messaging::{ChatMessage, Conversation, User};
//! ```

pub mod contact;
pub mod conversation;
pub mod message;
pub mod user;

pub use contact::AddContactRequest;
pub use conversation::{
    AddMemberRequest, Conversation, ConversationDetail, CreateConversationRequest,
};
pub use message::{
    ChatMessage, Comment, CommentRequest, CreatedResponse, ForwardMessageRequest, Reaction,
    ReactionRequest, ReactionResponse, SendMessageRequest,
};
pub use user::{validate_username, LoginRequest, LoginResponse, User, UserSearchQuery};
