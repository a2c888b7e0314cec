//! # convo-core
//!
//! Core types and traits for the conversation echo demo: [`ConversationsApi`], conversation,
//! participant and message types, the [`ConvoError`] taxonomy, and tracing initialization.
//! Transport-agnostic; used by twilio-conversations and convo-echo.

pub mod api;
pub mod error;
pub mod logger;
pub mod types;

pub use api::ConversationsApi;
pub use error::{ConvoError, Result};
pub use logger::init_tracing;
pub use types::{Conversation, Message, MessagingBinding, NewParticipant, Participant};
