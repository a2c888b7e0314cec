//! Conversations API abstraction.
//!
//! [`ConversationsApi`] is transport-agnostic; `twilio-conversations` implements it over HTTP
//! and tests substitute in-memory fakes.

use crate::error::Result;
use crate::types::{Conversation, Message, NewParticipant, Participant};
use async_trait::async_trait;

/// Operations the echo demo needs from the provider, scoped to one conversation service.
///
/// List operations return the complete sequence; implementations follow pagination themselves.
#[async_trait]
pub trait ConversationsApi: Send + Sync {
    /// Lists every conversation in the service, in provider order.
    async fn list_conversations(&self) -> Result<Vec<Conversation>>;
    /// Lists the participants of a conversation.
    async fn list_participants(&self, conversation_sid: &str) -> Result<Vec<Participant>>;
    /// Creates a conversation with the given friendly name.
    async fn create_conversation(&self, friendly_name: &str) -> Result<Conversation>;
    /// Adds a participant with a messaging binding to a conversation.
    async fn create_participant(
        &self,
        conversation_sid: &str,
        participant: &NewParticipant,
    ) -> Result<Participant>;
    /// Lists all messages of a conversation, oldest first.
    async fn list_messages(&self, conversation_sid: &str) -> Result<Vec<Message>>;
    /// Posts a message into a conversation.
    async fn create_message(&self, conversation_sid: &str, body: &str) -> Result<Message>;
    /// Deletes a conversation together with its participants and messages.
    async fn delete_conversation(&self, conversation_sid: &str) -> Result<()>;
}
