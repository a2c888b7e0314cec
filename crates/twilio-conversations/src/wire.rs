//! Response envelopes of the Conversations v1 API.

use convo_core::{Conversation, Message, Participant};
use serde::Deserialize;

/// Pagination block present on every list response.
#[derive(Debug, Deserialize, Default)]
pub(crate) struct PageMeta {
    #[serde(default)]
    pub next_page_url: Option<String>,
}

/// A list response page: items under a resource-specific key plus `meta`.
pub(crate) trait Page: serde::de::DeserializeOwned {
    type Item;
    fn into_parts(self) -> (Vec<Self::Item>, PageMeta);
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConversationPage {
    #[serde(default)]
    conversations: Vec<Conversation>,
    #[serde(default)]
    meta: PageMeta,
}

impl Page for ConversationPage {
    type Item = Conversation;
    fn into_parts(self) -> (Vec<Conversation>, PageMeta) {
        (self.conversations, self.meta)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ParticipantPage {
    #[serde(default)]
    participants: Vec<Participant>,
    #[serde(default)]
    meta: PageMeta,
}

impl Page for ParticipantPage {
    type Item = Participant;
    fn into_parts(self) -> (Vec<Participant>, PageMeta) {
        (self.participants, self.meta)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessagePage {
    #[serde(default)]
    messages: Vec<Message>,
    #[serde(default)]
    meta: PageMeta,
}

impl Page for MessagePage {
    type Item = Message;
    fn into_parts(self) -> (Vec<Message>, PageMeta) {
        (self.messages, self.meta)
    }
}

/// Error body returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub code: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}
