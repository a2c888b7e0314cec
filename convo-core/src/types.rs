//! Core types: conversation, participant, messaging binding, message.
//!
//! Field names follow the provider's JSON so the HTTP client can deserialize
//! straight into these types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A provider-side thread of messages. Referenced locally by `sid` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub sid: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
}

/// Association between a participant's real address and the proxy-channel address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagingBinding {
    #[serde(rename = "type", default)]
    pub binding_type: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub proxy_address: Option<String>,
}

/// An address attached to a conversation. Chat-identity participants have no binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub sid: String,
    #[serde(default)]
    pub identity: Option<String>,
    #[serde(default)]
    pub messaging_binding: Option<MessagingBinding>,
}

impl Participant {
    /// True when this participant's messaging-binding address equals `address`.
    pub fn is_bound_to(&self, address: &str) -> bool {
        self.messaging_binding
            .as_ref()
            .and_then(|b| b.address.as_deref())
            .map(|a| a == address)
            .unwrap_or(false)
    }
}

/// A single message. Immutable and append-only; `index` is its position in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sid: String,
    #[serde(default)]
    pub index: u64,
    #[serde(default)]
    pub author: Option<String>,
    /// Absent for media-only messages.
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
}

impl Message {
    pub fn is_authored_by(&self, address: &str) -> bool {
        self.author.as_deref() == Some(address)
    }

    /// Body text, empty for media-only messages.
    pub fn text(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

/// Parameters for creating a participant bound to an external address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
    pub address: String,
    pub proxy_address: String,
}
