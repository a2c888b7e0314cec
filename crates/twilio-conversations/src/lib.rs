//! # Twilio Conversations client
//!
//! Implements [`convo_core::ConversationsApi`] against the Conversations v1 REST API.
//!
//! ## Behaviour
//!
//! - Basic auth with an API key sid and secret.
//! - Every call is scoped to one conversation service (`/Services/{sid}/...`).
//! - List calls follow `meta.next_page_url` until the last page.
//! - Failures are classified into [`convo_core::ConvoError`]: 401/403 are fatal,
//!   429/5xx and network errors are transient, other statuses are API errors.
//!
//! ## Example
//!
//! ```rust,no_run
//! use convo_core::ConversationsApi;
//! use twilio_conversations::{Credentials, TwilioConversationsClient};
//!
//! async fn example() -> convo_core::Result<()> {
//!     let client = TwilioConversationsClient::new(
//!         Credentials {
//!             api_key_sid: "SKxxxxxxxx".to_string(),
//!             api_secret: "secret".to_string(),
//!         },
//!         "ISxxxxxxxx".to_string(),
//!     )?;
//!     let conversations = client.list_conversations().await?;
//!     println!("{} conversations", conversations.len());
//!     Ok(())
//! }
//! ```

mod client;
mod wire;

pub use client::{Credentials, TwilioConversationsClient, DEFAULT_BASE_URL};

/// Masks a credential for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of it.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_ascii() {
        "***".to_string()
    } else {
        format!("{}***{}", &token[..7], &token[len - 4..])
    }
}
