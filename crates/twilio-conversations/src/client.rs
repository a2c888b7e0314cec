//! Reqwest-based implementation of [`ConversationsApi`].

use std::time::Duration;

use async_trait::async_trait;
use convo_core::{
    Conversation, ConversationsApi, ConvoError, Message, NewParticipant, Participant, Result,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::mask_token;
use crate::wire::{ConversationPage, ErrorBody, MessagePage, Page, ParticipantPage};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://conversations.twilio.com/v1";

/// Items requested per page on the first request of a listing.
const PAGE_SIZE: u32 = 50;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// API key credentials used for basic auth.
#[derive(Clone)]
pub struct Credentials {
    pub api_key_sid: String,
    pub api_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key_sid", &mask_token(&self.api_key_sid))
            .field("api_secret", &"***")
            .finish()
    }
}

/// Conversations v1 client scoped to a single conversation service.
#[derive(Debug, Clone)]
pub struct TwilioConversationsClient {
    http: Client,
    base_url: String,
    service_sid: String,
    credentials: Credentials,
}

impl TwilioConversationsClient {
    /// Creates a client for `service_sid` against the production API with the default timeout.
    pub fn new(credentials: Credentials, service_sid: String) -> Result<Self> {
        Self::with_options(credentials, service_sid, DEFAULT_BASE_URL.to_string(), DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom base URL (e.g. a mock server) and per-request timeout.
    pub fn with_options(
        credentials: Credentials,
        service_sid: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConvoError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_sid,
            credentials,
        })
    }

    pub fn service_sid(&self) -> &str {
        &self.service_sid
    }

    fn conversations_url(&self) -> String {
        format!("{}/Services/{}/Conversations", self.base_url, self.service_sid)
    }

    fn conversation_url(&self, conversation_sid: &str) -> String {
        format!("{}/{}", self.conversations_url(), conversation_sid)
    }

    fn first_page_url(url: String) -> String {
        format!("{}?PageSize={}", url, PAGE_SIZE)
    }

    /// Sends an authenticated request and maps transport failures and non-success statuses.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .basic_auth(&self.credentials.api_key_sid, Some(&self.credentials.api_secret))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => (body.code, body.message.unwrap_or_else(|| status.to_string())),
            Err(_) => (None, status.to_string()),
        };
        warn!(status = status.as_u16(), code = ?code, message = %message, "Conversations API request failed");
        Err(ConvoError::from_status(status.as_u16(), code, message))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let text = response.text().await.map_err(map_transport_error)?;
        serde_json::from_str(&text).map_err(|e| ConvoError::Decode(e.to_string()))
    }

    /// Fetches `first_url` and every page reachable through `meta.next_page_url`.
    async fn list_all<P: Page>(&self, first_url: String) -> Result<Vec<P::Item>> {
        let mut items = Vec::new();
        let mut next = Some(first_url);
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            let response = self.send(self.http.get(&url)).await?;
            let page: P = Self::read_json(response).await?;
            let (mut page_items, meta) = page.into_parts();
            pages += 1;
            debug!(page = pages, items = page_items.len(), "Fetched page");
            items.append(&mut page_items);
            next = meta.next_page_url.filter(|u| !u.is_empty());
        }

        Ok(items)
    }
}

fn map_transport_error(e: reqwest::Error) -> ConvoError {
    if e.is_builder() {
        ConvoError::Config(e.to_string())
    } else if e.is_decode() {
        ConvoError::Decode(e.to_string())
    } else {
        ConvoError::Transient(e.to_string())
    }
}

#[async_trait]
impl ConversationsApi for TwilioConversationsClient {
    #[instrument(skip(self), fields(service_sid = %self.service_sid))]
    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let url = Self::first_page_url(self.conversations_url());
        let conversations = self.list_all::<ConversationPage>(url).await?;
        info!(count = conversations.len(), "Listed conversations");
        Ok(conversations)
    }

    #[instrument(skip(self))]
    async fn list_participants(&self, conversation_sid: &str) -> Result<Vec<Participant>> {
        let url = Self::first_page_url(format!(
            "{}/Participants",
            self.conversation_url(conversation_sid)
        ));
        self.list_all::<ParticipantPage>(url).await
    }

    #[instrument(skip(self))]
    async fn create_conversation(&self, friendly_name: &str) -> Result<Conversation> {
        let request = self
            .http
            .post(self.conversations_url())
            .form(&[("FriendlyName", friendly_name)]);
        let conversation: Conversation = Self::read_json(self.send(request).await?).await?;
        info!(conversation_sid = %conversation.sid, "Created conversation");
        Ok(conversation)
    }

    #[instrument(skip(self, participant), fields(address = %participant.address))]
    async fn create_participant(
        &self,
        conversation_sid: &str,
        participant: &NewParticipant,
    ) -> Result<Participant> {
        let request = self
            .http
            .post(format!("{}/Participants", self.conversation_url(conversation_sid)))
            .form(&[
                ("MessagingBinding.Address", participant.address.as_str()),
                ("MessagingBinding.ProxyAddress", participant.proxy_address.as_str()),
            ]);
        let created: Participant = Self::read_json(self.send(request).await?).await?;
        info!(participant_sid = %created.sid, "Created participant");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn list_messages(&self, conversation_sid: &str) -> Result<Vec<Message>> {
        let url = Self::first_page_url(format!(
            "{}/Messages",
            self.conversation_url(conversation_sid)
        ));
        self.list_all::<MessagePage>(url).await
    }

    #[instrument(skip(self, body), fields(body_len = body.len()))]
    async fn create_message(&self, conversation_sid: &str, body: &str) -> Result<Message> {
        let request = self
            .http
            .post(format!("{}/Messages", self.conversation_url(conversation_sid)))
            .form(&[("Body", body)]);
        let message: Message = Self::read_json(self.send(request).await?).await?;
        info!(message_sid = %message.sid, index = message.index, "Created message");
        Ok(message)
    }

    #[instrument(skip(self))]
    async fn delete_conversation(&self, conversation_sid: &str) -> Result<()> {
        self.send(self.http.delete(self.conversation_url(conversation_sid)))
            .await?;
        info!("Deleted conversation");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> TwilioConversationsClient {
        TwilioConversationsClient::with_options(
            Credentials {
                api_key_sid: "SK0123456789abcdef".to_string(),
                api_secret: "secret".to_string(),
            },
            "IS123".to_string(),
            base_url.to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_urls_strip_trailing_slash() {
        let c = client("http://localhost:1234/v1/");
        assert_eq!(
            c.conversations_url(),
            "http://localhost:1234/v1/Services/IS123/Conversations"
        );
        assert_eq!(
            c.conversation_url("CH1"),
            "http://localhost:1234/v1/Services/IS123/Conversations/CH1"
        );
    }

    #[test]
    fn test_first_page_url_sets_page_size() {
        assert_eq!(
            TwilioConversationsClient::first_page_url("http://x/Messages".to_string()),
            "http://x/Messages?PageSize=50"
        );
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let c = client("http://localhost");
        let debug = format!("{:?}", c);
        assert!(!debug.contains("\"secret\""));
        assert!(debug.contains("SK01234***cdef"));
    }
}
