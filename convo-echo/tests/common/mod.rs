//! In-memory [`ConversationsApi`] and a recording [`Sleeper`] for integration tests.
//!
//! `FakeApi` keeps conversations, participants and messages in memory, counts calls per
//! operation, can inject failures, and can schedule user messages to "arrive" on a given
//! `list_messages` call so polling behaviour is observable without real time passing.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use convo_core::{
    Conversation, ConversationsApi, ConvoError, Message, MessagingBinding, NewParticipant,
    Participant, Result,
};
use convo_echo::{EchoContext, RetryPolicy, Sleeper};

pub const OPERATOR: &str = "whatsapp:+15550001111";
pub const PROXY: &str = "whatsapp:+15559998888";
/// Author the provider assigns to messages posted through the API.
pub const SYSTEM_AUTHOR: &str = "system";

#[derive(Default)]
struct State {
    conversations: Vec<Conversation>,
    participants: HashMap<String, Vec<Participant>>,
    messages: HashMap<String, Vec<Message>>,
    /// (list_messages call number, conversation sid, author, body)
    scheduled: Vec<(usize, String, String, String)>,
    failures: HashMap<&'static str, VecDeque<ConvoError>>,
    calls: HashMap<&'static str, usize>,
    next_id: usize,
}

#[derive(Default)]
pub struct FakeApi {
    state: Mutex<State>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Adds a conversation whose only participant is bound to `address`.
    pub fn seed_conversation(&self, sid: &str, address: Option<&str>) {
        let mut state = self.state.lock().unwrap();
        state.conversations.push(Conversation {
            sid: sid.to_string(),
            friendly_name: Some(format!("seeded {}", sid)),
            date_created: None,
        });
        let participant = Participant {
            sid: format!("MB-{}", sid),
            identity: None,
            messaging_binding: address.map(|a| MessagingBinding {
                binding_type: Some("whatsapp".to_string()),
                address: Some(a.to_string()),
                proxy_address: Some(PROXY.to_string()),
            }),
        };
        state
            .participants
            .entry(sid.to_string())
            .or_default()
            .push(participant);
        state.messages.entry(sid.to_string()).or_default();
    }

    /// Appends a message immediately.
    pub fn push_message(&self, conversation_sid: &str, author: &str, body: &str) {
        let mut state = self.state.lock().unwrap();
        Self::append(&mut state, conversation_sid, author, body);
    }

    /// Makes a message appear right before the `on_call`-th (1-based) `list_messages` returns.
    pub fn schedule_message(&self, on_call: usize, conversation_sid: &str, author: &str, body: &str) {
        self.state.lock().unwrap().scheduled.push((
            on_call,
            conversation_sid.to_string(),
            author.to_string(),
            body.to_string(),
        ));
    }

    /// The next call of `operation` fails with `error` (queued in order).
    pub fn fail_next(&self, operation: &'static str, error: ConvoError) {
        self.state
            .lock()
            .unwrap()
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    pub fn conversation_count(&self) -> usize {
        self.state.lock().unwrap().conversations.len()
    }

    pub fn participants_of(&self, conversation_sid: &str) -> Vec<Participant> {
        self.state
            .lock()
            .unwrap()
            .participants
            .get(conversation_sid)
            .cloned()
            .unwrap_or_default()
    }

    pub fn messages_of(&self, conversation_sid: &str) -> Vec<Message> {
        self.state
            .lock()
            .unwrap()
            .messages
            .get(conversation_sid)
            .cloned()
            .unwrap_or_default()
    }

    /// Bodies of messages posted through `create_message`.
    pub fn replies(&self, conversation_sid: &str) -> Vec<String> {
        self.messages_of(conversation_sid)
            .into_iter()
            .filter(|m| m.is_authored_by(SYSTEM_AUTHOR))
            .map(|m| m.text().to_string())
            .collect()
    }

    fn append(state: &mut State, conversation_sid: &str, author: &str, body: &str) -> Message {
        state.next_id += 1;
        let list = state.messages.entry(conversation_sid.to_string()).or_default();
        let message = Message {
            sid: format!("IM{}", state.next_id),
            index: list.len() as u64,
            author: Some(author.to_string()),
            body: Some(body.to_string()),
            date_created: None,
        };
        list.push(message.clone());
        message
    }

    /// Counts the call and pops an injected failure, if any.
    fn enter(&self, operation: &'static str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(operation).or_default() += 1;
        match state.failures.get_mut(operation).and_then(|q| q.pop_front()) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ConversationsApi for FakeApi {
    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        self.enter("list_conversations")?;
        Ok(self.state.lock().unwrap().conversations.clone())
    }

    async fn list_participants(&self, conversation_sid: &str) -> Result<Vec<Participant>> {
        self.enter("list_participants")?;
        Ok(self.participants_of(conversation_sid))
    }

    async fn create_conversation(&self, friendly_name: &str) -> Result<Conversation> {
        self.enter("create_conversation")?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let conversation = Conversation {
            sid: format!("CH{}", state.next_id),
            friendly_name: Some(friendly_name.to_string()),
            date_created: None,
        };
        state.conversations.push(conversation.clone());
        state.messages.entry(conversation.sid.clone()).or_default();
        Ok(conversation)
    }

    async fn create_participant(
        &self,
        conversation_sid: &str,
        participant: &NewParticipant,
    ) -> Result<Participant> {
        self.enter("create_participant")?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let created = Participant {
            sid: format!("MB{}", state.next_id),
            identity: None,
            messaging_binding: Some(MessagingBinding {
                binding_type: Some("whatsapp".to_string()),
                address: Some(participant.address.clone()),
                proxy_address: Some(participant.proxy_address.clone()),
            }),
        };
        state
            .participants
            .entry(conversation_sid.to_string())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn list_messages(&self, conversation_sid: &str) -> Result<Vec<Message>> {
        self.enter("list_messages")?;
        let mut state = self.state.lock().unwrap();
        let call = state.calls.get("list_messages").copied().unwrap_or(0);
        let due: Vec<(String, String, String)> = state
            .scheduled
            .iter()
            .filter(|(on_call, ..)| *on_call == call)
            .map(|(_, sid, author, body)| (sid.clone(), author.clone(), body.clone()))
            .collect();
        for (sid, author, body) in due {
            Self::append(&mut state, &sid, &author, &body);
        }
        Ok(state
            .messages
            .get(conversation_sid)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_message(&self, conversation_sid: &str, body: &str) -> Result<Message> {
        self.enter("create_message")?;
        let mut state = self.state.lock().unwrap();
        Ok(Self::append(&mut state, conversation_sid, SYSTEM_AUTHOR, body))
    }

    async fn delete_conversation(&self, conversation_sid: &str) -> Result<()> {
        self.enter("delete_conversation")?;
        let mut state = self.state.lock().unwrap();
        let before = state.conversations.len();
        state.conversations.retain(|c| c.sid != conversation_sid);
        if state.conversations.len() == before {
            return Err(ConvoError::from_status(404, Some(20404), "not found"));
        }
        state.participants.remove(conversation_sid);
        state.messages.remove(conversation_sid);
        Ok(())
    }
}

/// Sleeper that records requested durations and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

/// Poll interval used by test contexts; distinct from backoff delays so sleeps can be told apart.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Context over the fake API with a recording sleeper and a small retry budget.
pub fn context(api: &Arc<FakeApi>, sleeper: &Arc<RecordingSleeper>) -> EchoContext {
    EchoContext::new(api.clone(), sleeper.clone(), OPERATOR, PROXY)
        .with_poll_interval(POLL_INTERVAL)
        .with_retry(RetryPolicy {
            max_retries: 3,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(40),
            multiplier: 2,
        })
}
