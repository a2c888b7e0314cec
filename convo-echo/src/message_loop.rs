//! Message loop: poll a conversation until the operator has the last word.
//!
//! Two states. `Waiting` fetches the full message list and looks only at the last entry;
//! when its author is the operator the loop moves to `Delivered(body)`. Reading the body
//! resets the loop to `Waiting`.
//!
//! Only the last message is inspected, so several user messages arriving between two polls
//! are observed as one: the earlier ones are skipped and only the newest gets a reply.

use convo_core::{Conversation, Result};
use tracing::{debug, info, instrument};

use crate::context::EchoContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    Waiting,
    Delivered(String),
}

pub struct MessageLoop<'a> {
    ctx: &'a EchoContext,
    conversation_sid: String,
    state: PollState,
    polls: u64,
}

impl<'a> MessageLoop<'a> {
    pub fn new(ctx: &'a EchoContext, conversation: &Conversation) -> Self {
        Self {
            ctx,
            conversation_sid: conversation.sid.clone(),
            state: PollState::Waiting,
            polls: 0,
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Number of message-list fetches performed so far.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// One step: fetch messages and update the state. Never sleeps.
    pub async fn poll_once(&mut self) -> Result<&PollState> {
        let ctx = self.ctx;
        let sid = self.conversation_sid.as_str();
        let messages = ctx
            .call("list_messages", move |api| api.list_messages(sid))
            .await?;
        self.polls += 1;

        self.state = match messages.last() {
            Some(last) if last.is_authored_by(&ctx.operator_address) => {
                info!(message_sid = %last.sid, index = last.index, "Got a message from the user");
                PollState::Delivered(last.text().to_string())
            }
            last => {
                debug!(
                    poll = self.polls,
                    messages = messages.len(),
                    last_author = ?last.and_then(|m| m.author.as_deref()),
                    "Waiting for user message..."
                );
                PollState::Waiting
            }
        };
        Ok(&self.state)
    }

    /// Blocks (sleeping one poll interval between fetches) until the operator's message is last,
    /// then returns its body and resets to `Waiting`.
    #[instrument(skip(self), fields(conversation_sid = %self.conversation_sid))]
    pub async fn next_user_message(&mut self) -> Result<String> {
        loop {
            if let PollState::Delivered(body) =
                std::mem::replace(&mut self.state, PollState::Waiting)
            {
                return Ok(body);
            }
            if let PollState::Delivered(_) = self.poll_once().await? {
                continue;
            }
            self.ctx.sleeper.sleep(self.ctx.poll_interval).await;
        }
    }
}
