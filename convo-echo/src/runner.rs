//! Echo driver: resolve the conversation, then wait, reply, repeat until the sentinel arrives.
//!
//! The first outbound message can only be sent after the user has written (the channel
//! rejects business-initiated messages without an approved template), so the driver always
//! starts by waiting.

use convo_core::{Conversation, Result};
use tracing::{info, instrument};

use crate::context::EchoContext;
use crate::message_loop::MessageLoop;
use crate::resolver;

/// User input that ends the conversation.
pub const SENTINEL: &str = ".";

/// Reply sent for a received message: echoes the text and its length in characters.
pub fn reply_text(message: &str) -> String {
    format!(
        "Hey there, got your message: {}, send '{}' to end the conversation. Length of your last message: {}",
        message,
        SENTINEL,
        message.chars().count()
    )
}

/// What happened during one echo session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EchoSummary {
    pub conversation_sid: String,
    /// Messages taken from the user, the sentinel included.
    pub received: usize,
    pub replied: usize,
}

/// Runs the echo loop on an already resolved conversation until the sentinel is received.
#[instrument(skip(ctx, conversation), fields(conversation_sid = %conversation.sid))]
pub async fn run_echo(ctx: &EchoContext, conversation: &Conversation) -> Result<EchoSummary> {
    let mut summary = EchoSummary {
        conversation_sid: conversation.sid.clone(),
        ..Default::default()
    };
    let mut messages = MessageLoop::new(ctx, conversation);
    let sid = conversation.sid.as_str();

    loop {
        let user_message = messages.next_user_message().await?;
        summary.received += 1;

        if user_message == SENTINEL {
            info!(
                received = summary.received,
                replied = summary.replied,
                "Ending conversation, since got '.' from user"
            );
            return Ok(summary);
        }

        let reply = reply_text(&user_message);
        let reply = reply.as_str();
        info!(reply = %reply, "Sending message to the user");
        ctx.call("create_message", move |api| api.create_message(sid, reply))
            .await?;
        summary.replied += 1;
        info!(message = %user_message, "Got a message from the user, and replied");
    }
}

/// Resolves (find-or-create) the operator's conversation and runs the echo loop on it.
pub async fn run(ctx: &EchoContext) -> Result<EchoSummary> {
    let conversation = resolver::resolve(ctx).await?;
    info!(
        conversation_sid = %conversation.sid,
        friendly_name = ?conversation.friendly_name,
        "Using conversation"
    );
    run_echo(ctx, &conversation).await
}
