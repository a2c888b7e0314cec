//! Conversation resolver: find the conversation bound to the operator's address, or create it.
//!
//! Known limitation: find-then-create holds no lock. Two processes resolving at the same time
//! with no existing match can both create a conversation, leaving two bound to the same
//! operator. Nothing on the provider side deduplicates them; run one instance per operator,
//! or clean up with `convo-echo reset`.

use convo_core::{Conversation, NewParticipant, Result};
use tracing::{debug, info, instrument};

use crate::context::EchoContext;

/// Friendly name given to conversations created for `operator_address`.
pub fn friendly_name(operator_address: &str) -> String {
    format!("Conversation with {}", operator_address)
}

/// Returns the first conversation (in provider order) with a participant bound to the operator.
#[instrument(skip(ctx), fields(operator = %ctx.operator_address))]
pub async fn find_conversation(ctx: &EchoContext) -> Result<Option<Conversation>> {
    let conversations = ctx
        .call("list_conversations", |api| api.list_conversations())
        .await?;
    let total = conversations.len();
    info!(total = total, "Getting my conversation...");

    for (i, conversation) in conversations.into_iter().enumerate() {
        let sid = conversation.sid.as_str();
        let participants = ctx
            .call("list_participants", move |api| api.list_participants(sid))
            .await?;
        debug!(
            progress = %format!("{}/{}", i + 1, total),
            conversation_sid = %sid,
            participants = participants.len(),
            "Checked conversation"
        );
        if participants
            .iter()
            .any(|p| p.is_bound_to(&ctx.operator_address))
        {
            info!(conversation_sid = %conversation.sid, "Found existing conversation");
            return Ok(Some(conversation));
        }
    }

    Ok(None)
}

/// Creates a conversation for the operator and binds operator ↔ proxy as its participant.
/// Assumes no such conversation exists yet.
#[instrument(skip(ctx), fields(operator = %ctx.operator_address))]
pub async fn create_conversation(ctx: &EchoContext) -> Result<Conversation> {
    let name = friendly_name(&ctx.operator_address);
    let name = name.as_str();
    let conversation = ctx
        .call("create_conversation", move |api| api.create_conversation(name))
        .await?;

    let binding = NewParticipant {
        address: ctx.operator_address.clone(),
        proxy_address: ctx.proxy_address.clone(),
    };
    let (sid, binding) = (conversation.sid.as_str(), &binding);
    let participant = ctx
        .call("create_participant", move |api| api.create_participant(sid, binding))
        .await?;

    info!(
        conversation_sid = %conversation.sid,
        participant_sid = %participant.sid,
        "Created conversation for operator"
    );
    Ok(conversation)
}

/// Find-or-create. Creates at most one conversation and one participant per call.
pub async fn resolve(ctx: &EchoContext) -> Result<Conversation> {
    match find_conversation(ctx).await? {
        Some(conversation) => Ok(conversation),
        None => create_conversation(ctx).await,
    }
}
