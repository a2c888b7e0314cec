//! Service reset: delete every conversation for a fresh start.

use convo_core::Result;
use tracing::{info, instrument};

use crate::context::EchoContext;

/// Deletes all conversations in the service and returns how many were deleted.
/// Stops at the first non-transient failure; conversations already deleted stay deleted.
#[instrument(skip(ctx))]
pub async fn delete_all_conversations(ctx: &EchoContext) -> Result<usize> {
    let conversations = ctx
        .call("list_conversations", |api| api.list_conversations())
        .await?;
    let total = conversations.len();
    info!(total = total, "Deleting all conversations...");

    for (i, conversation) in conversations.iter().enumerate() {
        let sid = conversation.sid.as_str();
        ctx.call("delete_conversation", move |api| api.delete_conversation(sid))
            .await?;
        info!(
            progress = %format!("{}/{}", i + 1, total),
            conversation_sid = %sid,
            "Deleted conversation"
        );
    }

    Ok(total)
}
