//! # convo-echo
//!
//! Conversation echo demo: find (or create) the conversation bound to the operator's address,
//! poll it for the operator's messages and reply with an echo until `.` is received.
//!
//! Everything runs against [`convo_core::ConversationsApi`] through an [`EchoContext`], so tests
//! drive the resolver and loop with in-memory fakes and a sleeper that never sleeps.

pub mod config;
pub mod context;
pub mod message_loop;
pub mod reset;
pub mod resolver;
pub mod retry;
pub mod runner;
pub mod sleeper;

pub use config::EchoConfig;
pub use context::EchoContext;
pub use message_loop::{MessageLoop, PollState};
pub use reset::delete_all_conversations;
pub use resolver::{create_conversation, find_conversation, friendly_name, resolve};
pub use retry::{with_retry, RetryPolicy};
pub use runner::{reply_text, run, run_echo, EchoSummary, SENTINEL};
pub use sleeper::{Sleeper, TokioSleeper};
