//! convo-echo CLI: run the echo demo, print the resolved conversation, or reset the service.
//! Config from env (and `.env`); poll interval can be overridden on the command line.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use convo_core::init_tracing;
use convo_echo::{delete_all_conversations, resolve, run, EchoConfig, EchoContext};
use tracing::info;
use twilio_conversations::{mask_token, TwilioConversationsClient};

#[derive(Parser)]
#[command(name = "convo-echo")]
#[command(about = "Conversation echo demo: run, resolve, reset", long_about = None)]
#[command(version)]
struct Cli {
    /// Override POLL_INTERVAL_MS.
    #[arg(long, global = true)]
    poll_interval_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Wait for the operator's messages and echo them until '.' is received (default).
    Run,
    /// Find or create the operator's conversation, print it, and exit.
    Resolve,
    /// Delete every conversation in the service.
    Reset {
        /// Confirm the deletion; without it nothing is deleted.
        #[arg(long)]
        yes: bool,
    },
}

fn build_context(config: &EchoConfig) -> Result<EchoContext> {
    let client = TwilioConversationsClient::with_options(
        config.credentials(),
        config.service_sid.clone(),
        config.api_base_url.clone(),
        config.http_timeout,
    )
    .context("Build Conversations API client")?;
    Ok(EchoContext::from_config(config, Arc::new(client)))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = EchoConfig::from_env().context(
        "Load config from .env (MS_TWILIO_*, PHONE_NUMBER, MS_WHATSAPP_NUMBER)",
    )?;
    if let Some(ms) = cli.poll_interval_ms {
        config.poll_interval = Duration::from_millis(ms);
    }
    config.validate()?;

    init_tracing(&config.log_file).context("Failed to initialize logging")?;
    info!(
        start_time = %Local::now().format("%Y-%m-%d %H:%M:%S"),
        account_sid = %mask_token(&config.account_sid),
        service_sid = %config.service_sid,
        operator = %config.operator_address(),
        proxy = %config.proxy_address(),
        log_file = %config.log_file,
        "Initializing conversation echo demo..."
    );

    let ctx = build_context(&config)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let summary = run(&ctx).await?;
            println!(
                "Conversation {} ended: {} messages received, {} replies sent",
                summary.conversation_sid, summary.received, summary.replied
            );
        }
        Commands::Resolve => {
            let conversation = resolve(&ctx).await?;
            println!(
                "{}\t{}",
                conversation.sid,
                conversation.friendly_name.as_deref().unwrap_or("")
            );
        }
        Commands::Reset { yes } => {
            if !yes {
                anyhow::bail!(
                    "reset deletes every conversation in service {}; pass --yes to confirm",
                    config.service_sid
                );
            }
            let deleted = delete_all_conversations(&ctx).await?;
            println!("Deleted {} conversations", deleted);
        }
    }

    Ok(())
}
