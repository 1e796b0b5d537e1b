//! Library root for `mention-bot`.
//!
//! Mention-bot is a Slack bot that keeps a Socket Mode connection open and
//! answers @-mentions with a short canned reply:
//! - Greets users who say hello
//! - Reports the (static) weather
//! - Falls back to a friendly "how are you"
//!
//! It can also post one-off alerts to a configured channel. The chat platform
//! sits behind a trait, so the event handling can run against other clients.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{
    config::Config,
    types::{AttachmentField, Void},
};
use interaction::alert::{Alert, send_alert};
use rustls::crypto;
use service::chat::ChatClient;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the mention-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the chat client
/// - Starts the event listener and the Socket Mode connection
pub async fn start(config: Config) -> Void {
    info!("Starting mention-bot ...");

    install_crypto_provider()?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}

/// Posts a single alert and exits.
///
/// The channel defaults to `slack_alert_channel_id` from the configuration.
pub async fn alert(config: Config, channel_id: Option<String>, pretext: String, text: String, fields: Vec<AttachmentField>) -> Void {
    let channel_id = channel_id
        .or_else(|| config.slack_alert_channel_id.clone())
        .ok_or_else(|| anyhow::anyhow!("No alert channel given and `slack_alert_channel_id` is not configured."))?;

    install_crypto_provider()?;

    let chat = ChatClient::slack(&config).await?;

    send_alert(Alert::new(channel_id, pretext, text, fields), &chat).await?;

    Ok(())
}

fn install_crypto_provider() -> Void {
    crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install the default crypto provider."))
}
