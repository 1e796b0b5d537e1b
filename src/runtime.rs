//! Runtime services and shared state for the mention-bot.

use futures::channel::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    interaction::listener,
    service::chat::ChatClient,
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the chat client and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the slack client.
        let chat = ChatClient::slack(&config).await?;

        Ok(Self { config, chat })
    }

    /// Run the transport and the event listener until either stops.
    ///
    /// The listener runs as a single background task. When the transport
    /// returns, the listener is cancelled and joined; when the listener
    /// returns first (a fail-fast error), its result is returned directly.
    pub async fn start(&self) -> Void {
        let (events, receiver) = mpsc::channel(self.config.event_buffer);
        let cancel = CancellationToken::new();

        let mut listener = tokio::spawn(listener::listen(receiver, self.chat.clone(), self.config.dispatch_policy, cancel.child_token()));

        info!("Listening for mentions of <@{}> ...", self.chat.bot_user_id());

        let served = tokio::select! {
            served = self.chat.start(events) => served,
            joined = &mut listener => {
                return joined.map_err(|e| anyhow::anyhow!("Listener task failed: {}", e))?;
            }
        };

        cancel.cancel();

        listener.await.map_err(|e| anyhow::anyhow!("Listener task failed: {}", e))??;

        served
    }
}
