pub mod slack;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use futures::channel::mpsc;

use crate::{
    base::types::{ReplyPayload, Res, Void},
    interaction::event::InboundEvent,
};

// Types.

/// Sending half of the channel the transport delivers inbound events on.
pub type EventSender = mpsc::Sender<InboundEvent>;

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the core functionality for interacting with chat platforms
/// like Slack. Implementing this trait allows different chat services to be used
/// with the mention-bot.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Get the bot user ID.
    ///
    /// Returns the unique identifier for the bot in the chat platform,
    /// which is what users @-mention.
    fn bot_user_id(&self) -> &str;

    /// Start the chat client listener.
    ///
    /// Connects to the chat platform and forwards every incoming event to
    /// `events` until the connection is shut down.
    async fn start(&self, events: EventSender) -> Void;

    /// Resolve a user ID to its display name.
    ///
    /// This is looked up fresh on every call; nothing is cached.
    async fn get_user_name(&self, user_id: &str) -> Res<String>;

    /// Post an attachment message to a channel.
    ///
    /// Returns the timestamp of the posted message.
    async fn post_message(&self, reply: &ReplyPayload) -> Res<String>;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
