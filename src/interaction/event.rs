//! Inbound events as delivered by a chat transport.
//!
//! The transport hands the listener [`InboundEvent`]s. Events API pushes arrive
//! as raw JSON together with an [`AckHandle`]; the listener turns the JSON into
//! an [`EventsApiEvent`] before classifying it.

use serde::Deserialize;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::base::types::Void;

/// Connection lifecycle notifications from the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The transport is about to register with the platform.
    Connecting,
    /// The app token is registered; the socket itself is opened while serving.
    Registered,
    /// The transport stopped serving.
    Disconnected,
}

/// An event received from the transport.
#[derive(Debug)]
pub enum InboundEvent {
    /// The transport's connection changed state.
    Session(SessionEvent),
    /// An Events API push, still in its wire form.
    EventsApi { payload: Value, ack: AckHandle },
    /// Anything else the transport delivers (slash commands, interactions, ...).
    Other { kind: String },
}

/// Opaque handle used to acknowledge an event back to the transport.
#[derive(Debug)]
pub struct AckHandle {
    sender: Option<oneshot::Sender<()>>,
}

impl AckHandle {
    /// Creates a handle along with the receiver the transport waits on.
    pub fn new() -> (Self, oneshot::Receiver<()>) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender: Some(sender) }, receiver)
    }

    /// Creates a handle nobody is waiting on; acknowledging it always succeeds.
    pub fn detached() -> Self {
        Self { sender: None }
    }

    /// Acknowledges the event.
    ///
    /// Fails when the transport has stopped waiting for the acknowledgement.
    pub fn ack(self) -> Void {
        match self.sender {
            Some(sender) => sender.send(()).map_err(|_| anyhow::anyhow!("Transport is no longer waiting for the acknowledgement.")),
            None => Ok(()),
        }
    }
}

/// An Events API envelope, discriminated by its outer `type`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawEventsApiEvent")]
pub enum EventsApiEvent {
    EventCallback { event: CallbackPayload },
    UrlVerification,
    AppRateLimited,
    /// Any other outer type, keeping its wire name.
    Other { kind: String },
}

impl EventsApiEvent {
    /// The wire name of the outer event type.
    pub fn kind(&self) -> &str {
        match self {
            EventsApiEvent::EventCallback { .. } => "event_callback",
            EventsApiEvent::UrlVerification => "url_verification",
            EventsApiEvent::AppRateLimited => "app_rate_limited",
            EventsApiEvent::Other { kind } => kind,
        }
    }
}

/// Wire form of an envelope; the inner event is only parsed for callbacks.
#[derive(Deserialize)]
struct RawEventsApiEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(alias = "inner_event")]
    event: Option<Value>,
}

impl TryFrom<RawEventsApiEvent> for EventsApiEvent {
    type Error = String;

    fn try_from(raw: RawEventsApiEvent) -> Result<Self, Self::Error> {
        match raw.kind.as_str() {
            "event_callback" => {
                let event = raw.event.ok_or("missing field `event`")?;
                let event = serde_json::from_value(event).map_err(|e| format!("invalid inner event: {e}"))?;

                Ok(EventsApiEvent::EventCallback { event })
            }
            "url_verification" => Ok(EventsApiEvent::UrlVerification),
            "app_rate_limited" => Ok(EventsApiEvent::AppRateLimited),
            _ => Ok(EventsApiEvent::Other { kind: raw.kind }),
        }
    }
}

/// The inner event of a callback, discriminated by its `type`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallbackPayload {
    AppMention(MentionEvent),
    #[serde(other)]
    Unrecognized,
}

/// A message that @-mentions the bot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MentionEvent {
    /// Sender user ID.
    pub user: String,
    /// Channel the mention was posted in.
    pub channel: String,
    /// Raw message text, including the mention token.
    #[serde(default)]
    pub text: String,
}
