use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// Errors raised while handling a single inbound event.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The raw events API payload did not have the expected shape.
    #[error("Event payload does not match the events API shape: {0}")]
    TypeMismatch(#[source] serde_json::Error),
    /// A callback event carried an inner event we do not handle.
    #[error("Unsupported inner event type.")]
    UnsupportedInnerEventType,
    /// An events API event that is not a callback.
    #[error("Invalid event received: `{kind}`.")]
    InvalidEventReceived { kind: String },
    /// The sender of a mention could not be resolved.
    #[error("Failed to look up user `{user_id}`: {reason}")]
    UserLookupFailed { user_id: String, reason: String },
    /// The reply could not be posted.
    #[error("Failed to post reply to `{channel_id}`: {reason}")]
    ReplyFailed { channel_id: String, reason: String },
}

/// A single titled field of an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    #[serde(default)]
    pub short: bool,
}

/// An attachment-style message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretext: Option<String>,
    pub text: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<AttachmentField>,
}

/// A message to be posted to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyPayload {
    pub channel_id: String,
    pub attachment: Attachment,
}
