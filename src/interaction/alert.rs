//! Standalone alerts posted outside of any conversation.

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::{
    base::types::{Attachment, AttachmentField, Res, ReplyPayload},
    interaction::app_mention::ACCENT_COLOR,
    service::chat::ChatClient,
};

/// Default pretext of an alert.
pub const DEFAULT_PRETEXT: &str = "Super Bot Text";

/// Default body of an alert.
pub const DEFAULT_TEXT: &str = "Slack Bot";

/// An alert to post to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub channel_id: String,
    pub pretext: String,
    pub text: String,
    pub fields: Vec<AttachmentField>,
}

impl Alert {
    /// Creates an alert; when no fields are given, the welcome and date fields are used.
    pub fn new(channel_id: impl Into<String>, pretext: impl Into<String>, text: impl Into<String>, fields: Vec<AttachmentField>) -> Self {
        let fields = if fields.is_empty() { default_fields(Utc::now()) } else { fields };

        Self {
            channel_id: channel_id.into(),
            pretext: pretext.into(),
            text: text.into(),
            fields,
        }
    }

    pub fn into_reply(self) -> ReplyPayload {
        ReplyPayload {
            channel_id: self.channel_id,
            attachment: Attachment {
                pretext: Some(self.pretext),
                text: self.text,
                color: ACCENT_COLOR.to_string(),
                fields: self.fields,
            },
        }
    }
}

/// The fields attached to an alert by default.
pub fn default_fields(now: DateTime<Utc>) -> Vec<AttachmentField> {
    vec![
        AttachmentField {
            title: "welcome".to_string(),
            value: "welcome to slack bot".to_string(),
            short: false,
        },
        AttachmentField {
            title: "date".to_string(),
            value: now.to_string(),
            short: false,
        },
    ]
}

/// Parses a `title=value` pair into a field.
pub fn parse_field(raw: &str) -> Res<AttachmentField> {
    let (title, value) = raw.split_once('=').ok_or_else(|| anyhow::anyhow!("Field `{}` must be of the form `title=value`.", raw))?;

    if title.trim().is_empty() {
        return Err(anyhow::anyhow!("Field `{}` has an empty title.", raw));
    }

    Ok(AttachmentField {
        title: title.trim().to_string(),
        value: value.to_string(),
        short: false,
    })
}

/// Posts an alert and returns the timestamp of the posted message.
#[instrument(skip_all, fields(channel = %alert.channel_id))]
pub async fn send_alert(alert: Alert, chat: &ChatClient) -> Res<String> {
    let ts = chat.post_message(&alert.into_reply()).await?;

    info!("Alert sent at {}.", ts);

    Ok(ts)
}
