//! Replies to @-mentions of the bot.

use tracing::{info, instrument};

use crate::{
    base::types::{Attachment, DispatchError, ReplyPayload},
    interaction::event::MentionEvent,
    service::chat::ChatClient,
};

/// Accent color of every attachment the bot posts.
pub const ACCENT_COLOR: &str = "#4af030";

/// The canned reply chosen for a mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Greeting,
    Weather,
    Fallback,
}

impl ReplyKind {
    /// Picks a reply by case-insensitive substring match; the first match wins.
    pub fn classify(text: &str) -> Self {
        let text = text.to_lowercase();

        if text.contains("hello") || text.contains("hi") {
            ReplyKind::Greeting
        } else if text.contains("weather") {
            ReplyKind::Weather
        } else {
            ReplyKind::Fallback
        }
    }

    /// Renders the reply text addressed to `name`.
    pub fn render(&self, name: &str) -> String {
        match self {
            ReplyKind::Greeting => format!("Hello :) {name}"),
            ReplyKind::Weather => format!("Weather is sunny today. {name} "),
            ReplyKind::Fallback => format!("I am good. How are you {name}?"),
        }
    }
}

/// Builds the reply to a mention posted in `channel_id`.
pub fn compose_reply(channel_id: &str, display_name: &str, text: &str) -> ReplyPayload {
    let kind = ReplyKind::classify(text);

    ReplyPayload {
        channel_id: channel_id.to_string(),
        attachment: Attachment {
            pretext: None,
            text: kind.render(display_name),
            color: ACCENT_COLOR.to_string(),
            fields: Vec::new(),
        },
    }
}

/// Looks up the sender of a mention and posts the canned reply.
#[instrument(skip_all, fields(user = %mention.user, channel = %mention.channel))]
pub async fn handle_app_mention(mention: MentionEvent, chat: &ChatClient) -> Result<(), DispatchError> {
    // Resolve the sender's name; no reply is sent if this fails.

    let display_name = chat.get_user_name(&mention.user).await.map_err(|e| DispatchError::UserLookupFailed {
        user_id: mention.user.clone(),
        reason: e.to_string(),
    })?;

    // Build and send the reply.

    let reply = compose_reply(&mention.channel, &display_name, &mention.text);

    let ts = chat.post_message(&reply).await.map_err(|e| DispatchError::ReplyFailed {
        channel_id: reply.channel_id.clone(),
        reason: e.to_string(),
    })?;

    info!("Replied to mention at {}.", ts);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greets_on_hello_or_hi_anywhere() {
        for text in ["<@BOT> hi there", "HELLO", "oh Hi", "<@BOT>hello!", "this is it"] {
            assert_eq!(ReplyKind::classify(text), ReplyKind::Greeting, "{text}");
        }
    }

    #[test]
    fn weather_without_greeting() {
        assert_eq!(ReplyKind::classify("<@BOT> what's the WEATHER"), ReplyKind::Weather);
    }

    #[test]
    fn greeting_beats_weather() {
        assert_eq!(ReplyKind::classify("hello, how is the weather"), ReplyKind::Greeting);
    }

    #[test]
    fn anything_else_falls_back() {
        assert_eq!(ReplyKind::classify("<@BOT> status?"), ReplyKind::Fallback);
        assert_eq!(ReplyKind::classify(""), ReplyKind::Fallback);
    }

    #[test]
    fn composes_greeting_reply() {
        let reply = compose_reply("C1", "Alice", "<@BOT> hi there");

        assert_eq!(reply.channel_id, "C1");
        assert_eq!(reply.attachment.text, "Hello :) Alice");
        assert_eq!(reply.attachment.color, "#4af030");
        assert!(reply.attachment.pretext.is_none());
        assert!(reply.attachment.fields.is_empty());
    }

    #[test]
    fn renders_every_template() {
        // `what's` contains no `hi`, so this one reaches the weather branch.
        assert_eq!(compose_reply("C1", "Alice", "<@BOT> what's the weather").attachment.text, "Weather is sunny today. Alice ");
        assert_eq!(compose_reply("C1", "Alice", "<@BOT> status?").attachment.text, "I am good. How are you Alice?");
    }

    #[test]
    fn every_branch_uses_the_accent_color() {
        for text in ["hi", "weather", "status"] {
            assert_eq!(compose_reply("C1", "Alice", text).attachment.color, ACCENT_COLOR);
        }
    }
}
