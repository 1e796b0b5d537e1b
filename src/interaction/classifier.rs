//! Routes events API events to their handlers.

use tracing::instrument;

use crate::{
    base::types::DispatchError,
    interaction::{
        app_mention,
        event::{CallbackPayload, EventsApiEvent, MentionEvent},
    },
    service::chat::ChatClient,
};

/// Extracts the mention carried by an events API event.
///
/// Only `event_callback` events wrapping an `app_mention` are accepted.
pub fn classify(event: EventsApiEvent) -> Result<MentionEvent, DispatchError> {
    match event {
        EventsApiEvent::EventCallback { event } => match event {
            CallbackPayload::AppMention(mention) => Ok(mention),
            CallbackPayload::Unrecognized => Err(DispatchError::UnsupportedInnerEventType),
        },
        other => Err(DispatchError::InvalidEventReceived { kind: other.kind().to_string() }),
    }
}

/// Classifies an event and hands recognized mentions to the responder.
#[instrument(skip_all, fields(kind = event.kind()))]
pub async fn dispatch(event: EventsApiEvent, chat: &ChatClient) -> Result<(), DispatchError> {
    let mention = classify(event)?;

    app_mention::handle_app_mention(mention, chat).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_app_mentions() {
        let mention = MentionEvent {
            user: "U1".to_string(),
            channel: "C1".to_string(),
            text: "<@BOT> hi".to_string(),
        };

        let event = EventsApiEvent::EventCallback {
            event: CallbackPayload::AppMention(mention.clone()),
        };

        assert_eq!(classify(event).unwrap(), mention);
    }

    #[test]
    fn rejects_unrecognized_inner_events() {
        let event = EventsApiEvent::EventCallback { event: CallbackPayload::Unrecognized };

        assert!(matches!(classify(event), Err(DispatchError::UnsupportedInnerEventType)));
    }

    #[test]
    fn rejects_non_callback_events() {
        for (event, expected) in [
            (EventsApiEvent::UrlVerification, "url_verification"),
            (EventsApiEvent::AppRateLimited, "app_rate_limited"),
            (EventsApiEvent::Other { kind: "team_join".to_string() }, "team_join"),
        ] {
            match classify(event) {
                Err(DispatchError::InvalidEventReceived { kind }) => assert_eq!(kind, expected),
                result => panic!("unexpected result: {result:?}"),
            }
        }
    }
}
