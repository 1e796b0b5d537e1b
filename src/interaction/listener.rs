//! The event listener loop.
//!
//! Exactly one listener runs per process. It pulls [`InboundEvent`]s off the
//! transport's stream one at a time, acknowledges events API pushes, and hands
//! them to the classifier. Events are handled strictly in receipt order.

use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    base::{
        config::DispatchPolicy,
        types::{DispatchError, Void},
    },
    interaction::{
        classifier,
        event::{EventsApiEvent, InboundEvent},
    },
    service::chat::ChatClient,
};

/// Runs the listener until `cancel` fires or the stream ends.
///
/// Cancellation is checked before every receive, so once it fires nothing
/// else is taken off the stream. Under [`DispatchPolicy::FailFast`] the first
/// failed event ends the loop with that error.
#[instrument(skip_all)]
pub async fn listen<S>(mut events: S, chat: ChatClient, policy: DispatchPolicy, cancel: CancellationToken) -> Void
where
    S: Stream<Item = InboundEvent> + Unpin,
{
    loop {
        let event = tokio::select! {
            biased;

            () = cancel.cancelled() => {
                info!("Shutting down event listener ...");
                return Ok(());
            }
            event = events.next() => event,
        };

        let Some(event) = event else {
            info!("Event stream closed, stopping listener.");
            return Ok(());
        };

        let InboundEvent::EventsApi { payload, ack } = event else {
            continue;
        };

        // Make sure this is actually an events API event.

        let api_event = match serde_json::from_value::<EventsApiEvent>(payload) {
            Ok(api_event) => api_event,
            Err(e) => {
                warn!("{}", DispatchError::TypeMismatch(e));
                continue;
            }
        };

        if let Err(e) = ack.ack() {
            debug!("Acknowledgement not delivered: {}", e);
        }

        // Handle the event.

        if let Err(e) = classifier::dispatch(api_event, &chat).await {
            error!("Error while handling: {}", e);

            if policy == DispatchPolicy::FailFast {
                return Err(e.into());
            }
        }
    }
}
