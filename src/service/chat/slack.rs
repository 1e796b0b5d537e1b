//! Slack implementation of the chat service.
//!
//! Events arrive over Socket Mode through slack-morphism's listener callbacks.
//! Each events API push is forwarded to the event stream as raw JSON together
//! with an ack handle, and the callback only returns (letting slack-morphism
//! acknowledge the envelope) once the listener has acked it.

use crate::{
    base::{
        config::Config,
        types::{ReplyPayload, Res, Void},
    },
    interaction::event::{AckHandle, InboundEvent, SessionEvent},
};
use async_trait::async_trait;
use futures::SinkExt;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::prelude::*;
use tracing::{info, instrument, warn};

use std::{sync::Arc, time::Duration};

use super::{ChatClient, EventSender, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config) -> Res<Self> {
        let client = SlackChatClient::new(config).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Structs.

/// User state for the slack socket client.
struct SlackUserState {
    events: EventSender,
    ack_timeout: Duration,
}

/// Slack client implementation.
#[derive(Clone)]
struct SlackChatClient {
    pub app_token: SlackApiToken,
    pub bot_token: SlackApiToken,
    pub bot_user_id: String,
    pub ack_timeout: Duration,
    pub client: Arc<FullClient>,
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config) -> Res<Self> {
        // Initialize tokens.

        let app_token = SlackApiToken::new(SlackApiTokenValue(config.slack_app_token.clone()));
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // Get the bot's user ID (this also verifies the bot token).

        let session = client.open_session(&bot_token);
        let bot_user = session.auth_test().await?;
        let bot_user_id = bot_user.user_id.0;

        info!("Slack bot user ID: {}", bot_user_id);

        Ok(Self {
            app_token,
            bot_token,
            bot_user_id,
            ack_timeout: config.ack_timeout(),
            client,
        })
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    async fn start(&self, events: EventSender) -> Void {
        let mut lifecycle = events.clone();

        // Initialize the socket mode listener.

        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new()
            .with_command_events(handle_command_event)
            .with_interaction_events(handle_interaction_event)
            .with_push_events(handle_push_event);

        // Initialize the socket mode listener environment.

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(SlackUserState {
            events,
            ack_timeout: self.ack_timeout,
        }));

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment.clone(),
            socket_mode_callbacks,
        ));

        // Register an app token to listen for events.

        let _ = lifecycle.try_send(InboundEvent::Session(SessionEvent::Connecting));
        socket_mode_listener.listen_for(&self.app_token).await?;
        let _ = lifecycle.try_send(InboundEvent::Session(SessionEvent::Registered));

        // Start WS connections calling Slack API to get WS url for the token,
        // and wait for Ctrl-C to shutdown.
        socket_mode_listener.serve().await;

        let _ = lifecycle.try_send(InboundEvent::Session(SessionEvent::Disconnected));

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_user_name(&self, user_id: &str) -> Res<String> {
        let request = SlackApiUsersInfoRequest::new(SlackUserId(user_id.to_string()));
        let session = self.client.open_session(&self.bot_token);

        let response = session.users_info(&request).await.map_err(|e| anyhow::anyhow!("Failed to get user info: {}", e))?;

        response.user.name.ok_or_else(|| anyhow::anyhow!("User `{}` has no name.", user_id))
    }

    #[instrument(skip_all, fields(channel = %reply.channel_id))]
    async fn post_message(&self, reply: &ReplyPayload) -> Res<String> {
        // Slack's attachment schema is a superset of ours, so go through its JSON form.
        let attachment = serde_json::to_value(&reply.attachment)?;
        let content: SlackMessageContent = serde_json::from_value(serde_json::json!({ "attachments": [attachment] }))?;

        let request = SlackApiChatPostMessageRequest::new(SlackChannelId(reply.channel_id.clone()), content);

        let session = self.client.open_session(&self.bot_token);

        let response = session.chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(response.ts.0)
    }
}

// Socket mode listener callbacks for Slack.

/// Handles command events from Slack.
///
/// Commands are acknowledged with an empty response so nothing is shown to the user.
async fn handle_command_event(
    _event: SlackCommandEvent,
    _client: Arc<SlackHyperClient>,
    states: SlackClientEventsUserState,
) -> Result<SlackCommandEventResponse, Box<dyn std::error::Error + Send + Sync>> {
    forward_other(&states, "slash_command").await;
    Ok(empty_command_response())
}

/// Handles interaction events from Slack.
async fn handle_interaction_event(_event: SlackInteractionEvent, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    forward_other(&states, "interaction").await;
    Ok(())
}

/// The response a slash command gets: an ack carrying no content.
fn empty_command_response() -> SlackCommandEventResponse {
    SlackCommandEventResponse::new(SlackMessageContent::new())
}

/// Handles push events from Slack.
///
/// Returns an error when the listener does not acknowledge the event in time,
/// so that Slack is free to redeliver it.
#[instrument(skip_all)]
async fn handle_push_event(event_callback: SlackPushEventCallback, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (mut events, ack_timeout) = user_state(&states).await?;

    let payload = serde_json::to_value(SlackPushEvent::EventCallback(event_callback))?;
    let (ack, acked) = AckHandle::new();

    events.send(InboundEvent::EventsApi { payload, ack }).await?;

    match tokio::time::timeout(ack_timeout, acked).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(_)) => Err(anyhow::anyhow!("Event was dropped without being acknowledged.").into()),
        Err(_) => Err(anyhow::anyhow!("Timed out waiting for the event to be acknowledged.").into()),
    }
}

/// Copies what the callbacks need out of the shared state, releasing the lock.
async fn user_state(states: &SlackClientEventsUserState) -> Res<(EventSender, Duration)> {
    let states = states.read().await;
    let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

    Ok((user_state.events.clone(), user_state.ack_timeout))
}

/// Forwards a non events API event to the listener without waiting.
async fn forward_other(states: &SlackClientEventsUserState, kind: &str) {
    match user_state(states).await {
        Ok((mut events, _)) => {
            let _ = events.try_send(InboundEvent::Other { kind: kind.to_string() });
        }
        Err(e) => warn!("{}", e),
    }
}

// Tests.
