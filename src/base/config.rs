//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc, time::Duration};

use serde::Deserialize;

use super::types::{Res, Void};

/// Default capacity of the inbound event channel.
fn default_event_buffer() -> usize {
    64
}

/// Default time the transport waits for the listener to acknowledge an event.
fn default_ack_timeout_ms() -> u64 {
    2500
}

/// What the listener does when handling an event fails.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// Stop the listener (and the process) on the first failed event.
    FailFast,
    /// Log the failure and keep listening.
    #[default]
    Continue,
}

/// Configuration for the mention-bot application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Slack app-level token used for Socket Mode (`SLACK_APP_TOKEN`).
    pub slack_app_token: String,
    /// Slack bot token used for Web API calls (`SLACK_BOT_TOKEN`).
    pub slack_bot_token: String,
    /// Channel that standalone alerts are posted to (`SLACK_ALERT_CHANNEL_ID`).
    #[serde(default)]
    pub slack_alert_channel_id: Option<String>,
    /// Listener behavior on a failed event (`DISPATCH_POLICY`).
    #[serde(default)]
    pub dispatch_policy: DispatchPolicy,
    /// Capacity of the inbound event channel (`EVENT_BUFFER`).
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
    /// Milliseconds the transport waits for an acknowledgement (`ACK_TIMEOUT_MS`).
    /// Slack expects envelopes to be acknowledged within three seconds.
    #[serde(default = "default_ack_timeout_ms")]
    pub ack_timeout_ms: u64,
}

impl ConfigInner {
    pub fn ack_timeout(&self) -> Duration {
        Duration::from_millis(self.ack_timeout_ms)
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("MENTION_BOT"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    fn validate(&self) -> Void {
        if !self.slack_app_token.starts_with("xapp-") {
            return Err(anyhow::anyhow!("Slack app token must start with `xapp-`."));
        }

        if !self.slack_bot_token.starts_with("xoxb-") {
            return Err(anyhow::anyhow!("Slack bot token must start with `xoxb-`."));
        }

        if self.event_buffer < 1 || self.event_buffer > 4096 {
            return Err(anyhow::anyhow!("Event buffer must be between 1 and 4096."));
        }

        if self.ack_timeout_ms < 1 || self.ack_timeout_ms > 3000 {
            return Err(anyhow::anyhow!("Ack timeout must be between 1 and 3000 milliseconds."));
        }

        Ok(())
    }
}
