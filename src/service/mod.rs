//! Service integrations for external APIs and clients.
//!
//! This module contains the chat service used by the mention-bot. It defines
//! a generic trait alongside the concrete Slack implementation, allowing for
//! extensibility and easy testing.

pub mod chat;
