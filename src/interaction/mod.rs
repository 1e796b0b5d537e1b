//! Event handling and user interactions for mention-bot.
//!
//! This module provides functionality for handling chat events:
//! - Receiving, acknowledging and dispatching inbound events
//! - Classifying events and replying to @-mentions
//! - Posting standalone alerts

pub mod alert;
pub mod app_mention;
pub mod classifier;
pub mod event;
pub mod listener;
