//! Event handling and user interactions for mania-bot.
//!
//! This module provides platform-independent handlers for inbound events:
//! - Trigger messages (`m!<word>`) with per-user cooldowns
//! - Administrator slash commands that edit the trigger table and panel list
//! - Panel button presses that post a stored text

pub mod button;
pub mod command;
pub mod trigger;

use crate::{
    base::config::Config,
    service::{chat::ChatClient, cooldown::CooldownTracker, store::StoreClient},
};

/// Everything a handler needs to process one event.
///
/// This is trivially cloneable, so each spawned handler can own a copy.
#[derive(Clone)]
pub struct HandlerContext {
    pub config: Config,
    pub store: StoreClient,
    pub cooldowns: CooldownTracker,
    pub chat: ChatClient,
}

/// Private reply for users lacking the administrator permission.
pub const PERMISSION_DENIED: &str = "❌ Administrator permission is required.";
