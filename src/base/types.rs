use std::{collections::BTreeMap, time::Duration};

use serde::{Deserialize, Serialize};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// Trigger word to response text.
///
/// A `BTreeMap` keeps listings stable; lookup order is irrelevant to matching.
pub type TriggerTable = BTreeMap<String, String>;

/// Ordered, index-addressed panel texts.
pub type PanelList = Vec<String>;

/// The two persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreKind {
    Triggers,
    Panel,
}

/// Result of a cooldown check for a single user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownStatus {
    /// The user may trigger; a fresh window has been opened.
    Allowed,
    /// The user is inside an active window.
    Throttled { remaining: Duration },
}

/// Enough of a platform interaction to respond to it later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRef {
    pub id: u64,
    pub token: String,
}

/// A clickable button on a rendered panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelButton {
    pub custom_id: String,
    pub label: String,
}

/// A plain-text message, stripped of platform details.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub message_id: u64,
    pub channel_id: u64,
    pub author_id: u64,
    pub author_is_bot: bool,
    pub author_is_admin: bool,
    pub content: String,
}

/// An administrator slash command and its options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Add { content: String },
    Trigger { trigger: String, response: String },
    TriggerList,
    Panel,
    Clear,
    Help,
    /// A command this build does not know, or one missing its options.
    Unknown { name: String },
}

/// A slash command invocation.
#[derive(Debug, Clone)]
pub struct IncomingCommand {
    pub interaction: InteractionRef,
    pub channel_id: u64,
    pub user_id: u64,
    pub user_is_admin: bool,
    pub command: AdminCommand,
}

/// A button press on a panel message.
#[derive(Debug, Clone)]
pub struct IncomingButton {
    pub interaction: InteractionRef,
    pub channel_id: u64,
    pub user_id: u64,
    pub user_is_admin: bool,
    pub custom_id: String,
}
