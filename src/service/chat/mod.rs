pub mod discord;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{InteractionRef, PanelButton, Res, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait covers every outbound action the dispatchers take, so the
/// dispatch logic never touches the platform library directly.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Post a message to a channel.
    async fn send_message(&self, channel_id: u64, text: &str) -> Void;

    /// Post a message as a reply to another message.
    ///
    /// Returns the ID of the posted message so it can be removed later.
    async fn reply_to_message(&self, channel_id: u64, message_id: u64, text: &str) -> Res<u64>;

    /// Delete a message.
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Void;

    /// Answer an interaction with a message only the invoker can see.
    async fn respond_ephemeral(&self, interaction: &InteractionRef, text: &str) -> Void;

    /// Answer an interaction with a private message carrying buttons.
    async fn respond_with_buttons(&self, interaction: &InteractionRef, text: &str, buttons: Vec<PanelButton>) -> Void;

    /// Acknowledge a component interaction without a visible reply.
    async fn acknowledge(&self, interaction: &InteractionRef) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
