//! Runtime services and shared state for the mania-bot.

use tracing::{Instrument, error, info, instrument};

use crate::{
    base::{config::Config, types::Void},
    service::{
        chat::discord::DiscordHandler,
        cooldown::CooldownTracker,
        health::{self, BotStatus},
        store::StoreClient,
    },
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the store, the cooldown tracker, the connection status,
/// and configuration. It is designed to be trivially cloneable, allowing it to
/// be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The trigger and panel store.
    pub store: StoreClient,
    /// The per-user cooldown tracker.
    pub cooldowns: CooldownTracker,
    /// The chat session status reported by the liveness endpoint.
    pub status: BotStatus,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> Self {
        let store = StoreClient::json(&config);
        let cooldowns = CooldownTracker::new(config.cooldown());

        info!("Data files: {} and {}", config.trigger_path().display(), config.panel_path().display());

        Self {
            config,
            store,
            cooldowns,
            status: BotStatus::new(),
        }
    }

    /// Starts the liveness endpoint and, when a token is configured, the chat session.
    ///
    /// A failed or missing chat session leaves the process running in a degraded
    /// state; only a failing HTTP endpoint or a shutdown signal returns.
    pub async fn start(&self) -> Void {
        let server = tokio::spawn(health::serve(self.status.clone(), self.config.port).in_current_span());

        match self.config.token() {
            Some(token) => {
                let token = token.to_string();
                let handler = DiscordHandler {
                    config: self.config.clone(),
                    store: self.store.clone(),
                    cooldowns: self.cooldowns.clone(),
                    status: self.status.clone(),
                };

                tokio::spawn(
                    async move {
                        if let Err(err) = handler.start_session(&token).await {
                            error!("Discord login failed: {:#}", err);
                        }
                    }
                    .in_current_span(),
                );
            }
            None => error!("No Discord token set (MANIA_BOT_DISCORD_TOKEN or TOKEN); the chat session will not start."),
        }

        tokio::select! {
            result = server => result??,
            _ = tokio::signal::ctrl_c() => info!("Shutdown signal received."),
        }

        Ok(())
    }
}
