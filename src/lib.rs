//! Library root for `mania-bot`.
//!
//! Mania-bot is a Discord automation agent for a single community server designed to:
//! - Reply to `m!<word>` messages from an administrator-managed trigger table
//! - Rate-limit non-administrator triggers with a per-user cooldown
//! - Surface pre-registered texts as clickable panel buttons
//! - Report liveness over HTTP for hosting-platform health checks
//!
//! The bot integrates with Discord for chat and flat JSON files for storage.
//! The architecture is built around traits for the chat and store services,
//! so the dispatch logic can be exercised without a live platform session.

pub mod base;
pub mod interaction;
pub mod prelude;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the mania-bot runtime:
/// - Creates the runtime context with the store, cooldown tracker, and status
/// - Starts the liveness endpoint and the Discord session
pub async fn start(config: Config) -> Void {
    info!("Starting mania-bot ...");

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config);

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
