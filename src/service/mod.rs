//! Service integrations and shared state for mania-bot.
//!
//! This module contains the services the dispatchers are built on:
//! - Chat services (e.g., Discord)
//! - Storage for the trigger table and panel list
//! - The per-user cooldown tracker and scheduled tasks
//! - The HTTP liveness endpoint
//!
//! The chat and store services define both generic traits and concrete
//! implementations, allowing for extensibility and easy testing.

pub mod chat;
pub mod cooldown;
pub mod health;
pub mod schedule;
pub mod store;
