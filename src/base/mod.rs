//! Core components and types for the mania-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Common types, result handling, and platform-neutral event shapes.

pub mod config;
pub mod types;
