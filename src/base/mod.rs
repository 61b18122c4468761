//! Core components, types, and utilities for the dispatch-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Inbound event and command types.
//! - Typed errors for the recoverable dispatch paths.

/// Settings loading.
pub mod config;
/// Dispatch errors.
pub mod error;
/// Shared types.
pub mod types;
