//! Service integrations for external collaborators.
//!
//! This module contains the boundaries the dispatcher talks to:
//! - Chat transports (e.g., the console)
//! - Module registries (e.g., a directory of scripts)
//! - Access policies (e.g., an allow-list)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod access;
pub mod chat;
pub mod modules;
