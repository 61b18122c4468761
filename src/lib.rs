//! Library root for `dispatch-bot`.
//!
//! Dispatch-bot sits between a chat transport and a set of commands:
//! - Drops echo and read-receipt events
//! - Gives stateful handlers first refusal on every message
//! - Splits `!command` messages shell-style and checks the sender
//! - Runs built-ins inline and pluggable script modules asynchronously
//! - Suggests alternatives for unknown commands
//!
//! The architecture is built around traits for the transport, the module registry
//! and the access policy, so each can be replaced (and mocked in tests).

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the dispatch-bot runtime:
/// - Loads the module registry
/// - Wires the dispatcher and the chat transport
/// - Starts the transport's event loop
pub async fn start(config: Config) -> Void {
    info!("Starting dispatch-bot ...");

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
