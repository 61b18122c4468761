//! Pluggable command modules and the registry that loads them.
//!
//! The registry is the only shared mutable state in the bot: `!reload` swaps its
//! contents while other events are being dispatched. Implementations must make
//! that swap atomic, so readers observe either the old or the new mapping.

pub mod script;

use std::{collections::BTreeSet, ops::Deref, sync::Arc};

use async_trait::async_trait;
use tracing::error;

use crate::{
    base::types::{InboundEvent, Res},
    service::chat::ChatRef,
};

// Types.

/// Shared handle to a loaded command module.
pub type ModuleHandle = Arc<dyn CommandModule>;

/// Shared handle to a stateful handler.
pub type StatefulHandlerRef = Arc<dyn StatefulHandler>;

// Traits.

/// A command whose handler is supplied by a loadable, reloadable unit.
pub trait CommandModule: Send + Sync + 'static {
    /// The command name the module answers to (without the `!` marker).
    fn name(&self) -> &str;

    /// Run the command.
    ///
    /// Implementations must return promptly and do their work on a separate task;
    /// the result is delivered through `callback`, at most once. Never calling it
    /// is tolerated and simply leaves the command unanswered.
    fn run(&self, event: InboundEvent, args: Vec<String>, callback: ModuleCallback);
}

/// A non-command handler given first refusal on every inbound event.
#[async_trait]
pub trait StatefulHandler: Send + Sync + 'static {
    /// Returns `true` if the handler has fully processed the event.
    ///
    /// Called for every event that passes the status filter, so the `false`
    /// path must leave no side effects behind.
    async fn handle(&self, event: &InboundEvent) -> bool;
}

/// Generic module registry trait that registries must implement.
#[async_trait]
pub trait GenericModuleRegistry: Send + Sync + 'static {
    /// Look up a module by its command name.
    fn lookup(&self, name: &str) -> Option<ModuleHandle>;

    /// All currently registered module command names.
    fn names(&self) -> BTreeSet<String>;

    /// The ordered chain of stateful handlers.
    fn message_handlers(&self) -> Vec<StatefulHandlerRef>;

    /// Reload every pluggable module, returning the resulting command names.
    async fn reload(&self) -> Res<Vec<String>>;
}

// Structs.

/// Module registry for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ModuleRegistry {
    inner: Arc<dyn GenericModuleRegistry>,
}

impl Deref for ModuleRegistry {
    type Target = dyn GenericModuleRegistry;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ModuleRegistry {
    /// Wrap a registry implementation.
    pub fn new(inner: Arc<dyn GenericModuleRegistry>) -> Self {
        Self { inner }
    }
}

/// Completion callback handed to [`CommandModule::run`].
///
/// Sending consumes the callback, so a module can deliver at most one reply per invocation.
/// Whatever text is sent goes to the originating chat unchanged.
pub struct ModuleCallback {
    command: String,
    chat: ChatRef,
}

impl ModuleCallback {
    /// A callback replying to `chat` on behalf of `command`.
    pub fn new(command: impl Into<String>, chat: ChatRef) -> Self {
        Self { command: command.into(), chat }
    }

    /// The command this callback answers.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Send the module's output to the chat the command arrived in.
    pub async fn send(self, output: impl AsRef<str>) {
        if let Err(err) = self.chat.send_message(output.as_ref()).await {
            error!("Failed to send output of `!{}`: {}", self.command, err);
        }
    }
}
