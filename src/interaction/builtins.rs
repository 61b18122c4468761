//! Commands compiled into the dispatcher.
//!
//! The table in [`BuiltinRegistry::standard`] is the one place built-ins are declared.
//! It is assembled once when the dispatcher is built and never changes afterwards;
//! `!reload` only affects module commands.

use std::collections::BTreeMap;

use futures::future::BoxFuture;
use tracing::{error, info};

use crate::base::{
    error::DispatchError,
    types::{InboundEvent, Void},
};

use super::dispatcher::Dispatcher;

// Types.

/// Signature shared by every built-in: `(dispatcher, args, event)`.
///
/// Built-ins reply through `event.chat` themselves; nothing is sent on their behalf.
pub type BuiltinFn = for<'a> fn(&'a Dispatcher, &'a [String], &'a InboundEvent) -> BoxFuture<'a, Void>;

/// A named built-in command.
#[derive(Clone, Copy)]
pub struct Builtin {
    /// Name the command answers to.
    pub name: &'static str,
    /// Function run when the command is invoked.
    pub handler: BuiltinFn,
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

/// Case-sensitive mapping from command name to built-in.
#[derive(Debug, Clone, Default)]
pub struct BuiltinRegistry {
    builtins: BTreeMap<&'static str, Builtin>,
}

impl BuiltinRegistry {
    /// The built-ins every dispatcher ships with.
    pub fn standard() -> Self {
        Self::from_table(&[Builtin { name: "reload", handler: reload }])
    }

    /// Build a registry from an explicit table; later entries replace earlier ones.
    pub fn from_table(table: &[Builtin]) -> Self {
        let builtins = table
            .iter()
            .map(|builtin| {
                info!("Built-in command {} is available.", builtin.name);
                (builtin.name, *builtin)
            })
            .collect();

        Self { builtins }
    }

    /// Look up a built-in by its exact name.
    pub fn get(&self, name: &str) -> Option<Builtin> {
        self.builtins.get(name).copied()
    }

    /// Registered names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.builtins.keys().copied()
    }
}

// Built-ins.

/// `!reload`: reload every module and reply with the resulting command list.
///
/// Only administrators may reload. Anyone else gets no reply at all; the attempt
/// surfaces as [`DispatchError::ReloadUnauthorized`] for the dispatcher to log.
pub fn reload<'a>(dispatcher: &'a Dispatcher, _args: &'a [String], event: &'a InboundEvent) -> BoxFuture<'a, Void> {
    Box::pin(async move {
        if !dispatcher.is_admin(&event.sender_handle) {
            return Err(DispatchError::ReloadUnauthorized {
                handle: event.sender_handle.clone(),
                command: "reload".to_string(),
            }
            .into());
        }

        let reply = match dispatcher.modules().reload().await {
            Ok(commands) => {
                info!("Reloaded {} module commands.", commands.len());
                format!("Available commands: {}", commands.join(", "))
            }
            Err(err) => {
                error!("Failed to reload modules: {}", err);
                format!("Failed to reload modules: {err}")
            }
        };

        event.chat.send_message(&reply).await
    })
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_has_reload_only() {
        let registry = BuiltinRegistry::standard();

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["reload"]);
        assert_eq!(registry.get("reload").map(|b| b.name), Some("reload"));
        assert!(registry.get("Reload").is_none());
        assert!(registry.get("weather").is_none());
    }
}
