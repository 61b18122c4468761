//! The per-event command dispatcher.
//!
//! Each inbound event runs through, in order:
//! 1. the status filter,
//! 2. the stateful handler chain,
//! 3. tokenization and the `!` marker check,
//! 4. the access policy (if any),
//! 5. resolution to a built-in, a module, or an "unknown command" reply.

use std::{
    collections::HashSet,
    ops::Deref,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
};

use tracing::{Instrument, debug, error, instrument, trace, warn};

use crate::{
    base::{
        error::DispatchError,
        types::{CommandInvocation, InboundEvent},
    },
    service::{
        access::AccessPolicy,
        modules::{ModuleCallback, ModuleHandle, ModuleRegistry},
    },
};

use super::{
    builtins::{Builtin, BuiltinRegistry},
    filter,
    resolver::{self, RandomSource, Resolution, ThreadRandom},
    tokenizer,
};

// Types.

/// Which branch of the dispatch pipeline an event ended in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Dropped by the status filter.
    Filtered,
    /// A stateful handler took the event.
    Claimed,
    /// Ordinary chat, not a command.
    NotCommand,
    /// A built-in ran to completion.
    Builtin(String),
    /// A module was started; its reply, if any, arrives later.
    Module(String),
    /// A recoverable rejection: malformed input, denied sender, unknown command, unauthorized built-in.
    Rejected(DispatchError),
    /// The command failed in a way that is not a rejection (see the logs).
    Failed(String),
}

// Structs.

/// Command dispatcher.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

impl Deref for Dispatcher {
    type Target = DispatcherInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// State shared by every clone of a [`Dispatcher`].
pub struct DispatcherInner {
    builtins: BuiltinRegistry,
    modules: ModuleRegistry,
    access: Option<AccessPolicy>,
    admins: HashSet<String>,
    random: Arc<dyn RandomSource>,
}

impl DispatcherInner {
    /// The module registry commands are resolved against.
    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    /// Whether `handle` may run privileged built-ins.
    pub fn is_admin(&self, handle: &str) -> bool {
        self.admins.contains(handle)
    }
}

/// Builder for [`Dispatcher`].
pub struct DispatcherBuilder {
    builtins: BuiltinRegistry,
    modules: ModuleRegistry,
    access: Option<AccessPolicy>,
    admins: HashSet<String>,
    random: Arc<dyn RandomSource>,
}

impl DispatcherBuilder {
    /// Require senders to pass `policy` before any command is resolved.
    pub fn access_policy(mut self, policy: AccessPolicy) -> Self {
        self.access = Some(policy);
        self
    }

    /// Handles allowed to run privileged built-ins.
    pub fn admins<I, S>(mut self, admins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.admins = admins.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the randomness used for fallback suggestions.
    pub fn random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Replace the built-in table.
    pub fn builtins(mut self, builtins: BuiltinRegistry) -> Self {
        self.builtins = builtins;
        self
    }

    /// Finish building.
    pub fn build(self) -> Dispatcher {
        Dispatcher {
            inner: Arc::new(DispatcherInner {
                builtins: self.builtins,
                modules: self.modules,
                access: self.access,
                admins: self.admins,
                random: self.random,
            }),
        }
    }
}

impl Dispatcher {
    /// Start building a dispatcher over `modules` with the standard built-ins,
    /// no access policy, no administrators and thread-local randomness.
    pub fn builder(modules: ModuleRegistry) -> DispatcherBuilder {
        DispatcherBuilder {
            builtins: BuiltinRegistry::standard(),
            modules,
            access: None,
            admins: HashSet::new(),
            random: Arc::new(ThreadRandom),
        }
    }

    /// Handle an event on a new task, so the transport never waits on it.
    pub fn dispatch(&self, event: InboundEvent) {
        let dispatcher = self.clone();

        tokio::spawn(
            async move {
                let outcome = dispatcher.handle(event).await;
                trace!("Dispatch finished: {:?}", outcome);
            }
            .in_current_span(),
        );
    }

    /// Run a single inbound event through the dispatch pipeline.
    ///
    /// Never fails: every error path ends in either no reply or one explanatory reply.
    #[instrument(name = "Dispatcher::handle", skip_all, fields(sender = %event.sender_handle, status = ?event.status))]
    pub async fn handle(&self, event: InboundEvent) -> Outcome {
        // The body of an echo or receipt is never inspected.
        if !filter::should_process(event.status) {
            trace!("Ignoring {:?} event.", event.status);
            return Outcome::Filtered;
        }

        for handler in self.modules.message_handlers() {
            if handler.handle(&event).await {
                debug!("Event claimed by a stateful handler.");
                return Outcome::Claimed;
            }
        }

        debug!("Processing message, body {}", event.body);

        let words = match tokenizer::tokenize(&event.body) {
            Ok(words) => words,
            Err(err) => {
                debug!("Dropping malformed message: {}", err);
                return Outcome::Rejected(err);
            }
        };

        let Some(CommandInvocation { name, args }) = tokenizer::parse_command(words) else {
            return Outcome::NotCommand;
        };

        if let Some(access) = &self.access
            && !access.is_allowed(&event.sender_handle)
        {
            debug!("Access denied for {}.", event.sender_handle);
            reply(&event, &access_denied_message(&event.sender_handle)).await;
            return Outcome::Rejected(DispatchError::AccessDenied {
                handle: event.sender_handle.clone(),
            });
        }

        match resolver::resolve(&name, &self.builtins, &*self.modules, &*self.random) {
            Resolution::Builtin(builtin) => self.run_builtin(builtin, &args, &event).await,
            Resolution::Module(module) => run_module(module, name, args, event),
            Resolution::Unknown { suggestions } => {
                reply(&event, &unknown_command_message(&event.sender_handle, &name, &suggestions)).await;
                Outcome::Rejected(DispatchError::UnknownCommand { name, suggestions })
            }
        }
    }

    async fn run_builtin(&self, builtin: Builtin, args: &[String], event: &InboundEvent) -> Outcome {
        debug!("Executing built-in command {}: {:?}", builtin.name, args);

        match (builtin.handler)(self, args, event).await {
            Ok(()) => Outcome::Builtin(builtin.name.to_string()),
            Err(err) => match err.downcast::<DispatchError>() {
                Ok(rejection) => {
                    warn!("{}", rejection);
                    Outcome::Rejected(rejection)
                }
                Err(err) => {
                    error!("Error while running built-in {}: {}", builtin.name, err);
                    Outcome::Failed(builtin.name.to_string())
                }
            },
        }
    }
}

// Helpers.

/// Start a module. Its output is wired straight to the chat; the dispatcher does not wait.
fn run_module(module: ModuleHandle, name: String, args: Vec<String>, event: InboundEvent) -> Outcome {
    debug!("Executing module command {}: {:?}", name, args);

    let callback = ModuleCallback::new(name.clone(), event.chat.clone());

    match catch_unwind(AssertUnwindSafe(|| module.run(event, args, callback))) {
        Ok(()) => Outcome::Module(name),
        Err(_) => {
            error!("Module {} panicked while starting.", name);
            Outcome::Failed(name)
        }
    }
}

/// Send a reply, logging rather than propagating failures.
async fn reply(event: &InboundEvent, text: &str) {
    if let Err(err) = event.chat.send_message(text).await {
        error!("Failed to send reply: {}", err);
    }
}

fn access_denied_message(handle: &str) -> String {
    format!("{handle}, you are not in any of the allowed chats, so you cannot give me commands. Go find another bot, or ask to be added.")
}

fn unknown_command_message(handle: &str, name: &str, suggestions: &[String]) -> String {
    format!("{handle}, I don't know about command: !{name}, maybe you mean another one: {}", suggestions.join(", "))
}

// Tests.
