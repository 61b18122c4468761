//! Runtime services and shared state for the dispatch-bot.

use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    interaction::dispatcher::Dispatcher,
    service::{access::AccessPolicy, chat::ChatClient, modules::ModuleRegistry},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the configuration, the chat transport, the module registry
/// and the dispatcher wired on top of them. Every member is trivially cloneable.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The chat client instance.
    pub chat: ChatClient,
    /// The module registry instance.
    pub modules: ModuleRegistry,
    /// The command dispatcher.
    pub dispatcher: Dispatcher,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the module registry.
        let modules = ModuleRegistry::scripts(&config).await?;

        // Initialize the chat client.
        let chat = ChatClient::console(&config);

        let dispatcher = Self::dispatcher(&config, modules.clone());

        Ok(Self { config, chat, modules, dispatcher })
    }

    /// Build the dispatcher described by `config` over `modules`.
    pub fn dispatcher(config: &Config, modules: ModuleRegistry) -> Dispatcher {
        let mut builder = Dispatcher::builder(modules).admins(config.admins.iter().cloned());

        if let Some(allowed) = &config.allowed_handles {
            info!("Restricting commands to {} allowed handles.", allowed.len());
            builder = builder.access_policy(AccessPolicy::allow_list(allowed.iter().cloned()));
        }

        builder.build()
    }

    /// Run the chat transport until it shuts down.
    pub async fn start(&self) -> Void {
        self.chat.start(self.dispatcher.clone()).await
    }
}
