//! Chat service integration for dispatch-bot.
//!
//! This module provides the boundary to the chat transport:
//! - Receiving message events and handing them to the dispatcher
//! - Sending text replies to a conversation
//!
//! It defines the `GenericChatClient` trait that can be implemented for different
//! chat services, with a console implementation for local use.

pub mod console;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::{base::types::Void, interaction::dispatcher::Dispatcher};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the core functionality for interacting with chat platforms.
/// Implementing this trait allows different chat services to be used with the dispatcher.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Get the bot's own handle on the chat platform.
    fn bot_handle(&self) -> &str;

    /// Start the chat client listener.
    ///
    /// This begins receiving inbound events and hands each one to the dispatcher.
    async fn start(&self, dispatcher: Dispatcher) -> Void;

    /// Send a text message to a conversation.
    async fn send_message(&self, chat_id: &str, text: &str) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    /// Wrap a transport implementation.
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }

    /// Get a reply handle for the given conversation.
    pub fn chat_ref(&self, chat_id: impl Into<String>) -> ChatRef {
        ChatRef {
            chat_id: chat_id.into(),
            client: self.clone(),
        }
    }
}

/// Opaque reply handle for a single conversation.
///
/// The dispatcher only ever uses this to send text back to where a message came from.
#[derive(Clone)]
pub struct ChatRef {
    chat_id: String,
    client: ChatClient,
}

impl ChatRef {
    /// The transport's identifier for the conversation.
    pub fn id(&self) -> &str {
        &self.chat_id
    }

    /// Send a text message to the conversation.
    pub async fn send_message(&self, text: &str) -> Void {
        self.client.send_message(&self.chat_id, text).await
    }
}
