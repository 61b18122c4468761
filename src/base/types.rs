//! Shared result aliases and the event types the dispatcher works on.

use std::fmt;

use crate::service::chat::ChatRef;

/// Error type used across the crate.
pub type Err = anyhow::Error;
/// Result with the crate's error type.
pub type Res<T> = Result<T, Err>;
/// Result carrying no value.
pub type Void = Res<()>;

/// Delivery status attached to an inbound chat event by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageStatus {
    /// A message that has been delivered to the conversation.
    Sent,
    /// The bot's own outbound echo, observed before delivery completes.
    Sending,
    /// A read-receipt echo that some clients emit; never shown in a chat UI.
    Read,
    /// A message received from another participant.
    Received,
    /// Any status the transport does not map onto the above.
    Other,
}

/// A single inbound chat event, constructed by the transport and consumed once by the dispatcher.
#[derive(Clone)]
pub struct InboundEvent {
    /// Handle of the participant who sent the message.
    pub sender_handle: String,
    /// Raw message text.
    pub body: String,
    /// Reply handle for the conversation the message arrived in.
    pub chat: ChatRef,
    /// Delivery status reported by the transport.
    pub status: MessageStatus,
}

impl InboundEvent {
    /// Build an event from its parts.
    pub fn new(sender_handle: impl Into<String>, body: impl Into<String>, chat: ChatRef, status: MessageStatus) -> Self {
        Self {
            sender_handle: sender_handle.into(),
            body: body.into(),
            chat,
            status,
        }
    }
}

impl fmt::Debug for InboundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InboundEvent")
            .field("sender_handle", &self.sender_handle)
            .field("body", &self.body)
            .field("chat", &self.chat.id())
            .field("status", &self.status)
            .finish()
    }
}

/// A command name (without the leading marker) plus its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Command name with the marker stripped.
    pub name: String,
    /// Positional arguments following the name.
    pub args: Vec<String>,
}
