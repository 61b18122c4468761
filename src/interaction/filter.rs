//! Drops transport events that are not real inbound messages.

use crate::base::types::MessageStatus;

/// Whether an event with this status should be dispatched at all.
///
/// `Sending` is the bot's own outbound echo, and `Read` is an acknowledgement some
/// clients echo back that never shows up in a chat UI. Neither has a body worth
/// looking at.
pub fn should_process(status: MessageStatus) -> bool {
    !matches!(status, MessageStatus::Sending | MessageStatus::Read)
}
