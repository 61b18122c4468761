//! Recoverable errors raised while turning a chat message into a command.
//!
//! None of these ever escape [`crate::interaction::dispatcher::Dispatcher::handle`];
//! each one degrades to "no reply" or "one explanatory reply".

use thiserror::Error;

/// Why an event did not turn into a successful command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// A quote was opened and never closed.
    #[error("no closing quotation")]
    UnterminatedQuote,
    /// The message ended with a lone escape character.
    #[error("no escaped character")]
    DanglingEscape,
    /// The access policy rejected the sender.
    #[error("access denied for `{handle}`")]
    AccessDenied {
        /// The rejected sender.
        handle: String,
    },
    /// The command is neither a built-in nor a loaded module.
    #[error("unknown command `!{name}`")]
    UnknownCommand {
        /// The unrecognized name, marker stripped.
        name: String,
        /// Alternatives offered in the reply.
        suggestions: Vec<String>,
    },
    /// A non-administrator attempted a privileged built-in.
    #[error("`{handle}` is not allowed to run `!{command}`")]
    ReloadUnauthorized {
        /// The non-administrator sender.
        handle: String,
        /// The privileged command that was refused.
        command: String,
    },
}
