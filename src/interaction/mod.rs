//! Command dispatch for dispatch-bot.
//!
//! This module turns inbound chat events into command invocations:
//! - Filtering out echo and receipt events
//! - Giving stateful handlers first refusal
//! - Tokenizing, access control and command resolution
//! - Running built-ins inline and modules asynchronously

pub mod builtins;
pub mod dispatcher;
pub mod filter;
pub mod resolver;
pub mod tokenizer;
