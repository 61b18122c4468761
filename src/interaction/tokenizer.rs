//! Shell-style word splitting of message text.
//!
//! Follows POSIX quoting: single quotes are fully literal, double quotes only honour
//! `\"` and `\\`, and an unquoted backslash escapes the next character. Quote
//! characters are consumed, and `#` has no special meaning. Words are separated
//! by space, tab, CR and LF only.

use std::mem;

use crate::base::{error::DispatchError, types::CommandInvocation};

/// The character that marks a message as a command attempt.
pub const COMMAND_MARKER: char = '!';

/// Split `body` into words.
///
/// Returns [`DispatchError::UnterminatedQuote`] if a quote is never closed, and
/// [`DispatchError::DanglingEscape`] if the text ends with a lone backslash.
pub fn tokenize(body: &str) -> Result<Vec<String>, DispatchError> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                if in_word {
                    words.push(mem::take(&mut word));
                    in_word = false;
                }
            }
            '\\' => {
                word.push(chars.next().ok_or(DispatchError::DanglingEscape)?);
                in_word = true;
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => word.push(c),
                        None => return Err(DispatchError::UnterminatedQuote),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\')) => word.push(c),
                            Some(c) => {
                                word.push('\\');
                                word.push(c);
                            }
                            None => return Err(DispatchError::UnterminatedQuote),
                        },
                        Some(c) => word.push(c),
                        None => return Err(DispatchError::UnterminatedQuote),
                    }
                }
            }
            c => {
                word.push(c);
                in_word = true;
            }
        }
    }

    if in_word {
        words.push(word);
    }

    Ok(words)
}

/// Interpret tokenized words as a command invocation.
///
/// Returns `None` for ordinary chat: no words, or a first word without the marker.
pub fn parse_command(words: Vec<String>) -> Option<CommandInvocation> {
    let mut words = words.into_iter();
    let first = words.next()?;
    let name = first.strip_prefix(COMMAND_MARKER)?;

    Some(CommandInvocation {
        name: name.to_string(),
        args: words.collect(),
    })
}
