//! Resolution of a command name to a built-in, a module, or nothing.

use std::collections::BTreeSet;

use rand::Rng;

use crate::service::modules::{GenericModuleRegistry, ModuleHandle};

use super::builtins::{Builtin, BuiltinRegistry};

// Traits.

/// Source of randomness for the "did you mean" fallback.
pub trait RandomSource: Send + Sync + 'static {
    /// Pick an index in `0..len`; `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

/// Thread-local RNG from `rand`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

// Types.

/// What a command name refers to.
#[derive(Clone)]
pub enum Resolution {
    Builtin(Builtin),
    Module(ModuleHandle),
    Unknown { suggestions: Vec<String> },
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Builtin(builtin) => f.debug_tuple("Builtin").field(&builtin.name).finish(),
            Resolution::Module(module) => f.debug_tuple("Module").field(&module.name()).finish(),
            Resolution::Unknown { suggestions } => f.debug_struct("Unknown").field("suggestions", suggestions).finish(),
        }
    }
}

// Functions.

/// Resolve `name` (marker already stripped).
///
/// Built-ins win over modules of the same name. Neither registry is modified.
pub fn resolve(name: &str, builtins: &BuiltinRegistry, modules: &dyn GenericModuleRegistry, random: &dyn RandomSource) -> Resolution {
    if let Some(builtin) = builtins.get(name) {
        return Resolution::Builtin(builtin);
    }

    if let Some(module) = modules.lookup(name) {
        return Resolution::Module(module);
    }

    let mut candidates = modules.names();

    if candidates.is_empty() {
        candidates = builtins.names().map(str::to_string).collect();
    }

    Resolution::Unknown {
        suggestions: suggest(name, &candidates, random),
    }
}

/// Every candidate sharing `name`'s first character; failing that, one random candidate.
///
/// Returns an empty list only when there are no candidates at all.
pub fn suggest(name: &str, candidates: &BTreeSet<String>, random: &dyn RandomSource) -> Vec<String> {
    let matching: Vec<String> = match name.chars().next() {
        Some(first) => candidates.iter().filter(|c| c.starts_with(first)).cloned().collect(),
        None => Vec::new(),
    };

    if !matching.is_empty() || candidates.is_empty() {
        return matching;
    }

    let index = random.pick(candidates.len()).min(candidates.len() - 1);

    candidates.iter().nth(index).cloned().into_iter().collect()
}

// Tests.
