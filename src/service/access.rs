//! Access control for command senders.

use std::{collections::HashSet, ops::Deref, sync::Arc};

// Traits.

/// Generic access policy trait.
///
/// Consulted only once a message is known to be a command attempt.
pub trait GenericAccessPolicy: Send + Sync + 'static {
    /// Whether `sender_handle` may issue commands.
    fn is_allowed(&self, sender_handle: &str) -> bool;
}

// Structs.

/// Access policy for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct AccessPolicy {
    inner: Arc<dyn GenericAccessPolicy>,
}

impl Deref for AccessPolicy {
    type Target = dyn GenericAccessPolicy;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl AccessPolicy {
    /// Wrap a policy implementation.
    pub fn new(inner: Arc<dyn GenericAccessPolicy>) -> Self {
        Self { inner }
    }

    /// Creates a policy that admits exactly the given handles.
    pub fn allow_list<I, S>(handles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Arc::new(AllowList::new(handles)))
    }
}

/// Policy admitting an explicit, case-sensitive set of handles.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    handles: HashSet<String>,
}

impl AllowList {
    /// Allow exactly `handles`.
    pub fn new<I, S>(handles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            handles: handles.into_iter().map(Into::into).collect(),
        }
    }
}

impl GenericAccessPolicy for AllowList {
    fn is_allowed(&self, sender_handle: &str) -> bool {
        self.handles.contains(sender_handle)
    }
}

// Tests.
