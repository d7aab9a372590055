//! Strata Cache Change Listeners
//!
//! Entry lifecycle notification. A listener subscribes to a REGION, not a
//! single key: once registered it observes update, remove, and expire
//! events for every key in that region. The broad scope is deliberate and
//! explicit; registration returns a handle that cancels the subscription.
//!
//! Listeners run on whichever thread observes the event, potentially
//! concurrently with other listeners on the same region.
//!
//! @version 0.1.0
//! @author Strata Development Team

use crate::connection::CacheConnection;
use std::sync::Arc;

// =============================================================================
// Entry Event
// =============================================================================

/// Kind of entry lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryEventKind {
    /// The entry was created or its value replaced.
    Updated,
    /// The entry was explicitly removed.
    Removed,
    /// The entry passed its expiry deadline.
    Expired,
}

impl EntryEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::Removed => "removed",
            Self::Expired => "expired",
        }
    }
}

/// An entry lifecycle event. Key and value are in transport form (the
/// codec-encoded text the cluster holds); values are absent when the event
/// does not carry one.
#[derive(Debug, Clone)]
pub struct EntryEvent {
    pub kind: EntryEventKind,
    pub region: String,
    pub key: String,
    pub value: Option<String>,
}

/// Shared listener callback type.
pub(crate) type ListenerFn = Arc<dyn Fn(&EntryEvent) + Send + Sync>;

// =============================================================================
// Listener Handle
// =============================================================================

/// A cancellable region-scoped subscription.
///
/// The subscription stays active until `cancel` is called; dropping the
/// handle does not deregister the listener.
pub struct ListenerHandle {
    region: String,
    id: u64,
    connection: Arc<CacheConnection>,
}

impl ListenerHandle {
    pub(crate) fn new(region: String, id: u64, connection: Arc<CacheConnection>) -> Self {
        Self {
            region,
            id,
            connection,
        }
    }

    /// The region this subscription observes.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Deregister the listener.
    pub fn cancel(self) {
        self.connection.remove_listener(&self.region, self.id);
    }
}

// =============================================================================
// Tests
// =============================================================================
