//! Append-only typed domain event log.
//!
//! Every engine owns an `EventLog` of its own event enum and appends
//! exactly one record per state-changing effect, in call order. External
//! observers (indexers, test assertions) read the log; nothing in the core
//! ever removes or rewrites an entry.

use serde::{Deserialize, Serialize};

/// An append-only sequence of typed domain events.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventLog<E> {
    entries: Vec<E>,
}

impl<E> EventLog<E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record one event. Appending is the only mutation the log supports.
    pub fn append(&mut self, event: E) {
        self.entries.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&E> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> Default for EventLog<E> {
    fn default() -> Self {
        Self::new()
    }
}
