use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use crate::document::{Document, NodeId};
use crate::event::{Event, EventType};

/// Callback invoked for a dispatched event.
///
/// The document is passed in rather than captured so listeners never keep
/// their own document alive.
pub type Listener = Arc<dyn Fn(&Document, &Event) + Send + Sync>;

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Document-wide: receives every bubbling event of its type.
    Document,
    Node(NodeId),
}

struct Entry {
    target: Target,
    kind: EventType,
    listener: Listener,
}

/// All listeners registered on one document, in registration order.
#[derive(Default)]
pub(crate) struct ListenerTable {
    next_id: u64,
    entries: BTreeMap<u64, Entry>,
}

impl fmt::Debug for ListenerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerTable")
            .field("next_id", &self.next_id)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl ListenerTable {
    pub(crate) fn insert(&mut self, target: Target, kind: EventType, listener: Listener) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(
            id,
            Entry {
                target,
                kind,
                listener,
            },
        );
        id
    }

    pub(crate) fn remove(&mut self, id: u64) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub(crate) fn contains(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn matching(&self, target: Target, kind: EventType) -> Vec<(u64, Listener)> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.target == target && entry.kind == kind)
            .map(|(id, entry)| (*id, Arc::clone(&entry.listener)))
            .collect()
    }

    pub(crate) fn count(&self, target: Target, kind: EventType) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.target == target && entry.kind == kind)
            .count()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Disposable handle for one or more registered listeners.
///
/// Removal is explicit: dropping a registration leaves its listeners active.
/// Several registrations can be folded into one with [`Registration::compose`].
#[derive(Default)]
pub struct Registration {
    handles: Vec<(Weak<RwLock<ListenerTable>>, u64)>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("listeners", &self.handles.len())
            .finish()
    }
}

impl Registration {
    pub(crate) fn new(table: &Arc<RwLock<ListenerTable>>, id: u64) -> Self {
        Self {
            handles: vec![(Arc::downgrade(table), id)],
        }
    }

    /// A registration holding nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fold several registrations into one handle.
    pub fn compose(registrations: impl IntoIterator<Item = Registration>) -> Self {
        Self {
            handles: registrations
                .into_iter()
                .flat_map(|registration| registration.handles)
                .collect(),
        }
    }

    /// Number of listeners this handle was created for.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Whether at least one of the listeners is still registered.
    pub fn is_active(&self) -> bool {
        self.handles.iter().any(|(table, id)| {
            table
                .upgrade()
                .and_then(|table| table.read().ok().map(|guard| guard.contains(*id)))
                .unwrap_or(false)
        })
    }

    /// Unregister every listener. Calling this again is a no-op.
    pub fn remove(&mut self) {
        for (table, id) in self.handles.drain(..) {
            if let Some(table) = table.upgrade()
                && let Ok(mut guard) = table.write()
            {
                guard.remove(id);
            }
        }
    }
}
