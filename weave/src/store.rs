//! Lookup from rendered nodes back to the widget that owns them.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use log::trace;
use weavedom::{Document, NodeId};

use crate::error::StoreError;

type Entry = Arc<dyn Any + Send + Sync>;

/// Side table mapping widget root nodes to widget handles.
///
/// The application owns the store and passes it where needed; nothing is
/// registered implicitly. Clones share the same table.
#[derive(Clone, Default)]
pub struct ComponentStore {
    entries: Arc<RwLock<HashMap<NodeId, Entry>>>,
}

impl fmt::Debug for ComponentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentStore")
            .field("len", &self.len())
            .finish()
    }
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `component` for `node`, replacing any previous entry.
    pub fn register<C: Any + Send + Sync>(&self, node: NodeId, component: C) {
        if let Ok(mut entries) = self.entries.write() {
            trace!("Registered {} for {node}", type_name::<C>());
            entries.insert(node, Arc::new(component));
        }
    }

    /// Remove the entry for `node`. Returns whether one existed.
    pub fn deregister(&self, node: NodeId) -> bool {
        self.entries
            .write()
            .map(|mut entries| entries.remove(&node).is_some())
            .unwrap_or(false)
    }

    pub fn lookup<C: Any + Send + Sync>(&self, node: NodeId) -> Option<Arc<C>> {
        self.try_lookup(node).ok()
    }

    pub fn try_lookup<C: Any + Send + Sync>(&self, node: NodeId) -> Result<Arc<C>, StoreError> {
        let entry = self
            .entries
            .read()
            .ok()
            .and_then(|entries| entries.get(&node).cloned())
            .ok_or(StoreError::NotRegistered(node))?;
        entry.downcast::<C>().map_err(|_| StoreError::TypeMismatch {
            node,
            expected: type_name::<C>(),
        })
    }

    /// Walk from `node` up through its ancestors and return the first
    /// registered component of type `C`.
    pub fn find_owner<C: Any + Send + Sync>(&self, doc: &Document, node: NodeId) -> Option<Arc<C>> {
        let mut current = Some(node);
        while let Some(id) = current {
            if let Some(component) = self.lookup::<C>(id) {
                return Some(component);
            }
            current = doc.parent(id);
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
