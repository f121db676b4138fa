//! Retained element tree with listener dispatch.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, RwLock};

use log::trace;

use crate::element::{Content, Element};
use crate::event::{Event, EventType, Key, Modifiers};
use crate::listener::{Listener, ListenerTable, Registration, Target};
use crate::selector::By;

/// Handle to a node in a [`Document`].
///
/// Slots are reused once a node is freed, so a handle carries the generation
/// of its slot. A handle to a freed node resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "#{}", self.index)
        } else {
            write!(f, "#{}.{}", self.index, self.generation)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Node {
    pub(crate) tag: String,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attributes: BTreeMap<String, String>,
    pub(crate) data: HashMap<String, String>,
    pub(crate) text: Option<String>,
    pub(crate) hidden: bool,
    pub(crate) checked: bool,
    pub(crate) disabled: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Node arena. Detached nodes stay allocated until they are removed; removed
/// subtrees go back on the free list.
#[derive(Debug, Default)]
pub(crate) struct Tree {
    slots: Vec<Slot>,
    free: Vec<usize>,
    live: usize,
}

impl Tree {
    pub(crate) fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn len(&self) -> usize {
        self.live
    }

    fn allocate(&mut self, node: Node) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free.pop()
            && let Some(slot) = self.slots.get_mut(index)
        {
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Free `id` and everything below it. The caller detaches `id` first.
    fn free_subtree(&mut self, id: NodeId) {
        if self.node(id).is_none() {
            return;
        }
        let mut doomed = self.descendants(id);
        doomed.push(id);
        for node in doomed {
            if let Some(slot) = self.slots.get_mut(node.index)
                && slot.generation == node.generation
                && slot.node.take().is_some()
            {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(node.index);
                self.live -= 1;
            }
        }
    }

    /// Ancestors from the parent up to the root.
    pub(crate) fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.node(id).and_then(|node| node.parent);
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.node(parent).and_then(|node| node.parent);
        }
        ancestors
    }

    fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        id == ancestor || self.ancestors(id).contains(&ancestor)
    }

    /// Descendants of `root` in document order, `root` excluded.
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self
            .node(root)
            .map(|node| node.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            result.push(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        result
    }

    fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(node) = self.node(id) {
            if let Some(text) = &node.text {
                out.push_str(text);
            }
            for child in &node.children {
                out.push_str(&self.text(*child));
            }
        }
        out
    }

    fn build(&mut self, element: Element, parent: Option<NodeId>) -> NodeId {
        let id = self.allocate(Node {
            tag: element.tag,
            id: element.id,
            classes: element.classes,
            attributes: element.attributes,
            data: element.data,
            text: None,
            hidden: element.hidden,
            checked: element.checked,
            disabled: element.disabled,
            parent,
            children: Vec::new(),
        });
        match element.content {
            Content::None => {}
            Content::Text(text) => {
                if let Some(node) = self.node_mut(id) {
                    node.text = Some(text);
                }
            }
            Content::Children(children) => {
                let child_ids: Vec<NodeId> = children
                    .into_iter()
                    .map(|child| self.build(child, Some(id)))
                    .collect();
                if let Some(node) = self.node_mut(id) {
                    node.children = child_ids;
                }
            }
        }
        id
    }

    fn detach(&mut self, id: NodeId) {
        let parent = self.node(id).and_then(|node| node.parent);
        if let Some(parent) = parent
            && let Some(parent_node) = self.node_mut(parent)
        {
            parent_node.children.retain(|child| *child != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    fn clear_children(&mut self, id: NodeId) {
        let children = self
            .node_mut(id)
            .map(|node| std::mem::take(&mut node.children))
            .unwrap_or_default();
        for child in children {
            self.free_subtree(child);
        }
    }
}

/// A retained element tree plus the listeners bound to it.
///
/// `Document` is a cheap handle: clones share the same tree. No internal lock
/// is held while listeners run, so listeners may freely mutate the document
/// they are handed.
#[derive(Clone)]
pub struct Document {
    tree: Arc<RwLock<Tree>>,
    listeners: Arc<RwLock<ListenerTable>>,
    body: NodeId,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.node_count())
            .field("listeners", &self.listener_total())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with an empty `body`.
    pub fn new() -> Self {
        let mut tree = Tree::default();
        let body = tree.build(Element::new("body"), None);
        Self {
            tree: Arc::new(RwLock::new(tree)),
            listeners: Arc::new(RwLock::new(ListenerTable::default())),
            body,
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    fn read<R>(&self, f: impl FnOnce(&Tree) -> R) -> Option<R> {
        self.tree.read().ok().map(|guard| f(&guard))
    }

    fn write<R>(&self, f: impl FnOnce(&mut Tree) -> R) -> Option<R> {
        self.tree.write().ok().map(|mut guard| f(&mut guard))
    }

    fn with_node<R>(&self, id: NodeId, f: impl FnOnce(&Node) -> R) -> Option<R> {
        self.read(|tree| tree.node(id).map(f)).flatten()
    }

    fn with_node_mut(&self, id: NodeId, f: impl FnOnce(&mut Node)) {
        self.write(|tree| {
            if let Some(node) = tree.node_mut(id) {
                f(node);
            }
        });
    }

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    /// Build `element` as a detached subtree and return its root.
    pub fn create(&self, element: Element) -> NodeId {
        let body = self.body;
        self.write(|tree| tree.build(element, None)).unwrap_or(body)
    }

    /// Build `element` and append it as the last child of `parent`.
    pub fn append(&self, parent: NodeId, element: Element) -> NodeId {
        let id = self.create(element);
        self.append_node(parent, id);
        id
    }

    /// Move an existing node under `parent`. Appending a node into its own
    /// subtree is ignored.
    pub fn append_node(&self, parent: NodeId, child: NodeId) {
        self.write(|tree| {
            if tree.node(parent).is_none() || tree.node(child).is_none() {
                return;
            }
            if tree.contains(child, parent) {
                return;
            }
            tree.detach(child);
            if let Some(node) = tree.node_mut(child) {
                node.parent = Some(parent);
            }
            if let Some(node) = tree.node_mut(parent) {
                node.children.push(child);
            }
        });
    }

    /// Detach a node and free its subtree. Removing `body` is ignored.
    pub fn remove(&self, id: NodeId) {
        if id == self.body {
            return;
        }
        self.write(|tree| {
            tree.detach(id);
            tree.free_subtree(id);
        });
    }

    /// Free every child subtree of `id`. Listeners bound to the old children
    /// are left alone; owners must remove their registrations.
    pub fn remove_children(&self, id: NodeId) {
        self.write(|tree| tree.clear_children(id));
    }

    /// Whether `id` still refers to a live node.
    pub fn exists(&self, id: NodeId) -> bool {
        self.read(|tree| tree.node(id).is_some()).unwrap_or(false)
    }

    /// Number of live nodes, `body` included.
    pub fn node_count(&self) -> usize {
        self.read(Tree::len).unwrap_or(0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.with_node(id, |node| node.parent).flatten()
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.with_node(id, |node| node.children.clone())
            .unwrap_or_default()
    }

    /// Whether `id` is `ancestor` or lies below it.
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.read(|tree| tree.contains(ancestor, id))
            .unwrap_or(false)
    }

    /// Whether the node is attached below `body`.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.body, id)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// First descendant of `root` matching `by`, in document order.
    pub fn find(&self, root: NodeId, by: &By) -> Option<NodeId> {
        self.read(|tree| {
            tree.descendants(root)
                .into_iter()
                .find(|id| by.matches(tree, *id))
        })
        .flatten()
    }

    /// All descendants of `root` matching `by`, in document order.
    pub fn find_all(&self, root: NodeId, by: &By) -> Vec<NodeId> {
        self.read(|tree| {
            tree.descendants(root)
                .into_iter()
                .filter(|id| by.matches(tree, *id))
                .collect()
        })
        .unwrap_or_default()
    }

    /// `id` itself or its nearest ancestor matching `by`.
    pub fn closest(&self, id: NodeId, by: &By) -> Option<NodeId> {
        self.read(|tree| {
            std::iter::once(id)
                .chain(tree.ancestors(id))
                .find(|candidate| by.matches(tree, *candidate))
        })
        .flatten()
    }

    pub fn matches(&self, id: NodeId, by: &By) -> bool {
        self.read(|tree| by.matches(tree, id)).unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Attributes
    // -------------------------------------------------------------------------

    pub fn tag(&self, id: NodeId) -> Option<String> {
        self.with_node(id, |node| node.tag.clone())
    }

    pub fn element_id(&self, id: NodeId) -> Option<String> {
        self.with_node(id, |node| node.id.clone()).flatten()
    }

    pub fn set_element_id(&self, id: NodeId, element_id: impl Into<String>) {
        let element_id = element_id.into();
        self.with_node_mut(id, |node| node.id = Some(element_id));
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<String> {
        self.with_node(id, |node| node.attributes.get(name).cloned())
            .flatten()
    }

    pub fn set_attr(&self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        let (name, value) = (name.into(), value.into());
        self.with_node_mut(id, |node| {
            node.attributes.insert(name, value);
        });
    }

    pub fn remove_attr(&self, id: NodeId, name: &str) {
        self.with_node_mut(id, |node| {
            node.attributes.remove(name);
        });
    }

    /// Read an `aria-*` attribute.
    pub fn aria(&self, id: NodeId, name: &str) -> Option<String> {
        self.attr(id, &format!("aria-{name}"))
    }

    pub fn set_aria(&self, id: NodeId, name: &str, value: impl Into<String>) {
        self.set_attr(id, format!("aria-{name}"), value);
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.with_node(id, |node| node.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn add_class(&self, id: NodeId, class: impl Into<String>) {
        let class = class.into();
        self.with_node_mut(id, |node| {
            if !node.classes.contains(&class) {
                node.classes.push(class);
            }
        });
    }

    pub fn remove_class(&self, id: NodeId, class: &str) {
        self.with_node_mut(id, |node| node.classes.retain(|c| c != class));
    }

    /// Add or remove `class` depending on `on`.
    pub fn toggle_class(&self, id: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    pub fn data(&self, id: NodeId, key: &str) -> Option<String> {
        self.with_node(id, |node| node.data.get(key).cloned())
            .flatten()
    }

    pub fn set_data(&self, id: NodeId, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        self.with_node_mut(id, |node| {
            node.data.insert(key, value);
        });
    }

    // -------------------------------------------------------------------------
    // Content and state
    // -------------------------------------------------------------------------

    /// Concatenated text of the node and all its descendants.
    pub fn text(&self, id: NodeId) -> String {
        self.read(|tree| tree.text(id)).unwrap_or_default()
    }

    /// Replace all content of the node with `text`.
    pub fn set_text(&self, id: NodeId, text: impl Into<String>) {
        let text = text.into();
        self.write(|tree| {
            tree.clear_children(id);
            if let Some(node) = tree.node_mut(id) {
                node.text = Some(text);
            }
        });
    }

    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.with_node(id, |node| node.hidden).unwrap_or(false)
    }

    pub fn set_hidden(&self, id: NodeId, hidden: bool) {
        self.with_node_mut(id, |node| node.hidden = hidden);
    }

    pub fn is_checked(&self, id: NodeId) -> bool {
        self.with_node(id, |node| node.checked).unwrap_or(false)
    }

    /// Direct state write. No event is dispatched.
    pub fn set_checked(&self, id: NodeId, checked: bool) {
        self.with_node_mut(id, |node| node.checked = checked);
    }

    pub fn is_disabled(&self, id: NodeId) -> bool {
        self.with_node(id, |node| node.disabled).unwrap_or(false)
    }

    pub fn set_disabled(&self, id: NodeId, disabled: bool) {
        self.with_node_mut(id, |node| node.disabled = disabled);
    }

    /// Current `value` attribute of an input.
    pub fn value(&self, id: NodeId) -> Option<String> {
        self.attr(id, "value")
    }

    pub fn set_value(&self, id: NodeId, value: impl Into<String>) {
        self.set_attr(id, "value", value);
    }

    fn is_checkbox(&self, id: NodeId) -> bool {
        self.with_node(id, |node| {
            node.tag == "input"
                && node.attributes.get("type").map(String::as_str) == Some("checkbox")
        })
        .unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Register a listener and return its disposable handle.
    pub fn bind(
        &self,
        target: Target,
        kind: EventType,
        listener: impl Fn(&Document, &Event) + Send + Sync + 'static,
    ) -> Registration {
        let listener: Listener = Arc::new(listener);
        match self.listeners.write() {
            Ok(mut guard) => {
                let id = guard.insert(target, kind, listener);
                Registration::new(&self.listeners, id)
            }
            Err(_) => Registration::empty(),
        }
    }

    /// Shorthand for a listener on one node.
    pub fn on(
        &self,
        id: NodeId,
        kind: EventType,
        listener: impl Fn(&Document, &Event) + Send + Sync + 'static,
    ) -> Registration {
        self.bind(Target::Node(id), kind, listener)
    }

    /// Number of listeners of `kind` currently attached to `target`.
    pub fn listener_count(&self, target: Target, kind: EventType) -> usize {
        self.listeners
            .read()
            .map(|guard| guard.count(target, kind))
            .unwrap_or(0)
    }

    /// Number of listeners registered on the document overall.
    pub fn listener_total(&self) -> usize {
        self.listeners.read().map(|guard| guard.len()).unwrap_or(0)
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Deliver an event to the target, then its ancestors, then document-wide
    /// listeners (the latter two only for bubbling events).
    ///
    /// The listener set is snapshotted first: listeners added while the event
    /// is being delivered do not see it, listeners removed meanwhile are
    /// skipped.
    pub fn dispatch(&self, event: Event) {
        let target = event.target();
        let kind = event.kind();

        let mut path = vec![target];
        if event.bubbles() {
            path.extend(self.read(|tree| tree.ancestors(target)).unwrap_or_default());
        }

        let snapshot: Vec<(u64, Listener)> = match self.listeners.read() {
            Ok(guard) => {
                let mut listeners: Vec<(u64, Listener)> = path
                    .iter()
                    .flat_map(|node| guard.matching(Target::Node(*node), kind))
                    .collect();
                if event.bubbles() {
                    listeners.extend(guard.matching(Target::Document, kind));
                }
                listeners
            }
            Err(_) => return,
        };

        trace!(
            "dispatch {:?} to {} ({} listeners)",
            kind,
            target,
            snapshot.len()
        );

        for (id, listener) in snapshot {
            let still_registered = self
                .listeners
                .read()
                .map(|guard| guard.contains(id))
                .unwrap_or(false);
            if still_registered {
                listener(self, &event);
            }
        }
    }

    /// Simulate a pointer press on `id`.
    pub fn pointer_down(&self, id: NodeId) {
        self.dispatch(Event::PointerDown { target: id });
    }

    /// Simulate a user click: pointer-down, then (for enabled checkboxes) the
    /// checked flip, then click and change. Disabled elements only see the
    /// pointer-down.
    pub fn click(&self, id: NodeId) {
        self.pointer_down(id);
        if self.is_disabled(id) {
            return;
        }
        let checkbox = self.is_checkbox(id);
        if checkbox {
            let checked = self.is_checked(id);
            self.set_checked(id, !checked);
        }
        self.dispatch(Event::Click { target: id });
        if checkbox {
            self.dispatch(Event::Change { target: id });
        }
    }

    /// Simulate typing into an input: set its value, then dispatch change.
    pub fn input(&self, id: NodeId, value: impl Into<String>) {
        if self.is_disabled(id) {
            return;
        }
        self.set_value(id, value);
        self.dispatch(Event::Change { target: id });
    }

    /// Simulate a key press targeted at `id`.
    pub fn key(&self, id: NodeId, key: Key) {
        self.dispatch(Event::Key {
            target: id,
            key,
            modifiers: Modifiers::default(),
        });
    }
}
