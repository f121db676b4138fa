//! Dropdown menu.

use std::fmt;
use std::sync::{Arc, RwLock};

use log::trace;
use weavedom::{By, Document, Element, EventType, NodeId};

use super::SelectCallback;
use crate::classes::{DISABLED, ITEM_DATA, component, modifier};
use crate::config::WeaveConfig;
use crate::data::fuzzy_filter;
use crate::id;
use crate::item::ItemRegistry;
use crate::toggle::ToggleController;
use crate::traits::{Component, Disableable};

struct DropdownInner<T> {
    registry: ItemRegistry<T>,
    items: Vec<(String, T)>,
    /// Menu rows, separators included, in insertion order.
    rows: Vec<NodeId>,
    collapse_on_select: bool,
    on_select: Option<SelectCallback<T>>,
}

impl<T> DropdownInner<T> {
    fn find(&self, id: &str) -> Option<&T> {
        self.items
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, item)| item)
    }
}

/// A toggle button opening a menu of items.
///
/// Clicking an item collapses the menu (unless configured to stay open), then
/// reports the item to the select callback. Clones share state.
pub struct Dropdown<T> {
    doc: Document,
    root: NodeId,
    button: NodeId,
    text: NodeId,
    menu: NodeId,
    toggle: ToggleController,
    inner: Arc<RwLock<DropdownInner<T>>>,
}

impl<T> Clone for Dropdown<T> {
    fn clone(&self) -> Self {
        Self {
            doc: self.doc.clone(),
            root: self.root,
            button: self.button,
            text: self.text,
            menu: self.menu,
            toggle: self.toggle.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Dropdown<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dropdown")
            .field("root", &self.root)
            .field("expanded", &self.toggle.is_expanded())
            .finish()
    }
}

impl<T: fmt::Display + Clone + Send + Sync + 'static> Dropdown<T> {
    /// Dropdown labelled `text`, rendering items by their `Display` form.
    pub fn new(doc: &Document, text: &str) -> Self {
        Self::with_registry(doc, text, ItemRegistry::new())
    }

    /// Like [`Dropdown::new`], honouring `collapse_on_select`.
    pub fn with_config(doc: &Document, text: &str, config: &WeaveConfig) -> Self {
        Self::new(doc, text).collapse_on_select(config.collapse_on_select)
    }
}

impl<T: Clone + Send + Sync + 'static> Dropdown<T> {
    /// Dropdown with a custom item registry. The root is created detached;
    /// append it with [`Document::append_node`].
    pub fn with_registry(doc: &Document, text: &str, registry: ItemRegistry<T>) -> Self {
        let button_id = id::unique(&["dropdown", "toggle"]);
        let root = doc.create(Element::div().class(component("dropdown", &[])));
        let button = doc.append(
            root,
            Element::button()
                .id(button_id.clone())
                .class(component("dropdown", &["toggle"]))
                .aria("expanded", "false")
                .aria("haspopup", "true"),
        );
        let text = doc.append(
            button,
            Element::span()
                .class(component("dropdown", &["toggle", "text"]))
                .text(text),
        );
        let menu = doc.append(
            root,
            Element::ul()
                .class(component("dropdown", &["menu"]))
                .role("menu")
                .aria("labelledby", button_id)
                .hidden(true),
        );

        let toggle = ToggleController::new();
        let trigger = toggle.clone();
        doc.on(button, EventType::Click, move |doc, _| {
            trigger.expand(doc, root, button, menu);
        });

        Self {
            doc: doc.clone(),
            root,
            button,
            text,
            menu,
            toggle,
            inner: Arc::new(RwLock::new(DropdownInner {
                registry,
                items: Vec::new(),
                rows: Vec::new(),
                collapse_on_select: true,
                on_select: None,
            })),
        }
    }

    // -------------------------------------------------------------------------
    // Items
    // -------------------------------------------------------------------------

    pub fn add(self, item: T) -> Self {
        self.add_item(item);
        self
    }

    pub fn add_all(self, items: impl IntoIterator<Item = T>) -> Self {
        for item in items {
            self.add_item(item);
        }
        self
    }

    pub fn add_separator(self) -> Self {
        let row = self.doc.append(
            self.menu,
            Element::li()
                .role("separator")
                .child(Element::div().class(component("dropdown", &["separator"]))),
        );
        if let Ok(mut guard) = self.inner.write() {
            guard.rows.push(row);
        }
        self
    }

    /// Append one item to the menu.
    pub fn add_item(&self, item: T) {
        let Ok(mut guard) = self.inner.write() else {
            return;
        };
        let item_id = guard.registry.id_of(&item);
        let registry = guard.registry.clone();
        guard.items.push((item_id.clone(), item.clone()));
        let li = self.doc.append(self.menu, Element::li().role("none"));
        guard.rows.push(li);
        drop(guard);

        let entry = self.doc.append(
            li,
            Element::button()
                .class(component("dropdown", &["menu", "item"]))
                .role("menuitem")
                .attr("tabindex", "-1")
                .data(ITEM_DATA, item_id.clone()),
        );
        registry.render_into(&item, &self.doc, entry);
        trace!("Added dropdown item '{item_id}'");

        let (root, button, menu) = (self.root, self.button, self.menu);
        let toggle = self.toggle.clone();
        let inner = Arc::clone(&self.inner);
        self.doc.on(entry, EventType::Click, move |doc, _| {
            let (callback, item, collapse) = match inner.read() {
                Ok(guard) => (
                    guard.on_select.clone(),
                    guard.find(&item_id).cloned(),
                    guard.collapse_on_select,
                ),
                Err(_) => return,
            };
            if collapse {
                toggle.collapse(doc, root, button, menu);
            }
            if let (Some(callback), Some(item)) = (callback, item) {
                callback(&item);
            }
        });
    }

    /// Report `item` to the select callback when `fire` is set.
    pub fn select(&self, item: &T, fire: bool) {
        if !fire {
            return;
        }
        let callback = self
            .inner
            .read()
            .ok()
            .and_then(|guard| guard.on_select.clone());
        if let Some(callback) = callback {
            callback(item);
        }
    }

    /// Re-render the entry for `item`, matched by id.
    pub fn update(&self, item: &T) {
        let Ok(mut guard) = self.inner.write() else {
            return;
        };
        let item_id = guard.registry.id_of(item);
        let Some(slot) = guard.items.iter_mut().find(|(existing, _)| *existing == item_id) else {
            return;
        };
        slot.1 = item.clone();
        let registry = guard.registry.clone();
        drop(guard);

        if let Some(entry) = self.item_element(&item_id) {
            self.doc.remove_children(entry);
            registry.render_into(item, &self.doc, entry);
        }
    }

    pub fn disable_item(&self, item: &T) {
        self.set_item_disabled(item, true);
    }

    pub fn enable_item(&self, item: &T) {
        self.set_item_disabled(item, false);
    }

    fn set_item_disabled(&self, item: &T, disabled: bool) {
        let item_id = match self.inner.read() {
            Ok(guard) => guard.registry.id_of(item),
            Err(_) => return,
        };
        if let Some(entry) = self.item_element(&item_id) {
            self.doc.set_disabled(entry, disabled);
            self.doc.toggle_class(entry, &modifier(DISABLED), disabled);
        }
    }

    /// Show only the items whose label fuzzily matches `query`, best match
    /// first. Separators are hidden while a query is active. A blank query
    /// restores every row in insertion order.
    pub fn filter(&self, query: &str) {
        let (ids, labels, rows): (Vec<String>, Vec<String>, Vec<NodeId>) = match self.inner.read() {
            Ok(guard) => {
                let (ids, labels): (Vec<String>, Vec<String>) = guard
                    .items
                    .iter()
                    .map(|(item_id, item)| (item_id.clone(), guard.registry.label_of(item)))
                    .unzip();
                (ids, labels, guard.rows.clone())
            }
            Err(_) => return,
        };

        let query = query.trim();
        if query.is_empty() {
            for row in rows {
                self.doc.set_hidden(row, false);
                self.doc.append_node(self.menu, row);
            }
            return;
        }

        for row in &rows {
            self.doc.set_hidden(*row, true);
        }
        let matches = fuzzy_filter(query, &labels);
        trace!("Dropdown filter '{query}' kept {} of {}", matches.len(), ids.len());
        for found in matches {
            let row = ids
                .get(found.index)
                .and_then(|item_id| self.item_element(item_id))
                .and_then(|entry| self.doc.parent(entry));
            if let Some(row) = row {
                self.doc.set_hidden(row, false);
                self.doc.append_node(self.menu, row);
            }
        }
    }

    /// Ids of the items currently shown, in menu order.
    pub fn shown_item_ids(&self) -> Vec<String> {
        self.doc
            .find_all(self.menu, &By::data(ITEM_DATA))
            .into_iter()
            .filter(|entry| {
                self.doc
                    .parent(*entry)
                    .is_some_and(|row| !self.doc.is_hidden(row))
            })
            .filter_map(|entry| self.doc.data(entry, ITEM_DATA))
            .collect()
    }

    /// The menu entry carrying `item_id`.
    pub fn item_element(&self, item_id: &str) -> Option<NodeId> {
        self.doc.find(self.menu, &By::data_value(ITEM_DATA, item_id))
    }

    pub fn item_count(&self) -> usize {
        self.inner.read().map(|guard| guard.items.len()).unwrap_or(0)
    }

    // -------------------------------------------------------------------------
    // Display
    // -------------------------------------------------------------------------

    pub fn identifier(self, identify: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.registry.set_identify(identify);
        }
        self
    }

    pub fn format(self, format: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.registry.set_format(format);
        }
        self
    }

    pub fn display(self, render: impl Fn(&T, &Document, NodeId) + Send + Sync + 'static) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.registry.set_render(render);
        }
        self
    }

    /// Replace the toggle text.
    pub fn set_text(&self, text: &str) {
        self.doc.set_text(self.text, text);
    }

    pub fn text(&self) -> String {
        self.doc.text(self.text)
    }

    // -------------------------------------------------------------------------
    // Modifiers
    // -------------------------------------------------------------------------

    /// Open the menu above the toggle.
    pub fn up(self) -> Self {
        self.doc.add_class(self.root, modifier("top"));
        self
    }

    /// Align the menu to the right edge.
    pub fn right(self) -> Self {
        self.doc.add_class(self.menu, modifier("align-right"));
        self
    }

    // -------------------------------------------------------------------------
    // Events and state
    // -------------------------------------------------------------------------

    pub fn on_select(self, callback: impl Fn(&T) + Send + Sync + 'static) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.on_select = Some(Arc::new(callback));
        }
        self
    }

    /// Whether an item click closes the menu. Defaults to `true`.
    pub fn collapse_on_select(self, collapse: bool) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.collapse_on_select = collapse;
        }
        self
    }

    pub fn on_toggle(self, callback: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.toggle.on_toggle(callback);
        self
    }

    pub fn toggle_button(&self) -> NodeId {
        self.button
    }

    pub fn menu(&self) -> NodeId {
        self.menu
    }

    pub fn is_expanded(&self) -> bool {
        self.toggle.is_expanded()
    }

    /// Open the menu. Unlike a click on the toggle this never closes it.
    pub fn expand(&self) {
        self.toggle
            .set_expanded(&self.doc, self.root, self.button, self.menu, true);
    }

    pub fn collapse(&self) {
        self.toggle.collapse(&self.doc, self.root, self.button, self.menu);
    }
}

impl<T> Component for Dropdown<T> {
    fn root(&self) -> NodeId {
        self.root
    }
}

impl<T> Disableable for Dropdown<T> {
    fn disable(&self) {
        self.doc.set_disabled(self.button, true);
    }

    fn enable(&self) {
        self.doc.set_disabled(self.button, false);
    }

    fn is_disabled(&self) -> bool {
        self.doc.is_disabled(self.button)
    }
}
