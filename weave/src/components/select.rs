//! Single and multi select menus.

use std::fmt;
use std::sync::{Arc, RwLock};

use log::debug;
use weavedom::{By, Document, Element, EventType, NodeId};

use crate::classes::{ITEM_DATA, SELECTED, component, modifier};
use crate::config::WeaveConfig;
use crate::id;
use crate::item::ItemRegistry;
use crate::selection::SelectionMode;
use crate::toggle::ToggleController;
use crate::traits::{Component, Disableable, HasValue, HasValues};

type ChangeCallback<T> = Arc<dyn Fn(&T, bool) + Send + Sync>;

struct SelectInner<T> {
    registry: ItemRegistry<T>,
    items: Vec<(String, T)>,
    selected: Vec<String>,
    placeholder: String,
    collapse_on_select: bool,
    on_select: Option<ChangeCallback<T>>,
}

impl<T: Clone> SelectInner<T> {
    fn find(&self, id: &str) -> Option<T> {
        self.items
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, item)| item.clone())
    }

    fn selected_items(&self) -> Vec<T> {
        self.selected.iter().filter_map(|id| self.find(id)).collect()
    }
}

/// Everything a listener needs. Holds no document handle, so listeners
/// stored in the document do not keep it alive.
struct SelectCore<T> {
    mode: SelectionMode,
    root: NodeId,
    button: NodeId,
    text: NodeId,
    menu: NodeId,
    toggle: ToggleController,
    inner: Arc<RwLock<SelectInner<T>>>,
}

impl<T> Clone for SelectCore<T> {
    fn clone(&self) -> Self {
        Self {
            mode: self.mode,
            root: self.root,
            button: self.button,
            text: self.text,
            menu: self.menu,
            toggle: self.toggle.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

/// A select menu in single or multi mode.
///
/// In single mode a click replaces the value and, by default, closes the
/// menu. In multi mode a click toggles the item and the menu stays open.
/// The select callback receives the item and whether it is now selected.
pub struct Select<T> {
    doc: Document,
    core: SelectCore<T>,
}

impl<T> Clone for Select<T> {
    fn clone(&self) -> Self {
        Self {
            doc: self.doc.clone(),
            core: self.core.clone(),
        }
    }
}

impl<T> fmt::Debug for Select<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Select")
            .field("mode", &self.core.mode)
            .field("root", &self.core.root)
            .finish()
    }
}

impl<T: fmt::Display + Clone + Send + Sync + 'static> Select<T> {
    pub fn single(doc: &Document, placeholder: &str) -> Self {
        Self::with_registry(doc, placeholder, SelectionMode::Single, ItemRegistry::new())
    }

    pub fn multi(doc: &Document, placeholder: &str) -> Self {
        Self::with_registry(doc, placeholder, SelectionMode::Multi, ItemRegistry::new())
    }
}

impl<T: Clone + Send + Sync + 'static> Select<T> {
    pub fn with_registry(
        doc: &Document,
        placeholder: &str,
        mode: SelectionMode,
        registry: ItemRegistry<T>,
    ) -> Self {
        let button_id = id::unique(&["select", "toggle"]);
        let root = doc.create(Element::div().class(component("select", &[])));
        let button = doc.append(
            root,
            Element::button()
                .id(button_id.clone())
                .class(component("select", &["toggle"]))
                .aria("expanded", "false")
                .aria("haspopup", "listbox"),
        );
        let text = doc.append(
            button,
            Element::span()
                .class(component("select", &["toggle", "text"]))
                .text(placeholder),
        );
        let menu = doc.append(
            root,
            Element::ul()
                .class(component("select", &["menu"]))
                .role("listbox")
                .aria("labelledby", button_id)
                .hidden(true),
        );
        if mode == SelectionMode::Multi {
            doc.set_aria(menu, "multiselectable", "true");
        }

        let toggle = ToggleController::new();
        let trigger = toggle.clone();
        doc.on(button, EventType::Click, move |doc, _| {
            trigger.expand(doc, root, button, menu);
        });

        Self {
            doc: doc.clone(),
            core: SelectCore {
                mode,
                root,
                button,
                text,
                menu,
                toggle,
                inner: Arc::new(RwLock::new(SelectInner {
                    registry,
                    items: Vec::new(),
                    selected: Vec::new(),
                    placeholder: placeholder.to_string(),
                    collapse_on_select: true,
                    on_select: None,
                })),
            },
        }
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Whether a single select closes after a choice. Multi selects never do.
    pub fn collapse_on_select(self, collapse: bool) -> Self {
        if let Ok(mut guard) = self.core.inner.write() {
            guard.collapse_on_select = collapse;
        }
        self
    }

    pub fn config(self, config: &WeaveConfig) -> Self {
        self.collapse_on_select(config.collapse_on_select)
    }

    pub fn format(self, format: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        if let Ok(mut guard) = self.core.inner.write() {
            guard.registry.set_format(format);
        }
        self
    }

    pub fn display(self, render: impl Fn(&T, &Document, NodeId) + Send + Sync + 'static) -> Self {
        if let Ok(mut guard) = self.core.inner.write() {
            guard.registry.set_render(render);
        }
        self
    }

    pub fn on_select(self, callback: impl Fn(&T, bool) + Send + Sync + 'static) -> Self {
        if let Ok(mut guard) = self.core.inner.write() {
            guard.on_select = Some(Arc::new(callback));
        }
        self
    }

    pub fn on_toggle(self, callback: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.core.toggle.on_toggle(callback);
        self
    }

    pub fn up(self) -> Self {
        self.doc.add_class(self.core.root, modifier("top"));
        self
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

    pub fn add_item(&self, item: T) {
        let Ok(mut guard) = self.core.inner.write() else {
            return;
        };
        let item_id = guard.registry.id_of(&item);
        let registry = guard.registry.clone();
        guard.items.push((item_id.clone(), item.clone()));
        drop(guard);

        let li = self
            .doc
            .append(self.core.menu, Element::li().role("presentation"));
        let entry = self.doc.append(
            li,
            Element::button()
                .class(component("select", &["menu", "item"]))
                .role("option")
                .aria("selected", "false")
                .data(ITEM_DATA, item_id.clone()),
        );
        registry.render_into(&item, &self.doc, entry);

        let core = self.core.clone();
        self.doc.on(entry, EventType::Click, move |doc, _| {
            core.on_item_click(doc, &item_id);
        });
    }

    /// Select `item`. Unknown items are ignored.
    pub fn select(&self, item: &T, fire: bool) {
        self.core.choose(&self.doc, item, true, fire);
    }

    pub fn deselect(&self, item: &T, fire: bool) {
        self.core.choose(&self.doc, item, false, fire);
    }

    /// Drop the whole selection without firing callbacks.
    pub fn clear(&self) {
        self.core.clear(&self.doc);
    }

    pub fn item_element(&self, item: &T) -> Option<NodeId> {
        let item_id = self.core.inner.read().ok()?.registry.id_of(item);
        self.doc
            .find(self.core.menu, &By::data_value(ITEM_DATA, item_id))
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    pub fn mode(&self) -> SelectionMode {
        self.core.mode
    }

    pub fn toggle_button(&self) -> NodeId {
        self.core.button
    }

    pub fn menu(&self) -> NodeId {
        self.core.menu
    }

    pub fn text(&self) -> String {
        self.doc.text(self.core.text)
    }

    pub fn is_expanded(&self) -> bool {
        self.core.toggle.is_expanded()
    }
}

impl<T: Clone + Send + Sync + 'static> SelectCore<T> {
    fn on_item_click(&self, doc: &Document, item_id: &str) {
        let (item, was_selected, collapse) = match self.inner.read() {
            Ok(guard) => (
                guard.find(item_id),
                guard.selected.iter().any(|id| id == item_id),
                guard.collapse_on_select,
            ),
            Err(_) => return,
        };
        let Some(item) = item else {
            return;
        };
        match self.mode {
            SelectionMode::Single => {
                if collapse {
                    self.toggle.collapse(doc, self.root, self.button, self.menu);
                }
                self.choose(doc, &item, true, true);
            }
            SelectionMode::Multi => self.choose(doc, &item, !was_selected, true),
        }
    }

    fn choose(&self, doc: &Document, item: &T, selected: bool, fire: bool) {
        let callback = {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            let item_id = guard.registry.id_of(item);
            if guard.find(&item_id).is_none() {
                return;
            }
            let present = guard.selected.contains(&item_id);
            match (self.mode, selected) {
                (SelectionMode::Single, true) => guard.selected = vec![item_id],
                (SelectionMode::Multi, true) if !present => guard.selected.push(item_id),
                (_, false) if present => guard.selected.retain(|id| *id != item_id),
                _ => {}
            }
            guard.on_select.clone()
        };
        self.refresh(doc);
        if fire && let Some(callback) = callback {
            callback(item, selected);
        }
    }

    fn clear(&self, doc: &Document) {
        if let Ok(mut guard) = self.inner.write() {
            guard.selected.clear();
        }
        self.refresh(doc);
    }

    /// Sync check marks, aria state and the toggle text with the selection.
    fn refresh(&self, doc: &Document) {
        let (selected, text) = match self.inner.read() {
            Ok(guard) => {
                let text = match (self.mode, guard.selected.as_slice()) {
                    (_, []) => guard.placeholder.clone(),
                    (SelectionMode::Single, [id]) => guard
                        .find(id)
                        .map(|item| guard.registry.label_of(&item))
                        .unwrap_or_else(|| guard.placeholder.clone()),
                    (_, ids) => format!("{} ({})", guard.placeholder, ids.len()),
                };
                (guard.selected.clone(), text)
            }
            Err(_) => return,
        };

        let check = component("select", &["menu", "item", "icon"]);
        for entry in doc.find_all(self.menu, &By::data(ITEM_DATA)) {
            let is_selected = doc
                .data(entry, ITEM_DATA)
                .is_some_and(|id| selected.contains(&id));
            doc.toggle_class(entry, &modifier(SELECTED), is_selected);
            doc.set_aria(entry, "selected", if is_selected { "true" } else { "false" });
            let icon = doc.find(entry, &By::classname(check.clone()));
            match (is_selected, icon) {
                (true, None) => {
                    doc.append(
                        entry,
                        Element::span().class(check.clone()).aria("hidden", "true"),
                    );
                }
                (false, Some(icon)) => doc.remove(icon),
                _ => {}
            }
        }
        doc.set_text(self.text, text);
        debug!("Select {} now has {} selected", self.root, selected.len());
    }

    fn selected_items(&self) -> Vec<T> {
        self.inner
            .read()
            .map(|guard| guard.selected_items())
            .unwrap_or_default()
    }
}

impl<T> Component for Select<T> {
    fn root(&self) -> NodeId {
        self.core.root
    }
}

impl<T> Disableable for Select<T> {
    fn disable(&self) {
        self.doc.set_disabled(self.core.button, true);
    }

    fn enable(&self) {
        self.doc.set_disabled(self.core.button, false);
    }

    fn is_disabled(&self) -> bool {
        self.doc.is_disabled(self.core.button)
    }
}

impl<T: Clone + Send + Sync + 'static> HasValue<T> for Select<T> {
    /// The first selected item.
    fn value(&self) -> Option<T> {
        self.core.selected_items().into_iter().next()
    }

    fn set_value(&self, value: Option<T>, fire: bool) {
        match value {
            Some(item) => {
                if self.core.mode == SelectionMode::Multi {
                    self.clear();
                }
                self.select(&item, fire);
            }
            None => self.clear(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> HasValues<T> for Select<T> {
    fn values(&self) -> Vec<T> {
        self.core.selected_items()
    }

    /// In single mode only the last value is kept.
    fn set_values(&self, values: Vec<T>, fire: bool) {
        self.clear();
        for item in &values {
            self.select(item, fire);
        }
    }
}
