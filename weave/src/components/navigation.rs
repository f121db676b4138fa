//! Expandable navigation section.

use std::fmt;
use std::sync::{Arc, RwLock};

use weavedom::{By, Document, Element, EventType, NodeId};

use crate::classes::{component, modifier};
use crate::id;
use crate::toggle::ToggleController;
use crate::traits::Component;

/// Data key carrying the item id on navigation links.
const NAV_ITEM: &str = "nav-item";

type ItemCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// A titled, collapsible group of navigation links.
///
/// The title link toggles the section. Clicking a link marks it current and
/// reports its id.
#[derive(Clone)]
pub struct NavigationGroup {
    doc: Document,
    root: NodeId,
    link: NodeId,
    section: NodeId,
    list: NodeId,
    toggle: ToggleController,
    on_item_click: Arc<RwLock<Option<ItemCallback>>>,
}

impl fmt::Debug for NavigationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationGroup")
            .field("root", &self.root)
            .field("expanded", &self.toggle.is_expanded())
            .finish()
    }
}

impl NavigationGroup {
    pub fn new(doc: &Document, title: &str) -> Self {
        let link_id = id::unique(&["nav", "group", title]);
        let root = doc.create(
            Element::li()
                .class(component("nav", &["item"]))
                .class(modifier("expandable")),
        );
        let link = doc.append(
            root,
            Element::button()
                .id(link_id.clone())
                .class(component("nav", &["link"]))
                .aria("expanded", "false")
                .text(title),
        );
        let section = doc.append(
            root,
            Element::section()
                .class(component("nav", &["subnav"]))
                .aria("labelledby", link_id)
                .hidden(true),
        );
        let list = doc.append(
            section,
            Element::ul().class(component("nav", &["simple", "list"])),
        );

        let toggle = ToggleController::new();
        let trigger = toggle.clone();
        doc.on(link, EventType::Click, move |doc, _| {
            trigger.expand(doc, root, link, section);
        });

        Self {
            doc: doc.clone(),
            root,
            link,
            section,
            list,
            toggle,
            on_item_click: Arc::new(RwLock::new(None)),
        }
    }

    /// Initial state.
    pub fn expanded(self, expanded: bool) -> Self {
        self.toggle
            .set_expanded(&self.doc, self.root, self.link, self.section, expanded);
        self
    }

    pub fn on_toggle(self, callback: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.toggle.on_toggle(callback);
        self
    }

    pub fn on_item_click(self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        if let Ok(mut guard) = self.on_item_click.write() {
            *guard = Some(Arc::new(callback));
        }
        self
    }

    pub fn add_item(self, item_id: &str, text: &str) -> Self {
        let li = self
            .doc
            .append(self.list, Element::li().class(component("nav", &["item"])));
        let anchor = self.doc.append(
            li,
            Element::new("a")
                .class(component("nav", &["link"]))
                .data(NAV_ITEM, item_id)
                .text(text),
        );

        let list = self.list;
        let callback = Arc::clone(&self.on_item_click);
        let item_id = item_id.to_string();
        self.doc.on(anchor, EventType::Click, move |doc, _| {
            mark_current(doc, list, &item_id);
            let callback = callback.read().ok().and_then(|guard| guard.clone());
            if let Some(callback) = callback {
                callback(&item_id);
            }
        });
        self
    }

    /// Mark `item_id` current without reporting it.
    pub fn select(&self, item_id: &str) {
        mark_current(&self.doc, self.list, item_id);
    }

    /// The id of the current link, if any.
    pub fn current(&self) -> Option<String> {
        self.doc
            .find(self.list, &By::classname(modifier("current")))
            .and_then(|anchor| self.doc.data(anchor, NAV_ITEM))
    }

    pub fn is_expanded(&self) -> bool {
        self.toggle.is_expanded()
    }

    pub fn expand(&self) {
        self.toggle
            .set_expanded(&self.doc, self.root, self.link, self.section, true);
    }

    pub fn collapse(&self) {
        self.toggle
            .collapse(&self.doc, self.root, self.link, self.section);
    }

    pub fn link(&self) -> NodeId {
        self.link
    }

    pub fn item_element(&self, item_id: &str) -> Option<NodeId> {
        self.doc
            .find(self.list, &By::data_value(NAV_ITEM, item_id))
    }
}

fn mark_current(doc: &Document, list: NodeId, item_id: &str) {
    let current = modifier("current");
    for anchor in doc.find_all(list, &By::data(NAV_ITEM)) {
        let is_current = doc.data(anchor, NAV_ITEM).as_deref() == Some(item_id);
        doc.toggle_class(anchor, &current, is_current);
        if is_current {
            doc.set_aria(anchor, "current", "page");
        } else {
            doc.remove_attr(anchor, "aria-current");
        }
    }
}

impl Component for NavigationGroup {
    fn root(&self) -> NodeId {
        self.root
    }
}
