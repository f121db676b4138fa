//! Card gallery.

use std::fmt;
use std::sync::{Arc, RwLock};

use weavedom::{By, Document, Element, NodeId};

use super::data_list::RowDisplay;
use crate::classes::{ITEM_DATA, SELECTED, component, modifier};
use crate::data::{DataSource, PageInfo, PagedDisplay, SelectionInfo, SortInfo};
use crate::selection::{SelectionBinder, closest_item_id};
use crate::traits::Component;

fn select_item_selector() -> By {
    By::classname(component("card", &["head"]))
        .desc(By::classname(component("card", &["actions"])))
        .desc(By::element("input").and(By::attribute_value("type", "checkbox")))
}

struct CardViewInner<T> {
    display: RowDisplay<T>,
    binder: SelectionBinder,
}

/// A [`PagedDisplay`] rendering one selectable card per item.
pub struct CardView<T> {
    doc: Document,
    root: NodeId,
    source: Arc<dyn DataSource<T>>,
    inner: Arc<RwLock<CardViewInner<T>>>,
}

impl<T> Clone for CardView<T> {
    fn clone(&self) -> Self {
        Self {
            doc: self.doc.clone(),
            root: self.root,
            source: Arc::clone(&self.source),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for CardView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardView").field("root", &self.root).finish()
    }
}

impl<T: Send + Sync + 'static> CardView<T> {
    /// `display` renders the card body.
    pub fn new(
        doc: &Document,
        source: Arc<dyn DataSource<T>>,
        display: impl Fn(&T, &Document, NodeId) + Send + Sync + 'static,
    ) -> Self {
        let root = doc.create(
            Element::div()
                .class("pf-l-gallery")
                .class(modifier("gutter")),
        );
        Self {
            doc: doc.clone(),
            root,
            source,
            inner: Arc::new(RwLock::new(CardViewInner {
                display: Arc::new(display),
                binder: SelectionBinder::new(root),
            })),
        }
    }

    pub fn card(&self, item_id: &str) -> Option<NodeId> {
        self.doc.find(self.root, &By::data_value(ITEM_DATA, item_id))
    }

    pub fn cards(&self) -> Vec<NodeId> {
        self.doc.children(self.root)
    }

    pub fn checkbox(&self, item_id: &str) -> Option<NodeId> {
        let card = self.card(item_id)?;
        self.doc.find(card, &select_item_selector())
    }
}

impl<T: Send + Sync + 'static> PagedDisplay<T> for CardView<T> {
    fn show_items(&self, items: &[T], _page_info: &PageInfo) {
        let display = match self.inner.write() {
            Ok(mut guard) => {
                guard.binder.remove_select_handler();
                Arc::clone(&guard.display)
            }
            Err(_) => return,
        };

        self.doc.remove_children(self.root);
        for item in items {
            let card = self.doc.append(
                self.root,
                Element::div()
                    .class(component("card", &[]))
                    .class(modifier("selectable"))
                    .data(ITEM_DATA, self.source.id_of(item)),
            );
            let head = self
                .doc
                .append(card, Element::div().class(component("card", &["head"])));
            let actions = self
                .doc
                .append(head, Element::div().class(component("card", &["actions"])));
            self.doc
                .append(actions, Element::checkbox().aria("label", "Select card"));
            let body = self
                .doc
                .append(card, Element::div().class(component("card", &["body"])));
            display(item, &self.doc, body);
        }

        if let Ok(mut guard) = self.inner.write() {
            let source = Arc::clone(&self.source);
            guard.binder.bind_select_handler(
                &self.doc,
                &select_item_selector(),
                closest_item_id,
                move |item_id, selected| {
                    if let Some(item) = source.item(item_id) {
                        source.select(&item, selected);
                    }
                },
            );
        }
    }

    fn update_selection(&self, selection: &SelectionInfo<T>) {
        let Ok(guard) = self.inner.read() else {
            return;
        };
        for item in self.source.visible_items() {
            let item_id = self.source.id_of(&item);
            let selected = selection.is_selected(&item);
            let selector = By::data_value(ITEM_DATA, item_id.clone()).desc(select_item_selector());
            guard.binder.update_selection(&self.doc, &selector, selected);
            if let Some(card) = self.card(&item_id) {
                self.doc.toggle_class(card, &modifier(SELECTED), selected);
            }
        }
    }

    fn update_sort_info(&self, _sort_info: &SortInfo<T>) {}
}

impl<T> Component for CardView<T> {
    fn root(&self) -> NodeId {
        self.root
    }
}
