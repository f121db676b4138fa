//! Data list: one row per item, optional checkbox and expandable content.

use std::fmt;
use std::sync::{Arc, RwLock};

use log::debug;
use weavedom::{By, Document, Element, EventType, NodeId, Registration};

use crate::classes::{EXPANDED, ITEM_DATA, SELECTED, component, modifier};
use crate::data::{DataSource, PageInfo, PagedDisplay, SelectionInfo, SortInfo};
use crate::id;
use crate::selection::{SelectionBinder, closest_item_id};
use crate::traits::Component;

/// Renders an item into a prepared container node.
pub type RowDisplay<T> = Arc<dyn Fn(&T, &Document, NodeId) + Send + Sync>;

fn select_item_selector() -> By {
    By::classname(component("data-list", &["check"]))
        .desc(By::element("input").and(By::attribute_value("type", "checkbox")))
}

fn toggle_selector() -> By {
    By::classname(component("data-list", &["toggle"])).desc(By::element("button"))
}

fn expandable_selector() -> By {
    By::classname(component("data-list", &["expandable", "content"]))
}

struct DataListInner<T> {
    display: RowDisplay<T>,
    expandable: Option<RowDisplay<T>>,
    selectable: bool,
    binder: SelectionBinder,
    expand_handler: Option<Registration>,
}

/// A [`PagedDisplay`] rendering items as a list of rows.
///
/// Every `show_items` drops the previous rows together with their checkbox
/// and expand listeners before rendering the new page.
pub struct DataList<T> {
    doc: Document,
    root: NodeId,
    source: Arc<dyn DataSource<T>>,
    inner: Arc<RwLock<DataListInner<T>>>,
}

impl<T> Clone for DataList<T> {
    fn clone(&self) -> Self {
        Self {
            doc: self.doc.clone(),
            root: self.root,
            source: Arc::clone(&self.source),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for DataList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataList").field("root", &self.root).finish()
    }
}

impl<T: Send + Sync + 'static> DataList<T> {
    pub fn new(
        doc: &Document,
        source: Arc<dyn DataSource<T>>,
        display: impl Fn(&T, &Document, NodeId) + Send + Sync + 'static,
    ) -> Self {
        let root = doc.create(
            Element::ul()
                .class(component("data-list", &[]))
                .role("list"),
        );
        Self {
            doc: doc.clone(),
            root,
            source,
            inner: Arc::new(RwLock::new(DataListInner {
                display: Arc::new(display),
                expandable: None,
                selectable: false,
                binder: SelectionBinder::new(root),
                expand_handler: None,
            })),
        }
    }

    /// Render a checkbox per row, wired to the data source selection.
    pub fn selectable(self) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.selectable = true;
        }
        self
    }

    /// Give each row a toggle revealing content rendered by `display`.
    pub fn expandable(self, display: impl Fn(&T, &Document, NodeId) + Send + Sync + 'static) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.expandable = Some(Arc::new(display));
        }
        self
    }

    pub fn compact(self) -> Self {
        self.doc.add_class(self.root, modifier("compact"));
        self
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// The row element for `item_id` on the current page.
    pub fn row(&self, item_id: &str) -> Option<NodeId> {
        self.doc.find(self.root, &By::data_value(ITEM_DATA, item_id))
    }

    pub fn rows(&self) -> Vec<NodeId> {
        self.doc
            .children(self.root)
            .into_iter()
            .filter(|node| self.doc.data(*node, ITEM_DATA).is_some())
            .collect()
    }

    pub fn checkbox(&self, item_id: &str) -> Option<NodeId> {
        let row = self.row(item_id)?;
        self.doc.find(row, &select_item_selector())
    }

    pub fn toggle_button(&self, item_id: &str) -> Option<NodeId> {
        let row = self.row(item_id)?;
        self.doc.find(row, &toggle_selector())
    }

    pub fn is_row_expanded(&self, item_id: &str) -> bool {
        self.row(item_id)
            .is_some_and(|row| self.doc.has_class(row, &modifier(EXPANDED)))
    }

    /// Expand or collapse the content of one row.
    pub fn toggle_row(&self, item_id: &str) {
        if let Some(row) = self.row(item_id) {
            toggle_row(&self.doc, row);
        }
    }

    fn render_row(
        &self,
        item: &T,
        display: &RowDisplay<T>,
        expandable: Option<&RowDisplay<T>>,
        selectable: bool,
    ) {
        let doc = &self.doc;
        let item_id = self.source.id_of(item);
        let row_id = id::build(&["data-list", item_id.as_str()]);
        let label_id = id::build(&[row_id.as_str(), "label"]);

        let li = doc.append(
            self.root,
            Element::li()
                .id(row_id.clone())
                .class(component("data-list", &["item"]))
                .aria("labelledby", label_id.clone())
                .data(ITEM_DATA, item_id),
        );
        let row = doc.append(li, Element::div().class(component("data-list", &["item", "row"])));
        let control = doc.append(
            row,
            Element::div().class(component("data-list", &["item", "control"])),
        );

        let content_id = id::build(&[row_id.as_str(), "content"]);
        if expandable.is_some() {
            let toggle = doc.append(control, Element::div().class(component("data-list", &["toggle"])));
            doc.append(
                toggle,
                Element::button()
                    .aria("expanded", "false")
                    .aria("controls", content_id.clone())
                    .aria("label", "Details"),
            );
        }
        if selectable {
            let check = doc.append(control, Element::div().class(component("data-list", &["check"])));
            doc.append(
                check,
                Element::checkbox()
                    .id(id::build(&[row_id.as_str(), "check"]))
                    .aria("labelledby", label_id.clone()),
            );
        }

        let cells = doc.append(
            row,
            Element::div()
                .id(label_id)
                .class(component("data-list", &["item", "content"])),
        );
        display(item, doc, cells);

        if let Some(expandable) = expandable {
            let section = doc.append(
                li,
                Element::section()
                    .id(content_id)
                    .class(component("data-list", &["expandable", "content"]))
                    .hidden(true),
            );
            let body = doc.append(
                section,
                Element::div().class(component("data-list", &["expandable", "content", "body"])),
            );
            expandable(item, doc, body);
        }
    }

    fn bind_expand_handler(&self) -> Registration {
        let registrations: Vec<Registration> = self
            .doc
            .find_all(self.root, &toggle_selector())
            .into_iter()
            .map(|button| {
                self.doc.on(button, EventType::Click, |doc, event| {
                    if let Some(row) = doc.closest(event.target(), &By::data(ITEM_DATA)) {
                        toggle_row(doc, row);
                    }
                })
            })
            .collect();
        Registration::compose(registrations)
    }
}

fn toggle_row(doc: &Document, row: NodeId) {
    let expanded = !doc.has_class(row, &modifier(EXPANDED));
    doc.toggle_class(row, &modifier(EXPANDED), expanded);
    if let Some(button) = doc.find(row, &toggle_selector()) {
        doc.set_aria(button, "expanded", expanded.to_string());
    }
    if let Some(section) = doc.find(row, &expandable_selector()) {
        doc.set_hidden(section, !expanded);
    }
}

impl<T: Send + Sync + 'static> PagedDisplay<T> for DataList<T> {
    fn show_items(&self, items: &[T], _page_info: &PageInfo) {
        let (display, expandable, selectable) = match self.inner.write() {
            Ok(mut guard) => {
                guard.binder.remove_select_handler();
                if let Some(mut registration) = guard.expand_handler.take() {
                    registration.remove();
                }
                (
                    Arc::clone(&guard.display),
                    guard.expandable.clone(),
                    guard.selectable,
                )
            }
            Err(_) => return,
        };

        self.doc.remove_children(self.root);
        for item in items {
            self.render_row(item, &display, expandable.as_ref(), selectable);
        }

        let expand_handler = expandable.is_some().then(|| self.bind_expand_handler());
        if let Ok(mut guard) = self.inner.write() {
            if selectable {
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
            guard.expand_handler = expand_handler;
        }
        debug!("Data list {} shows {} rows", self.root, items.len());
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
            if let Some(row) = self.row(&item_id) {
                self.doc.toggle_class(row, &modifier(SELECTED), selected);
            }
        }
    }

    fn update_sort_info(&self, _sort_info: &SortInfo<T>) {}
}

impl<T> Component for DataList<T> {
    fn root(&self) -> NodeId {
        self.root
    }
}
