//! Data table with sortable columns.

use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, RwLock};

use log::debug;
use weavedom::{By, Document, Element, EventType, NodeId};

use super::data_list::RowDisplay;
use crate::classes::{ITEM_DATA, SELECTED, SORT_DATA, component, modifier};
use crate::data::{Comparator, DataSource, PageInfo, PagedDisplay, SelectionInfo, SortInfo};
use crate::selection::{SelectionBinder, closest_item_id};
use crate::traits::Component;

fn select_item_selector() -> By {
    By::classname(component("table", &["check"]))
        .desc(By::element("input").and(By::attribute_value("type", "checkbox")))
}

/// One table column.
pub struct Column<T> {
    id: String,
    title: String,
    cell: RowDisplay<T>,
    comparator: Option<Comparator<T>>,
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            cell: Arc::clone(&self.cell),
            comparator: self.comparator.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("sortable", &self.comparator.is_some())
            .finish()
    }
}

impl<T> Column<T> {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        cell: impl Fn(&T, &Document, NodeId) + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            cell: Arc::new(cell),
            comparator: None,
        }
    }

    /// Column showing `text(item)`.
    pub fn text(
        id: impl Into<String>,
        title: impl Into<String>,
        text: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self::new(id, title, move |item, doc, cell| doc.set_text(cell, text(item)))
    }

    /// Make the column sortable. `comparator` describes ascending order.
    pub fn sortable(mut self, comparator: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
        self.comparator = Some(Arc::new(comparator));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_sortable(&self) -> bool {
        self.comparator.is_some()
    }
}

struct DataTableInner<T> {
    columns: Vec<Column<T>>,
    selectable: bool,
    binder: SelectionBinder,
    /// Active criterion and direction as last reported by the source.
    sort: Option<(String, bool)>,
}

/// A [`PagedDisplay`] rendering items as table rows.
///
/// Clicking a sortable header asks the data source to sort by that column,
/// ascending first and flipping direction on each further click.
pub struct DataTable<T> {
    doc: Document,
    root: NodeId,
    header: NodeId,
    body: NodeId,
    source: Arc<dyn DataSource<T>>,
    inner: Arc<RwLock<DataTableInner<T>>>,
}

impl<T> Clone for DataTable<T> {
    fn clone(&self) -> Self {
        Self {
            doc: self.doc.clone(),
            root: self.root,
            header: self.header,
            body: self.body,
            source: Arc::clone(&self.source),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for DataTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable").field("root", &self.root).finish()
    }
}

impl<T: Send + Sync + 'static> DataTable<T> {
    pub fn new(doc: &Document, source: Arc<dyn DataSource<T>>) -> Self {
        let root = doc.create(Element::table().class(component("table", &[])).role("grid"));
        let thead = doc.append(root, Element::thead());
        let header = doc.append(thead, Element::tr());
        let body = doc.append(root, Element::tbody());
        Self {
            doc: doc.clone(),
            root,
            header,
            body,
            source,
            inner: Arc::new(RwLock::new(DataTableInner {
                columns: Vec::new(),
                selectable: false,
                binder: SelectionBinder::new(body),
                sort: None,
            })),
        }
    }

    /// Add a checkbox column wired to the data source selection. Call before
    /// adding columns so the header lines up.
    pub fn selectable(self) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            if !guard.selectable {
                self.doc
                    .append(self.header, Element::th().class(component("table", &["check"])));
            }
            guard.selectable = true;
        }
        self
    }

    pub fn column(self, column: Column<T>) -> Self {
        let th = self.doc.append(
            self.header,
            Element::th()
                .role("columnheader")
                .data(SORT_DATA, column.id.clone()),
        );
        if let Some(comparator) = &column.comparator {
            self.doc.add_class(th, component("table", &["sort"]));
            self.doc.set_aria(th, "sort", "none");
            let button = self.doc.append(th, Element::button().text(column.title.clone()));
            self.bind_sort(button, &column.id, Arc::clone(comparator));
        } else {
            self.doc.set_text(th, column.title.clone());
        }
        if let Ok(mut guard) = self.inner.write() {
            guard.columns.push(column);
        }
        self
    }

    fn bind_sort(&self, button: NodeId, column_id: &str, comparator: Comparator<T>) {
        let source = Arc::clone(&self.source);
        let inner = Arc::clone(&self.inner);
        let column_id = column_id.to_string();
        self.doc.on(button, EventType::Click, move |_, _| {
            let ascending = match inner.read() {
                Ok(guard) => match &guard.sort {
                    Some((active, ascending)) if *active == column_id => !ascending,
                    _ => true,
                },
                Err(_) => return,
            };
            debug!("Sorting by '{column_id}', ascending: {ascending}");
            source.sort(SortInfo::with_comparator(
                column_id.clone(),
                Arc::clone(&comparator),
                ascending,
            ));
        });
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// The header cell for `column_id`.
    pub fn header_cell(&self, column_id: &str) -> Option<NodeId> {
        self.doc
            .find(self.header, &By::data_value(SORT_DATA, column_id))
    }

    /// The clickable sort button in a sortable header.
    pub fn sort_button(&self, column_id: &str) -> Option<NodeId> {
        let th = self.header_cell(column_id)?;
        self.doc.find(th, &By::element("button"))
    }

    pub fn row(&self, item_id: &str) -> Option<NodeId> {
        self.doc.find(self.body, &By::data_value(ITEM_DATA, item_id))
    }

    pub fn rows(&self) -> Vec<NodeId> {
        self.doc.children(self.body)
    }

    pub fn checkbox(&self, item_id: &str) -> Option<NodeId> {
        let row = self.row(item_id)?;
        self.doc.find(row, &select_item_selector())
    }
}

impl<T: Send + Sync + 'static> PagedDisplay<T> for DataTable<T> {
    fn show_items(&self, items: &[T], _page_info: &PageInfo) {
        let (columns, selectable) = match self.inner.write() {
            Ok(mut guard) => {
                guard.binder.remove_select_handler();
                (guard.columns.clone(), guard.selectable)
            }
            Err(_) => return,
        };

        self.doc.remove_children(self.body);
        for item in items {
            let tr = self.doc.append(
                self.body,
                Element::tr().data(ITEM_DATA, self.source.id_of(item)),
            );
            if selectable {
                let td = self
                    .doc
                    .append(tr, Element::td().class(component("table", &["check"])));
                self.doc
                    .append(td, Element::checkbox().aria("label", "Select row"));
            }
            for column in &columns {
                let td = self.doc.append(tr, Element::td().data("label", column.title.clone()));
                (column.cell)(item, &self.doc, td);
            }
        }

        if selectable && let Ok(mut guard) = self.inner.write() {
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
            if let Some(row) = self.row(&item_id) {
                self.doc.toggle_class(row, &modifier(SELECTED), selected);
            }
        }
    }

    /// Mark the active column with its direction and reset every other
    /// sortable header.
    fn update_sort_info(&self, sort_info: &SortInfo<T>) {
        let active = sort_info
            .criterion_id()
            .map(|criterion| (criterion.to_string(), sort_info.is_ascending()));
        for th in self.doc.find_all(self.header, &By::data(SORT_DATA)) {
            if !self.doc.has_class(th, &component("table", &["sort"])) {
                continue;
            }
            let column_id = self.doc.data(th, SORT_DATA);
            let direction = match &active {
                Some((criterion, ascending)) if column_id.as_deref() == Some(criterion.as_str()) => {
                    if *ascending { "ascending" } else { "descending" }
                }
                _ => "none",
            };
            self.doc.set_aria(th, "sort", direction);
            self.doc
                .toggle_class(th, &modifier(SELECTED), direction != "none");
        }
        if let Ok(mut guard) = self.inner.write() {
            guard.sort = active;
        }
    }
}

impl<T> Component for DataTable<T> {
    fn root(&self) -> NodeId {
        self.root
    }
}
