//! Toolbar for paged data: bulk selection, text filter and pagination.

use std::fmt;
use std::sync::{Arc, RwLock};

use log::debug;
use weavedom::{Document, Element, EventType, NodeId};

use super::{Dropdown, Pagination};
use crate::classes::{component, modifier};
use crate::config::WeaveConfig;
use crate::data::{DataSource, PageInfo, PagedDisplay, SelectionInfo, SortInfo, fuzzy_matches};
use crate::item::FormatFn;
use crate::toggle::ToggleController;
use crate::traits::{Component, Disableable};

/// Filter key used for the text filter.
pub const TEXT_FILTER: &str = "text";

/// Entries of the bulk-select menu, carrying the item counts they show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkSelect {
    None,
    Page(usize),
    All(usize),
}

impl BulkSelect {
    fn id(&self) -> &'static str {
        match self {
            Self::None => "select-none",
            Self::Page(_) => "select-page",
            Self::All(_) => "select-all",
        }
    }
}

impl fmt::Display for BulkSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "Select none (0 items)"),
            Self::Page(count) => write!(f, "Select page ({count} items)"),
            Self::All(count) => write!(f, "Select all ({count} items)"),
        }
    }
}

#[derive(Clone, Copy)]
struct FilterGroup {
    group: NodeId,
    button: NodeId,
    content: NodeId,
    input: NodeId,
}

struct ToolbarInner<T> {
    label: Option<FormatFn<T>>,
    filter: Option<FilterGroup>,
}

/// A [`PagedDisplay`] that drives its data source instead of rendering
/// items: bulk selection, a collapsible text filter and pagination.
pub struct Toolbar<T> {
    doc: Document,
    root: NodeId,
    content: NodeId,
    bulk: Dropdown<BulkSelect>,
    checkbox: NodeId,
    selected: NodeId,
    pagination: Pagination,
    filter_toggle: ToggleController,
    source: Arc<dyn DataSource<T>>,
    inner: Arc<RwLock<ToolbarInner<T>>>,
}

impl<T> Clone for Toolbar<T> {
    fn clone(&self) -> Self {
        Self {
            doc: self.doc.clone(),
            root: self.root,
            content: self.content,
            bulk: self.bulk.clone(),
            checkbox: self.checkbox,
            selected: self.selected,
            pagination: self.pagination.clone(),
            filter_toggle: self.filter_toggle.clone(),
            source: Arc::clone(&self.source),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Toolbar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolbar").field("root", &self.root).finish()
    }
}

impl<T: Send + Sync + 'static> Toolbar<T> {
    pub fn new(doc: &Document, source: Arc<dyn DataSource<T>>) -> Self {
        Self::with_config(doc, source, &WeaveConfig::default())
    }

    pub fn with_config(doc: &Document, source: Arc<dyn DataSource<T>>, config: &WeaveConfig) -> Self {
        let root = doc.create(Element::div().class(component("toolbar", &[])));
        let content = doc.append(root, Element::div().class(component("toolbar", &["content"])));

        // Bulk select
        let bulk_item = doc.append(
            content,
            Element::div()
                .class(component("toolbar", &["item"]))
                .class(modifier("bulk-select")),
        );
        let checkbox = doc.append(
            bulk_item,
            Element::checkbox().aria("label", "Select all").aria("checked", "false"),
        );

        let bulk_source = Arc::clone(&source);
        let bulk = Dropdown::new(doc, "")
            .identifier(|option: &BulkSelect| option.id().to_string())
            .add(BulkSelect::None)
            .add(BulkSelect::Page(0))
            .add(BulkSelect::All(0))
            .on_select(move |option| match option {
                BulkSelect::None => bulk_source.clear_all_selection(),
                BulkSelect::Page(_) => bulk_source.select_visible(),
                BulkSelect::All(_) => bulk_source.select_all(),
            });
        doc.append_node(bulk_item, bulk.root());
        let selected = doc.append(
            bulk_item,
            Element::span().class(component("toolbar", &["selected"])),
        );

        // The source skips notifying when it ignores the request, so the
        // checkbox is resynced from the source afterwards.
        let checkbox_source = Arc::clone(&source);
        doc.on(checkbox, EventType::Click, move |doc, event| {
            if doc.is_checked(event.target()) {
                checkbox_source.select_all();
            } else {
                checkbox_source.clear_all_selection();
            }
            show_selection(
                doc,
                checkbox,
                selected,
                &checkbox_source.selection_info(),
                checkbox_source.page_info().total(),
            );
        });

        // Pagination
        let pagination_item = doc.append(
            content,
            Element::div()
                .class(component("toolbar", &["item"]))
                .class(modifier("pagination")),
        );
        let pagination = wire_pagination(Pagination::with_config(doc, config), &source);
        doc.append_node(pagination_item, pagination.root());

        Self {
            doc: doc.clone(),
            root,
            content,
            bulk,
            checkbox,
            selected,
            pagination,
            filter_toggle: ToggleController::new(),
            source,
            inner: Arc::new(RwLock::new(ToolbarInner {
                label: None,
                filter: None,
            })),
        }
    }

    /// Add a collapsible text filter matching `label(item)` fuzzily.
    pub fn text_filter(self, label: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        let built = match self.inner.write() {
            Ok(mut guard) => {
                guard.label = Some(Arc::new(label));
                guard.filter.is_some()
            }
            Err(_) => true,
        };
        if built {
            return self;
        }

        let doc = &self.doc;
        let group = doc.append(
            self.content,
            Element::div()
                .class(component("toolbar", &["group"]))
                .class(modifier("toggle-group")),
        );
        let toggle = doc.append(group, Element::div().class(component("toolbar", &["toggle"])));
        let button = doc.append(
            toggle,
            Element::button()
                .aria("label", "Show filters")
                .aria("expanded", "false"),
        );
        let expandable = doc.append(
            group,
            Element::div()
                .class(component("toolbar", &["expandable", "content"]))
                .hidden(true),
        );
        let input = doc.append(
            expandable,
            Element::input("search")
                .class(component("text-input-group", &["text", "input"]))
                .aria("label", "Filter"),
        );
        if let Ok(mut guard) = self.inner.write() {
            guard.filter = Some(FilterGroup {
                group,
                button,
                content: expandable,
                input,
            });
        }

        let trigger = self.filter_toggle.clone();
        doc.on(button, EventType::Click, move |doc, _| {
            trigger.expand(doc, group, button, expandable);
        });
        let inner = Arc::clone(&self.inner);
        let source = Arc::clone(&self.source);
        doc.on(input, EventType::Change, move |doc, event| {
            let query = doc.value(event.target()).unwrap_or_default();
            apply_text_filter(&inner, source.as_ref(), &query);
        });
        self
    }

    /// Filter the data source by `query`. An empty query removes the filter.
    pub fn filter_text(&self, query: &str) {
        if let Some(filter) = self.filter_group() {
            self.doc.set_value(filter.input, query);
        }
        apply_text_filter(&self.inner, self.source.as_ref(), query);
    }

    fn filter_group(&self) -> Option<FilterGroup> {
        self.inner.read().ok().and_then(|guard| guard.filter)
    }

    // -------------------------------------------------------------------------
    // Elements
    // -------------------------------------------------------------------------

    pub fn bulk_select(&self) -> &Dropdown<BulkSelect> {
        &self.bulk
    }

    pub fn bulk_checkbox(&self) -> NodeId {
        self.checkbox
    }

    pub fn selected_text(&self) -> String {
        self.doc.text(self.selected)
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn filter_input(&self) -> Option<NodeId> {
        self.filter_group().map(|filter| filter.input)
    }

    pub fn filter_toggle_button(&self) -> Option<NodeId> {
        self.filter_group().map(|filter| filter.button)
    }

    pub fn is_filter_expanded(&self) -> bool {
        self.filter_toggle.is_expanded()
    }

    pub fn expand_filters(&self) {
        if let Some(filter) = self.filter_group() {
            self.filter_toggle
                .set_expanded(&self.doc, filter.group, filter.button, filter.content, true);
        }
    }
}

fn apply_text_filter<T: Send + Sync + 'static>(
    inner: &RwLock<ToolbarInner<T>>,
    source: &dyn DataSource<T>,
    query: &str,
) {
    let label = inner.read().ok().and_then(|guard| guard.label.clone());
    let Some(label) = label else {
        debug!("Toolbar has no text filter");
        return;
    };
    let query = query.trim().to_string();
    if query.is_empty() {
        source.remove_filter(TEXT_FILTER);
    } else {
        debug!("Filtering by '{query}'");
        source.add_filter(
            TEXT_FILTER,
            Arc::new(move |item: &T| fuzzy_matches(&query, &label(item))),
        );
    }
}

/// Bulk checkbox state and selected-count text. Bulk selection is off in
/// single-select mode.
fn show_selection<T>(
    doc: &Document,
    checkbox: NodeId,
    label: NodeId,
    selection: &SelectionInfo<T>,
    total: usize,
) {
    let selected = selection.count();
    let all = selected > 0 && selected >= total;
    let partial = selected > 0 && !all;

    doc.set_disabled(checkbox, !selection.is_multi_select());
    doc.set_checked(checkbox, all);
    let state = match (all, partial) {
        (true, _) => "true",
        (_, true) => "mixed",
        _ => "false",
    };
    doc.set_aria(checkbox, "checked", state);
    if selected == 0 {
        doc.set_text(label, "");
    } else {
        doc.set_text(label, format!("{selected} selected"));
    }
}

fn wire_pagination<T: Send + Sync + 'static>(
    pagination: Pagination,
    source: &Arc<dyn DataSource<T>>,
) -> Pagination {
    let first = Arc::clone(source);
    let previous = Arc::clone(source);
    let next = Arc::clone(source);
    let last = Arc::clone(source);
    let goto = Arc::clone(source);
    let size = Arc::clone(source);
    pagination
        .on_first_page(move || first.goto_first_page())
        .on_previous_page(move || previous.goto_previous_page())
        .on_next_page(move || next.goto_next_page())
        .on_last_page(move || last.goto_last_page())
        .on_goto_page(move |page| goto.goto_page(page))
        .on_page_size(move |page_size| size.set_page_size(page_size))
}

impl<T: Send + Sync + 'static> PagedDisplay<T> for Toolbar<T> {
    fn show_items(&self, _items: &[T], page_info: &PageInfo) {
        self.pagination.update(page_info);
        self.bulk.update(&BulkSelect::Page(page_info.visible()));
        self.bulk.update(&BulkSelect::All(page_info.total()));
    }

    fn update_selection(&self, selection: &SelectionInfo<T>) {
        let single = !selection.is_multi_select();
        if single != self.bulk.is_disabled() {
            if single {
                self.bulk.disable();
            } else {
                self.bulk.enable();
            }
        }
        show_selection(
            &self.doc,
            self.checkbox,
            self.selected,
            selection,
            self.source.page_info().total(),
        );
    }

    fn update_sort_info(&self, _sort_info: &SortInfo<T>) {}
}

impl<T> Component for Toolbar<T> {
    fn root(&self) -> NodeId {
        self.root
    }
}
