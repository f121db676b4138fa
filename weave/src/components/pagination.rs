//! Pagination controls.

use std::fmt;
use std::sync::{Arc, RwLock};

use log::trace;
use weavedom::{Document, Element, EventType, NodeId};

use super::{Callback, Select};
use crate::classes::{component, modifier};
use crate::config::WeaveConfig;
use crate::data::PageInfo;
use crate::item::ItemRegistry;
use crate::selection::SelectionMode;
use crate::traits::{Component, Disableable};

type PageCallback = Arc<dyn Fn(usize) + Send + Sync>;

#[derive(Default)]
struct Handlers {
    page_size: Option<PageCallback>,
    goto_page: Option<PageCallback>,
    first_page: Option<Callback>,
    previous_page: Option<Callback>,
    next_page: Option<Callback>,
    last_page: Option<Callback>,
}

fn parse_page(text: &str) -> Option<usize> {
    text.trim()
        .parse::<usize>()
        .ok()
        .and_then(|page| page.checked_sub(1))
}

/// Item range info, page-size menu and page navigation.
///
/// The widget only reports what the user asked for through its callbacks;
/// call [`update`](Pagination::update) with the resulting [`PageInfo`] to
/// refresh it.
#[derive(Clone)]
pub struct Pagination {
    doc: Document,
    root: NodeId,
    info: NodeId,
    page_size: Select<usize>,
    first: NodeId,
    previous: NodeId,
    input: NodeId,
    pages: NodeId,
    next: NodeId,
    last: NodeId,
    handlers: Arc<RwLock<Handlers>>,
}

impl fmt::Debug for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pagination").field("root", &self.root).finish()
    }
}

impl Pagination {
    pub fn new(doc: &Document) -> Self {
        Self::with_config(doc, &WeaveConfig::default())
    }

    /// Page-size choices come from the configuration.
    pub fn with_config(doc: &Document, config: &WeaveConfig) -> Self {
        let handlers: Arc<RwLock<Handlers>> = Arc::default();
        let root = doc.create(Element::div().class(component("pagination", &[])));
        let info = doc.append(
            root,
            Element::div().class(component("pagination", &["total", "items"])),
        );

        let size_handlers = Arc::clone(&handlers);
        let page_size = Select::with_registry(
            doc,
            "",
            SelectionMode::Single,
            ItemRegistry::new().format(|size: &usize| format!("{size} per page")),
        )
        .add_all(config.page_size_options.iter().copied())
        .on_select(move |size, selected| {
            let callback = size_handlers
                .read()
                .ok()
                .and_then(|guard| guard.page_size.clone());
            if selected && let Some(callback) = callback {
                callback(*size);
            }
        });
        doc.append_node(root, page_size.root());

        let nav = doc.append(
            root,
            Element::nav()
                .class(component("pagination", &["nav"]))
                .aria("label", "Pagination"),
        );
        let first = nav_button(doc, nav, "Go to first page", &handlers, |h| h.first_page.clone());
        let previous = nav_button(doc, nav, "Go to previous page", &handlers, |h| {
            h.previous_page.clone()
        });
        let select = doc.append(
            nav,
            Element::div().class(component("pagination", &["nav", "page", "select"])),
        );
        let input = doc.append(
            select,
            Element::input("number")
                .class(component("form-control", &[]))
                .aria("label", "Current page")
                .attr("min", "1"),
        );
        let pages = doc.append(select, Element::span().aria("hidden", "true"));
        let next = nav_button(doc, nav, "Go to next page", &handlers, |h| h.next_page.clone());
        let last = nav_button(doc, nav, "Go to last page", &handlers, |h| h.last_page.clone());

        let input_handlers = Arc::clone(&handlers);
        doc.on(input, EventType::Change, move |doc, event| {
            let text = doc.value(event.target()).unwrap_or_default();
            goto_page(&input_handlers, &text);
        });

        Self {
            doc: doc.clone(),
            root,
            info,
            page_size,
            first,
            previous,
            input,
            pages,
            next,
            last,
            handlers,
        }
    }

    /// Parse a 1-based page number typed by the user into a 0-based page.
    ///
    /// Anything that is not a positive integer is rejected.
    ///
    /// ```
    /// use weave::components::Pagination;
    ///
    /// assert_eq!(Pagination::parse_page(" 3 "), Some(2));
    /// assert_eq!(Pagination::parse_page("0"), None);
    /// assert_eq!(Pagination::parse_page("three"), None);
    /// ```
    pub fn parse_page(text: &str) -> Option<usize> {
        parse_page(text)
    }

    /// Treat `text` as typed into the page input.
    pub fn goto_page_input(&self, text: &str) {
        goto_page(&self.handlers, text);
    }

    /// Refresh every control from `page_info`. No callback runs.
    pub fn update(&self, page_info: &PageInfo) {
        let doc = &self.doc;
        doc.set_text(
            self.info,
            format!(
                "{} - {} of {}",
                page_info.from(),
                page_info.to(),
                page_info.total()
            ),
        );
        self.page_size.select(&page_info.page_size(), false);
        doc.set_value(self.input, (page_info.page() + 1).to_string());
        doc.set_attr(self.input, "max", page_info.pages().to_string());
        doc.set_disabled(self.input, page_info.pages() < 2);
        doc.set_text(self.pages, format!("of {}", page_info.pages()));

        let first_page = page_info.is_first_page();
        let last_page = page_info.is_last_page();
        doc.set_disabled(self.first, first_page);
        doc.set_disabled(self.previous, first_page);
        doc.set_disabled(self.next, last_page);
        doc.set_disabled(self.last, last_page);
        trace!(
            "Pagination at page {} of {}",
            page_info.page() + 1,
            page_info.pages()
        );
    }

    /// Hide the first/last buttons and the page input.
    pub fn compact(self) -> Self {
        self.doc.add_class(self.root, modifier("compact"));
        for node in [self.first, self.last, self.input] {
            self.doc.set_hidden(node, true);
        }
        self
    }

    // -------------------------------------------------------------------------
    // Callbacks
    // -------------------------------------------------------------------------

    pub fn on_page_size(self, callback: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.set_handler(|h| h.page_size = Some(Arc::new(callback)));
        self
    }

    /// Called with the 0-based page.
    pub fn on_goto_page(self, callback: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.set_handler(|h| h.goto_page = Some(Arc::new(callback)));
        self
    }

    pub fn on_first_page(self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.set_handler(|h| h.first_page = Some(Arc::new(callback)));
        self
    }

    pub fn on_previous_page(self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.set_handler(|h| h.previous_page = Some(Arc::new(callback)));
        self
    }

    pub fn on_next_page(self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.set_handler(|h| h.next_page = Some(Arc::new(callback)));
        self
    }

    pub fn on_last_page(self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.set_handler(|h| h.last_page = Some(Arc::new(callback)));
        self
    }

    fn set_handler(&self, set: impl FnOnce(&mut Handlers)) {
        if let Ok(mut guard) = self.handlers.write() {
            set(&mut guard);
        }
    }

    // -------------------------------------------------------------------------
    // Elements
    // -------------------------------------------------------------------------

    pub fn info(&self) -> NodeId {
        self.info
    }

    pub fn info_text(&self) -> String {
        self.doc.text(self.info)
    }

    pub fn page_size_select(&self) -> &Select<usize> {
        &self.page_size
    }

    pub fn first_button(&self) -> NodeId {
        self.first
    }

    pub fn previous_button(&self) -> NodeId {
        self.previous
    }

    pub fn next_button(&self) -> NodeId {
        self.next
    }

    pub fn last_button(&self) -> NodeId {
        self.last
    }

    pub fn page_input(&self) -> NodeId {
        self.input
    }
}

fn nav_button(
    doc: &Document,
    nav: NodeId,
    label: &str,
    handlers: &Arc<RwLock<Handlers>>,
    pick: impl Fn(&Handlers) -> Option<Callback> + Send + Sync + 'static,
) -> NodeId {
    let button = doc.append(
        nav,
        Element::button()
            .class(component("button", &[]))
            .class(modifier("plain"))
            .aria("label", label),
    );
    let handlers = Arc::clone(handlers);
    doc.on(button, EventType::Click, move |_, _| {
        let callback = handlers.read().ok().and_then(|guard| pick(&guard));
        if let Some(callback) = callback {
            callback();
        }
    });
    button
}

fn goto_page(handlers: &Arc<RwLock<Handlers>>, text: &str) {
    let Some(page) = parse_page(text) else {
        trace!("Ignoring page input '{text}'");
        return;
    };
    let callback = handlers
        .read()
        .ok()
        .and_then(|guard| guard.goto_page.clone());
    if let Some(callback) = callback {
        callback(page);
    }
}

impl Component for Pagination {
    fn root(&self) -> NodeId {
        self.root
    }
}

impl Disableable for Pagination {
    fn disable(&self) {
        self.page_size.disable();
        for node in [self.first, self.previous, self.input, self.next, self.last] {
            self.doc.set_disabled(node, true);
        }
    }

    fn enable(&self) {
        self.page_size.enable();
        for node in [self.first, self.previous, self.input, self.next, self.last] {
            self.doc.set_disabled(node, false);
        }
    }

    fn is_disabled(&self) -> bool {
        self.page_size.is_disabled()
    }
}
