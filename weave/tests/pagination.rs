use std::sync::{Arc, Mutex};

use weave::components::Pagination;
use weave::config::WeaveConfig;
use weave::data::PageInfo;
use weave::traits::{Component, Disableable, HasValue};
use weavedom::Document;

#[derive(Debug, Clone, PartialEq)]
enum Request {
    First,
    Previous,
    Next,
    Last,
    Page(usize),
    Size(usize),
}

fn pagination(doc: &Document) -> (Pagination, Arc<Mutex<Vec<Request>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = |requests: &Arc<Mutex<Vec<Request>>>| {
        let requests = Arc::clone(requests);
        move |request: Request| requests.lock().unwrap().push(request)
    };
    let (first, previous, next, last, page, size) = (
        log(&requests),
        log(&requests),
        log(&requests),
        log(&requests),
        log(&requests),
        log(&requests),
    );
    let pagination = Pagination::new(doc)
        .on_first_page(move || first(Request::First))
        .on_previous_page(move || previous(Request::Previous))
        .on_next_page(move || next(Request::Next))
        .on_last_page(move || last(Request::Last))
        .on_goto_page(move |n| page(Request::Page(n)))
        .on_page_size(move |n| size(Request::Size(n)));
    doc.append_node(doc.body(), pagination.root());
    (pagination, requests)
}

fn page_info(total: usize, page: usize) -> PageInfo {
    let mut info = PageInfo::new(10);
    info.set_total(total);
    info.set_page(page);
    info.set_visible(info.to() + 1 - info.from());
    info
}

// ============================================================================
// Display
// ============================================================================

#[test]
fn test_update_shows_range_and_pages() {
    let doc = Document::new();
    let (pagination, requests) = pagination(&doc);

    pagination.update(&page_info(42, 1));

    assert_eq!(pagination.info_text(), "11 - 20 of 42");
    assert_eq!(doc.value(pagination.page_input()).as_deref(), Some("2"));
    assert_eq!(doc.attr(pagination.page_input(), "max").as_deref(), Some("5"));
    assert!(doc.text(pagination.root()).contains("of 5"));
    assert_eq!(pagination.page_size_select().value(), Some(10));
    assert!(requests.lock().unwrap().is_empty());
}

#[test]
fn test_buttons_disabled_at_bounds() {
    let doc = Document::new();
    let (pagination, _) = pagination(&doc);

    pagination.update(&page_info(42, 0));
    assert!(doc.is_disabled(pagination.first_button()));
    assert!(doc.is_disabled(pagination.previous_button()));
    assert!(!doc.is_disabled(pagination.next_button()));

    pagination.update(&page_info(42, 4));
    assert!(!doc.is_disabled(pagination.first_button()));
    assert!(doc.is_disabled(pagination.next_button()));
    assert!(doc.is_disabled(pagination.last_button()));
}

#[test]
fn test_empty_range() {
    let doc = Document::new();
    let (pagination, _) = pagination(&doc);

    pagination.update(&PageInfo::new(10));

    assert_eq!(pagination.info_text(), "0 - 0 of 0");
    assert!(doc.is_disabled(pagination.page_input()));
    assert!(doc.is_disabled(pagination.last_button()));
}

// ============================================================================
// Requests
// ============================================================================

#[test]
fn test_navigation_buttons_report() {
    let doc = Document::new();
    let (pagination, requests) = pagination(&doc);
    pagination.update(&page_info(42, 2));

    doc.click(pagination.first_button());
    doc.click(pagination.previous_button());
    doc.click(pagination.next_button());
    doc.click(pagination.last_button());

    assert_eq!(
        *requests.lock().unwrap(),
        vec![Request::First, Request::Previous, Request::Next, Request::Last]
    );
}

#[test]
fn test_disabled_buttons_do_not_report() {
    let doc = Document::new();
    let (pagination, requests) = pagination(&doc);
    pagination.update(&page_info(5, 0));

    doc.click(pagination.first_button());
    doc.click(pagination.next_button());

    assert!(requests.lock().unwrap().is_empty());
}

#[test]
fn test_page_input_reports_zero_based_page() {
    let doc = Document::new();
    let (pagination, requests) = pagination(&doc);
    pagination.update(&page_info(42, 0));

    doc.input(pagination.page_input(), "3");
    doc.input(pagination.page_input(), "zero");
    doc.input(pagination.page_input(), "0");
    pagination.goto_page_input(" 5 ");

    assert_eq!(*requests.lock().unwrap(), vec![Request::Page(2), Request::Page(4)]);
}

#[test]
fn test_page_size_choice_reports() {
    let doc = Document::new();
    let (pagination, requests) = pagination(&doc);
    pagination.update(&page_info(42, 0));
    let select = pagination.page_size_select();

    doc.click(select.toggle_button());
    doc.click(select.item_element(&50).unwrap());

    assert_eq!(*requests.lock().unwrap(), vec![Request::Size(50)]);
    assert_eq!(select.text(), "50 per page");
    assert!(!select.is_expanded());
}

#[test]
fn test_page_size_options_from_config() {
    let doc = Document::new();
    let config = WeaveConfig::default().page_size_options(vec![5, 25]);
    let pagination = Pagination::with_config(&doc, &config);
    let select = pagination.page_size_select();

    assert!(select.item_element(&5).is_some());
    assert!(select.item_element(&25).is_some());
    assert!(select.item_element(&10).is_none());
}

#[test]
fn test_disable_and_enable() {
    let doc = Document::new();
    let (pagination, _) = pagination(&doc);

    pagination.disable();
    assert!(pagination.is_disabled());
    assert!(doc.is_disabled(pagination.next_button()));

    pagination.enable();
    assert!(!pagination.is_disabled());
}

#[test]
fn test_compact_hides_outer_controls() {
    let doc = Document::new();
    let (pagination, _) = pagination(&doc);
    let pagination = pagination.compact();

    assert!(doc.has_class(pagination.root(), "pf-m-compact"));
    assert!(doc.is_hidden(pagination.first_button()));
    assert!(doc.is_hidden(pagination.page_input()));
    assert!(!doc.is_hidden(pagination.next_button()));
}
