use std::sync::Arc;

use weave::components::{BulkSelect, DataList, Toolbar};
use weave::config::WeaveConfig;
use weave::data::{DataProvider, DataSource};
use weave::traits::{Component, Disableable};
use weavedom::{Document, Element, NodeId};

#[derive(Debug, Clone, PartialEq)]
struct Task {
    id: u32,
    title: String,
}

fn tasks() -> Vec<Task> {
    [
        "Write report",
        "Review budget",
        "Book flights",
        "Renew passport",
        "Call plumber",
        "Water plants",
        "Return library books",
    ]
    .iter()
    .enumerate()
    .map(|(n, title)| Task {
        id: n as u32,
        title: title.to_string(),
    })
    .collect()
}

struct Fixture {
    doc: Document,
    provider: DataProvider<Task>,
    toolbar: Toolbar<Task>,
    list: DataList<Task>,
}

fn fixture() -> Fixture {
    let doc = Document::new();
    let provider = DataProvider::with_config(
        |task: &Task| format!("task-{}", task.id),
        &WeaveConfig::default().page_size(3),
    );
    let source: Arc<dyn DataSource<Task>> = Arc::new(provider.clone());
    let toolbar = Toolbar::new(&doc, Arc::clone(&source)).text_filter(|task| task.title.clone());
    let list = DataList::new(&doc, source, |task: &Task, doc: &Document, target: NodeId| {
        doc.append(target, Element::span().text(task.title.clone()));
    })
    .selectable();
    doc.append_node(doc.body(), toolbar.root());
    doc.append_node(doc.body(), list.root());
    provider.bind_display(Arc::new(toolbar.clone()));
    provider.bind_display(Arc::new(list.clone()));
    provider.update(tasks()).unwrap();
    Fixture {
        doc,
        provider,
        toolbar,
        list,
    }
}

fn bulk_entry(fixture: &Fixture, id: &str) -> NodeId {
    fixture.toolbar.bulk_select().item_element(id).unwrap()
}

// ============================================================================
// Bulk Select
// ============================================================================

#[test]
fn test_bulk_labels_follow_counts() {
    let f = fixture();

    assert_eq!(f.doc.text(bulk_entry(&f, "select-none")), "Select none (0 items)");
    assert_eq!(f.doc.text(bulk_entry(&f, "select-page")), "Select page (3 items)");
    assert_eq!(f.doc.text(bulk_entry(&f, "select-all")), "Select all (7 items)");

    f.provider.goto_last_page();
    assert_eq!(f.doc.text(bulk_entry(&f, "select-page")), "Select page (1 items)");
}

#[test]
fn test_bulk_menu_selects_page_all_and_none() {
    let f = fixture();
    let bulk = f.toolbar.bulk_select();

    f.doc.click(bulk.toggle_button());
    f.doc.click(bulk_entry(&f, "select-page"));
    assert_eq!(f.provider.selection_info().count(), 3);
    assert_eq!(f.toolbar.selected_text(), "3 selected");
    assert!(!bulk.is_expanded());

    f.doc.click(bulk.toggle_button());
    f.doc.click(bulk_entry(&f, "select-all"));
    assert_eq!(f.provider.selection_info().count(), 7);
    assert!(f.doc.is_checked(f.list.checkbox("task-0").unwrap()));

    f.doc.click(bulk.toggle_button());
    f.doc.click(bulk_entry(&f, "select-none"));
    assert!(!f.provider.selection_info().has_selection());
    assert_eq!(f.toolbar.selected_text(), "");
}

#[test]
fn test_bulk_checkbox_states() {
    let f = fixture();
    let checkbox = f.toolbar.bulk_checkbox();
    assert_eq!(f.doc.aria(checkbox, "checked").as_deref(), Some("false"));

    f.doc.click(f.list.checkbox("task-1").unwrap());
    assert!(!f.doc.is_checked(checkbox));
    assert_eq!(f.doc.aria(checkbox, "checked").as_deref(), Some("mixed"));

    f.doc.click(checkbox);
    assert_eq!(f.provider.selection_info().count(), 7);
    assert!(f.doc.is_checked(checkbox));
    assert_eq!(f.doc.aria(checkbox, "checked").as_deref(), Some("true"));

    f.doc.click(checkbox);
    assert!(!f.provider.selection_info().has_selection());
    assert_eq!(f.doc.aria(checkbox, "checked").as_deref(), Some("false"));
}

#[test]
fn test_single_select_disables_bulk_controls() {
    let doc = Document::new();
    let provider = DataProvider::with_config(
        |task: &Task| task.id.to_string(),
        &WeaveConfig::default().single_select(),
    );
    let toolbar = Toolbar::new(&doc, Arc::new(provider.clone()));
    doc.append_node(doc.body(), toolbar.root());
    provider.bind_display(Arc::new(toolbar.clone()));
    provider.update(tasks()).unwrap();
    let checkbox = toolbar.bulk_checkbox();

    doc.click(checkbox);

    assert!(doc.is_disabled(checkbox));
    assert!(toolbar.bulk_select().is_disabled());
    assert!(!doc.is_checked(checkbox));
    assert!(!provider.selection_info().has_selection());
}

#[test]
fn test_ignored_bulk_click_resyncs_checkbox() {
    let doc = Document::new();
    let provider = DataProvider::with_config(
        |task: &Task| task.id.to_string(),
        &WeaveConfig::default().single_select(),
    );
    let toolbar = Toolbar::new(&doc, Arc::new(provider.clone()));
    provider.update(tasks()).unwrap();
    let checkbox = toolbar.bulk_checkbox();

    doc.click(checkbox);

    assert!(!doc.is_checked(checkbox));
    assert_eq!(doc.aria(checkbox, "checked").as_deref(), Some("false"));
    assert_eq!(toolbar.selected_text(), "");
    assert!(!provider.selection_info().has_selection());
}

#[test]
fn test_bulk_option_display() {
    assert_eq!(BulkSelect::Page(4).to_string(), "Select page (4 items)");
    assert_eq!(BulkSelect::All(12).to_string(), "Select all (12 items)");
}

// ============================================================================
// Text Filter
// ============================================================================

#[test]
fn test_filter_group_toggles() {
    let f = fixture();
    let button = f.toolbar.filter_toggle_button().unwrap();

    assert!(!f.toolbar.is_filter_expanded());
    f.doc.click(button);
    assert!(f.toolbar.is_filter_expanded());

    let outside = f.doc.append(f.doc.body(), Element::div());
    f.doc.pointer_down(outside);
    assert!(!f.toolbar.is_filter_expanded());
}

#[test]
fn test_typing_filters_source() {
    let f = fixture();
    f.toolbar.expand_filters();

    f.doc.input(f.toolbar.filter_input().unwrap(), "book");

    let titles: Vec<String> = f.provider.filtered_items().into_iter().map(|t| t.title).collect();
    assert_eq!(titles, vec!["Book flights", "Return library books"]);
    assert_eq!(f.list.rows().len(), 2);
    assert_eq!(f.toolbar.pagination().info_text(), "1 - 2 of 2");
    assert_eq!(f.doc.text(bulk_entry(&f, "select-all")), "Select all (2 items)");
}

#[test]
fn test_clearing_filter_restores_items() {
    let f = fixture();

    f.toolbar.filter_text("plumb");
    assert_eq!(f.provider.page_info().total(), 1);
    assert_eq!(
        f.doc.value(f.toolbar.filter_input().unwrap()).as_deref(),
        Some("plumb")
    );

    f.toolbar.filter_text("   ");
    assert!(!f.provider.has_filters());
    assert_eq!(f.provider.page_info().total(), 7);
}

#[test]
fn test_toolbar_without_text_filter() {
    let doc = Document::new();
    let provider = DataProvider::new(|task: &Task| task.id.to_string());
    let toolbar = Toolbar::new(&doc, Arc::new(provider.clone()));
    provider.update(tasks()).unwrap();

    toolbar.filter_text("report");

    assert!(toolbar.filter_input().is_none());
    assert!(!provider.has_filters());
}

// ============================================================================
// Pagination
// ============================================================================

#[test]
fn test_pagination_drives_provider() {
    let f = fixture();
    let pagination = f.toolbar.pagination();
    assert_eq!(pagination.info_text(), "1 - 3 of 7");

    f.doc.click(pagination.next_button());
    assert_eq!(f.provider.page_info().page(), 1);
    assert_eq!(pagination.info_text(), "4 - 6 of 7");

    f.doc.click(pagination.last_button());
    assert_eq!(f.provider.page_info().page(), 2);
    assert!(f.doc.is_disabled(pagination.next_button()));

    f.doc.input(pagination.page_input(), "1");
    assert_eq!(f.provider.page_info().page(), 0);
    assert_eq!(f.list.rows().len(), 3);
}

#[test]
fn test_page_size_menu_drives_provider() {
    let f = fixture();
    let select = f.toolbar.pagination().page_size_select();

    f.doc.click(select.toggle_button());
    f.doc.click(select.item_element(&10).unwrap());

    assert_eq!(f.provider.page_info().page_size(), 10);
    assert_eq!(f.list.rows().len(), 7);
    assert_eq!(f.toolbar.pagination().info_text(), "1 - 7 of 7");
}
