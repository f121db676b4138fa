use std::sync::{Arc, Mutex};

use weave::components::DataList;
use weave::config::WeaveConfig;
use weave::data::{DataProvider, DataSource, PageInfo, PagedDisplay, SelectionInfo, SortInfo};
use weave::traits::Component;
use weavedom::{Document, Element, EventType, NodeId, Target};

#[derive(Debug, Clone, PartialEq)]
struct Host {
    name: String,
    address: String,
}

fn hosts(count: usize) -> Vec<Host> {
    (0..count)
        .map(|n| Host {
            name: format!("host-{n}"),
            address: format!("10.0.0.{n}"),
        })
        .collect()
}

fn provider(page_size: usize) -> DataProvider<Host> {
    DataProvider::with_config(
        |host: &Host| host.name.clone(),
        &WeaveConfig::default().page_size(page_size),
    )
}

fn render_name(host: &Host, doc: &Document, target: NodeId) {
    doc.append(target, Element::span().class("name").text(host.name.clone()));
}

fn data_list(doc: &Document, provider: &DataProvider<Host>) -> DataList<Host> {
    let source: Arc<dyn DataSource<Host>> = Arc::new(provider.clone());
    let list = DataList::new(doc, source, render_name).selectable();
    doc.append_node(doc.body(), list.root());
    provider.bind_display(Arc::new(list.clone()));
    list
}

/// Records which item ids reach the data source through clicks.
struct CountingSource {
    inner: DataProvider<Host>,
    selects: Mutex<Vec<(String, bool)>>,
}

impl DataSource<Host> for CountingSource {
    fn id_of(&self, item: &Host) -> String {
        self.inner.id_of(item)
    }

    fn item(&self, id: &str) -> Option<Host> {
        self.inner.item(id)
    }

    fn select(&self, item: &Host, selected: bool) {
        self.selects
            .lock()
            .unwrap()
            .push((item.name.clone(), selected));
    }

    fn visible_items(&self) -> Vec<Host> {
        self.inner.visible_items()
    }

    fn select_all(&self) {}

    fn select_visible(&self) {}

    fn clear_all_selection(&self) {}

    fn sort(&self, _sort_info: SortInfo<Host>) {}

    fn add_filter(&self, _id: &str, _filter: weave::data::Filter<Host>) {}

    fn remove_filter(&self, _id: &str) {}

    fn goto_first_page(&self) {}

    fn goto_previous_page(&self) {}

    fn goto_next_page(&self) {}

    fn goto_last_page(&self) {}

    fn goto_page(&self, _page: usize) {}

    fn set_page_size(&self, _page_size: usize) {}

    fn page_info(&self) -> PageInfo {
        self.inner.page_info()
    }

    fn selection_info(&self) -> SelectionInfo<Host> {
        self.inner.selection_info()
    }
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_show_items_renders_one_row_per_item() {
    let doc = Document::new();
    let provider = provider(3);
    let list = data_list(&doc, &provider);

    provider.update(hosts(5)).unwrap();

    assert_eq!(list.rows().len(), 3);
    let row = list.row("host-1").unwrap();
    assert_eq!(doc.element_id(row).as_deref(), Some("data-list-host-1"));
    assert!(doc.text(row).contains("host-1"));
    assert!(list.checkbox("host-2").is_some());
    assert!(list.row("host-3").is_none());
}

#[test]
fn test_paging_replaces_rows() {
    let doc = Document::new();
    let provider = provider(2);
    let list = data_list(&doc, &provider);
    provider.update(hosts(5)).unwrap();

    provider.goto_last_page();

    assert_eq!(list.rows().len(), 1);
    assert!(list.row("host-4").is_some());
    assert!(list.row("host-0").is_none());
}

#[test]
fn test_without_selectable_there_are_no_checkboxes() {
    let doc = Document::new();
    let provider = provider(5);
    let source: Arc<dyn DataSource<Host>> = Arc::new(provider.clone());
    let list = DataList::new(&doc, source, render_name);
    provider.bind_display(Arc::new(list.clone()));

    provider.update(hosts(2)).unwrap();

    assert!(list.checkbox("host-0").is_none());
    assert_eq!(doc.listener_total(), 0);
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_checkbox_click_selects_in_provider() {
    let doc = Document::new();
    let provider = provider(5);
    let list = data_list(&doc, &provider);
    provider.update(hosts(3)).unwrap();

    doc.click(list.checkbox("host-1").unwrap());

    assert_eq!(provider.selection_info().ids(), vec!["host-1"]);
    let row = list.row("host-1").unwrap();
    assert!(doc.has_class(row, "pf-m-selected"));

    doc.click(list.checkbox("host-1").unwrap());
    assert!(!provider.selection_info().has_selection());
    assert!(!doc.has_class(row, "pf-m-selected"));
}

#[test]
fn test_update_selection_syncs_checkboxes_silently() {
    let doc = Document::new();
    let provider = provider(5);
    let counting = Arc::new(CountingSource {
        inner: provider.clone(),
        selects: Mutex::new(Vec::new()),
    });
    let list = DataList::new(&doc, counting.clone(), render_name).selectable();
    provider.bind_display(Arc::new(list.clone()));
    let items = hosts(4);
    provider.update(items.clone()).unwrap();

    provider.select(&items[0], true);
    provider.select(&items[2], true);

    for (index, host) in items.iter().enumerate() {
        let checked = doc.is_checked(list.checkbox(&host.name).unwrap());
        assert_eq!(checked, index == 0 || index == 2, "{}", host.name);
    }
    assert!(counting.selects.lock().unwrap().is_empty());

    provider.select(&items[0], false);
    assert!(!doc.is_checked(list.checkbox("host-0").unwrap()));
    assert!(counting.selects.lock().unwrap().is_empty());
}

#[test]
fn test_stale_checkbox_is_detached_after_rerender() {
    let doc = Document::new();
    let provider = provider(5);
    let counting = Arc::new(CountingSource {
        inner: provider.clone(),
        selects: Mutex::new(Vec::new()),
    });
    let list = DataList::new(&doc, counting.clone(), render_name).selectable();
    provider.bind_display(Arc::new(list.clone()));

    provider.update(hosts(3)).unwrap();
    let stale = list.checkbox("host-0").unwrap();
    provider.update(hosts(3)).unwrap();

    doc.click(stale);
    assert!(counting.selects.lock().unwrap().is_empty());
    assert_eq!(doc.listener_count(Target::Node(stale), EventType::Click), 0);

    doc.click(list.checkbox("host-0").unwrap());
    assert_eq!(
        *counting.selects.lock().unwrap(),
        vec![("host-0".to_string(), true)]
    );
}

#[test]
fn test_listener_count_stable_across_renders() {
    let doc = Document::new();
    let provider = provider(4);
    let list = data_list(&doc, &provider).expandable(|host, doc, target| {
        doc.set_text(target, host.address.clone());
    });

    provider.update(hosts(4)).unwrap();
    let after_first = doc.listener_total();
    for _ in 0..3 {
        provider.update(hosts(4)).unwrap();
    }

    assert_eq!(after_first, 8);
    assert_eq!(doc.listener_total(), after_first);
    assert_eq!(list.rows().len(), 4);
}

#[test]
fn test_node_count_stable_across_page_turns() {
    let doc = Document::new();
    let provider = provider(20);
    let list = data_list(&doc, &provider);
    provider.update(hosts(40)).unwrap();
    let first_row = list.rows()[0];
    let nodes = doc.node_count();
    let listeners = doc.listener_total();

    for _ in 0..100 {
        provider.goto_next_page();
        provider.goto_previous_page();
    }

    assert_eq!(doc.node_count(), nodes);
    assert_eq!(doc.listener_total(), listeners);
    assert!(!doc.exists(first_row));
    assert_eq!(list.rows().len(), 20);
}

#[test]
fn test_direct_show_items_call() {
    let doc = Document::new();
    let provider = provider(10);
    provider.update(hosts(2)).unwrap();
    let source: Arc<dyn DataSource<Host>> = Arc::new(provider.clone());
    let list = DataList::new(&doc, source, render_name).selectable();

    list.show_items(&provider.visible_items(), &provider.page_info());
    list.update_selection(&provider.selection_info());

    assert_eq!(list.rows().len(), 2);
    assert!(!doc.is_checked(list.checkbox("host-0").unwrap()));
}

// ============================================================================
// Expandable Rows
// ============================================================================

#[test]
fn test_expand_toggle_reveals_content() {
    let doc = Document::new();
    let provider = provider(5);
    let list = data_list(&doc, &provider).expandable(|host, doc, target| {
        doc.set_text(target, host.address.clone());
    });
    provider.update(hosts(2)).unwrap();

    let button = list.toggle_button("host-1").unwrap();
    assert_eq!(doc.aria(button, "expanded").as_deref(), Some("false"));
    assert!(!list.is_row_expanded("host-1"));

    doc.click(button);
    assert!(list.is_row_expanded("host-1"));
    assert!(!list.is_row_expanded("host-0"));
    assert_eq!(doc.aria(button, "expanded").as_deref(), Some("true"));
    assert!(doc.text(list.row("host-1").unwrap()).contains("10.0.0.1"));

    list.toggle_row("host-1");
    assert!(!list.is_row_expanded("host-1"));
}
