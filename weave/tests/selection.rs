use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use weave::classes::ITEM_DATA;
use weave::selection::{SelectionBinder, closest_item_id};
use weavedom::{By, Document, Element, EventType, NodeId, Target};

fn checkbox_selector() -> By {
    By::element("input").and(By::attribute_value("type", "checkbox"))
}

/// A list of rows, each tagged with an item id and holding one checkbox.
fn rows(doc: &Document, ids: &[&str]) -> (NodeId, Vec<NodeId>) {
    let root = doc.append(doc.body(), Element::ul());
    let boxes = ids
        .iter()
        .map(|id| {
            let row = doc.append(root, Element::li().data(ITEM_DATA, *id));
            let cell = doc.append(row, Element::div());
            doc.append(cell, Element::checkbox())
        })
        .collect();
    (root, boxes)
}

fn recorder() -> (
    Arc<Mutex<Vec<(String, bool)>>>,
    impl Fn(&str, bool) + Send + Sync + 'static,
) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    (calls, move |id: &str, checked: bool| {
        sink.lock().unwrap().push((id.to_string(), checked))
    })
}

// ============================================================================
// Binding
// ============================================================================

#[test]
fn test_click_reports_id_and_checked_state() {
    let doc = Document::new();
    let (root, boxes) = rows(&doc, &["a", "b"]);
    let mut binder = SelectionBinder::new(root);
    let (calls, on_change) = recorder();

    let bound = binder.bind_select_handler(&doc, &checkbox_selector(), closest_item_id, on_change);
    doc.click(boxes[1]);
    doc.click(boxes[1]);

    assert_eq!(bound, 2);
    assert_eq!(
        *calls.lock().unwrap(),
        vec![("b".to_string(), true), ("b".to_string(), false)]
    );
}

#[test]
fn test_rebind_without_remove_fires_once() {
    let doc = Document::new();
    let (root, boxes) = rows(&doc, &["a"]);
    let mut binder = SelectionBinder::new(root);
    let count = Arc::new(AtomicUsize::new(0));

    for _ in 0..3 {
        let seen = Arc::clone(&count);
        binder.bind_select_handler(&doc, &checkbox_selector(), closest_item_id, move |_, _| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
    }
    doc.click(boxes[0]);

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(doc.listener_count(Target::Node(boxes[0]), EventType::Click), 1);
}

#[test]
fn test_remove_select_handler_detaches_everything() {
    let doc = Document::new();
    let (root, boxes) = rows(&doc, &["a", "b", "c"]);
    let mut binder = SelectionBinder::new(root);
    let (calls, on_change) = recorder();

    binder.bind_select_handler(&doc, &checkbox_selector(), closest_item_id, on_change);
    assert!(binder.is_bound());
    binder.remove_select_handler();
    binder.remove_select_handler();

    for checkbox in &boxes {
        doc.click(*checkbox);
    }
    assert!(!binder.is_bound());
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(doc.listener_total(), 0);
}

#[test]
fn test_controls_without_item_id_are_ignored() {
    let doc = Document::new();
    let root = doc.append(doc.body(), Element::div());
    let stray = doc.append(root, Element::checkbox());
    let mut binder = SelectionBinder::new(root);
    let (calls, on_change) = recorder();

    binder.bind_select_handler(&doc, &checkbox_selector(), closest_item_id, on_change);
    doc.click(stray);

    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn test_only_controls_under_root_are_bound() {
    let doc = Document::new();
    let (root, _) = rows(&doc, &["a"]);
    let (_, outside) = rows(&doc, &["z"]);
    let mut binder = SelectionBinder::new(root);
    let (calls, on_change) = recorder();

    binder.bind_select_handler(&doc, &checkbox_selector(), closest_item_id, on_change);
    doc.click(outside[0]);

    assert!(calls.lock().unwrap().is_empty());
}

// ============================================================================
// Programmatic Updates
// ============================================================================

#[test]
fn test_update_selection_sets_state_without_callback() {
    let doc = Document::new();
    let (root, boxes) = rows(&doc, &["a", "b", "c"]);
    let mut binder = SelectionBinder::new(root);
    let (calls, on_change) = recorder();
    binder.bind_select_handler(&doc, &checkbox_selector(), closest_item_id, on_change);

    let selected = ["a", "c"];
    for id in ["a", "b", "c"] {
        let selector = By::data_value(ITEM_DATA, id).desc(checkbox_selector());
        binder.update_selection(&doc, &selector, selected.contains(&id));
    }

    assert!(doc.is_checked(boxes[0]));
    assert!(!doc.is_checked(boxes[1]));
    assert!(doc.is_checked(boxes[2]));
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn test_closest_item_id_walks_up() {
    let doc = Document::new();
    let (root, boxes) = rows(&doc, &["first"]);

    assert_eq!(closest_item_id(&doc, boxes[0]).as_deref(), Some("first"));
    assert_eq!(closest_item_id(&doc, root), None);
}
