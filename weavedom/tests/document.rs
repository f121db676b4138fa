use weavedom::{By, Document, Element};

fn list_with_items(doc: &Document) -> weavedom::NodeId {
    doc.append(
        doc.body(),
        Element::ul().id("list").class("list").children(vec![
            Element::li().class("item").data("item", "a").text("Alpha"),
            Element::li().class("item").data("item", "b").text("Beta"),
        ]),
    )
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn test_create_is_detached_until_appended() {
    let doc = Document::new();
    let node = doc.create(Element::div().id("floating"));

    assert!(!doc.is_connected(node));
    assert_eq!(doc.parent(node), None);

    doc.append_node(doc.body(), node);
    assert!(doc.is_connected(node));
    assert_eq!(doc.parent(node), Some(doc.body()));
}

#[test]
fn test_children_keep_document_order() {
    let doc = Document::new();
    let list = list_with_items(&doc);

    let children = doc.children(list);
    assert_eq!(children.len(), 2);
    assert_eq!(doc.text(children[0]), "Alpha");
    assert_eq!(doc.text(children[1]), "Beta");
}

#[test]
fn test_append_node_moves_between_parents() {
    let doc = Document::new();
    let a = doc.append(doc.body(), Element::div());
    let b = doc.append(doc.body(), Element::div());
    let child = doc.append(a, Element::span());

    doc.append_node(b, child);

    assert!(doc.children(a).is_empty());
    assert_eq!(doc.children(b), vec![child]);
}

#[test]
fn test_append_into_own_subtree_is_ignored() {
    let doc = Document::new();
    let outer = doc.append(doc.body(), Element::div());
    let inner = doc.append(outer, Element::div());

    doc.append_node(inner, outer);

    assert_eq!(doc.parent(outer), Some(doc.body()));
    assert_eq!(doc.parent(inner), Some(outer));
}

#[test]
fn test_remove_children_frees_subtrees() {
    let doc = Document::new();
    let list = list_with_items(&doc);
    let first = doc.children(list)[0];
    assert_eq!(doc.node_count(), 4);

    doc.remove_children(list);

    assert!(doc.children(list).is_empty());
    assert!(!doc.exists(first));
    assert_eq!(doc.text(first), "");
    assert_eq!(doc.parent(first), None);
    assert_eq!(doc.node_count(), 2);
}

#[test]
fn test_freed_slot_does_not_answer_stale_handle() {
    let doc = Document::new();
    let old = doc.append(doc.body(), Element::div().class("old").text("old"));

    doc.remove(old);
    let new = doc.append(doc.body(), Element::div().class("new").text("new"));

    assert_ne!(old, new);
    assert!(doc.exists(new));
    assert!(!doc.exists(old));
    assert!(!doc.has_class(old, "new"));
    assert_eq!(doc.text(old), "");
    assert_eq!(doc.children(doc.body()), vec![new]);
    assert_eq!(doc.node_count(), 2);
}

#[test]
fn test_remove_frees_nested_nodes_and_keeps_body() {
    let doc = Document::new();
    let list = list_with_items(&doc);

    doc.remove(list);
    doc.remove(doc.body());

    assert_eq!(doc.node_count(), 1);
    assert!(doc.exists(doc.body()));
    assert!(doc.children(doc.body()).is_empty());
}

#[test]
fn test_contains_includes_self() {
    let doc = Document::new();
    let list = list_with_items(&doc);
    let item = doc.children(list)[1];

    assert!(doc.contains(list, list));
    assert!(doc.contains(list, item));
    assert!(!doc.contains(item, list));
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_find_all_excludes_root() {
    let doc = Document::new();
    let list = list_with_items(&doc);

    let items = doc.find_all(list, &By::classname("item"));
    assert_eq!(items.len(), 2);

    let lists = doc.find_all(list, &By::classname("list"));
    assert!(lists.is_empty());
}

#[test]
fn test_find_returns_first_match() {
    let doc = Document::new();
    let list = list_with_items(&doc);

    let found = doc.find(list, &By::data("item")).map(|id| doc.text(id));
    assert_eq!(found.as_deref(), Some("Alpha"));
}

#[test]
fn test_closest_walks_up_including_self() {
    let doc = Document::new();
    let row = doc.append(
        doc.body(),
        Element::li()
            .data("item", "row-1")
            .child(Element::div().child(Element::checkbox().id("check"))),
    );
    let check = doc.find(row, &By::id("check")).expect("checkbox");

    assert_eq!(doc.closest(check, &By::data("item")), Some(row));
    assert_eq!(doc.closest(row, &By::data("item")), Some(row));
    assert_eq!(doc.closest(check, &By::classname("missing")), None);
}

// ============================================================================
// Attributes and state
// ============================================================================

#[test]
fn test_classes_attributes_and_data() {
    let doc = Document::new();
    let node = doc.append(doc.body(), Element::button().class("btn").aria("expanded", "false"));

    doc.add_class(node, "pf-m-primary");
    doc.add_class(node, "pf-m-primary");
    assert!(doc.has_class(node, "pf-m-primary"));

    doc.toggle_class(node, "btn", false);
    assert!(!doc.has_class(node, "btn"));

    assert_eq!(doc.aria(node, "expanded").as_deref(), Some("false"));
    doc.set_aria(node, "expanded", "true");
    assert_eq!(doc.attr(node, "aria-expanded").as_deref(), Some("true"));

    doc.set_data(node, "sort", "name");
    assert_eq!(doc.data(node, "sort").as_deref(), Some("name"));
}

#[test]
fn test_set_text_replaces_children() {
    let doc = Document::new();
    let list = list_with_items(&doc);

    doc.set_text(list, "empty");

    assert!(doc.children(list).is_empty());
    assert_eq!(doc.text(list), "empty");
}

#[test]
fn test_set_checked_is_silent_state_write() {
    let doc = Document::new();
    let check = doc.append(doc.body(), Element::checkbox());

    assert!(!doc.is_checked(check));
    doc.set_checked(check, true);
    assert!(doc.is_checked(check));
}
