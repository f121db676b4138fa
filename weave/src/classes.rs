//! CSS class and data-key names.

pub const EXPANDED: &str = "expanded";
pub const DISABLED: &str = "disabled";
pub const SELECTED: &str = "selected";

/// Data key carrying an item id on rendered rows, cards and menu entries.
pub const ITEM_DATA: &str = "item";

/// Data key carrying a column id on sortable table headers.
pub const SORT_DATA: &str = "sort";

/// Block/element class: `component("dropdown", &["toggle"])` is
/// `pf-c-dropdown__toggle`.
pub fn component(block: &str, elements: &[&str]) -> String {
    if elements.is_empty() {
        format!("pf-c-{block}")
    } else {
        format!("pf-c-{block}__{}", elements.join("-"))
    }
}

/// Modifier class: `modifier("expanded")` is `pf-m-expanded`.
pub fn modifier(name: &str) -> String {
    format!("pf-m-{name}")
}
