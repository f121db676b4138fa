//! Checkbox selection wiring for list-like widgets.

use std::sync::Arc;

use log::{debug, trace};
use weavedom::{By, Document, EventType, NodeId, Registration};

use crate::classes::ITEM_DATA;

/// Selection mode for menus and list-like widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Single item selection (radio-button style).
    #[default]
    Single,
    /// Multiple items can be selected (checkbox style).
    Multi,
}

/// Read the item id from the nearest ancestor (or the node itself) carrying
/// the item data key.
pub fn closest_item_id(doc: &Document, node: NodeId) -> Option<String> {
    doc.closest(node, &By::data(ITEM_DATA))
        .and_then(|item| doc.data(item, ITEM_DATA))
}

/// Binds click listeners on every selectable control under a root and reports
/// `(item id, checked)` to a single callback.
///
/// Content under the root is expected to be replaced wholesale (a new page,
/// a new filter). Binding again always drops the previous listeners first, so
/// controls from an earlier render can never report a change.
#[derive(Debug)]
pub struct SelectionBinder {
    root: NodeId,
    active: Option<Registration>,
}

impl SelectionBinder {
    pub fn new(root: NodeId) -> Self {
        Self { root, active: None }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether listeners from a previous bind are still registered.
    pub fn is_bound(&self) -> bool {
        self.active.as_ref().is_some_and(Registration::is_active)
    }

    /// Bind every control under the root matching `selector`.
    ///
    /// On click, `closest_id` maps the control to an item id; when it yields
    /// one, `on_change` receives the id and the control's checked state.
    /// Returns the number of controls bound.
    pub fn bind_select_handler(
        &mut self,
        doc: &Document,
        selector: &By,
        closest_id: impl Fn(&Document, NodeId) -> Option<String> + Send + Sync + 'static,
        on_change: impl Fn(&str, bool) + Send + Sync + 'static,
    ) -> usize {
        self.remove_select_handler();

        let closest_id = Arc::new(closest_id);
        let on_change = Arc::new(on_change);
        let controls = doc.find_all(self.root, selector);
        let registrations: Vec<Registration> = controls
            .iter()
            .map(|control| {
                let closest_id = Arc::clone(&closest_id);
                let on_change = Arc::clone(&on_change);
                doc.on(*control, EventType::Click, move |doc, event| {
                    let control = event.target();
                    if let Some(id) = closest_id(doc, control) {
                        let checked = doc.is_checked(control);
                        trace!("Selection change for '{id}': {checked}");
                        on_change(&id, checked);
                    }
                })
            })
            .collect();

        debug!(
            "Bound {} selection controls under {}",
            registrations.len(),
            self.root
        );
        let count = registrations.len();
        self.active = Some(Registration::compose(registrations));
        count
    }

    /// Drop the listeners from the last bind. Safe to call when unbound.
    pub fn remove_select_handler(&mut self) {
        if let Some(mut registration) = self.active.take() {
            registration.remove();
        }
    }

    /// Set the checked state of the first control under the root matching
    /// `selector`. This is a state write, no listener runs.
    pub fn update_selection(&self, doc: &Document, selector: &By, selected: bool) {
        if let Some(control) = doc.find(self.root, selector) {
            doc.set_checked(control, selected);
        }
    }
}
