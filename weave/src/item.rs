//! Identifier, label and rendering functions for typed items.

use std::fmt;
use std::sync::Arc;

use weavedom::{Document, NodeId};

use crate::id;

pub type IdentifyFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
pub type FormatFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
pub type RenderFn<T> = Arc<dyn Fn(&T, &Document, NodeId) + Send + Sync>;

/// How a domain value becomes a stable key, a label and a rendered node.
///
/// With [`ItemRegistry::new`] the identifier and label both come from the
/// item's `Display` form. Two distinct items with the same string form will
/// therefore share an id; supply a real identifier with
/// [`identify`](ItemRegistry::identify) for anything but simple values.
///
/// Replacing a function does not touch nodes that were already rendered.
pub struct ItemRegistry<T> {
    identify: IdentifyFn<T>,
    format: FormatFn<T>,
    render: Option<RenderFn<T>>,
}

impl<T> Clone for ItemRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            identify: Arc::clone(&self.identify),
            format: Arc::clone(&self.format),
            render: self.render.clone(),
        }
    }
}

impl<T> fmt::Debug for ItemRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemRegistry")
            .field("custom_render", &self.render.is_some())
            .finish()
    }
}

impl<T: fmt::Display + 'static> Default for ItemRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Display + 'static> ItemRegistry<T> {
    /// Registry using the `Display` form for both identifier and label.
    pub fn new() -> Self {
        Self {
            identify: Arc::new(|item: &T| item.to_string()),
            format: Arc::new(|item: &T| item.to_string()),
            render: None,
        }
    }
}

impl<T> ItemRegistry<T> {
    /// Registry for types without a `Display` form.
    pub fn custom(
        identify: impl Fn(&T) -> String + Send + Sync + 'static,
        format: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            identify: Arc::new(identify),
            format: Arc::new(format),
            render: None,
        }
    }

    /// Sanitized identifier: the raw identifier passed through [`id::build`].
    pub fn id_of(&self, item: &T) -> String {
        let raw = (self.identify)(item);
        id::build(&[raw.as_str()])
    }

    pub fn label_of(&self, item: &T) -> String {
        (self.format)(item)
    }

    /// Render `item` into `target`. Without a custom render function the
    /// target's text is set to the label.
    pub fn render_into(&self, item: &T, doc: &Document, target: NodeId) {
        match &self.render {
            Some(render) => render(item, doc, target),
            None => doc.set_text(target, self.label_of(item)),
        }
    }

    // -------------------------------------------------------------------------
    // Builder setters
    // -------------------------------------------------------------------------

    pub fn identify(mut self, identify: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.set_identify(identify);
        self
    }

    pub fn format(mut self, format: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.set_format(format);
        self
    }

    pub fn render(
        mut self,
        render: impl Fn(&T, &Document, NodeId) + Send + Sync + 'static,
    ) -> Self {
        self.set_render(render);
        self
    }

    // -------------------------------------------------------------------------
    // In-place setters for owners holding the registry
    // -------------------------------------------------------------------------

    pub fn set_identify(&mut self, identify: impl Fn(&T) -> String + Send + Sync + 'static) {
        self.identify = Arc::new(identify);
    }

    pub fn set_format(&mut self, format: impl Fn(&T) -> String + Send + Sync + 'static) {
        self.format = Arc::new(format);
    }

    pub fn set_render(&mut self, render: impl Fn(&T, &Document, NodeId) + Send + Sync + 'static) {
        self.render = Some(Arc::new(render));
    }
}
