//! Collapse/expand handling shared by every disclosure widget.

use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use log::debug;
use weavedom::{Document, Event, EventType, Key, NodeId, Registration, Target};

use crate::classes::{EXPANDED, modifier};

/// State-changed callback, invoked with the new expanded state.
pub type ToggleCallback = Arc<dyn Fn(bool) + Send + Sync>;

#[derive(Default)]
struct ToggleInner {
    expanded: bool,
    /// Outside-pointer and escape listeners, present iff `expanded`.
    dismissal: Option<Registration>,
    on_toggle: Option<ToggleCallback>,
}

/// Open/closed state for one disclosure widget.
///
/// The widget root, trigger and surface are passed on every call; only the
/// dismissal listeners registered while open are kept. While open, a single
/// document-wide pointer-down listener collapses the widget when the pointer
/// goes down outside the root, and pressing `Escape` inside the root
/// collapses it too.
///
/// Clones share state.
///
/// # Example
///
/// ```
/// use weavedom::{Document, Element};
/// use weave::toggle::ToggleController;
///
/// let doc = Document::new();
/// let root = doc.append(doc.body(), Element::div());
/// let button = doc.append(root, Element::button());
/// let menu = doc.append(root, Element::ul().hidden(true));
///
/// let toggle = ToggleController::new();
/// toggle.expand(&doc, root, button, menu);
/// assert!(toggle.is_expanded());
/// assert!(!doc.is_hidden(menu));
///
/// doc.pointer_down(doc.body());
/// assert!(!toggle.is_expanded());
/// ```
#[derive(Clone, Default)]
pub struct ToggleController {
    inner: Arc<Mutex<ToggleInner>>,
}

impl fmt::Debug for ToggleController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleController")
            .field("expanded", &self.is_expanded())
            .finish()
    }
}

impl ToggleController {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_weak(inner: &Weak<Mutex<ToggleInner>>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    /// Set the state-changed callback, replacing any previous one.
    pub fn on_toggle(&self, callback: impl Fn(bool) + Send + Sync + 'static) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.on_toggle = Some(Arc::new(callback));
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.inner
            .lock()
            .map(|guard| guard.expanded)
            .unwrap_or(false)
    }

    /// Whether dismissal listeners are currently registered.
    pub fn has_dismissal_listener(&self) -> bool {
        self.inner
            .lock()
            .map(|guard| {
                guard
                    .dismissal
                    .as_ref()
                    .is_some_and(Registration::is_active)
            })
            .unwrap_or(false)
    }

    /// Open the surface, or close it if it is already open.
    pub fn expand(&self, doc: &Document, root: NodeId, trigger: NodeId, surface: NodeId) {
        if self.is_expanded() {
            self.collapse(doc, root, trigger, surface);
            return;
        }

        let mut registration = self.bind_dismissal(doc, root, trigger, surface);
        let callback = match self.inner.lock() {
            Ok(mut guard) if !guard.expanded => {
                guard.expanded = true;
                if let Some(mut stale) = guard.dismissal.replace(registration) {
                    stale.remove();
                }
                guard.on_toggle.clone()
            }
            _ => {
                registration.remove();
                return;
            }
        };

        doc.set_aria(trigger, "expanded", "true");
        doc.set_hidden(surface, false);
        doc.add_class(root, modifier(EXPANDED));
        debug!("Expanded disclosure {root}");

        if let Some(callback) = callback {
            callback(true);
        }
    }

    /// Close the surface. Does nothing when already closed.
    pub fn collapse(&self, doc: &Document, root: NodeId, trigger: NodeId, surface: NodeId) {
        let (registration, callback) = match self.inner.lock() {
            Ok(mut guard) if guard.expanded => {
                guard.expanded = false;
                (guard.dismissal.take(), guard.on_toggle.clone())
            }
            _ => return,
        };

        if let Some(mut registration) = registration {
            registration.remove();
        }
        doc.set_aria(trigger, "expanded", "false");
        doc.set_hidden(surface, true);
        doc.remove_class(root, &modifier(EXPANDED));
        debug!("Collapsed disclosure {root}");

        if let Some(callback) = callback {
            callback(false);
        }
    }

    /// Open or close depending on `expanded`.
    pub fn set_expanded(
        &self,
        doc: &Document,
        root: NodeId,
        trigger: NodeId,
        surface: NodeId,
        expanded: bool,
    ) {
        if expanded && !self.is_expanded() {
            self.expand(doc, root, trigger, surface);
        } else if !expanded {
            self.collapse(doc, root, trigger, surface);
        }
    }

    fn bind_dismissal(
        &self,
        doc: &Document,
        root: NodeId,
        trigger: NodeId,
        surface: NodeId,
    ) -> Registration {
        let weak = Arc::downgrade(&self.inner);
        let outside = doc.bind(Target::Document, EventType::PointerDown, move |doc, event| {
            if doc.contains(root, event.target()) {
                return;
            }
            if let Some(toggle) = Self::from_weak(&weak) {
                toggle.collapse(doc, root, trigger, surface);
            }
        });

        let weak = Arc::downgrade(&self.inner);
        let escape = doc.on(root, EventType::Key, move |doc, event| {
            if let Event::Key {
                key: Key::Escape, ..
            } = event
                && let Some(toggle) = Self::from_weak(&weak)
            {
                toggle.collapse(doc, root, trigger, surface);
            }
        });

        Registration::compose([outside, escape])
    }
}
