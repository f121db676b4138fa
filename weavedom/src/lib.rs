pub mod document;
pub mod element;
pub mod event;
pub mod listener;
pub mod selector;

pub use document::{Document, NodeId};
pub use element::{Content, Element};
pub use event::{Event, EventType, Key, Modifiers};
pub use listener::{Listener, Registration, Target};
pub use selector::By;
