//! Capabilities shared across widgets.

use weavedom::NodeId;

/// A widget with a root node in the document.
pub trait Component {
    fn root(&self) -> NodeId;
}

pub trait Disableable {
    fn disable(&self);

    fn enable(&self);

    fn is_disabled(&self) -> bool;
}

/// A widget holding at most one value.
pub trait HasValue<T> {
    fn value(&self) -> Option<T>;

    /// Replace the value. Change callbacks run only when `fire` is set.
    fn set_value(&self, value: Option<T>, fire: bool);
}

/// A widget holding any number of values.
pub trait HasValues<T> {
    fn values(&self) -> Vec<T>;

    /// Replace the values. Change callbacks run only when `fire` is set.
    fn set_values(&self, values: Vec<T>, fire: bool);
}
