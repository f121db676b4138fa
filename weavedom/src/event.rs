use crate::document::NodeId;

/// Event kinds that listeners can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    PointerDown,
    Click,
    Change,
    Key,
    Focus,
    Blur,
}

/// High-level events with element targeting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Pointer pressed on an element (fires before `Click`)
    PointerDown { target: NodeId },
    /// Element activated by pointer or keyboard
    Click { target: NodeId },
    /// Form control value changed
    Change { target: NodeId },
    /// Key press event, targeted at focused element
    Key {
        target: NodeId,
        key: Key,
        modifiers: Modifiers,
    },
    /// Element gained focus
    Focus { target: NodeId },
    /// Element lost focus
    Blur { target: NodeId },
}

impl Event {
    pub fn target(&self) -> NodeId {
        match self {
            Self::PointerDown { target }
            | Self::Click { target }
            | Self::Change { target }
            | Self::Key { target, .. }
            | Self::Focus { target }
            | Self::Blur { target } => *target,
        }
    }

    pub fn kind(&self) -> EventType {
        match self {
            Self::PointerDown { .. } => EventType::PointerDown,
            Self::Click { .. } => EventType::Click,
            Self::Change { .. } => EventType::Change,
            Self::Key { .. } => EventType::Key,
            Self::Focus { .. } => EventType::Focus,
            Self::Blur { .. } => EventType::Blur,
        }
    }

    /// Focus and blur do not bubble, everything else does.
    pub fn bubbles(&self) -> bool {
        !matches!(self, Self::Focus { .. } | Self::Blur { .. })
    }
}

/// Simplified key representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Key modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Default::default()
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Default::default()
        }
    }

    pub fn none(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt
    }
}
