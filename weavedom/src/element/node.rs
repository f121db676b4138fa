use std::collections::{BTreeMap, HashMap};

use super::Content;

/// Declarative description of an element subtree.
///
/// Elements are plain values: they are built with chained methods and only
/// become live nodes once mounted into a [`Document`](crate::Document).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    // Identity
    pub tag: String,
    pub id: Option<String>,

    // Content
    pub content: Content,

    // Presentation
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,

    // State
    pub hidden: bool,
    pub checked: bool,
    pub disabled: bool,

    // Custom data storage (item ids, sort keys, ...)
    pub data: HashMap<String, String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn span() -> Self {
        Self::new("span")
    }

    pub fn section() -> Self {
        Self::new("section")
    }

    pub fn nav() -> Self {
        Self::new("nav")
    }

    pub fn ul() -> Self {
        Self::new("ul")
    }

    pub fn li() -> Self {
        Self::new("li")
    }

    pub fn button() -> Self {
        Self::new("button").attr("type", "button")
    }

    pub fn table() -> Self {
        Self::new("table")
    }

    pub fn thead() -> Self {
        Self::new("thead")
    }

    pub fn tbody() -> Self {
        Self::new("tbody")
    }

    pub fn tr() -> Self {
        Self::new("tr")
    }

    pub fn th() -> Self {
        Self::new("th")
    }

    pub fn td() -> Self {
        Self::new("td")
    }

    /// Create a checkbox input.
    pub fn checkbox() -> Self {
        Self::new("input").attr("type", "checkbox")
    }

    /// Create a text-like input of the given type (`text`, `number`, ...).
    pub fn input(kind: impl Into<String>) -> Self {
        Self::new("input").attr("type", kind)
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    // Presentation
    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set an `aria-*` attribute. The prefix is added for you.
    pub fn aria(self, name: &str, value: impl Into<String>) -> Self {
        self.attr(format!("aria-{name}"), value)
    }

    pub fn role(self, role: impl Into<String>) -> Self {
        self.attr("role", role)
    }

    // State
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    // Custom data
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    // Content
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.content = Content::Text(text.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => self.content = Content::Children(vec![child]),
        }
        self
    }

    pub fn children(mut self, new_children: impl IntoIterator<Item = Element>) -> Self {
        match &mut self.content {
            Content::Children(children) => children.extend(new_children),
            _ => self.content = Content::Children(new_children.into_iter().collect()),
        }
        self
    }
}
