//! CSS-like selectors over a [`Document`](crate::Document).

use crate::document::{NodeId, Tree};

/// Selector used by `find`, `find_all` and `closest`.
///
/// # Example
///
/// ```
/// use weavedom::By;
///
/// // `.pf-c-data-list__check > input[type=checkbox]`
/// let checkbox = By::classname("pf-c-data-list__check")
///     .child(By::element("input").and(By::attribute_value("type", "checkbox")));
/// # let _ = checkbox;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum By {
    Element(String),
    Class(String),
    Id(String),
    Attribute(String, Option<String>),
    Data(String, Option<String>),
    And(Vec<By>),
    /// `parent > child`
    Child(Box<By>, Box<By>),
    /// `ancestor descendant`
    Descendant(Box<By>, Box<By>),
}

impl By {
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element(tag.into())
    }

    pub fn classname(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Element carrying the attribute, whatever its value.
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::Attribute(name.into(), None)
    }

    pub fn attribute_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Attribute(name.into(), Some(value.into()))
    }

    /// Element carrying the data key, whatever its value.
    pub fn data(key: impl Into<String>) -> Self {
        Self::Data(key.into(), None)
    }

    pub fn data_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Data(key.into(), Some(value.into()))
    }

    pub fn and(self, other: By) -> Self {
        match self {
            Self::And(mut all) => {
                all.push(other);
                Self::And(all)
            }
            this => Self::And(vec![this, other]),
        }
    }

    pub fn child(self, child: By) -> Self {
        Self::Child(Box::new(self), Box::new(child))
    }

    pub fn desc(self, descendant: By) -> Self {
        Self::Descendant(Box::new(self), Box::new(descendant))
    }

    pub(crate) fn matches(&self, tree: &Tree, id: NodeId) -> bool {
        let Some(node) = tree.node(id) else {
            return false;
        };
        match self {
            Self::Element(tag) => node.tag == *tag,
            Self::Class(class) => node.classes.iter().any(|c| c == class),
            Self::Id(expected) => node.id.as_deref() == Some(expected.as_str()),
            Self::Attribute(name, value) => match (node.attributes.get(name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            },
            Self::Data(key, value) => match (node.data.get(key), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            },
            Self::And(all) => all.iter().all(|by| by.matches(tree, id)),
            Self::Child(parent, child) => {
                child.matches(tree, id)
                    && node.parent.is_some_and(|parent_id| parent.matches(tree, parent_id))
            }
            Self::Descendant(ancestor, descendant) => {
                descendant.matches(tree, id)
                    && tree
                        .ancestors(id)
                        .into_iter()
                        .any(|ancestor_id| ancestor.matches(tree, ancestor_id))
            }
        }
    }
}
