//! Widget core for a document-backed design system.
//!
//! Widgets own a subtree of a [`weavedom::Document`] and react to the events
//! dispatched on it. The building blocks are the [`ToggleController`]
//! (expand/collapse with outside-click dismissal), the [`ItemRegistry`]
//! (identify, label and render arbitrary items) and the [`SelectionBinder`]
//! (checkbox listeners for paged displays). [`DataProvider`] feeds any number
//! of [`PagedDisplay`]s such as [`DataList`], [`DataTable`] or [`Toolbar`].

pub mod classes;
pub mod components;
pub mod config;
pub mod data;
pub mod error;
pub mod id;
pub mod item;
pub mod selection;
pub mod store;
pub mod toggle;
pub mod traits;

pub use config::WeaveConfig;
pub use data::{DataProvider, DataSource, PagedDisplay};
pub use item::ItemRegistry;
pub use selection::SelectionBinder;
pub use toggle::ToggleController;

#[cfg(doc)]
use components::{DataList, DataTable, Toolbar};

pub mod prelude {
    pub use crate::components::{
        BulkSelect, CardView, Column, DataList, DataTable, Dropdown, NavigationGroup, Pagination,
        Select, Toolbar,
    };
    pub use crate::config::WeaveConfig;
    pub use crate::data::{
        DataProvider, DataSource, Filter, PageInfo, PagedDisplay, SelectionInfo, SortInfo,
    };
    pub use crate::error::{ConfigError, DataError, StoreError};
    pub use crate::item::ItemRegistry;
    pub use crate::selection::{SelectionBinder, SelectionMode};
    pub use crate::store::ComponentStore;
    pub use crate::toggle::ToggleController;
    pub use crate::traits::{Component, Disableable, HasValue, HasValues};

    pub use weavedom::{By, Document, Element, EventType, Key, NodeId};
}
