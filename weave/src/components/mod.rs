//! Widgets built on the toggle, item and selection primitives.

mod card_view;
mod data_list;
mod data_table;
mod dropdown;
mod navigation;
mod pagination;
mod select;
mod toolbar;

use std::sync::Arc;

pub use card_view::CardView;
pub use data_list::{DataList, RowDisplay};
pub use data_table::{Column, DataTable};
pub use dropdown::Dropdown;
pub use navigation::NavigationGroup;
pub use pagination::Pagination;
pub use select::Select;
pub use toolbar::{BulkSelect, Toolbar};

/// Item callback.
pub type SelectCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Argument-less callback.
pub type Callback = Arc<dyn Fn() + Send + Sync>;
