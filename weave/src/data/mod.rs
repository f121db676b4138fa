//! Paged data: the display contract, the data-source contract, and the
//! in-memory [`DataProvider`] that implements the latter.

mod filter;
mod info;
mod provider;

use std::sync::Arc;

pub use filter::{FilterMatch, fuzzy_filter, fuzzy_matches};
pub use info::{Comparator, PageInfo, SelectionInfo, SortInfo};
pub use provider::DataProvider;

/// Item predicate. Filters registered on a source combine with logical AND.
pub type Filter<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Something that renders one page of items.
///
/// `show_items` replaces the rendered content entirely, including any
/// listeners bound to it. The other two calls update the existing content
/// in place and must not fire selection callbacks.
pub trait PagedDisplay<T>: Send + Sync {
    fn show_items(&self, items: &[T], page_info: &PageInfo);

    fn update_selection(&self, selection: &SelectionInfo<T>);

    fn update_sort_info(&self, sort_info: &SortInfo<T>);
}

/// Calls a display makes back into whatever feeds it.
pub trait DataSource<T>: Send + Sync {
    /// Identifier used to tag rendered rows.
    fn id_of(&self, item: &T) -> String;

    fn item(&self, id: &str) -> Option<T>;

    fn select(&self, item: &T, selected: bool);

    fn visible_items(&self) -> Vec<T>;

    fn select_all(&self);

    fn select_visible(&self);

    fn clear_all_selection(&self);

    fn sort(&self, sort_info: SortInfo<T>);

    fn add_filter(&self, id: &str, filter: Filter<T>);

    fn remove_filter(&self, id: &str);

    // -------------------------------------------------------------------------
    // Paging
    // -------------------------------------------------------------------------

    fn goto_first_page(&self);

    fn goto_previous_page(&self);

    fn goto_next_page(&self);

    fn goto_last_page(&self);

    /// 0-based, clamped to the available pages.
    fn goto_page(&self, page: usize);

    fn set_page_size(&self, page_size: usize);

    fn page_info(&self) -> PageInfo;

    fn selection_info(&self) -> SelectionInfo<T>;
}
