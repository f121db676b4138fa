//! Paging, selection and sort snapshots handed to displays.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::item::IdentifyFn;

// =============================================================================
// PageInfo
// =============================================================================

/// Paging state. Pages are 0-based, `from`/`to` are 1-based item positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    page: usize,
    page_size: usize,
    total: usize,
    visible: usize,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageInfo {
    /// A page size of 0 is treated as 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
            total: 0,
            visible: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of items on the current page.
    pub fn visible(&self) -> usize {
        self.visible
    }

    /// Number of pages, never less than one.
    pub fn pages(&self) -> usize {
        self.total.div_ceil(self.page_size).max(1)
    }

    /// Position of the first item on this page, 0 when there are no items.
    pub fn from(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.page * self.page_size + 1
        }
    }

    /// Position of the last item on this page, 0 when there are no items.
    pub fn to(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.total.min((self.page + 1) * self.page_size)
        }
    }

    pub fn is_first_page(&self) -> bool {
        self.page == 0
    }

    pub fn is_last_page(&self) -> bool {
        self.page + 1 >= self.pages()
    }

    /// Move to `page`, clamped to the available pages.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.pages() - 1);
    }

    /// Change the page size, keeping the first item of the current page
    /// visible. A size of 0 is ignored.
    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size == 0 {
            return;
        }
        let first = self.page * self.page_size;
        self.page_size = page_size;
        self.set_page(first / page_size);
    }

    /// Set the total item count; the current page is clamped to fit.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.set_page(self.page);
    }

    pub fn set_visible(&mut self, visible: usize) {
        self.visible = visible;
    }

    /// Back to the first page with no items. The page size is kept.
    pub fn reset(&mut self) {
        self.page = 0;
        self.total = 0;
        self.visible = 0;
    }
}

// =============================================================================
// SelectionInfo
// =============================================================================

/// The set of selected items, keyed by identifier.
pub struct SelectionInfo<T> {
    identifier: IdentifyFn<T>,
    multi_select: bool,
    selected: HashMap<String, T>,
    order: Vec<String>,
}

impl<T: Clone> Clone for SelectionInfo<T> {
    fn clone(&self) -> Self {
        Self {
            identifier: Arc::clone(&self.identifier),
            multi_select: self.multi_select,
            selected: self.selected.clone(),
            order: self.order.clone(),
        }
    }
}

impl<T> fmt::Debug for SelectionInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionInfo")
            .field("multi_select", &self.multi_select)
            .field("selected", &self.order)
            .finish()
    }
}

impl<T> SelectionInfo<T> {
    pub fn new(identifier: IdentifyFn<T>, multi_select: bool) -> Self {
        Self {
            identifier,
            multi_select,
            selected: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn is_multi_select(&self) -> bool {
        self.multi_select
    }

    pub fn count(&self) -> usize {
        self.order.len()
    }

    pub fn has_selection(&self) -> bool {
        !self.order.is_empty()
    }

    pub fn is_selected(&self, item: &T) -> bool {
        self.selected.contains_key(&(self.identifier)(item))
    }

    pub fn is_selected_id(&self, id: &str) -> bool {
        self.selected.contains_key(id)
    }

    /// Selected items in selection order.
    pub fn items(&self) -> Vec<&T> {
        self.order
            .iter()
            .filter_map(|id| self.selected.get(id))
            .collect()
    }

    /// Selected ids in selection order.
    pub fn ids(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// The first selected item, the only one in single-select mode.
    pub fn first(&self) -> Option<&T> {
        self.order.first().and_then(|id| self.selected.get(id))
    }

    /// Add an item. In single-select mode this replaces the selection.
    pub fn add(&mut self, id: String, item: T) {
        if !self.multi_select {
            self.reset();
        }
        if self.selected.insert(id.clone(), item).is_none() {
            self.order.push(id);
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let removed = self.selected.remove(id);
        if removed.is_some() {
            self.order.retain(|existing| existing != id);
        }
        removed
    }

    pub fn reset(&mut self) {
        self.selected.clear();
        self.order.clear();
    }
}

// =============================================================================
// SortInfo
// =============================================================================

pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Active sort criterion. The comparator always describes ascending order;
/// `ascending == false` reverses it.
pub struct SortInfo<T> {
    criterion_id: Option<String>,
    comparator: Option<Comparator<T>>,
    ascending: bool,
}

impl<T> Clone for SortInfo<T> {
    fn clone(&self) -> Self {
        Self {
            criterion_id: self.criterion_id.clone(),
            comparator: self.comparator.clone(),
            ascending: self.ascending,
        }
    }
}

impl<T> fmt::Debug for SortInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortInfo")
            .field("criterion_id", &self.criterion_id)
            .field("ascending", &self.ascending)
            .finish()
    }
}

impl<T> Default for SortInfo<T> {
    fn default() -> Self {
        Self::unsorted()
    }
}

impl<T> SortInfo<T> {
    pub fn new(
        criterion_id: impl Into<String>,
        comparator: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static,
        ascending: bool,
    ) -> Self {
        Self {
            criterion_id: Some(criterion_id.into()),
            comparator: Some(Arc::new(comparator)),
            ascending,
        }
    }

    /// Build from an existing shared comparator.
    pub fn with_comparator(
        criterion_id: impl Into<String>,
        comparator: Comparator<T>,
        ascending: bool,
    ) -> Self {
        Self {
            criterion_id: Some(criterion_id.into()),
            comparator: Some(comparator),
            ascending,
        }
    }

    pub fn unsorted() -> Self {
        Self {
            criterion_id: None,
            comparator: None,
            ascending: true,
        }
    }

    pub fn criterion_id(&self) -> Option<&str> {
        self.criterion_id.as_deref()
    }

    pub fn is_ascending(&self) -> bool {
        self.ascending
    }

    pub fn is_sorted(&self) -> bool {
        self.comparator.is_some()
    }

    /// Same criterion, opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            ascending: !self.ascending,
            ..self.clone()
        }
    }

    /// Compare two items honoring the direction. Without a comparator every
    /// pair is equal, which keeps a stable sort in insertion order.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        match &self.comparator {
            Some(comparator) if self.ascending => comparator(a, b),
            Some(comparator) => comparator(b, a),
            None => Ordering::Equal,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::unsorted();
    }
}
