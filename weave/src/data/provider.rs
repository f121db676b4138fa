//! In-memory data source with filtering, sorting, paging and selection.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, RwLock};

use log::{debug, trace};

use super::{DataSource, Filter, PageInfo, PagedDisplay, SelectionInfo, SortInfo};
use crate::config::WeaveConfig;
use crate::error::DataError;
use crate::item::IdentifyFn;

type SelectHandler<T> = Arc<dyn Fn(&T) + Send + Sync>;
type Display<T> = Arc<dyn PagedDisplay<T>>;

struct ProviderInner<T> {
    identifier: IdentifyFn<T>,
    items: Vec<T>,
    index: HashMap<String, usize>,
    filters: BTreeMap<String, Filter<T>>,
    sort_info: SortInfo<T>,
    page_info: PageInfo,
    selection: SelectionInfo<T>,
    /// Indices into `items` after filtering and sorting.
    filtered: Vec<usize>,
    /// The slice of `filtered` on the current page.
    visible: Vec<usize>,
}

impl<T: Clone> ProviderInner<T> {
    /// Re-run filters, sort and paging over the current items.
    fn apply(&mut self) {
        let mut filtered: Vec<usize> = (0..self.items.len())
            .filter(|&index| {
                let item = &self.items[index];
                self.filters.values().all(|filter| filter(item))
            })
            .collect();
        if self.sort_info.is_sorted() {
            let items = &self.items;
            let sort_info = &self.sort_info;
            filtered.sort_by(|&a, &b| sort_info.compare(&items[a], &items[b]));
        }

        self.page_info.set_total(filtered.len());
        let from = self.page_info.from().saturating_sub(1);
        let to = self.page_info.to();
        self.visible = filtered.get(from..to).map(<[usize]>::to_vec).unwrap_or_default();
        self.page_info.set_visible(self.visible.len());
        self.filtered = filtered;
    }

    fn collect(&self, indices: &[usize]) -> Vec<T> {
        indices.iter().map(|&index| self.items[index].clone()).collect()
    }

    fn id_of(&self, item: &T) -> String {
        (self.identifier)(item)
    }

    fn contains_id(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }
}

/// Owns a list of items and drives any number of [`PagedDisplay`]s.
///
/// Items pass through the filters (AND-combined), then the sort, then the
/// current page. Every change that affects the visible page calls, for each
/// bound display in bind order, `show_items`, `update_selection` and
/// `update_sort_info`. Selection-only changes call `update_selection` only.
///
/// Handles are cheap to clone and share state. No lock is held while
/// displays or select handlers run, so they may call back into the provider.
pub struct DataProvider<T> {
    inner: Arc<RwLock<ProviderInner<T>>>,
    displays: Arc<RwLock<Vec<Display<T>>>>,
    select_handlers: Arc<RwLock<Vec<SelectHandler<T>>>>,
}

impl<T> Clone for DataProvider<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            displays: Arc::clone(&self.displays),
            select_handlers: Arc::clone(&self.select_handlers),
        }
    }
}

impl<T> fmt::Debug for DataProvider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("DataProvider");
        if let Ok(guard) = self.inner.read() {
            debug
                .field("items", &guard.items.len())
                .field("page_info", &guard.page_info)
                .field("selected", &guard.selection.count());
        }
        debug.finish()
    }
}

impl<T: Clone + Send + Sync + 'static> DataProvider<T> {
    /// Provider with default paging that allows multiple selected items.
    pub fn new(identifier: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Self::with_config(identifier, &WeaveConfig::default())
    }

    pub fn with_config(
        identifier: impl Fn(&T) -> String + Send + Sync + 'static,
        config: &WeaveConfig,
    ) -> Self {
        let identifier: IdentifyFn<T> = Arc::new(identifier);
        Self {
            inner: Arc::new(RwLock::new(ProviderInner {
                identifier: Arc::clone(&identifier),
                items: Vec::new(),
                index: HashMap::new(),
                filters: BTreeMap::new(),
                sort_info: SortInfo::unsorted(),
                page_info: PageInfo::new(config.page_size),
                selection: SelectionInfo::new(identifier, config.multi_select),
                filtered: Vec::new(),
                visible: Vec::new(),
            })),
            displays: Arc::new(RwLock::new(Vec::new())),
            select_handlers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register a display. It is not rendered until the next update.
    pub fn bind_display(&self, display: Arc<dyn PagedDisplay<T>>) {
        if let Ok(mut displays) = self.displays.write() {
            displays.push(display);
        }
    }

    /// Called with the item whenever an item becomes selected.
    pub fn on_select(&self, handler: impl Fn(&T) + Send + Sync + 'static) {
        if let Ok(mut handlers) = self.select_handlers.write() {
            handlers.push(Arc::new(handler));
        }
    }

    // -------------------------------------------------------------------------
    // Items
    // -------------------------------------------------------------------------

    /// Replace all items. Paging, selection, filters and sort are reset.
    ///
    /// Fails without touching the current state if two items share an id, or
    /// if a callback panicked while the provider state was locked.
    pub fn update(&self, items: impl IntoIterator<Item = T>) -> Result<(), DataError> {
        let items: Vec<T> = items.into_iter().collect();
        {
            let mut guard = self.inner.write().map_err(|_| DataError::Poisoned)?;
            let mut index = HashMap::with_capacity(items.len());
            for (position, item) in items.iter().enumerate() {
                let id = guard.id_of(item);
                if index.insert(id.clone(), position).is_some() {
                    return Err(DataError::DuplicateId(id));
                }
            }

            guard.items = items;
            guard.index = index;
            guard.filters.clear();
            guard.sort_info.reset();
            guard.page_info.reset();
            guard.selection.reset();
            guard.apply();
            debug!("Data provider updated with {} items", guard.items.len());
        }
        self.show();
        Ok(())
    }

    pub fn contains(&self, item: &T) -> bool {
        self.inner
            .read()
            .map(|guard| guard.contains_id(&guard.id_of(item)))
            .unwrap_or(false)
    }

    /// Whether the item is on the current page.
    pub fn is_visible(&self, item: &T) -> bool {
        self.inner
            .read()
            .map(|guard| {
                let id = guard.id_of(item);
                guard
                    .index
                    .get(&id)
                    .is_some_and(|position| guard.visible.contains(position))
            })
            .unwrap_or(false)
    }

    pub fn id_of(&self, item: &T) -> String {
        self.inner
            .read()
            .map(|guard| guard.id_of(item))
            .unwrap_or_default()
    }

    pub fn item(&self, id: &str) -> Option<T> {
        let guard = self.inner.read().ok()?;
        guard.index.get(id).map(|&position| guard.items[position].clone())
    }

    pub fn all_items(&self) -> Vec<T> {
        self.inner
            .read()
            .map(|guard| guard.items.clone())
            .unwrap_or_default()
    }

    /// Items passing every filter, in sort order.
    pub fn filtered_items(&self) -> Vec<T> {
        self.inner
            .read()
            .map(|guard| guard.collect(&guard.filtered))
            .unwrap_or_default()
    }

    /// Items on the current page, in sort order.
    pub fn visible_items(&self) -> Vec<T> {
        self.inner
            .read()
            .map(|guard| guard.collect(&guard.visible))
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Select or deselect one item. Unknown items are ignored.
    ///
    /// Select handlers run only when the item becomes selected.
    pub fn select(&self, item: &T, selected: bool) {
        {
            let mut guard = match self.inner.write() {
                Ok(guard) => guard,
                Err(_) => return,
            };
            let id = guard.id_of(item);
            let Some(&position) = guard.index.get(&id) else {
                trace!("Ignoring selection of unknown item '{id}'");
                return;
            };
            if selected {
                let stored = guard.items[position].clone();
                guard.selection.add(id, stored);
            } else if guard.selection.remove(&id).is_none() {
                return;
            }
        }

        if selected {
            let handlers = self
                .select_handlers
                .read()
                .map(|handlers| handlers.clone())
                .unwrap_or_default();
            for handler in handlers {
                handler(item);
            }
        }
        self.notify_selection();
    }

    /// Select every filtered item. Ignored in single-select mode.
    pub fn select_all(&self) {
        self.select_range(|guard| guard.filtered.clone());
    }

    /// Select the items on the current page. Ignored in single-select mode.
    pub fn select_visible(&self) {
        self.select_range(|guard| guard.visible.clone());
    }

    fn select_range(&self, range: impl FnOnce(&ProviderInner<T>) -> Vec<usize>) {
        {
            let mut guard = match self.inner.write() {
                Ok(guard) if guard.selection.is_multi_select() => guard,
                _ => return,
            };
            let positions = range(&guard);
            guard.selection.reset();
            for position in positions {
                let item = guard.items[position].clone();
                let id = guard.id_of(&item);
                guard.selection.add(id, item);
            }
            debug!("Selected {} items", guard.selection.count());
        }
        self.notify_selection();
    }

    pub fn clear_all_selection(&self) {
        {
            let mut guard = match self.inner.write() {
                Ok(guard) if guard.selection.has_selection() => guard,
                _ => return,
            };
            guard.selection.reset();
        }
        self.notify_selection();
    }

    /// Deselect the items on the current page, keeping the rest.
    pub fn clear_visible_selection(&self) {
        {
            let mut guard = match self.inner.write() {
                Ok(guard) if guard.selection.has_selection() => guard,
                _ => return,
            };
            let visible: HashSet<String> = guard
                .visible
                .iter()
                .map(|&position| guard.id_of(&guard.items[position]))
                .collect();
            for id in &visible {
                guard.selection.remove(id);
            }
        }
        self.notify_selection();
    }

    pub fn selection_info(&self) -> SelectionInfo<T> {
        match self.inner.read() {
            Ok(guard) => guard.selection.clone(),
            Err(poisoned) => poisoned.into_inner().selection.clone(),
        }
    }

    // -------------------------------------------------------------------------
    // Filters and sort
    // -------------------------------------------------------------------------

    /// Add or replace the filter stored under `id`.
    pub fn add_filter(&self, id: &str, filter: impl Fn(&T) -> bool + Send + Sync + 'static) {
        self.add_shared_filter(id, Arc::new(filter));
    }

    pub fn add_shared_filter(&self, id: &str, filter: Filter<T>) {
        self.modify(|guard| {
            guard.filters.insert(id.to_string(), filter);
            true
        });
    }

    pub fn remove_filter(&self, id: &str) {
        self.modify(|guard| guard.filters.remove(id).is_some());
    }

    pub fn clear_filters(&self) {
        self.modify(|guard| {
            let had_filters = !guard.filters.is_empty();
            guard.filters.clear();
            had_filters
        });
    }

    pub fn has_filters(&self) -> bool {
        self.inner
            .read()
            .map(|guard| !guard.filters.is_empty())
            .unwrap_or(false)
    }

    pub fn sort(&self, sort_info: SortInfo<T>) {
        self.modify(|guard| {
            guard.sort_info = sort_info;
            true
        });
    }

    pub fn sort_info(&self) -> SortInfo<T> {
        self.inner
            .read()
            .map(|guard| guard.sort_info.clone())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Paging
    // -------------------------------------------------------------------------

    pub fn page_info(&self) -> PageInfo {
        self.inner
            .read()
            .map(|guard| guard.page_info)
            .unwrap_or_default()
    }

    /// A size of 0 is ignored. The first item of the current page stays
    /// visible.
    pub fn set_page_size(&self, page_size: usize) {
        self.modify(|guard| {
            if page_size == 0 || page_size == guard.page_info.page_size() {
                return false;
            }
            guard.page_info.set_page_size(page_size);
            true
        });
    }

    pub fn goto_first_page(&self) {
        self.goto_page(0);
    }

    pub fn goto_previous_page(&self) {
        let page = self.page_info().page();
        if page > 0 {
            self.goto_page(page - 1);
        }
    }

    pub fn goto_next_page(&self) {
        self.goto_page(self.page_info().page() + 1);
    }

    pub fn goto_last_page(&self) {
        self.goto_page(self.page_info().pages() - 1);
    }

    /// 0-based, clamped to the available pages.
    pub fn goto_page(&self, page: usize) {
        self.modify(|guard| {
            let before = guard.page_info.page();
            guard.page_info.set_page(page);
            guard.page_info.page() != before
        });
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Run `change` under the write lock; if it reports a change, re-apply
    /// and re-render.
    fn modify(&self, change: impl FnOnce(&mut ProviderInner<T>) -> bool) {
        {
            let mut guard = match self.inner.write() {
                Ok(guard) => guard,
                Err(_) => return,
            };
            if !change(&mut guard) {
                return;
            }
            guard.apply();
            trace!(
                "Data provider page {}/{} showing {}",
                guard.page_info.page() + 1,
                guard.page_info.pages(),
                guard.page_info.visible()
            );
        }
        self.show();
    }

    fn displays(&self) -> Vec<Display<T>> {
        self.displays
            .read()
            .map(|displays| displays.clone())
            .unwrap_or_default()
    }

    fn show(&self) {
        let snapshot = self.inner.read().ok().map(|guard| {
            (
                guard.collect(&guard.visible),
                guard.page_info,
                guard.selection.clone(),
                guard.sort_info.clone(),
            )
        });
        let Some((items, page_info, selection, sort_info)) = snapshot else {
            return;
        };
        for display in self.displays() {
            display.show_items(&items, &page_info);
            display.update_selection(&selection);
            display.update_sort_info(&sort_info);
        }
    }

    fn notify_selection(&self) {
        let selection = self.selection_info();
        for display in self.displays() {
            display.update_selection(&selection);
        }
    }
}

impl<T: Clone + Send + Sync + 'static> DataSource<T> for DataProvider<T> {
    fn id_of(&self, item: &T) -> String {
        DataProvider::id_of(self, item)
    }

    fn item(&self, id: &str) -> Option<T> {
        DataProvider::item(self, id)
    }

    fn select(&self, item: &T, selected: bool) {
        DataProvider::select(self, item, selected);
    }

    fn visible_items(&self) -> Vec<T> {
        DataProvider::visible_items(self)
    }

    fn select_all(&self) {
        DataProvider::select_all(self);
    }

    fn select_visible(&self) {
        DataProvider::select_visible(self);
    }

    fn clear_all_selection(&self) {
        DataProvider::clear_all_selection(self);
    }

    fn sort(&self, sort_info: SortInfo<T>) {
        DataProvider::sort(self, sort_info);
    }

    fn add_filter(&self, id: &str, filter: Filter<T>) {
        self.add_shared_filter(id, filter);
    }

    fn remove_filter(&self, id: &str) {
        DataProvider::remove_filter(self, id);
    }

    fn goto_first_page(&self) {
        DataProvider::goto_first_page(self);
    }

    fn goto_previous_page(&self) {
        DataProvider::goto_previous_page(self);
    }

    fn goto_next_page(&self) {
        DataProvider::goto_next_page(self);
    }

    fn goto_last_page(&self) {
        DataProvider::goto_last_page(self);
    }

    fn goto_page(&self, page: usize) {
        DataProvider::goto_page(self, page);
    }

    fn set_page_size(&self, page_size: usize) {
        DataProvider::set_page_size(self, page_size);
    }

    fn page_info(&self) -> PageInfo {
        DataProvider::page_info(self)
    }

    fn selection_info(&self) -> SelectionInfo<T> {
        DataProvider::selection_info(self)
    }
}
