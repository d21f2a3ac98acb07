//! The table engine and its builder

use super::pipeline;
use super::state::EngineState;
use super::{DEFAULT_ITEMS_PER_PAGE, FilterFn, SearchFn};
use crate::core::filter::ALL;
use crate::core::{
    ConfigError, FilterSet, FilterValue, PaginationMeta, Record, SortDirection, SortIndicator,
    SortSpec, TableError, TableQuery,
};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Owned snapshot of the visible page
#[derive(Debug, Clone, Serialize)]
pub struct TablePage<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
    pub search_term: String,
    pub filters: FilterSet,
    pub sort: SortSpec,
}

/// In-memory search, filter, sort and pagination over a record collection
///
/// The engine keeps the caller's collection as-is and caches the pipeline
/// result as row indices. Search, filter, sort and data changes recompute the
/// pipeline; page navigation only re-slices it.
///
/// # Example
///
/// ```rust
/// use estate_table::prelude::*;
/// use serde_json::json;
///
/// let leads = vec![
///     json!({"name": "Amir", "status": "active", "createdAt": "2024-03-01"}),
///     json!({"name": "Sara", "status": "closed", "createdAt": "2024-02-01"}),
/// ];
///
/// let mut table = TableEngine::builder()
///     .data(leads)
///     .initial_sort(SortSpec::desc("createdAt"))
///     .search(|lead: &serde_json::Value, term: &str| {
///         lead["name"].as_str().is_some_and(|n| n.to_lowercase().contains(term))
///     })
///     .filter("status", |lead: &serde_json::Value, value: &str| lead["status"] == value)
///     .build()?;
///
/// table.set_filter("status", "active");
/// assert_eq!(table.total_items(), 1);
/// assert_eq!(table.sort_indicator("createdAt"), SortIndicator::Descending);
/// # Ok::<(), TableError>(())
/// ```
pub struct TableEngine<T> {
    data: Vec<T>,
    items_per_page: usize,
    search_fn: Option<SearchFn<T>>,
    filter_fns: IndexMap<String, FilterFn<T>>,
    state: EngineState,
    rows: Vec<usize>,
}

impl<T> fmt::Debug for TableEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableEngine")
            .field("records", &self.data.len())
            .field("matched", &self.rows.len())
            .field("items_per_page", &self.items_per_page)
            .field("filter_fns", &self.filter_fns.keys().collect::<Vec<_>>())
            .field("state", &self.state)
            .finish()
    }
}

impl<T: Record> TableEngine<T> {
    pub fn builder() -> TableEngineBuilder<T> {
        TableEngineBuilder::new()
    }

    // === Mutators ===

    /// Store the raw search term; resets to page 1 when it changes
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term == self.state.search_term {
            return;
        }
        self.state.search_term = term;
        self.state.current_page = 1;
        self.recompute();
    }

    /// Store a filter value verbatim; resets to page 1 when it changes
    ///
    /// `"all"`, empty values and [`FilterValue::Disabled`] disable the filter.
    /// Keys with no registered predicate are stored but have no effect.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        let key = key.into();
        if !self.filter_fns.contains_key(&key) {
            tracing::trace!(filter = %key, "filter has no predicate, value stored without effect");
        }
        if self.state.filters.set(key, value) {
            self.state.current_page = 1;
            self.recompute();
        }
    }

    /// Disable every filter
    pub fn clear_filters(&mut self) {
        if self.state.filters.clear() {
            self.state.current_page = 1;
            self.recompute();
        }
    }

    /// Column-click sort cycle
    ///
    /// Same key while ascending switches to descending; anything else sorts
    /// ascending by `key`. The current page is kept.
    pub fn request_sort(&mut self, key: &str) {
        let direction = if self.state.sort.key == key
            && self.state.sort.direction == SortDirection::Ascending
        {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        self.set_sort(SortSpec::new(key, direction));
    }

    /// Replace the active sort; the current page is kept
    pub fn set_sort(&mut self, sort: SortSpec) {
        if sort == self.state.sort {
            return;
        }
        tracing::debug!(sort = %sort, "table sort changed");
        self.state.sort = sort;
        self.recompute();
    }

    /// Navigate to a page, clamped into `[1, total_pages]`
    pub fn set_current_page(&mut self, page: usize) {
        let clamped = pipeline::clamp_page(page, self.total_pages());
        if clamped != page {
            tracing::debug!(requested = page, clamped, "page request clamped");
        }
        self.state.current_page = clamped;
    }

    pub fn next_page(&mut self) {
        self.set_current_page(self.state.current_page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_current_page(self.state.current_page.saturating_sub(1));
    }

    /// Hand the engine a freshly fetched collection
    ///
    /// The current page is kept when still in range and clamped otherwise.
    pub fn set_data(&mut self, data: impl Into<Option<Vec<T>>>) {
        self.data = data.into().unwrap_or_default();
        self.recompute();
    }

    /// Restore search, filters, sort and page from a snapshot
    ///
    /// Filters missing from the snapshot are dropped. A snapshot without a
    /// sort keeps the current one. The sort expression is parsed before
    /// anything is applied, so an invalid snapshot leaves the engine untouched.
    pub fn apply_query(&mut self, query: &TableQuery) -> Result<(), ConfigError> {
        let sort = query.sort_spec()?;

        let filters: FilterSet = query.filter_values().collect();
        for (key, _) in filters.iter_active() {
            if !self.filter_fns.contains_key(key) {
                tracing::trace!(filter = %key, "restored filter has no predicate");
            }
        }

        self.state.search_term = query.search.clone();
        self.state.filters = filters;
        if let Some(sort) = sort {
            self.state.sort = sort;
        }
        self.recompute();
        self.set_current_page(query.page());
        Ok(())
    }

    // === Queries ===

    /// Records on the current page, in pipeline order
    pub fn paged_items(&self) -> Vec<&T> {
        pipeline::paginate(&self.rows, self.state.current_page, self.items_per_page)
            .iter()
            .map(|&i| &self.data[i])
            .collect()
    }

    /// Every record surviving search and filters, in sorted order
    pub fn matched_items(&self) -> Vec<&T> {
        self.rows.iter().map(|&i| &self.data[i]).collect()
    }

    /// Owned snapshot of the current page and controls
    pub fn page(&self) -> TablePage<T>
    where
        T: Clone,
    {
        TablePage {
            items: self.paged_items().into_iter().cloned().collect(),
            pagination: self.pagination(),
            search_term: self.state.search_term.clone(),
            filters: self.state.filters.clone(),
            sort: self.state.sort.clone(),
        }
    }

    /// Total pages, at least 1 even for an empty result
    pub fn total_pages(&self) -> usize {
        pipeline::total_pages(self.rows.len(), self.items_per_page)
    }

    /// Number of records surviving search and filters
    pub fn total_items(&self) -> usize {
        self.rows.len()
    }

    pub fn current_page(&self) -> usize {
        self.state.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn search_term(&self) -> &str {
        &self.state.search_term
    }

    pub fn filters(&self) -> &FilterSet {
        &self.state.filters
    }

    pub fn sort(&self) -> &SortSpec {
        &self.state.sort
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Number of records in the source collection
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sort arrow for a column
    pub fn sort_indicator(&self, key: &str) -> SortIndicator {
        if self.state.sort.key != key {
            return SortIndicator::None;
        }
        match self.state.sort.direction {
            SortDirection::Ascending => SortIndicator::Ascending,
            SortDirection::Descending => SortIndicator::Descending,
        }
    }

    pub fn pagination(&self) -> PaginationMeta {
        PaginationMeta::new(self.state.current_page, self.items_per_page, self.rows.len())
    }

    /// Snapshot of the user-facing state
    pub fn query(&self) -> TableQuery {
        TableQuery {
            page: self.state.current_page,
            search: self.state.search_term.clone(),
            filters: self
                .state
                .filters
                .iter()
                .map(|(k, v)| (k.to_string(), v.as_active().unwrap_or(ALL).to_string()))
                .collect(),
            sort: Some(self.state.sort.to_string()),
        }
    }

    // === Pipeline ===

    fn recompute(&mut self) {
        let mut rows: Vec<usize> = (0..self.data.len()).collect();

        if let Some(search_fn) = &self.search_fn {
            let term = self.state.normalized_search();
            rows = pipeline::search(&self.data, rows, &term, search_fn);
        }
        rows = pipeline::filter(&self.data, rows, &self.state.filters, &self.filter_fns);
        rows = pipeline::sort(&self.data, rows, &self.state.sort);

        self.rows = rows;

        let total_pages = self.total_pages();
        if self.state.current_page > total_pages {
            tracing::debug!(
                page = self.state.current_page,
                total_pages,
                "current page out of range after recompute, clamping"
            );
        }
        self.state.current_page = pipeline::clamp_page(self.state.current_page, total_pages);

        tracing::debug!(
            records = self.data.len(),
            matched = self.rows.len(),
            page = self.state.current_page,
            total_pages,
            sort = %self.state.sort,
            "table pipeline recomputed"
        );
    }
}

/// Builder for [`TableEngine`]
///
/// `initial_sort` is required; everything else has a default.
pub struct TableEngineBuilder<T> {
    data: Option<Vec<T>>,
    items_per_page: usize,
    initial_sort: Option<SortSpec>,
    search_fn: Option<SearchFn<T>>,
    filter_fns: IndexMap<String, FilterFn<T>>,
    initial_filters: FilterSet,
}

impl<T> Default for TableEngineBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TableEngineBuilder<T> {
    pub fn new() -> Self {
        Self {
            data: None,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            initial_sort: None,
            search_fn: None,
            filter_fns: IndexMap::new(),
            initial_filters: FilterSet::new(),
        }
    }

    /// Source collection; `None` while loading is treated as empty
    pub fn data(mut self, data: impl Into<Option<Vec<T>>>) -> Self {
        self.data = data.into();
        self
    }

    pub fn items_per_page(mut self, items_per_page: usize) -> Self {
        self.items_per_page = items_per_page;
        self
    }

    pub fn initial_sort(mut self, sort: SortSpec) -> Self {
        self.initial_sort = Some(sort);
        self
    }

    pub fn search<F>(self, f: F) -> Self
    where
        F: Fn(&T, &str) -> bool + Send + Sync + 'static,
    {
        self.search_fn(Arc::new(f))
    }

    pub fn search_fn(mut self, f: SearchFn<T>) -> Self {
        self.search_fn = Some(f);
        self
    }

    pub fn filter<F>(self, key: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T, &str) -> bool + Send + Sync + 'static,
    {
        self.filter_fn(key, Arc::new(f))
    }

    pub fn filter_fn(mut self, key: impl Into<String>, f: FilterFn<T>) -> Self {
        self.filter_fns.insert(key.into(), f);
        self
    }

    /// Pre-seed a filter value, e.g. a scope fixed by the parent route
    pub fn initial_filter(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.initial_filters.set(key, value);
        self
    }

    pub fn initial_filters(mut self, filters: FilterSet) -> Self {
        self.initial_filters = filters;
        self
    }
}

impl<T: Record> TableEngineBuilder<T> {
    /// Build the engine and run the pipeline once
    pub fn build(self) -> Result<TableEngine<T>, TableError> {
        if self.items_per_page == 0 {
            return Err(ConfigError::InvalidItemsPerPage {
                value: self.items_per_page,
            }
            .into());
        }
        let sort = self.initial_sort.ok_or(ConfigError::MissingInitialSort)?;

        let mut engine = TableEngine {
            data: self.data.unwrap_or_default(),
            items_per_page: self.items_per_page,
            search_fn: self.search_fn,
            filter_fns: self.filter_fns,
            state: EngineState::new(sort, self.initial_filters),
            rows: Vec::new(),
        };
        engine.recompute();
        Ok(engine)
    }
}
