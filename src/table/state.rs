//! User-facing state owned by a single table engine

use super::pipeline::normalize_term;
use crate::core::{FilterSet, SortSpec};
use serde::Serialize;

/// Page, search term, filters and sort of one table
///
/// Only the owning [`TableEngine`](super::TableEngine) mutates it, so the
/// page-reset and clamping rules always hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineState {
    /// Current page, always within `[1, max(1, total_pages)]`
    pub current_page: usize,

    /// Raw search term as typed
    pub search_term: String,

    pub filters: FilterSet,

    pub sort: SortSpec,
}

impl EngineState {
    pub(crate) fn new(sort: SortSpec, filters: FilterSet) -> Self {
        Self {
            current_page: 1,
            search_term: String::new(),
            filters,
            sort,
        }
    }

    /// Trimmed, lower-cased search term compared by the search stage
    pub fn normalized_search(&self) -> String {
        normalize_term(&self.search_term)
    }
}
