//! Sort specifications, pagination metadata and table query snapshots

use crate::core::error::ConfigError;
use crate::core::filter::FilterValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of the active sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    /// Short form used in `field:dir` expressions
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// The single active sort of a table
///
/// `key` is a dot path resolved against every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    pub fn asc(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Descending)
    }

    /// Parse a sort expression
    ///
    /// # Format
    /// - `field:asc` or `field` (ascending)
    /// - `field:desc` (descending)
    ///
    /// # Example
    /// ```
    /// use estate_table::core::{SortDirection, SortSpec};
    ///
    /// let sort = SortSpec::parse("createdAt:desc").unwrap();
    /// assert_eq!(sort.key, "createdAt");
    /// assert_eq!(sort.direction, SortDirection::Descending);
    /// ```
    pub fn parse(expr: &str) -> Result<Self, ConfigError> {
        let invalid = |message: &str| ConfigError::InvalidSort {
            value: expr.to_string(),
            message: message.to_string(),
        };

        let expr_trimmed = expr.trim();
        let (key, direction) = match expr_trimmed.rsplit_once(':') {
            Some((key, dir)) => {
                let direction = match dir.trim().to_ascii_lowercase().as_str() {
                    "asc" | "ascending" => SortDirection::Ascending,
                    "desc" | "descending" => SortDirection::Descending,
                    _ => return Err(invalid("direction must be 'asc' or 'desc'")),
                };
                (key.trim(), direction)
            }
            None => (expr_trimmed, SortDirection::Ascending),
        };

        if key.is_empty() {
            return Err(invalid("sort key is empty"));
        }

        Ok(Self::new(key, direction))
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.direction.as_str())
    }
}

impl FromStr for SortSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Tri-state sort arrow for a column header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortIndicator {
    None,
    Ascending,
    Descending,
}

impl SortIndicator {
    /// Glyph rendered next to a column title
    pub fn symbol(&self) -> &'static str {
        match self {
            SortIndicator::None => "⇅",
            SortIndicator::Ascending => "▲",
            SortIndicator::Descending => "▼",
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub items_per_page: usize,

    /// Total number of items (after search and filters)
    pub total_items: usize,

    /// Total number of pages, never below 1
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata, clamping `page` into range
    pub fn new(page: usize, items_per_page: usize, total_items: usize) -> Self {
        let items_per_page = items_per_page.max(1);
        let total_pages = total_items.div_ceil(items_per_page).max(1);
        let page = page.clamp(1, total_pages);

        Self {
            page,
            items_per_page,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// Serializable snapshot of a table's user-facing state
///
/// Lets a list page persist and restore its state, e.g. through URL query
/// strings:
///
/// ```text
/// page=2&search=amir&sort=createdAt:desc&filters[status]=active
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableQuery {
    /// Page number (starts at 1)
    pub page: usize,

    /// Raw search term
    pub search: String,

    /// Filter values; `"all"` or empty disables a filter
    pub filters: IndexMap<String, String>,

    /// Sort expression (`field:asc` / `field:desc`)
    pub sort: Option<String>,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
            filters: IndexMap::new(),
            sort: None,
        }
    }
}

impl TableQuery {
    /// Page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Parse the sort expression, if any
    pub fn sort_spec(&self) -> Result<Option<SortSpec>, ConfigError> {
        self.sort.as_deref().map(SortSpec::parse).transpose()
    }

    /// Iterate over filter values in their typed form
    pub fn filter_values(&self) -> impl Iterator<Item = (&str, FilterValue)> {
        self.filters
            .iter()
            .map(|(k, v)| (k.as_str(), FilterValue::from(v.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parse_forms() {
        assert_eq!(SortSpec::parse("name").unwrap(), SortSpec::asc("name"));
        assert_eq!(SortSpec::parse("name:asc").unwrap(), SortSpec::asc("name"));
        assert_eq!(
            SortSpec::parse(" title.en : DESC ").unwrap(),
            SortSpec::desc("title.en")
        );
    }

    #[test]
    fn test_sort_parse_rejects_garbage() {
        assert!(SortSpec::parse("").is_err());
        assert!(SortSpec::parse(":desc").is_err());
        assert!(SortSpec::parse("name:sideways").is_err());
    }

    #[test]
    fn test_sort_display_round_trips() {
        let spec = SortSpec::desc("createdAt");
        assert_eq!(spec.to_string(), "createdAt:desc");
        assert_eq!(spec.to_string().parse::<SortSpec>().unwrap(), spec);
    }

    #[test]
    fn test_sort_direction_serde_aliases() {
        let spec: SortSpec =
            serde_json::from_str(r#"{"key": "price", "direction": "desc"}"#).unwrap();
        assert_eq!(spec.direction, SortDirection::Descending);
        let spec: SortSpec = serde_json::from_str(r#"{"key": "price"}"#).unwrap();
        assert_eq!(spec.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 20, 145);
        assert_eq!(meta.total_items, 145);
        assert_eq!(meta.total_pages, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);
    }

    #[test]
    fn test_pagination_meta_empty_is_one_page() {
        let meta = PaginationMeta::new(3, 10, 0);
        assert_eq!(meta.total_pages, 1);
        assert_eq!(meta.page, 1);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn test_sort_indicator_symbols() {
        assert_eq!(SortIndicator::None.symbol(), "⇅");
        assert_eq!(SortIndicator::Ascending.symbol(), "▲");
        assert_eq!(SortIndicator::Descending.symbol(), "▼");
    }

    #[test]
    fn test_table_query_defaults() {
        let q: TableQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.page(), 1);
        assert!(q.search.is_empty());
        assert_eq!(q.sort_spec().unwrap(), None);
    }
}
