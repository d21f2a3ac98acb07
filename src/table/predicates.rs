//! Declarative search and filter predicates
//!
//! List pages that only need "does any of these fields contain the term" or
//! "does this field equal the selected option" build their predicates here
//! instead of writing closures by hand. Table configuration files compile to
//! the same predicates.

use super::{FilterFn, SearchFn};
use crate::core::{FieldValue, Record};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

/// Case-insensitive substring search over several field paths
///
/// A record matches when any listed path resolves to a value whose text form
/// contains the normalized term.
pub fn search_fields<T>(paths: Vec<String>) -> SearchFn<T>
where
    T: Record + 'static,
{
    Arc::new(move |record: &T, term: &str| {
        paths.iter().any(|path| {
            record
                .resolve(path)
                .is_some_and(|value| value.to_display_string().to_lowercase().contains(term))
        })
    })
}

/// How a filter value is matched against a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMatch {
    /// Text form equals the filter value, ignoring case
    #[default]
    Equals,

    /// Text form contains the filter value, ignoring case
    Contains,

    /// Field is at least the filter value
    Min,

    /// Field is at most the filter value
    Max,

    /// `"true"` keeps records where the field is present, `"false"` where it is absent
    Exists,
}

impl FilterMatch {
    /// Compile into a predicate over `field`
    pub fn predicate<T>(self, field: impl Into<String>) -> FilterFn<T>
    where
        T: Record + 'static,
    {
        let field = field.into();
        Arc::new(move |record: &T, value: &str| self.matches(record.resolve(&field), value))
    }

    /// Match a resolved field against a filter value
    pub fn matches(self, field: Option<FieldValue>, value: &str) -> bool {
        match self {
            FilterMatch::Exists => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => field.is_some(),
                "false" | "no" | "0" => field.is_none(),
                _ => true,
            },
            FilterMatch::Equals => {
                field.is_some_and(|f| f.to_display_string().eq_ignore_ascii_case(value.trim()))
            }
            FilterMatch::Contains => field.is_some_and(|f| {
                f.to_display_string()
                    .to_lowercase()
                    .contains(&value.trim().to_lowercase())
            }),
            FilterMatch::Min => {
                field.is_some_and(|f| compare_to_bound(&f, value) != Ordering::Less)
            }
            FilterMatch::Max => {
                field.is_some_and(|f| compare_to_bound(&f, value) != Ordering::Greater)
            }
        }
    }
}

// Numeric fields compare numerically when the bound parses as a number,
// everything else compares by text form.
fn compare_to_bound(field: &FieldValue, bound: &str) -> Ordering {
    let bound = bound.trim();
    match (field.as_f64(), bound.parse::<f64>()) {
        (Some(n), Ok(b)) => n.total_cmp(&b),
        _ => field.to_display_string().as_str().cmp(bound),
    }
}
