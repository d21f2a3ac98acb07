//! Pure pipeline stages: search, filter, sort, paginate
//!
//! Every stage takes the source collection plus a vector of row indices into
//! it and returns a new index vector. The source is never reordered or
//! mutated, so a recomputation is a pure function of its inputs.

use super::{FilterFn, SearchFn};
use crate::core::{FieldValue, FilterSet, Record, SortDirection, SortSpec};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::ops::Range;

/// Normalized form of a search term: trimmed and lower-cased
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Keep rows whose record matches the (already normalized) term
///
/// An empty term disables the stage. Order is preserved.
pub fn search<T>(data: &[T], rows: Vec<usize>, term: &str, search_fn: &SearchFn<T>) -> Vec<usize> {
    if term.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|&i| search_fn(&data[i], term))
        .collect()
}

/// Keep rows that satisfy every active filter with a registered predicate
///
/// Filters compose with AND. Disabled filters and filters without a
/// predicate have no effect.
pub fn filter<T>(
    data: &[T],
    rows: Vec<usize>,
    filters: &FilterSet,
    filter_fns: &IndexMap<String, FilterFn<T>>,
) -> Vec<usize> {
    let active: Vec<(&FilterFn<T>, &str)> = filters
        .iter_active()
        .filter_map(|(key, value)| filter_fns.get(key).map(|f| (f, value)))
        .collect();

    if active.is_empty() {
        return rows;
    }

    rows.into_iter()
        .filter(|&i| active.iter().all(|&(f, value)| f(&data[i], value)))
        .collect()
}

/// Stable sort of rows by the resolved value of `spec.key`
///
/// Keys are resolved once per row before sorting.
pub fn sort<T: Record>(data: &[T], rows: Vec<usize>, spec: &SortSpec) -> Vec<usize> {
    let mut keyed: Vec<(Option<FieldValue>, usize)> = rows
        .into_iter()
        .map(|i| (data[i].resolve(&spec.key), i))
        .collect();

    // slice::sort_by is stable
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a.as_ref(), b.as_ref(), spec.direction));

    keyed.into_iter().map(|(_, i)| i).collect()
}

/// Compare two resolved sort keys
///
/// Absent values come after every present value in both directions; only
/// present values are subject to the direction.
pub fn compare_keys(
    a: Option<&FieldValue>,
    b: Option<&FieldValue>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match direction {
            SortDirection::Ascending => a.compare(b),
            SortDirection::Descending => a.compare(b).reverse(),
        },
    }
}

/// `ceil(total_items / items_per_page)`, never below 1
pub fn total_pages(total_items: usize, items_per_page: usize) -> usize {
    total_items.div_ceil(items_per_page.max(1)).max(1)
}

/// Clamp a requested page into `[1, max(1, total_pages)]`
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Rows visible on `page`
pub fn paginate(rows: &[usize], page: usize, items_per_page: usize) -> &[usize] {
    &rows[page_range(page, items_per_page, rows.len())]
}

/// Row range visible on `page`
pub fn page_range(page: usize, items_per_page: usize, total_items: usize) -> Range<usize> {
    let start = page
        .saturating_sub(1)
        .saturating_mul(items_per_page)
        .min(total_items);
    let end = start.saturating_add(items_per_page).min(total_items);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn leads() -> Vec<Value> {
        vec![
            json!({"id": 0, "name": "Amir Haddad", "status": "active", "budget": 300, "city": "Dubai"}),
            json!({"id": 1, "name": "Sara Amiri", "status": "closed", "budget": 150, "city": "Abu Dhabi"}),
            json!({"id": 2, "name": "Omar Khalil", "status": "active", "budget": null, "city": "Dubai"}),
            json!({"id": 3, "name": "Lina Amir", "status": "active", "budget": 150, "city": "Sharjah"}),
            json!({"id": 4, "name": "Yousef Nasser", "status": "new", "city": "Dubai"}),
            json!({"id": 5, "name": "Huda Saleh", "status": "active", "budget": 150, "city": "Dubai"}),
        ]
    }

    fn all_rows(data: &[Value]) -> Vec<usize> {
        (0..data.len()).collect()
    }

    fn name_search() -> SearchFn<Value> {
        Arc::new(|r: &Value, term: &str| {
            r["name"]
                .as_str()
                .is_some_and(|n| n.to_lowercase().contains(term))
        })
    }

    fn field_filters() -> IndexMap<String, FilterFn<Value>> {
        let mut fns: IndexMap<String, FilterFn<Value>> = IndexMap::new();
        fns.insert(
            "status".to_string(),
            Arc::new(|r: &Value, v: &str| r["status"] == v),
        );
        fns.insert("city".to_string(), Arc::new(|r: &Value, v: &str| r["city"] == v));
        fns
    }

    #[test]
    fn test_normalize_term() {
        assert_eq!(normalize_term("  AmIr "), "amir");
        assert_eq!(normalize_term("   "), "");
    }

    #[test]
    fn test_search_empty_term_keeps_all() {
        let data = leads();
        let rows = search(&data, all_rows(&data), "", &name_search());
        assert_eq!(rows, all_rows(&data));
    }

    #[test]
    fn test_search_preserves_order() {
        let data = leads();
        let rows = search(&data, all_rows(&data), "amir", &name_search());
        assert_eq!(rows, vec![0, 1, 3]);
    }

    #[test]
    fn test_search_is_idempotent() {
        let data = leads();
        let f = name_search();
        let once = search(&data, all_rows(&data), "amir", &f);
        let twice = search(&data, once.clone(), "amir", &f);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_and_composition() {
        let data = leads();
        let filters: FilterSet = [("status", "active"), ("city", "Dubai")]
            .into_iter()
            .collect();
        let rows = filter(&data, all_rows(&data), &filters, &field_filters());
        assert_eq!(rows, vec![0, 2, 5]);
    }

    #[test]
    fn test_filter_commutes() {
        let data = leads();
        let fns = field_filters();
        let ab: FilterSet = [("status", "active"), ("city", "Dubai")].into_iter().collect();
        let ba: FilterSet = [("city", "Dubai"), ("status", "active")].into_iter().collect();
        assert_eq!(
            filter(&data, all_rows(&data), &ab, &fns),
            filter(&data, all_rows(&data), &ba, &fns)
        );
    }

    #[test]
    fn test_filter_disabled_and_unknown_have_no_effect() {
        let data = leads();
        let filters: FilterSet = [("status", "all"), ("partnerType", "finishing")]
            .into_iter()
            .collect();
        let rows = filter(&data, all_rows(&data), &filters, &field_filters());
        assert_eq!(rows, all_rows(&data));
    }

    #[test]
    fn test_sort_is_stable_for_duplicates() {
        let data = leads();
        let rows = sort(&data, all_rows(&data), &SortSpec::asc("budget"));
        // 150 appears for rows 1, 3, 5 in that order; absent rows 2, 4 last
        assert_eq!(rows, vec![1, 3, 5, 0, 2, 4]);

        let rows = sort(&data, all_rows(&data), &SortSpec::desc("budget"));
        assert_eq!(rows, vec![0, 1, 3, 5, 2, 4]);
    }

    #[test]
    fn test_absent_values_always_last() {
        let data = leads();
        for spec in [SortSpec::asc("budget"), SortSpec::desc("budget")] {
            let rows = sort(&data, all_rows(&data), &spec);
            let first_absent = rows
                .iter()
                .position(|&i| data[i].resolve("budget").is_none())
                .unwrap();
            assert!(
                rows[first_absent..]
                    .iter()
                    .all(|&i| data[i].resolve("budget").is_none())
            );
        }
    }

    #[test]
    fn test_sort_unknown_key_preserves_order() {
        let data = leads();
        let rows = sort(&data, vec![4, 2, 0], &SortSpec::desc("does.not.exist"));
        assert_eq!(rows, vec![4, 2, 0]);
    }

    #[test]
    fn test_sort_strings() {
        let data = leads();
        let rows = sort(&data, all_rows(&data), &SortSpec::asc("name"));
        assert_eq!(rows, vec![0, 5, 3, 2, 1, 4]);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 10), 3);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(5, 0), 1);
    }

    #[test]
    fn test_page_range() {
        assert_eq!(page_range(1, 10, 25), 0..10);
        assert_eq!(page_range(3, 10, 25), 20..25);
        assert_eq!(page_range(4, 10, 25), 25..25);
        assert_eq!(page_range(1, 10, 0), 0..0);
    }

    #[test]
    fn test_paginate() {
        let rows: Vec<usize> = (0..25).rev().collect();
        assert_eq!(paginate(&rows, 3, 10), &[4, 3, 2, 1, 0]);
        assert!(paginate(&rows, 4, 10).is_empty());
    }
}
