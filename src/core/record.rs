//! Records and dot-path field resolution
//!
//! The table engine never inspects records directly. It asks them to resolve a
//! dot-separated path such as `"title.en"` or `"delivery.isImmediate"` into a
//! [`FieldValue`], and treats `None` as an absent value.

use super::field::FieldValue;
use serde_json::{Map, Value};

/// An item that can be searched, filtered and sorted by field path
///
/// Implemented for `serde_json::Value` and `serde_json::Map`. Typed records
/// implement it by matching on the paths they expose:
///
/// ```rust
/// use estate_table::core::{FieldValue, Record};
///
/// struct Partner {
///     name: String,
///     rating: Option<i64>,
/// }
///
/// impl Record for Partner {
///     fn resolve(&self, path: &str) -> Option<FieldValue> {
///         match path {
///             "name" => Some(FieldValue::from(self.name.as_str())),
///             "rating" => self.rating.map(FieldValue::Integer),
///             _ => None,
///         }
///     }
/// }
///
/// let p = Partner { name: "Emaar".into(), rating: None };
/// assert!(p.resolve("rating").is_none());
/// ```
pub trait Record {
    /// Resolve a possibly nested field; `None` when any segment is missing or null
    fn resolve(&self, path: &str) -> Option<FieldValue>;
}

impl Record for Value {
    fn resolve(&self, path: &str) -> Option<FieldValue> {
        resolve_path(self, path).and_then(FieldValue::from_json)
    }
}

impl Record for Map<String, Value> {
    fn resolve(&self, path: &str) -> Option<FieldValue> {
        let (head, rest) = split_head(path)?;
        let first = self.get(head)?;
        match rest {
            Some(rest) => resolve_path(first, rest).and_then(FieldValue::from_json),
            None => FieldValue::from_json(first),
        }
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn resolve(&self, path: &str) -> Option<FieldValue> {
        (**self).resolve(path)
    }
}

impl<R: Record + ?Sized> Record for std::sync::Arc<R> {
    fn resolve(&self, path: &str) -> Option<FieldValue> {
        (**self).resolve(path)
    }
}

/// Walk a JSON tree along a dot-separated path
///
/// Object segments are looked up by key, numeric segments index into arrays.
/// A missing segment, a scalar in the middle of the path, or an empty path
/// resolves to `None` rather than an error.
pub fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let (head, rest) = split_head(path)?;

    let next = match value {
        Value::Object(map) => map.get(head)?,
        Value::Array(items) => items.get(head.parse::<usize>().ok()?)?,
        _ => return None,
    };

    match rest {
        Some(rest) => resolve_path(next, rest),
        None => Some(next),
    }
}

fn split_head(path: &str) -> Option<(&str, Option<&str>)> {
    if path.is_empty() {
        return None;
    }
    match path.split_once('.') {
        Some((head, rest)) if !head.is_empty() => Some((head, Some(rest))),
        Some(_) => None,
        None => Some((path, None)),
    }
}
