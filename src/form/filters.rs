//! Reusable input filters
//!
//! These filters transform submitted values before validation

use anyhow::{Result, anyhow};
use serde_json::{Number, Value};

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.trim().to_string()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: convert string to lowercase
pub fn lowercase() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.to_lowercase()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: empty string becomes null
pub fn empty_to_null() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| match value {
        Value::String(s) if s.is_empty() => Ok(Value::Null),
        other => Ok(other),
    }
}

/// Filter: numeric strings become numbers
///
/// Integers stay integers; anything that is neither a number nor null fails.
pub fn to_number() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |field: &str, value: Value| match value {
        Value::Null | Value::Number(_) => Ok(value),
        Value::String(s) => {
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Value::Number(i.into()));
            }
            s.parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| anyhow!("'{}' must be a number (value: {})", field, s))
        }
        other => Err(anyhow!("'{}' must be a number (value: {})", field, other)),
    }
}

/// Filter: checkbox-style values become booleans; absent means unchecked
pub fn to_bool() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |field: &str, value: Value| match value {
        Value::Null => Ok(Value::Bool(false)),
        Value::Bool(_) => Ok(value),
        Value::String(ref s) => match s.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(Value::Bool(true)),
            "false" | "off" | "no" | "0" | "" => Ok(Value::Bool(false)),
            _ => Err(anyhow!("'{}' must be true or false (value: {})", field, s)),
        },
        Value::Number(ref n) => Ok(Value::Bool(n.as_f64().is_some_and(|n| n != 0.0))),
        other => Err(anyhow!("'{}' must be true or false (value: {})", field, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // === trim() ===

    #[test]
    fn test_trim_removes_whitespace() {
        let f = trim();
        let result = f("name", json!("  hello  ")).expect("should not fail");
        assert_eq!(result, json!("hello"));
    }

    #[test]
    fn test_trim_non_string_passthrough() {
        let f = trim();
        let result = f("age", json!(42)).expect("should not fail");
        assert_eq!(result, json!(42));
    }

    // === lowercase() ===

    #[test]
    fn test_lowercase_converts_string() {
        let f = lowercase();
        let result = f("email", json!("Hello@WORLD.com")).expect("should not fail");
        assert_eq!(result, json!("hello@world.com"));
    }

    // === empty_to_null() ===

    #[test]
    fn test_empty_to_null() {
        let f = empty_to_null();
        assert_eq!(f("name", json!("")).unwrap(), json!(null));
        assert_eq!(f("name", json!("x")).unwrap(), json!("x"));
    }

    // === to_number() ===

    #[test]
    fn test_to_number_parses_strings() {
        let f = to_number();
        assert_eq!(f("rooms", json!("3")).unwrap(), json!(3));
        assert_eq!(f("area", json!("120.5")).unwrap(), json!(120.5));
        assert_eq!(f("area", json!(null)).unwrap(), json!(null));
    }

    #[test]
    fn test_to_number_rejects_text() {
        let f = to_number();
        let err = f("price", json!("cheap")).unwrap_err();
        assert!(err.to_string().contains("must be a number"));
        assert!(f("price", json!(true)).is_err());
    }

    // === to_bool() ===

    #[test]
    fn test_to_bool() {
        let f = to_bool();
        assert_eq!(f("featured", json!(null)).unwrap(), json!(false));
        assert_eq!(f("featured", json!("on")).unwrap(), json!(true));
        assert_eq!(f("featured", json!(0)).unwrap(), json!(false));
        assert!(f("featured", json!("maybe")).is_err());
    }
}
