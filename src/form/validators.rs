//! Reusable field validators
//!
//! Each validator receives the field name and its already filtered value.
//! Validators other than `required` let null values through, so optional
//! fields are only checked when filled in.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Validator: field is required (not null, not an empty string)
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Err(format!("'{}' is required", field)),
        Value::String(s) if s.trim().is_empty() => Err(format!("'{}' is required", field)),
        _ => Ok(()),
    }
}

/// Validator: checkbox is ticked
pub fn checked() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Bool(true) => Ok(()),
        _ => Err(format!("'{}' must be checked", field)),
    }
}

/// Validator: string has at least `min` characters
pub fn min_length(min: usize) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            let len = s.chars().count();
            if len < min {
                return Err(format!(
                    "'{}' must have at least {} characters (currently: {})",
                    field, min, len
                ));
            }
        }
        Ok(())
    }
}

/// Validator: string has at most `max` characters
pub fn max_length(max: usize) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            let len = s.chars().count();
            if len > max {
                return Err(format!(
                    "'{}' must not exceed {} characters (currently: {})",
                    field, max, len
                ));
            }
        }
        Ok(())
    }
}

/// Validator: number is at least `min`
pub fn min_value(min: f64) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(num) = value.as_f64() {
            if num < min {
                return Err(format!(
                    "'{}' must be at least {} (value: {})",
                    field, min, num
                ));
            }
        }
        Ok(())
    }
}

/// Validator: number must not exceed maximum
pub fn max_value(max: f64) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(num) = value.as_f64() {
            if num > max {
                return Err(format!(
                    "'{}' must not exceed {} (value: {})",
                    field, max, num
                ));
            }
        }
        Ok(())
    }
}

/// Validator: string matches a compiled pattern
///
/// The pattern is anchored by the caller; `message` replaces the default text.
pub fn pattern(
    regex: Regex,
    message: Option<String>,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            if !regex.is_match(s) {
                return Err(message
                    .clone()
                    .unwrap_or_else(|| format!("'{}' has an invalid format", field)));
            }
        }
        Ok(())
    }
}

/// Validator: value must be in allowed list
pub fn in_list(
    allowed: Vec<String>,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            if !allowed.iter().any(|a| a == s) {
                return Err(format!(
                    "'{}' must be one of: {:?} (current value: {})",
                    field, allowed, s
                ));
            }
        }
        Ok(())
    }
}

/// Validator: date must match format
pub fn date_format(
    format: &'static str,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            if chrono::NaiveDate::parse_from_str(s, format).is_err() {
                return Err(format!(
                    "'{}' must use the format {} (current value: {})",
                    field, format, s
                ));
            }
        }
        Ok(())
    }
}

/// Validator: string is an email address
pub fn email() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| format_check(field, value, email_regex(), "email address")
}

/// Validator: string is an http(s) URL
pub fn url() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| format_check(field, value, url_regex(), "URL")
}

/// Validator: string is an E.164-like phone number
pub fn phone() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| format_check(field, value, phone_regex(), "phone number")
}

fn format_check(field: &str, value: &Value, regex: &Regex, what: &str) -> Result<(), String> {
    match value.as_str() {
        Some(s) if !regex.is_match(s) => Err(format!("'{}' must be a valid {}", field, what)),
        _ => Ok(()),
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
    })
}

fn url_regex() -> &'static Regex {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    URL_REGEX.get_or_init(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("valid url regex"))
}

fn phone_regex() -> &'static Regex {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    // At least 8 digits, max 15 (E.164 standard)
    PHONE_REGEX.get_or_init(|| Regex::new(r"^\+?[1-9]\d{7,14}$").expect("valid phone regex"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // === required() ===

    #[test]
    fn test_required_null_value_returns_error() {
        let v = required();
        let result = v("name", &json!(null));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("required"));
    }

    #[test]
    fn test_required_blank_string_returns_error() {
        let v = required();
        assert!(v("name", &json!("   ")).is_err());
    }

    #[test]
    fn test_required_false_is_a_value() {
        let v = required();
        assert!(v("accepted", &json!(false)).is_ok());
        assert!(v("rooms", &json!(0)).is_ok());
    }

    // === checked() ===

    #[test]
    fn test_checked() {
        let v = checked();
        assert!(v("terms", &json!(true)).is_ok());
        assert!(v("terms", &json!(false)).unwrap_err().contains("must be checked"));
        assert!(v("terms", &json!(null)).is_err());
    }

    // === lengths ===

    #[test]
    fn test_min_length_counts_characters() {
        let v = min_length(3);
        assert!(v("name", &json!("دبي")).is_ok());
        assert!(v("name", &json!("ab")).is_err());
    }

    #[test]
    fn test_max_length() {
        let v = max_length(5);
        assert!(v("code", &json!("abcde")).is_ok());
        let err = v("code", &json!("abcdef")).unwrap_err();
        assert!(err.contains("must not exceed 5"));
    }

    #[test]
    fn test_lengths_ignore_null() {
        assert!(min_length(3)("name", &json!(null)).is_ok());
        assert!(max_length(3)("name", &json!(null)).is_ok());
    }

    // === numeric bounds ===

    #[test]
    fn test_min_and_max_value() {
        assert!(min_value(0.0)("price", &json!(0)).is_ok());
        assert!(min_value(0.0)("price", &json!(-1)).is_err());
        assert!(max_value(10.0)("rooms", &json!(10)).is_ok());
        assert!(max_value(10.0)("rooms", &json!(10.5)).is_err());
    }

    // === pattern() ===

    #[test]
    fn test_pattern_custom_message() {
        let v = pattern(
            Regex::new(r"^[A-Z]{3}-\d+$").unwrap(),
            Some("Use the REF-123 format".to_string()),
        );
        assert!(v("reference", &json!("ABC-42")).is_ok());
        assert_eq!(
            v("reference", &json!("abc")).unwrap_err(),
            "Use the REF-123 format"
        );
    }

    // === in_list() ===

    #[test]
    fn test_in_list() {
        let v = in_list(vec!["villa".to_string(), "apartment".to_string()]);
        assert!(v("type", &json!("villa")).is_ok());
        assert!(v("type", &json!("castle")).is_err());
    }

    // === formats ===

    #[test]
    fn test_date_format() {
        let v = date_format("%Y-%m-%d");
        assert!(v("handover", &json!("2026-03-31")).is_ok());
        assert!(v("handover", &json!("31/03/2026")).is_err());
    }

    #[test]
    fn test_email_validation() {
        let v = email();
        assert!(v("email", &json!("test@example.com")).is_ok());
        assert!(v("email", &json!("user.name+tag@example.co.uk")).is_ok());
        assert!(v("email", &json!("invalid-email")).is_err());
        assert!(v("email", &json!("@example.com")).is_err());
    }

    #[test]
    fn test_url_and_phone() {
        assert!(url()("site", &json!("https://example.com/listing")).is_ok());
        assert!(url()("site", &json!("example")).is_err());
        assert!(phone()("phone", &json!("+971501234567")).is_ok());
        assert!(phone()("phone", &json!("12")).is_err());
    }
}
