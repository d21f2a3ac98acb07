//! Declarative form field definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input widget of a field; decides filtering and built-in format checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Textarea,
    Email,
    Number,
    Select,
    Checkbox,
    Date,
    Phone,
    Url,
}

impl FieldKind {
    /// HTML `type` attribute of the rendered input
    pub fn input_type(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Textarea => "textarea",
            FieldKind::Email => "email",
            FieldKind::Number => "number",
            FieldKind::Select => "select",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Date => "date",
            FieldKind::Phone => "tel",
            FieldKind::Url => "url",
        }
    }

    /// Whether submitted values are free text
    pub fn is_textual(&self) -> bool {
        !matches!(self, FieldKind::Number | FieldKind::Checkbox)
    }
}

/// A validation rule attached to a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FieldRule {
    Required,
    MinLength {
        value: usize,
    },
    MaxLength {
        value: usize,
    },
    Min {
        value: f64,
    },
    Max {
        value: f64,
    },
    Pattern {
        value: String,
        #[serde(default)]
        message: Option<String>,
    },
}

/// Choice of a select field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// One field of a dynamic form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    /// Key of the field in the submitted payload
    pub name: String,

    pub label: String,

    #[serde(default)]
    pub kind: FieldKind,

    #[serde(default)]
    pub rules: Vec<FieldRule>,

    /// Allowed values for select fields
    #[serde(default)]
    pub options: Vec<SelectOption>,

    /// Value used when the field is missing or empty
    #[serde(default)]
    pub default: Option<Value>,
}

impl FormField {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            rules: Vec::new(),
            options: Vec::new(),
            default: None,
        }
    }

    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn required(self) -> Self {
        self.rule(FieldRule::Required)
    }

    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(SelectOption {
            value: value.into(),
            label: label.into(),
        });
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules.contains(&FieldRule::Required)
    }
}

/// Constraints a renderer puts on the input element
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct InputConstraints {
    pub input_type: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}
