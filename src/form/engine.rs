//! Compiled dynamic forms

use super::field::{FieldKind, FieldRule, FormField, InputConstraints};
use super::{filters, validators};
use crate::core::{FieldValidationError, ValidationError};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

type Validator = Arc<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;
type InputFilter = Arc<dyn Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync>;

struct CompiledField {
    field: FormField,
    constraints: InputConstraints,
    filters: Vec<InputFilter>,
    validators: Vec<Validator>,
}

/// A form whose field definitions have been compiled into input constraints,
/// input filters and validators
///
/// ```rust
/// use estate_table::form::{DynamicForm, FieldKind, FieldRule, FormField};
/// use serde_json::json;
///
/// let form = DynamicForm::compile(vec![
///     FormField::new("name", "Name", FieldKind::Text).required(),
///     FormField::new("budget", "Budget", FieldKind::Number).rule(FieldRule::Min { value: 0.0 }),
/// ])?;
///
/// let payload = form.submit(&json!({"name": "  Amir ", "budget": "1500000", "spam": 1}))?;
/// assert_eq!(payload, json!({"name": "Amir", "budget": 1500000}));
/// # Ok::<(), estate_table::core::ValidationError>(())
/// ```
pub struct DynamicForm {
    fields: Vec<CompiledField>,
}

impl std::fmt::Debug for DynamicForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicForm")
            .field(
                "fields",
                &self.fields.iter().map(|c| &c.field.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl DynamicForm {
    /// Compile field definitions
    ///
    /// Fails on duplicate names, unparsable patterns and contradictory bounds.
    pub fn compile(fields: Vec<FormField>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        let mut compiled = Vec::with_capacity(fields.len());

        for field in fields {
            if !seen.insert(field.name.clone()) {
                return Err(invalid_rule(&field.name, "duplicate field name"));
            }
            compiled.push(compile_field(field)?);
        }

        tracing::debug!(fields = compiled.len(), "dynamic form compiled");
        Ok(Self { fields: compiled })
    }

    /// Compile a JSON array of field definitions
    pub fn from_json(definition: Value) -> Result<Self, ValidationError> {
        let fields: Vec<FormField> =
            serde_json::from_value(definition).map_err(|e| ValidationError::InvalidPayload {
                message: format!("invalid form definition: {}", e),
            })?;
        Self::compile(fields)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FormField> {
        self.fields.iter().map(|c| &c.field)
    }

    /// Rendering constraints of a field
    pub fn constraints(&self, name: &str) -> Option<&InputConstraints> {
        self.fields
            .iter()
            .find(|c| c.field.name == name)
            .map(|c| &c.constraints)
    }

    /// Filter, validate and shape a submission
    ///
    /// Every field is checked and all errors are reported together. The
    /// resulting payload only contains declared fields; optional fields left
    /// empty are omitted.
    pub fn submit(&self, submission: &Value) -> Result<Value, ValidationError> {
        let Some(input) = submission.as_object() else {
            return Err(ValidationError::InvalidPayload {
                message: "submission must be a JSON object".to_string(),
            });
        };

        let mut payload = Map::new();
        let mut errors = Vec::new();

        for compiled in &self.fields {
            let name = compiled.field.name.as_str();
            let mut value = input.get(name).cloned().unwrap_or(Value::Null);
            if value.is_null() {
                if let Some(default) = &compiled.field.default {
                    value = default.clone();
                }
            }

            let mut filter_failed = false;
            for filter in &compiled.filters {
                match filter(name, value.clone()) {
                    Ok(filtered) => value = filtered,
                    Err(e) => {
                        errors.push(FieldValidationError::new(name, e.to_string()));
                        filter_failed = true;
                        break;
                    }
                }
            }
            if filter_failed {
                continue;
            }

            if value.is_null() {
                if let Some(default) = &compiled.field.default {
                    value = default.clone();
                }
            }

            for validator in &compiled.validators {
                if let Err(message) = validator(name, &value) {
                    errors.push(FieldValidationError::new(name, message));
                }
            }

            if !value.is_null() {
                payload.insert(name.to_string(), value);
            }
        }

        if !errors.is_empty() {
            tracing::debug!(errors = errors.len(), "form submission rejected");
            return Err(ValidationError::FieldErrors(errors));
        }

        Ok(Value::Object(payload))
    }
}

fn invalid_rule(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidRule {
        field: field.to_string(),
        message: message.into(),
    }
}

fn compile_field(field: FormField) -> Result<CompiledField, ValidationError> {
    let mut constraints = InputConstraints {
        input_type: field.kind.input_type(),
        ..InputConstraints::default()
    };
    let mut checks: Vec<Validator> = Vec::new();

    for rule in &field.rules {
        match rule {
            FieldRule::Required => {
                constraints.required = true;
                // A required checkbox must be ticked; unticked arrives as false
                if field.kind == FieldKind::Checkbox {
                    checks.push(Arc::new(validators::checked()));
                } else {
                    checks.push(Arc::new(validators::required()));
                }
            }
            FieldRule::MinLength { value } => {
                constraints.min_length = Some(*value);
                checks.push(Arc::new(validators::min_length(*value)));
            }
            FieldRule::MaxLength { value } => {
                constraints.max_length = Some(*value);
                checks.push(Arc::new(validators::max_length(*value)));
            }
            FieldRule::Min { value } => {
                constraints.min = Some(*value);
                checks.push(Arc::new(validators::min_value(*value)));
            }
            FieldRule::Max { value } => {
                constraints.max = Some(*value);
                checks.push(Arc::new(validators::max_value(*value)));
            }
            FieldRule::Pattern { value, message } => {
                // Patterns match the whole input, as an HTML pattern attribute does
                let regex = Regex::new(&format!("^(?:{})$", value))
                    .map_err(|e| invalid_rule(&field.name, format!("invalid pattern: {}", e)))?;
                constraints.pattern = Some(value.clone());
                checks.push(Arc::new(validators::pattern(regex, message.clone())));
            }
        }
    }

    if let (Some(min), Some(max)) = (constraints.min_length, constraints.max_length) {
        if min > max {
            return Err(invalid_rule(&field.name, "min_length is greater than max_length"));
        }
    }
    if let (Some(min), Some(max)) = (constraints.min, constraints.max) {
        if min > max {
            return Err(invalid_rule(&field.name, "min is greater than max"));
        }
    }

    match field.kind {
        FieldKind::Email => checks.push(Arc::new(validators::email())),
        FieldKind::Url => checks.push(Arc::new(validators::url())),
        FieldKind::Phone => checks.push(Arc::new(validators::phone())),
        FieldKind::Date => checks.push(Arc::new(validators::date_format("%Y-%m-%d"))),
        FieldKind::Select if !field.options.is_empty() => {
            let allowed: Vec<String> = field.options.iter().map(|o| o.value.clone()).collect();
            constraints.options = allowed.clone();
            checks.push(Arc::new(validators::in_list(allowed)));
        }
        _ => {}
    }

    let input_filters: Vec<InputFilter> = match field.kind {
        FieldKind::Number => vec![
            Arc::new(filters::trim()),
            Arc::new(filters::empty_to_null()),
            Arc::new(filters::to_number()),
        ],
        FieldKind::Checkbox => vec![Arc::new(filters::to_bool())],
        FieldKind::Email => vec![
            Arc::new(filters::trim()),
            Arc::new(filters::lowercase()),
            Arc::new(filters::empty_to_null()),
        ],
        _ => vec![Arc::new(filters::trim()), Arc::new(filters::empty_to_null())],
    };

    Ok(CompiledField {
        field,
        constraints,
        filters: input_filters,
        validators: checks,
    })
}
