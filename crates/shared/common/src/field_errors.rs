//! Per-field validation error map.

use std::collections::BTreeMap;

use serde::Serialize;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Field name to human-readable messages.
///
/// Nested fields use dotted keys (`owner.email`, `values.tenant`).
/// Ordered so rendered responses are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map holding a single message.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Flatten `validator` output into this map, keys prefixed by `prefix`.
    pub fn extend_from_validator(&mut self, errors: &ValidationErrors, prefix: &str) {
        for (field, kind) in errors.errors() {
            let key = format!("{}{}", prefix, field);
            match kind {
                ValidationErrorsKind::Field(list) => {
                    for error in list {
                        self.add(key.clone(), describe(&key, error));
                    }
                }
                ValidationErrorsKind::Struct(inner) => {
                    self.extend_from_validator(inner, &format!("{}.", key));
                }
                ValidationErrorsKind::List(items) => {
                    for (index, inner) in items {
                        self.extend_from_validator(inner, &format!("{}.{}.", key, index));
                    }
                }
            }
        }
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut map = Self::new();
        map.extend_from_validator(errors, "");
        map
    }
}

impl IntoIterator for FieldErrors {
    type Item = (String, Vec<String>);
    type IntoIter = std::collections::btree_map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Human label for a field key: last dotted segment, underscores as spaces.
pub fn label(key: &str) -> String {
    key.rsplit('.').next().unwrap_or(key).replace('_', " ")
}

/// Render a message for one failed rule.
///
/// Explicit messages on the rule win; otherwise the text is derived from
/// the rule code and its parameters.
fn describe(key: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let label = label(key);
    let param = |name: &str| error.params.get(name).map(|v| v.to_string());

    match error.code.as_ref() {
        "required" => format!("The {} field is required.", label),
        "email" => format!("The {} field must be a valid email address.", label),
        "in" => format!("The selected {} is invalid.", label),
        "date" => format!("The {} field must be a valid date.", label),
        "length" => match (param("min"), param("max"), param("equal")) {
            (_, _, Some(size)) => format!("The {} field must be {} characters.", label, size),
            (Some(min), Some(max), _) => {
                format!("The {} field must be between {} and {} characters.", label, min, max)
            }
            (Some(min), None, _) => format!("The {} field must be at least {} characters.", label, min),
            (None, Some(max), _) => {
                format!("The {} field must not be greater than {} characters.", label, max)
            }
            _ => format!("The {} field has an invalid length.", label),
        },
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("The {} field must be between {} and {}.", label, min, max),
            (Some(min), None) => format!("The {} field must be at least {}.", label, min),
            (None, Some(max)) => format!("The {} field must not be greater than {}.", label, max),
            _ => format!("The {} field is out of range.", label),
        },
        _ => format!("The {} field is invalid.", label),
    }
}
