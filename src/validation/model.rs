//! Validation models
//!
//! An `InputModel` describes the *shape* of one operation's cleaned input:
//! field names bound to declarative constraints. Models are built
//! per-request by model hooks, so constraints that depend on runtime
//! settings (the bulk-action cap, title length bounds) are builder
//! parameters, not a baked-in global schema.
//!
//! Structural validation runs before any business validator: a model
//! coerces raw JSON into `FieldValue`s or records structural errors, and
//! any structural failure short-circuits the rest of the pipeline for the
//! operation.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::errors::{codes, ErrorLocation, ErrorsList};
use super::value::{CleanedData, FieldValue};

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9A-Za-z_]+$").expect("valid username regex"))
}

/// Declarative constraint on one input field
#[derive(Debug, Clone)]
pub enum FieldConstraint {
    /// Integer greater than zero
    PositiveInt,

    /// Boolean flag
    Bool,

    /// Trimmed text with character-count bounds
    Text { min: usize, max: usize },

    /// Lowercased email address
    Email,

    /// Username: word characters only, with character-count bounds
    Username { min: usize, max: usize },

    /// Non-empty list of positive integer ids, bounded by `max_items`
    IdList { max_items: usize },
}

/// One declared field
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    constraint: FieldConstraint,
    required: bool,
}

/// The shape of one operation's cleaned input
#[derive(Debug, Clone, Default)]
pub struct InputModel {
    fields: Vec<FieldSpec>,
}

impl InputModel {
    /// Start declaring a model
    pub fn builder() -> InputModelBuilder {
        InputModelBuilder::default()
    }

    /// Declared field names, in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Coerce raw input against the model
    ///
    /// Returns cleaned values for the fields that passed and structural
    /// errors for those that did not. Fields are processed independently;
    /// a failure on one never hides failures on another.
    pub fn clean(&self, raw: &Value) -> (CleanedData, ErrorsList) {
        let mut data = CleanedData::new();
        let mut errors = ErrorsList::new();

        let Some(object) = raw.as_object() else {
            errors.add_root(codes::INVALID_INPUT);
            return (data, errors);
        };

        for field in &self.fields {
            let location = ErrorLocation::field(&field.name);
            match object.get(&field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        errors.add(location, codes::MISSING);
                    }
                }
                Some(value) => {
                    if let Some(cleaned) =
                        clean_value(&field.constraint, value, &location, &mut errors)
                    {
                        data.insert(field.name.clone(), cleaned);
                    }
                }
            }
        }

        (data, errors)
    }
}

/// Builder for `InputModel`
///
/// ```ignore
/// let model = InputModel::builder()
///     .id_list("threads", ctx.settings.bulk_action_limit)
///     .positive_int("category")
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct InputModelBuilder {
    fields: Vec<FieldSpec>,
}

impl InputModelBuilder {
    fn field(mut self, name: impl Into<String>, constraint: FieldConstraint) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            constraint,
            required: true,
        });
        self
    }

    /// Declare a required positive-integer field
    pub fn positive_int(self, name: impl Into<String>) -> Self {
        self.field(name, FieldConstraint::PositiveInt)
    }

    /// Declare a required boolean field
    pub fn bool(self, name: impl Into<String>) -> Self {
        self.field(name, FieldConstraint::Bool)
    }

    /// Declare a required text field with character-count bounds
    pub fn text(self, name: impl Into<String>, min: usize, max: usize) -> Self {
        self.field(name, FieldConstraint::Text { min, max })
    }

    /// Declare a required email field
    pub fn email(self, name: impl Into<String>) -> Self {
        self.field(name, FieldConstraint::Email)
    }

    /// Declare a required username field with character-count bounds
    pub fn username(self, name: impl Into<String>, min: usize, max: usize) -> Self {
        self.field(name, FieldConstraint::Username { min, max })
    }

    /// Declare a required, non-empty, bounded list of positive ids
    pub fn id_list(self, name: impl Into<String>, max_items: usize) -> Self {
        self.field(name, FieldConstraint::IdList { max_items })
    }

    /// Mark the most recently declared field as optional
    pub fn optional(mut self) -> Self {
        if let Some(last) = self.fields.last_mut() {
            last.required = false;
        }
        self
    }

    pub fn build(self) -> InputModel {
        InputModel {
            fields: self.fields,
        }
    }
}

fn clean_value(
    constraint: &FieldConstraint,
    value: &Value,
    location: &ErrorLocation,
    errors: &mut ErrorsList,
) -> Option<FieldValue> {
    match constraint {
        FieldConstraint::PositiveInt => clean_positive_int(value, location, errors),
        FieldConstraint::Bool => match value.as_bool() {
            Some(flag) => Some(FieldValue::Bool(flag)),
            None => {
                errors.add(location.clone(), codes::NOT_BOOL);
                None
            }
        },
        FieldConstraint::Text { min, max } => {
            let text = match value.as_str() {
                Some(text) => text.trim(),
                None => {
                    errors.add(location.clone(), codes::NOT_TEXT);
                    return None;
                }
            };
            let length = text.chars().count();
            if length < *min {
                errors.add(location.clone(), codes::TEXT_TOO_SHORT);
                None
            } else if length > *max {
                errors.add(location.clone(), codes::TEXT_TOO_LONG);
                None
            } else {
                Some(FieldValue::Text(text.to_string()))
            }
        }
        FieldConstraint::Email => {
            let text = match value.as_str() {
                Some(text) => text.trim(),
                None => {
                    errors.add(location.clone(), codes::NOT_TEXT);
                    return None;
                }
            };
            if email_regex().is_match(text) {
                Some(FieldValue::Text(text.to_lowercase()))
            } else {
                errors.add(location.clone(), codes::INVALID_EMAIL);
                None
            }
        }
        FieldConstraint::Username { min, max } => {
            let text = match value.as_str() {
                Some(text) => text.trim(),
                None => {
                    errors.add(location.clone(), codes::NOT_TEXT);
                    return None;
                }
            };
            let length = text.chars().count();
            if length < *min || length > *max || !username_regex().is_match(text) {
                errors.add(location.clone(), codes::INVALID_USERNAME);
                None
            } else {
                Some(FieldValue::Text(text.to_string()))
            }
        }
        FieldConstraint::IdList { max_items } => {
            let items = match value.as_array() {
                Some(items) => items,
                None => {
                    errors.add(location.clone(), codes::NOT_LIST);
                    return None;
                }
            };
            if items.is_empty() {
                errors.add(location.clone(), codes::LIST_EMPTY);
                return None;
            }
            if items.len() > *max_items {
                errors.add(location.clone(), codes::LIST_TOO_LONG);
                return None;
            }

            let mut cleaned = Vec::with_capacity(items.len());
            let mut failed = false;
            for (index, item) in items.iter().enumerate() {
                let item_location = location
                    .item(index)
                    .expect("id list fields have field locations");
                match clean_positive_int(item, &item_location, errors) {
                    Some(id) => cleaned.push(id),
                    None => failed = true,
                }
            }

            if failed {
                None
            } else {
                Some(FieldValue::List(cleaned))
            }
        }
    }
}

fn clean_positive_int(
    value: &Value,
    location: &ErrorLocation,
    errors: &mut ErrorsList,
) -> Option<FieldValue> {
    match value.as_i64() {
        Some(n) if n > 0 => Some(FieldValue::Int(n)),
        Some(_) => {
            errors.add(location.clone(), codes::NOT_POSITIVE);
            None
        }
        None => {
            errors.add(location.clone(), codes::NOT_INT);
            None
        }
    }
}
