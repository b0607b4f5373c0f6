//! Cleaned input values
//!
//! `FieldValue` is the dynamic value type flowing through validator chains.
//! Structural validation produces primitives; business validators may
//! replace them (an id becomes the loaded entity). The `Entity` variant is
//! type-erased so extensions can push their own types through the pipeline
//! without the crate knowing about them.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::entities::EntityId;

/// A validated input value
#[derive(Clone)]
pub enum FieldValue {
    Int(i64),
    Text(String),
    Bool(bool),
    List(Vec<FieldValue>),

    /// A loaded entity (or any extension-supplied value)
    Entity(Arc<dyn Any + Send + Sync>),
}

impl FieldValue {
    /// Wrap an entity value
    pub fn entity<T: Send + Sync + 'static>(value: T) -> Self {
        FieldValue::Entity(Arc::new(value))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Downcast an entity value to a concrete type
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        match self {
            FieldValue::Entity(value) => value.clone().downcast::<T>().ok(),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(value) => write!(f, "Int({})", value),
            FieldValue::Text(value) => write!(f, "Text({:?})", value),
            FieldValue::Bool(value) => write!(f, "Bool({})", value),
            FieldValue::List(items) => f.debug_list().entries(items.iter()).finish(),
            FieldValue::Entity(_) => write!(f, "Entity(..)"),
        }
    }
}

/// Validated, typed request input
///
/// Maps field names to `FieldValue`s. Fields that failed validation are
/// absent, never partially-typed garbage.
#[derive(Clone, Default)]
pub struct CleanedData {
    fields: HashMap<String, FieldValue>,
}

impl CleanedData {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field value, replacing any previous one
    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    /// Remove a field, returning its value if present
    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Get a field as an integer
    pub fn int(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(FieldValue::as_int)
    }

    /// Get a field as text
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Get a field as a bool
    pub fn bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_bool)
    }

    /// Get a list field's ids
    ///
    /// Only the `Int` elements are returned; once validators have replaced
    /// ids with entities this returns an empty list.
    pub fn ids(&self, field: &str) -> Option<Vec<EntityId>> {
        self.get(field)
            .and_then(FieldValue::as_list)
            .map(|items| items.iter().filter_map(FieldValue::as_int).collect())
    }

    /// Get a field as a loaded entity
    pub fn entity<T: Send + Sync + 'static>(&self, field: &str) -> Option<Arc<T>> {
        self.get(field).and_then(FieldValue::downcast::<T>)
    }

    /// Get a list field's elements as loaded entities
    ///
    /// Returns `None` if the field is absent, not a list, or any element is
    /// not a `T`.
    pub fn entities<T: Send + Sync + 'static>(&self, field: &str) -> Option<Vec<Arc<T>>> {
        let items = self.get(field).and_then(FieldValue::as_list)?;
        items.iter().map(FieldValue::downcast::<T>).collect()
    }
}

impl fmt::Debug for CleanedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.fields.iter()).finish()
    }
}
