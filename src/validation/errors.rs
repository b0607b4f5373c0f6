//! Error accumulator
//!
//! Validation failures are data, not exceptions: every validator appends
//! `(location, code)` entries to one shared `ErrorsList`, and the pipeline
//! decides success by checking emptiness. Append order is preserved all the
//! way through serialization, so clients see deterministic error ordering.

use std::fmt;

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

/// Serialized path segment for operation-level errors
pub const ROOT_LOCATION: &str = "__root__";

/// Address of a validation error
///
/// A tagged variant instead of ad-hoc string paths, so accumulation and
/// serialization stay exhaustive and typo-proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorLocation {
    /// Operation-level failure (e.g. unauthorized)
    Root,

    /// Failure on a named input field
    Field(String),

    /// Failure on one element of a bulk/list field
    Index(String, usize),
}

impl ErrorLocation {
    /// Address a named field
    pub fn field(name: impl Into<String>) -> Self {
        ErrorLocation::Field(name.into())
    }

    /// Address one element of a list field
    pub fn index(name: impl Into<String>, index: usize) -> Self {
        ErrorLocation::Index(name.into(), index)
    }

    /// Derive the address of element `index` under this location
    ///
    /// Only field locations have elements; anything else is a mis-assembled
    /// chain (bulk validators attach to fields).
    pub fn item(&self, index: usize) -> Option<Self> {
        match self {
            ErrorLocation::Field(name) => Some(ErrorLocation::Index(name.clone(), index)),
            _ => None,
        }
    }

    /// Check whether this location addresses `field` or one of its elements
    pub fn belongs_to(&self, field: &str) -> bool {
        match self {
            ErrorLocation::Root => false,
            ErrorLocation::Field(name) => name == field,
            ErrorLocation::Index(name, _) => name == field,
        }
    }
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorLocation::Root => write!(f, "{}", ROOT_LOCATION),
            ErrorLocation::Field(name) => write!(f, "{}", name),
            ErrorLocation::Index(name, index) => write!(f, "{}.{}", name, index),
        }
    }
}

impl Serialize for ErrorLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ErrorLocation::Root => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(ROOT_LOCATION)?;
                seq.end()
            }
            ErrorLocation::Field(name) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(name)?;
                seq.end()
            }
            ErrorLocation::Index(name, index) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(name)?;
                seq.serialize_element(index)?;
                seq.end()
            }
        }
    }
}

/// One accumulated validation failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEntry {
    pub location: ErrorLocation,
    pub code: String,
}

/// Ordered collection of validation failures
///
/// Accumulation is non-destructive: independent validators append without
/// seeing each other, and everything appended is returned together. Presence
/// of any entry marks the whole operation as failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorsList {
    entries: Vec<ErrorEntry>,
}

impl ErrorsList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an error at a location
    pub fn add(&mut self, location: ErrorLocation, code: impl Into<String>) {
        self.entries.push(ErrorEntry {
            location,
            code: code.into(),
        });
    }

    /// Append an operation-level error
    pub fn add_root(&mut self, code: impl Into<String>) {
        self.add(ErrorLocation::Root, code);
    }

    /// The pipeline's "did anything fail" signal
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of accumulated errors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate entries in append order
    pub fn iter(&self) -> impl Iterator<Item = &ErrorEntry> {
        self.entries.iter()
    }

    /// Check for errors at the root location
    pub fn has_root_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.location == ErrorLocation::Root)
    }

    /// Check for errors on a field or any of its elements
    pub fn has_field_errors(&self, field: &str) -> bool {
        self.entries.iter().any(|e| e.location.belongs_to(field))
    }
}

impl Serialize for ErrorsList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a ErrorsList {
    type Item = &'a ErrorEntry;
    type IntoIter = std::slice::Iter<'a, ErrorEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Error codes used by the built-in models and validators
///
/// Extensions are free to introduce their own codes; nothing in the pipeline
/// interprets them beyond carrying them to the response.
pub mod codes {
    // Structural
    pub const INVALID_INPUT: &str = "type_error.mapping";
    pub const MISSING: &str = "value_error.missing";
    pub const NOT_INT: &str = "type_error.integer";
    pub const NOT_POSITIVE: &str = "value_error.positive_int";
    pub const NOT_BOOL: &str = "type_error.bool";
    pub const NOT_TEXT: &str = "type_error.str";
    pub const TEXT_TOO_SHORT: &str = "value_error.text.too_short";
    pub const TEXT_TOO_LONG: &str = "value_error.text.too_long";
    pub const NOT_LIST: &str = "type_error.list";
    pub const LIST_EMPTY: &str = "value_error.list.min_items";
    pub const LIST_TOO_LONG: &str = "value_error.list.max_items";
    pub const INVALID_EMAIL: &str = "value_error.email";
    pub const INVALID_USERNAME: &str = "value_error.username";

    // Business
    pub const NOT_AUTHORIZED: &str = "auth_error.not_authorized";
    pub const NOT_MODERATOR: &str = "auth_error.not_moderator";
    pub const NOT_AUTHOR: &str = "auth_error.not_author";
    pub const INVALID_CREDENTIALS: &str = "auth_error.invalid_credentials";
    pub const THREAD_NOT_EXISTS: &str = "value_error.thread.not_exists";
    pub const THREAD_CLOSED: &str = "value_error.thread.closed";
    pub const CATEGORY_NOT_EXISTS: &str = "value_error.category.not_exists";
    pub const CATEGORY_CLOSED: &str = "value_error.category.closed";
    pub const POST_NOT_EXISTS: &str = "value_error.post.not_exists";
    pub const USERNAME_TAKEN: &str = "value_error.username.taken";
    pub const EMAIL_TAKEN: &str = "value_error.email.taken";
}
