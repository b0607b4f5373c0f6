//! User entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{slugify, EntityId};

/// A registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,

    pub name: String,

    /// Lowercased, slugified name used for uniqueness checks
    pub slug: String,

    pub email: String,

    /// Opaque hash produced by the `PasswordHasher` collaborator.
    /// Never serialized into responses.
    #[serde(skip)]
    pub password_hash: String,

    /// Site-wide moderator flag
    pub is_moderator: bool,

    /// Categories this user moderates, when not a site-wide moderator
    pub moderated_categories: Vec<EntityId>,

    pub joined_at: DateTime<Utc>,
}

impl User {
    /// Create a regular account
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            id,
            name,
            slug,
            email: email.into().to_lowercase(),
            password_hash: password_hash.into(),
            is_moderator: false,
            moderated_categories: Vec::new(),
            joined_at: Utc::now(),
        }
    }

    /// Grant the site-wide moderator flag
    pub fn as_moderator(mut self) -> Self {
        self.is_moderator = true;
        self
    }

    /// Grant moderation rights over specific categories
    pub fn moderating(mut self, categories: Vec<EntityId>) -> Self {
        self.moderated_categories = categories;
        self
    }

    /// Check moderation rights over a category
    pub fn can_moderate(&self, category_id: EntityId) -> bool {
        self.is_moderator || self.moderated_categories.contains(&category_id)
    }
}
