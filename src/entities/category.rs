//! Category entity

use serde::{Deserialize, Serialize};

use super::{slugify, EntityId};

/// A board section threads are posted in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,

    /// Parent category, if this is a subcategory
    pub parent_id: Option<EntityId>,

    pub name: String,
    pub slug: String,

    /// Closed categories reject new threads, replies and thread moves
    pub is_closed: bool,
}

impl Category {
    /// Create an open category
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            id,
            parent_id: None,
            name,
            slug,
            is_closed: false,
        }
    }

    /// Set the parent category
    pub fn with_parent(mut self, parent_id: EntityId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Mark the category closed
    pub fn closed(mut self) -> Self {
        self.is_closed = true;
        self
    }
}
