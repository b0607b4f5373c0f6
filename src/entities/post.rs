//! Post entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EntityId;

/// A single message in a thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: EntityId,
    pub thread_id: EntityId,

    /// Posting account, if not anonymous
    pub poster_id: Option<EntityId>,

    pub body: String,

    pub posted_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,

    /// Number of times the body was edited
    pub edits: i64,
}

impl Post {
    /// Create a new post
    pub fn new(
        id: EntityId,
        thread_id: EntityId,
        poster_id: Option<EntityId>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id,
            thread_id,
            poster_id,
            body: body.into(),
            posted_at: Utc::now(),
            edited_at: None,
            edits: 0,
        }
    }

    /// Replace the body, stamping the edit
    pub fn edit(&mut self, body: impl Into<String>) {
        self.body = body.into();
        self.edited_at = Some(Utc::now());
        self.edits += 1;
    }
}
