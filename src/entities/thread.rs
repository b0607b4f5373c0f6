//! Thread entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{slugify, Category, EntityId, Post};

/// A discussion thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: EntityId,
    pub category_id: EntityId,

    /// Account that started the thread, if not anonymous
    pub starter_id: Option<EntityId>,

    pub title: String,
    pub slug: String,

    /// The opening post, set once it has been persisted
    pub first_post_id: Option<EntityId>,

    pub started_at: DateTime<Utc>,
    pub last_posted_at: DateTime<Utc>,

    /// Reply count, the opening post excluded
    pub replies: i64,

    /// Closed threads reject replies and edits from non-moderators
    pub is_closed: bool,
}

impl Thread {
    /// Create a new open thread in a category
    pub fn new(id: EntityId, category_id: EntityId, title: impl Into<String>) -> Self {
        let title = title.into();
        let slug = slugify(&title);
        let now = Utc::now();
        Self {
            id,
            category_id,
            starter_id: None,
            title,
            slug,
            first_post_id: None,
            started_at: now,
            last_posted_at: now,
            replies: 0,
            is_closed: false,
        }
    }

    /// Set the starting user
    pub fn with_starter(mut self, starter_id: EntityId) -> Self {
        self.starter_id = Some(starter_id);
        self
    }

    /// Move the thread to another category
    pub fn move_to(&mut self, category: &Category) {
        self.category_id = category.id;
    }

    /// Open or close the thread
    pub fn set_closed(&mut self, is_closed: bool) {
        self.is_closed = is_closed;
    }

    /// Replace the title, refreshing the slug
    pub fn edit_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.slug = slugify(&self.title);
    }

    /// Record the opening post
    pub fn set_first_post(&mut self, post: &Post) {
        self.first_post_id = Some(post.id);
        self.last_posted_at = post.posted_at;
    }

    /// Record a new reply
    pub fn register_reply(&mut self, post: &Post) {
        self.replies += 1;
        self.last_posted_at = post.posted_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_thread() {
        let thread = Thread::new(1, 5, "First thread!").with_starter(42);
        assert_eq!(thread.category_id, 5);
        assert_eq!(thread.slug, "first-thread");
        assert_eq!(thread.starter_id, Some(42));
        assert_eq!(thread.replies, 0);
        assert!(!thread.is_closed);
    }

    #[test]
    fn test_move_to() {
        let mut thread = Thread::new(1, 5, "Thread");
        let category = Category::new(9, "Other");
        thread.move_to(&category);
        assert_eq!(thread.category_id, 9);
    }

    #[test]
    fn test_edit_title_refreshes_slug() {
        let mut thread = Thread::new(1, 5, "Old title");
        thread.edit_title("Brand new title");
        assert_eq!(thread.title, "Brand new title");
        assert_eq!(thread.slug, "brand-new-title");
    }

    #[test]
    fn test_register_reply() {
        let mut thread = Thread::new(1, 5, "Thread");
        let post = Post::new(7, 1, Some(42), "A reply");
        thread.register_reply(&post);
        assert_eq!(thread.replies, 1);
        assert_eq!(thread.last_posted_at, post.posted_at);
    }
}
