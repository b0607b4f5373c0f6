//! Storage collaborator
//!
//! Persistence is outside this crate: mutations talk to a `ForumStore`
//! implementation through this narrow interface. Bulk loads are
//! best-effort by contract — unresolvable ids are silently dropped, never
//! surfaced as errors, because read-side echo is independent of write-side
//! validation.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::core::PipelineResult;
use crate::entities::{Category, EntityId, Post, Thread, User};

/// Data persistence contract for forum mutations
///
/// `store_*` methods return the stored entity so implementations can assign
/// ids to new records; passing an entity with an existing id updates it.
#[async_trait]
pub trait ForumStore: Send + Sync {
    // Loads (best-effort on the bulk variant)

    /// Load the threads that exist among `ids`, preserving input order
    async fn load_threads(&self, ids: &[EntityId]) -> PipelineResult<Vec<Thread>>;

    async fn load_thread(&self, id: EntityId) -> PipelineResult<Option<Thread>>;
    async fn load_category(&self, id: EntityId) -> PipelineResult<Option<Category>>;
    async fn load_post(&self, id: EntityId) -> PipelineResult<Option<Post>>;
    async fn load_user(&self, id: EntityId) -> PipelineResult<Option<User>>;

    /// Case-insensitive lookup by username
    async fn get_user_by_name(&self, name: &str) -> PipelineResult<Option<User>>;

    /// Case-insensitive lookup by email
    async fn get_user_by_email(&self, email: &str) -> PipelineResult<Option<User>>;

    // Stores (atomic enough for the entity set passed)

    async fn store_threads(&self, threads: Vec<Thread>) -> PipelineResult<Vec<Thread>>;
    async fn store_thread(&self, thread: Thread) -> PipelineResult<Thread>;
    async fn store_post(&self, post: Post) -> PipelineResult<Post>;
    async fn store_user(&self, user: User) -> PipelineResult<User>;

    async fn delete_thread(&self, id: EntityId) -> PipelineResult<()>;
}
