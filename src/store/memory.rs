//! In-memory store
//!
//! Backs the demo binary and the test suite. Entities live in hash maps
//! behind one mutex; ids are assigned from a shared counter when a stored
//! entity arrives with id `0`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::{PipelineError, PipelineResult};
use crate::entities::{Category, EntityId, Post, Thread, User};

use super::ForumStore;

#[derive(Default)]
struct Inner {
    categories: HashMap<EntityId, Category>,
    threads: HashMap<EntityId, Thread>,
    posts: HashMap<EntityId, Post>,
    users: HashMap<EntityId, User>,
    next_id: EntityId,
}

/// Mutex-backed `ForumStore` implementation
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
        }
    }

    fn lock(&self) -> PipelineResult<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| PipelineError::store("memory store poisoned"))
    }

    // Seeding helpers for tests and demos

    pub fn seed_category(&self, category: Category) {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.next_id = inner.next_id.max(category.id + 1);
        inner.categories.insert(category.id, category);
    }

    pub fn seed_thread(&self, thread: Thread) {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.next_id = inner.next_id.max(thread.id + 1);
        inner.threads.insert(thread.id, thread);
    }

    pub fn seed_post(&self, post: Post) {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.next_id = inner.next_id.max(post.id + 1);
        inner.posts.insert(post.id, post);
    }

    pub fn seed_user(&self, user: User) {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.next_id = inner.next_id.max(user.id + 1);
        inner.users.insert(user.id, user);
    }

    /// Number of stored threads
    pub fn thread_count(&self) -> usize {
        self.inner.lock().expect("memory store poisoned").threads.len()
    }
}

impl Inner {
    fn assign_id(&mut self, id: EntityId) -> EntityId {
        if id != 0 {
            return id;
        }
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[async_trait]
impl ForumStore for MemoryStore {
    async fn load_threads(&self, ids: &[EntityId]) -> PipelineResult<Vec<Thread>> {
        let inner = self.lock()?;
        // Best-effort: missing ids are dropped
        Ok(ids
            .iter()
            .filter_map(|id| inner.threads.get(id).cloned())
            .collect())
    }

    async fn load_thread(&self, id: EntityId) -> PipelineResult<Option<Thread>> {
        Ok(self.lock()?.threads.get(&id).cloned())
    }

    async fn load_category(&self, id: EntityId) -> PipelineResult<Option<Category>> {
        Ok(self.lock()?.categories.get(&id).cloned())
    }

    async fn load_post(&self, id: EntityId) -> PipelineResult<Option<Post>> {
        Ok(self.lock()?.posts.get(&id).cloned())
    }

    async fn load_user(&self, id: EntityId) -> PipelineResult<Option<User>> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    async fn get_user_by_name(&self, name: &str) -> PipelineResult<Option<User>> {
        let name = name.to_lowercase();
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| u.name.to_lowercase() == name)
            .cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> PipelineResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn store_threads(&self, threads: Vec<Thread>) -> PipelineResult<Vec<Thread>> {
        let mut inner = self.lock()?;
        let mut stored = Vec::with_capacity(threads.len());
        for mut thread in threads {
            thread.id = inner.assign_id(thread.id);
            inner.threads.insert(thread.id, thread.clone());
            stored.push(thread);
        }
        Ok(stored)
    }

    async fn store_thread(&self, mut thread: Thread) -> PipelineResult<Thread> {
        let mut inner = self.lock()?;
        thread.id = inner.assign_id(thread.id);
        inner.threads.insert(thread.id, thread.clone());
        Ok(thread)
    }

    async fn store_post(&self, mut post: Post) -> PipelineResult<Post> {
        let mut inner = self.lock()?;
        post.id = inner.assign_id(post.id);
        inner.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn store_user(&self, mut user: User) -> PipelineResult<User> {
        let mut inner = self.lock()?;
        user.id = inner.assign_id(user.id);
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_thread(&self, id: EntityId) -> PipelineResult<()> {
        let mut inner = self.lock()?;
        inner.threads.remove(&id);
        inner.posts.retain(|_, post| post.thread_id != id);
        Ok(())
    }
}
