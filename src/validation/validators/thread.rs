//! Thread validators

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{PipelineError, PipelineResult, RequestContext};
use crate::entities::Thread;
use crate::validation::errors::{codes, ErrorLocation, ErrorsList};
use crate::validation::pipeline::{run_chain, ArcValidator, AsyncValidator};
use crate::validation::value::FieldValue;

fn thread_value(value: &FieldValue) -> PipelineResult<Arc<Thread>> {
    value
        .downcast::<Thread>()
        .ok_or_else(|| PipelineError::unexpected_value("expected a thread entity"))
}

/// Replaces a thread id with the loaded thread
pub struct ThreadExistsValidator;

#[async_trait]
impl AsyncValidator for ThreadExistsValidator {
    async fn validate(
        &self,
        ctx: &RequestContext,
        value: FieldValue,
        location: &ErrorLocation,
        errors: &mut ErrorsList,
    ) -> PipelineResult<Option<FieldValue>> {
        let id = value
            .as_int()
            .ok_or_else(|| PipelineError::unexpected_value("expected a thread id"))?;

        match ctx.store.load_thread(id).await? {
            Some(thread) => Ok(Some(FieldValue::entity(thread))),
            None => {
                errors.add(location.clone(), codes::THREAD_NOT_EXISTS);
                Ok(None)
            }
        }
    }
}

/// Rejects closed threads for non-moderators
pub struct ThreadIsOpenValidator;

#[async_trait]
impl AsyncValidator for ThreadIsOpenValidator {
    async fn validate(
        &self,
        ctx: &RequestContext,
        value: FieldValue,
        location: &ErrorLocation,
        errors: &mut ErrorsList,
    ) -> PipelineResult<Option<FieldValue>> {
        let thread = thread_value(&value)?;

        let is_moderator = ctx
            .user
            .as_ref()
            .map(|u| u.can_moderate(thread.category_id))
            .unwrap_or(false);

        if thread.is_closed && !is_moderator {
            errors.add(location.clone(), codes::THREAD_CLOSED);
            return Ok(None);
        }

        Ok(Some(value))
    }
}

/// Requires the caller to be the thread starter or a moderator
pub struct ThreadAuthorValidator;

#[async_trait]
impl AsyncValidator for ThreadAuthorValidator {
    async fn validate(
        &self,
        ctx: &RequestContext,
        value: FieldValue,
        location: &ErrorLocation,
        errors: &mut ErrorsList,
    ) -> PipelineResult<Option<FieldValue>> {
        let thread = thread_value(&value)?;

        let authorized = ctx.user.as_ref().map_or(false, |user| {
            thread.starter_id == Some(user.id) || user.can_moderate(thread.category_id)
        });

        if !authorized {
            errors.add(location.clone(), codes::NOT_AUTHOR);
            return Ok(None);
        }

        Ok(Some(value))
    }
}

/// Runs category validators against a thread's category
///
/// Loads the thread's category, threads it through the inner chain at the
/// same location, and passes the *thread* on when the chain accepts. Lets
/// bulk thread chains reuse category checks like `CategoryModeratorValidator`.
pub struct ThreadCategoryValidator {
    inner: Vec<ArcValidator>,
}

impl ThreadCategoryValidator {
    pub fn new<V: AsyncValidator + 'static>(validator: V) -> Self {
        Self {
            inner: vec![Arc::new(validator)],
        }
    }

    /// Append another category validator to the inner chain
    pub fn and<V: AsyncValidator + 'static>(mut self, validator: V) -> Self {
        self.inner.push(Arc::new(validator));
        self
    }
}

#[async_trait]
impl AsyncValidator for ThreadCategoryValidator {
    async fn validate(
        &self,
        ctx: &RequestContext,
        value: FieldValue,
        location: &ErrorLocation,
        errors: &mut ErrorsList,
    ) -> PipelineResult<Option<FieldValue>> {
        let thread = thread_value(&value)?;

        let category = ctx
            .store
            .load_category(thread.category_id)
            .await?
            .ok_or_else(|| {
                PipelineError::store(format!(
                    "thread {} references missing category {}",
                    thread.id, thread.category_id
                ))
            })?;

        let result = run_chain(
            ctx,
            &self.inner,
            FieldValue::entity(category),
            location,
            errors,
        )
        .await?;

        match result {
            Some(_) => Ok(Some(value)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Category, User};
    use crate::store::{ForumStore, MemoryStore};
    use crate::validation::validators::CategoryModeratorValidator;

    fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.seed_category(Category::new(5, "General"));
        store.seed_thread(Thread::new(1, 5, "Open thread").with_starter(42));
        let mut closed = Thread::new(2, 5, "Closed thread");
        closed.set_closed(true);
        store.seed_thread(closed);
        store
    }

    #[tokio::test]
    async fn test_exists_replaces_id_with_entity() {
        let ctx = RequestContext::new(seeded_store());
        let mut errors = ErrorsList::new();

        let result = ThreadExistsValidator
            .validate(
                &ctx,
                FieldValue::Int(1),
                &ErrorLocation::index("threads", 0),
                &mut errors,
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.downcast::<Thread>().unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_exists_rejects_unknown_id() {
        let ctx = RequestContext::new(seeded_store());
        let mut errors = ErrorsList::new();

        let result = ThreadExistsValidator
            .validate(
                &ctx,
                FieldValue::Int(999),
                &ErrorLocation::index("threads", 2),
                &mut errors,
            )
            .await
            .unwrap();

        assert!(result.is_none());
        let entry = errors.iter().next().unwrap();
        assert_eq!(entry.location, ErrorLocation::index("threads", 2));
        assert_eq!(entry.code, codes::THREAD_NOT_EXISTS);
    }

    #[tokio::test]
    async fn test_is_open() {
        let store = seeded_store();
        let ctx = RequestContext::new(store.clone())
            .with_user(User::new(42, "JohnDoe", "john@example.com", "hash"));

        let closed = store.load_thread(2).await.unwrap().unwrap();
        let mut errors = ErrorsList::new();
        let result = ThreadIsOpenValidator
            .validate(
                &ctx,
                FieldValue::entity(closed),
                &ErrorLocation::field("thread"),
                &mut errors,
            )
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(errors.iter().next().unwrap().code, codes::THREAD_CLOSED);
    }

    #[tokio::test]
    async fn test_author_validator() {
        let store = seeded_store();
        let thread = store.load_thread(1).await.unwrap().unwrap();

        // The starter passes
        let ctx = RequestContext::new(store.clone())
            .with_user(User::new(42, "Starter", "s@example.com", "hash"));
        let mut errors = ErrorsList::new();
        let result = ThreadAuthorValidator
            .validate(
                &ctx,
                FieldValue::entity(thread.clone()),
                &ErrorLocation::field("thread"),
                &mut errors,
            )
            .await
            .unwrap();
        assert!(result.is_some());

        // A stranger does not
        let ctx = RequestContext::new(store)
            .with_user(User::new(7, "Other", "o@example.com", "hash"));
        let mut errors = ErrorsList::new();
        let result = ThreadAuthorValidator
            .validate(
                &ctx,
                FieldValue::entity(thread),
                &ErrorLocation::field("thread"),
                &mut errors,
            )
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(errors.iter().next().unwrap().code, codes::NOT_AUTHOR);
    }

    #[tokio::test]
    async fn test_thread_category_composition() {
        let store = seeded_store();
        let thread = store.load_thread(1).await.unwrap().unwrap();

        // Moderator of category 5: the thread passes through unchanged
        let ctx = RequestContext::new(store.clone())
            .with_user(User::new(1, "Mod", "m@example.com", "hash").moderating(vec![5]));
        let mut errors = ErrorsList::new();
        let result = ThreadCategoryValidator::new(CategoryModeratorValidator)
            .validate(
                &ctx,
                FieldValue::entity(thread.clone()),
                &ErrorLocation::index("threads", 0),
                &mut errors,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.downcast::<Thread>().unwrap().id, 1);

        // Non-moderator: the inner failure lands at the thread's location
        let ctx = RequestContext::new(store)
            .with_user(User::new(7, "Other", "o@example.com", "hash"));
        let mut errors = ErrorsList::new();
        let result = ThreadCategoryValidator::new(CategoryModeratorValidator)
            .validate(
                &ctx,
                FieldValue::entity(thread),
                &ErrorLocation::index("threads", 0),
                &mut errors,
            )
            .await
            .unwrap();
        assert!(result.is_none());
        let entry = errors.iter().next().unwrap();
        assert_eq!(entry.location, ErrorLocation::index("threads", 0));
        assert_eq!(entry.code, codes::NOT_MODERATOR);
    }
}
