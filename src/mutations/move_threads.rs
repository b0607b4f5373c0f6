//! Move threads mutation
//!
//! Bulk-moves threads into another category. The caller must moderate every
//! thread's current category, and the target category must exist and be
//! open.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::core::{PipelineResult, RequestContext};
use crate::entities::{Category, Thread};
use crate::validation::{
    BulkValidator, CategoryExistsValidator, CategoryIsOpenValidator, CategoryModeratorValidator,
    CleanedData, ErrorsList, InputModel, ThreadCategoryValidator, ThreadExistsValidator,
    UserIsAuthorizedRootValidator, ValidatorSet,
};

use super::{list_or_none, required, validate_input};

/// Response for the move-threads mutation
///
/// `errors` and `threads` may both be present: resolved threads are echoed
/// back even when validation failed.
#[derive(Debug, Serialize)]
pub struct MoveThreadsResponse {
    pub errors: Option<ErrorsList>,
    pub threads: Option<Vec<Thread>>,
}

/// Resolve a move-threads request
pub async fn move_threads(
    ctx: &Arc<RequestContext>,
    input: &Value,
) -> PipelineResult<MoveThreadsResponse> {
    let hooks = &ctx.hooks.move_threads;

    let model = hooks.model.call_action(input_model, ctx.clone()).await?;
    let (cleaned, errors) = model.clean(input);
    if !errors.is_empty() {
        return Ok(MoveThreadsResponse {
            errors: Some(errors),
            threads: None,
        });
    }

    // Best-effort echo load: unresolvable ids are dropped, not reported
    let loaded = match cleaned.ids("threads") {
        Some(ids) if !ids.is_empty() => ctx.store.load_threads(&ids).await?,
        _ => Vec::new(),
    };

    let mut validators = ValidatorSet::new();
    validators.add_field(
        "threads",
        BulkValidator::new(ThreadExistsValidator)
            .and(ThreadCategoryValidator::new(CategoryModeratorValidator)),
    );
    validators.add_field("category", CategoryExistsValidator);
    validators.add_field("category", CategoryIsOpenValidator);
    validators.add_root(UserIsAuthorizedRootValidator);

    let (cleaned, errors) = hooks
        .input
        .call_action(validate_input, (ctx.clone(), validators, cleaned, errors))
        .await?;

    if !errors.is_empty() {
        tracing::debug!(
            request = %ctx.request_id,
            errors = errors.len(),
            "move_threads rejected"
        );
        return Ok(MoveThreadsResponse {
            errors: Some(errors),
            threads: list_or_none(loaded),
        });
    }

    let threads = hooks
        .action
        .call_action(move_threads_action, (ctx.clone(), cleaned))
        .await?;

    Ok(MoveThreadsResponse {
        errors: None,
        threads: Some(threads),
    })
}

async fn input_model(ctx: Arc<RequestContext>) -> PipelineResult<InputModel> {
    Ok(InputModel::builder()
        .id_list("threads", ctx.settings.bulk_action_limit)
        .positive_int("category")
        .build())
}

async fn move_threads_action(
    (ctx, cleaned): (Arc<RequestContext>, CleanedData),
) -> PipelineResult<Vec<Thread>> {
    let threads = required(cleaned.entities::<Thread>("threads"), "threads")?;
    let category = required(cleaned.entity::<Category>("category"), "category")?;

    let mut threads: Vec<Thread> = threads.iter().map(|t| (**t).clone()).collect();
    for thread in &mut threads {
        thread.move_to(&category);
    }

    tracing::info!(
        request = %ctx.request_id,
        category = category.id,
        count = threads.len(),
        "moving threads"
    );
    ctx.store.store_threads(threads).await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::core::PipelineError;
    use crate::entities::{EntityId, Post, User};
    use crate::hooks::{ActionFilter, ForumHooks, InputHookArgs, Next};
    use crate::store::{ForumStore, MemoryStore};
    use crate::validation::{codes, AsyncValidator, ErrorLocation, FieldValue};

    /// Seeds: open categories 5 and 6, closed category 7, thread 1 in 5,
    /// thread 2 in 6, thread 3 in 5.
    fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.seed_category(Category::new(5, "General"));
        store.seed_category(Category::new(6, "Restricted"));
        store.seed_category(Category::new(7, "Archive").closed());
        store.seed_thread(Thread::new(1, 5, "First"));
        store.seed_thread(Thread::new(2, 6, "Second"));
        store.seed_thread(Thread::new(3, 5, "Third"));
        store
    }

    fn moderator_of_5() -> User {
        User::new(42, "Moderator", "mod@example.com", "hash").moderating(vec![5])
    }

    #[tokio::test]
    async fn test_moves_threads_and_persists() {
        let store = seeded_store();
        let ctx = Arc::new(
            RequestContext::new(store.clone())
                .with_user(User::new(1, "Admin", "a@example.com", "hash").as_moderator()),
        );

        let response = move_threads(&ctx, &json!({"threads": [1, 2], "category": 5}))
            .await
            .unwrap();

        assert!(response.errors.is_none());
        let threads = response.threads.unwrap();
        assert_eq!(threads.len(), 2);
        assert!(threads.iter().all(|t| t.category_id == 5));

        // Persisted
        let stored = store.load_thread(2).await.unwrap().unwrap();
        assert_eq!(stored.category_id, 5);
    }

    #[tokio::test]
    async fn test_partial_failure_reports_indexes_and_echoes_loaded() {
        // Thread 999 does not exist; the caller does not moderate thread 2's
        // category. Both failures surface; threads 1 and 2 are still echoed.
        let store = seeded_store();
        let ctx = Arc::new(RequestContext::new(store.clone()).with_user(moderator_of_5()));

        let response = move_threads(&ctx, &json!({"threads": [1, 2, 999], "category": 5}))
            .await
            .unwrap();

        let errors = response.errors.unwrap();
        let entries: Vec<_> = errors.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].location, ErrorLocation::index("threads", 1));
        assert_eq!(entries[0].code, codes::NOT_MODERATOR);
        assert_eq!(entries[1].location, ErrorLocation::index("threads", 2));
        assert_eq!(entries[1].code, codes::THREAD_NOT_EXISTS);

        let echoed: Vec<_> = response.threads.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(echoed, vec![1, 2]);

        // Nothing moved
        let stored = store.load_thread(1).await.unwrap().unwrap();
        assert_eq!(stored.category_id, 5);
    }

    #[tokio::test]
    async fn test_closed_target_category_is_rejected() {
        let store = seeded_store();
        let ctx = Arc::new(RequestContext::new(store).with_user(moderator_of_5()));

        let response = move_threads(&ctx, &json!({"threads": [1], "category": 7}))
            .await
            .unwrap();

        let errors = response.errors.unwrap();
        let entry = errors.iter().next().unwrap();
        assert_eq!(entry.location, ErrorLocation::field("category"));
        assert_eq!(entry.code, codes::CATEGORY_CLOSED);
    }

    #[tokio::test]
    async fn test_unauthorized_root_error_still_echoes_threads() {
        let store = seeded_store();
        let ctx = Arc::new(RequestContext::new(store)); // anonymous

        let response = move_threads(&ctx, &json!({"threads": [1], "category": 5}))
            .await
            .unwrap();

        let errors = response.errors.unwrap();
        assert!(errors.has_root_errors());
        // Best-effort echo is independent of the validation outcome
        let echoed: Vec<_> = response.threads.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(echoed, vec![1]);
    }

    /// Store wrapper counting every call, for the short-circuit test
    struct CountingStore {
        inner: Arc<MemoryStore>,
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn new(inner: Arc<MemoryStore>) -> Self {
            Self {
                inner,
                calls: AtomicUsize::new(0),
            }
        }

        fn tick(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ForumStore for CountingStore {
        async fn load_threads(&self, ids: &[EntityId]) -> PipelineResult<Vec<Thread>> {
            self.tick();
            self.inner.load_threads(ids).await
        }

        async fn load_thread(&self, id: EntityId) -> PipelineResult<Option<Thread>> {
            self.tick();
            self.inner.load_thread(id).await
        }

        async fn load_category(&self, id: EntityId) -> PipelineResult<Option<Category>> {
            self.tick();
            self.inner.load_category(id).await
        }

        async fn load_post(&self, id: EntityId) -> PipelineResult<Option<Post>> {
            self.tick();
            self.inner.load_post(id).await
        }

        async fn load_user(&self, id: EntityId) -> PipelineResult<Option<User>> {
            self.tick();
            self.inner.load_user(id).await
        }

        async fn get_user_by_name(&self, name: &str) -> PipelineResult<Option<User>> {
            self.tick();
            self.inner.get_user_by_name(name).await
        }

        async fn get_user_by_email(&self, email: &str) -> PipelineResult<Option<User>> {
            self.tick();
            self.inner.get_user_by_email(email).await
        }

        async fn store_threads(&self, threads: Vec<Thread>) -> PipelineResult<Vec<Thread>> {
            self.tick();
            self.inner.store_threads(threads).await
        }

        async fn store_thread(&self, thread: Thread) -> PipelineResult<Thread> {
            self.tick();
            self.inner.store_thread(thread).await
        }

        async fn store_post(&self, post: Post) -> PipelineResult<Post> {
            self.tick();
            self.inner.store_post(post).await
        }

        async fn store_user(&self, user: User) -> PipelineResult<User> {
            self.tick();
            self.inner.store_user(user).await
        }

        async fn delete_thread(&self, id: EntityId) -> PipelineResult<()> {
            self.tick();
            self.inner.delete_thread(id).await
        }
    }

    #[tokio::test]
    async fn test_structural_failure_makes_no_store_calls() {
        let store = Arc::new(CountingStore::new(seeded_store()));
        let store_handle: Arc<dyn ForumStore> = store.clone();
        let ctx = Arc::new(RequestContext::new(store_handle).with_user(moderator_of_5()));

        let response = move_threads(&ctx, &json!({"threads": [], "category": 5}))
            .await
            .unwrap();

        let errors = response.errors.unwrap();
        assert_eq!(errors.iter().next().unwrap().code, codes::LIST_EMPTY);
        assert!(response.threads.is_none());
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    /// Rejects any value with an extension-specific code
    struct RejectWithCode(&'static str);

    #[async_trait]
    impl AsyncValidator for RejectWithCode {
        async fn validate(
            &self,
            _ctx: &RequestContext,
            _value: FieldValue,
            location: &ErrorLocation,
            errors: &mut ErrorsList,
        ) -> PipelineResult<Option<FieldValue>> {
            errors.add(location.clone(), self.0);
            Ok(None)
        }
    }

    /// Input hook filter injecting an extra category validator
    struct InjectCategoryCheck;

    #[async_trait]
    impl ActionFilter<InputHookArgs, (CleanedData, ErrorsList)> for InjectCategoryCheck {
        async fn filter(
            &self,
            next: Next<'_, InputHookArgs, (CleanedData, ErrorsList)>,
            (ctx, mut validators, data, errors): InputHookArgs,
        ) -> PipelineResult<(CleanedData, ErrorsList)> {
            validators.add_field("category", RejectWithCode("extension_error.category"));
            next.call((ctx, validators, data, errors)).await
        }
    }

    #[tokio::test]
    async fn test_extension_injected_validator_reaches_the_errors_list() {
        let mut hooks = ForumHooks::new();
        hooks.move_threads.input.register(InjectCategoryCheck);

        let ctx = Arc::new(
            RequestContext::new(seeded_store())
                .with_hooks(Arc::new(hooks))
                .with_user(User::new(1, "Admin", "a@example.com", "hash").as_moderator()),
        );

        let response = move_threads(&ctx, &json!({"threads": [1], "category": 5}))
            .await
            .unwrap();

        let errors = response.errors.unwrap();
        assert!(errors
            .iter()
            .any(|e| e.code == "extension_error.category"
                && e.location == ErrorLocation::field("category")));
    }

    #[tokio::test]
    async fn test_model_hook_sees_settings() {
        use crate::core::ForumSettings;

        let ctx = Arc::new(
            RequestContext::new(seeded_store())
                .with_settings(ForumSettings::default().with_bulk_action_limit(2))
                .with_user(User::new(1, "Admin", "a@example.com", "hash").as_moderator()),
        );

        let response = move_threads(&ctx, &json!({"threads": [1, 2, 3], "category": 5}))
            .await
            .unwrap();

        let errors = response.errors.unwrap();
        assert_eq!(errors.iter().next().unwrap().code, codes::LIST_TOO_LONG);
    }

    #[tokio::test]
    async fn test_collaborator_failure_is_a_hard_error() {
        struct BrokenStore;

        #[async_trait]
        impl ForumStore for BrokenStore {
            async fn load_threads(&self, _ids: &[EntityId]) -> PipelineResult<Vec<Thread>> {
                Err(PipelineError::store("down"))
            }
            async fn load_thread(&self, _id: EntityId) -> PipelineResult<Option<Thread>> {
                Err(PipelineError::store("down"))
            }
            async fn load_category(&self, _id: EntityId) -> PipelineResult<Option<Category>> {
                Err(PipelineError::store("down"))
            }
            async fn load_post(&self, _id: EntityId) -> PipelineResult<Option<Post>> {
                Err(PipelineError::store("down"))
            }
            async fn load_user(&self, _id: EntityId) -> PipelineResult<Option<User>> {
                Err(PipelineError::store("down"))
            }
            async fn get_user_by_name(&self, _name: &str) -> PipelineResult<Option<User>> {
                Err(PipelineError::store("down"))
            }
            async fn get_user_by_email(&self, _email: &str) -> PipelineResult<Option<User>> {
                Err(PipelineError::store("down"))
            }
            async fn store_threads(&self, _threads: Vec<Thread>) -> PipelineResult<Vec<Thread>> {
                Err(PipelineError::store("down"))
            }
            async fn store_thread(&self, _thread: Thread) -> PipelineResult<Thread> {
                Err(PipelineError::store("down"))
            }
            async fn store_post(&self, _post: Post) -> PipelineResult<Post> {
                Err(PipelineError::store("down"))
            }
            async fn store_user(&self, _user: User) -> PipelineResult<User> {
                Err(PipelineError::store("down"))
            }
            async fn delete_thread(&self, _id: EntityId) -> PipelineResult<()> {
                Err(PipelineError::store("down"))
            }
        }

        let ctx = Arc::new(
            RequestContext::new(Arc::new(BrokenStore)).with_user(moderator_of_5()),
        );

        let err = move_threads(&ctx, &json!({"threads": [1], "category": 5}))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Store(_)));
    }

    #[tokio::test]
    async fn test_response_serialization_carries_errors_and_echo() {
        let ctx = Arc::new(RequestContext::new(seeded_store())); // anonymous

        let response = move_threads(&ctx, &json!({"threads": [1], "category": 5}))
            .await
            .unwrap();
        let json = serde_json::to_value(&response).unwrap();

        assert!(json["errors"].is_array());
        // Bulk moderator failure first, root failure second: append order
        assert_eq!(json["errors"][0]["location"], json!(["threads", 0]));
        assert_eq!(json["errors"][1]["location"], json!(["__root__"]));
        assert_eq!(json["threads"][0]["id"], 1);
    }
}
