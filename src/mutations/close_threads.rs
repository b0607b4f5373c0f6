//! Close threads mutation
//!
//! Bulk-closes (or reopens) threads. The caller must moderate every
//! thread's category.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::core::{PipelineResult, RequestContext};
use crate::entities::Thread;
use crate::validation::{
    BulkValidator, CategoryModeratorValidator, CleanedData, ErrorsList, InputModel,
    ThreadCategoryValidator, ThreadExistsValidator, UserIsAuthorizedRootValidator, ValidatorSet,
};

use super::{list_or_none, required, validate_input};

/// Response for the close-threads mutation
#[derive(Debug, Serialize)]
pub struct CloseThreadsResponse {
    pub errors: Option<ErrorsList>,
    pub threads: Option<Vec<Thread>>,
}

/// Resolve a close-threads request
pub async fn close_threads(
    ctx: &Arc<RequestContext>,
    input: &Value,
) -> PipelineResult<CloseThreadsResponse> {
    let hooks = &ctx.hooks.close_threads;

    let model = hooks.model.call_action(input_model, ctx.clone()).await?;
    let (cleaned, errors) = model.clean(input);
    if !errors.is_empty() {
        return Ok(CloseThreadsResponse {
            errors: Some(errors),
            threads: None,
        });
    }

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
    validators.add_root(UserIsAuthorizedRootValidator);

    let (cleaned, errors) = hooks
        .input
        .call_action(validate_input, (ctx.clone(), validators, cleaned, errors))
        .await?;

    if !errors.is_empty() {
        return Ok(CloseThreadsResponse {
            errors: Some(errors),
            threads: list_or_none(loaded),
        });
    }

    let threads = hooks
        .action
        .call_action(close_threads_action, (ctx.clone(), cleaned))
        .await?;

    Ok(CloseThreadsResponse {
        errors: None,
        threads: Some(threads),
    })
}

async fn input_model(ctx: Arc<RequestContext>) -> PipelineResult<InputModel> {
    Ok(InputModel::builder()
        .id_list("threads", ctx.settings.bulk_action_limit)
        .bool("is_closed")
        .build())
}

async fn close_threads_action(
    (ctx, cleaned): (Arc<RequestContext>, CleanedData),
) -> PipelineResult<Vec<Thread>> {
    let threads = required(cleaned.entities::<Thread>("threads"), "threads")?;
    let is_closed = required(cleaned.bool("is_closed"), "is_closed")?;

    let mut threads: Vec<Thread> = threads.iter().map(|t| (**t).clone()).collect();
    for thread in &mut threads {
        thread.set_closed(is_closed);
    }

    tracing::info!(
        request = %ctx.request_id,
        is_closed,
        count = threads.len(),
        "closing threads"
    );
    ctx.store.store_threads(threads).await
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::entities::{Category, User};
    use crate::hooks::{ActionFilter, ForumHooks, Next};
    use crate::store::{ForumStore, MemoryStore};
    use crate::validation::{codes, ErrorLocation};

    fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.seed_category(Category::new(5, "General"));
        store.seed_thread(Thread::new(1, 5, "First"));
        store.seed_thread(Thread::new(2, 5, "Second"));
        store
    }

    fn moderator() -> User {
        User::new(42, "Moderator", "mod@example.com", "hash").moderating(vec![5])
    }

    #[tokio::test]
    async fn test_closes_and_reopens() {
        let store = seeded_store();
        let ctx = Arc::new(RequestContext::new(store.clone()).with_user(moderator()));

        let response = close_threads(&ctx, &json!({"threads": [1, 2], "is_closed": true}))
            .await
            .unwrap();
        assert!(response.errors.is_none());
        assert!(response.threads.unwrap().iter().all(|t| t.is_closed));
        assert!(store.load_thread(1).await.unwrap().unwrap().is_closed);

        let response = close_threads(&ctx, &json!({"threads": [1], "is_closed": false}))
            .await
            .unwrap();
        assert!(response.errors.is_none());
        assert!(!store.load_thread(1).await.unwrap().unwrap().is_closed);
    }

    #[tokio::test]
    async fn test_non_moderator_is_rejected_per_thread() {
        let ctx = Arc::new(
            RequestContext::new(seeded_store())
                .with_user(User::new(7, "User", "u@example.com", "hash")),
        );

        let response = close_threads(&ctx, &json!({"threads": [1, 2], "is_closed": true}))
            .await
            .unwrap();

        let errors = response.errors.unwrap();
        let locations: Vec<_> = errors.iter().map(|e| e.location.clone()).collect();
        assert_eq!(
            locations,
            vec![
                ErrorLocation::index("threads", 0),
                ErrorLocation::index("threads", 1),
            ]
        );
        // Threads are still echoed for display
        assert_eq!(response.threads.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_flag_is_structural() {
        let ctx = Arc::new(RequestContext::new(seeded_store()).with_user(moderator()));

        let response = close_threads(&ctx, &json!({"threads": [1]})).await.unwrap();

        let errors = response.errors.unwrap();
        let entry = errors.iter().next().unwrap();
        assert_eq!(entry.location, ErrorLocation::field("is_closed"));
        assert_eq!(entry.code, codes::MISSING);
        assert!(response.threads.is_none());
    }

    /// Action hook filter that skips the base action entirely
    struct DryRun;

    #[async_trait]
    impl ActionFilter<(Arc<RequestContext>, CleanedData), Vec<Thread>> for DryRun {
        async fn filter(
            &self,
            _next: Next<'_, (Arc<RequestContext>, CleanedData), Vec<Thread>>,
            (_ctx, cleaned): (Arc<RequestContext>, CleanedData),
        ) -> PipelineResult<Vec<Thread>> {
            // Report what would change without persisting anything
            let threads = cleaned.entities::<Thread>("threads").unwrap_or_default();
            Ok(threads.iter().map(|t| (**t).clone()).collect())
        }
    }

    #[tokio::test]
    async fn test_action_filter_can_short_circuit_persistence() {
        let mut hooks = ForumHooks::new();
        hooks.close_threads.action.register(DryRun);

        let store = seeded_store();
        let ctx = Arc::new(
            RequestContext::new(store.clone())
                .with_hooks(Arc::new(hooks))
                .with_user(moderator()),
        );

        let response = close_threads(&ctx, &json!({"threads": [1], "is_closed": true}))
            .await
            .unwrap();

        assert!(response.errors.is_none());
        // The base action never ran: nothing was persisted
        assert!(!store.load_thread(1).await.unwrap().unwrap().is_closed);
    }
}
