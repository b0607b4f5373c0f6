//! Post reply mutation
//!
//! Adds a post to an existing thread. The thread and its category must be
//! open for non-moderators.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::core::{PipelineResult, RequestContext};
use crate::entities::{Post, Thread};
use crate::validation::{
    CategoryIsOpenValidator, CleanedData, ErrorsList, InputModel, ThreadCategoryValidator,
    ThreadExistsValidator, ThreadIsOpenValidator, UserIsAuthorizedRootValidator, ValidatorSet,
};

use super::{required, validate_input};

/// Response for the post-reply mutation
#[derive(Debug, Serialize)]
pub struct PostReplyResponse {
    pub errors: Option<ErrorsList>,
    pub thread: Option<Thread>,
    pub post: Option<Post>,
}

/// Resolve a post-reply request
pub async fn post_reply(
    ctx: &Arc<RequestContext>,
    input: &Value,
) -> PipelineResult<PostReplyResponse> {
    let hooks = &ctx.hooks.post_reply;

    let model = hooks.model.call_action(input_model, ctx.clone()).await?;
    let (cleaned, errors) = model.clean(input);
    if !errors.is_empty() {
        return Ok(PostReplyResponse {
            errors: Some(errors),
            thread: None,
            post: None,
        });
    }

    let loaded = match cleaned.int("thread") {
        Some(id) => ctx.store.load_thread(id).await?,
        None => None,
    };

    let mut validators = ValidatorSet::new();
    validators.add_field("thread", ThreadExistsValidator);
    validators.add_field(
        "thread",
        ThreadCategoryValidator::new(CategoryIsOpenValidator),
    );
    validators.add_field("thread", ThreadIsOpenValidator);
    validators.add_root(UserIsAuthorizedRootValidator);

    let (cleaned, errors) = hooks
        .input
        .call_action(validate_input, (ctx.clone(), validators, cleaned, errors))
        .await?;

    if !errors.is_empty() {
        return Ok(PostReplyResponse {
            errors: Some(errors),
            thread: loaded,
            post: None,
        });
    }

    let (thread, post) = hooks
        .action
        .call_action(post_reply_action, (ctx.clone(), cleaned))
        .await?;

    Ok(PostReplyResponse {
        errors: None,
        thread: Some(thread),
        post: Some(post),
    })
}

async fn input_model(ctx: Arc<RequestContext>) -> PipelineResult<InputModel> {
    Ok(InputModel::builder()
        .positive_int("thread")
        .text(
            "body",
            ctx.settings.post_min_length,
            ctx.settings.post_max_length,
        )
        .build())
}

async fn post_reply_action(
    (ctx, cleaned): (Arc<RequestContext>, CleanedData),
) -> PipelineResult<(Thread, Post)> {
    let thread = required(cleaned.entity::<Thread>("thread"), "thread")?;
    let body = required(cleaned.text("body"), "body")?;

    let poster_id = ctx.user.as_ref().map(|u| u.id);
    let post = ctx
        .store
        .store_post(Post::new(0, thread.id, poster_id, body))
        .await?;

    let mut thread = (*thread).clone();
    thread.register_reply(&post);
    let thread = ctx.store.store_thread(thread).await?;

    tracing::info!(
        request = %ctx.request_id,
        thread = thread.id,
        post = post.id,
        "posted reply"
    );
    Ok((thread, post))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::entities::{Category, User};
    use crate::store::{ForumStore, MemoryStore};
    use crate::validation::codes;

    fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.seed_category(Category::new(5, "General"));
        store.seed_thread(Thread::new(1, 5, "Open thread"));
        store
    }

    #[tokio::test]
    async fn test_posts_reply_and_bumps_thread() {
        let store = seeded_store();
        let ctx = Arc::new(
            RequestContext::new(store.clone())
                .with_user(User::new(42, "Poster", "p@example.com", "hash")),
        );

        let response = post_reply(&ctx, &json!({"thread": 1, "body": "A fine reply"}))
            .await
            .unwrap();

        assert!(response.errors.is_none());
        let thread = response.thread.unwrap();
        let post = response.post.unwrap();
        assert_eq!(thread.replies, 1);
        assert_eq!(post.thread_id, 1);
        assert_eq!(post.poster_id, Some(42));
        assert_eq!(thread.last_posted_at, post.posted_at);

        let stored = store.load_post(post.id).await.unwrap().unwrap();
        assert_eq!(stored.body, "A fine reply");
    }

    #[tokio::test]
    async fn test_closed_thread_rejects_replies() {
        let store = seeded_store();
        let mut closed = Thread::new(2, 5, "Closed thread");
        closed.set_closed(true);
        store.seed_thread(closed);

        let ctx = Arc::new(
            RequestContext::new(store)
                .with_user(User::new(42, "Poster", "p@example.com", "hash")),
        );

        let response = post_reply(&ctx, &json!({"thread": 2, "body": "Too late now"}))
            .await
            .unwrap();

        let errors = response.errors.unwrap();
        assert_eq!(errors.iter().next().unwrap().code, codes::THREAD_CLOSED);
        assert_eq!(response.thread.unwrap().id, 2);
        assert!(response.post.is_none());
    }

    #[tokio::test]
    async fn test_anonymous_caller_is_rejected() {
        let ctx = Arc::new(RequestContext::new(seeded_store()));

        let response = post_reply(&ctx, &json!({"thread": 1, "body": "Hello there"}))
            .await
            .unwrap();

        let errors = response.errors.unwrap();
        assert!(errors.has_root_errors());
        assert!(response.post.is_none());
    }
}
