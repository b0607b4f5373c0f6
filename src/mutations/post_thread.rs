//! Post thread mutation
//!
//! Starts a new thread with its opening post in a category.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::core::{PipelineResult, RequestContext};
use crate::entities::{Category, Post, Thread};
use crate::validation::{
    CategoryExistsValidator, CategoryIsOpenValidator, CleanedData, ErrorsList, InputModel,
    UserIsAuthorizedRootValidator, ValidatorSet,
};

use super::{required, validate_input};

/// Response for the post-thread mutation
#[derive(Debug, Serialize)]
pub struct PostThreadResponse {
    pub errors: Option<ErrorsList>,
    pub thread: Option<Thread>,
    pub post: Option<Post>,
}

/// Resolve a post-thread request
pub async fn post_thread(
    ctx: &Arc<RequestContext>,
    input: &Value,
) -> PipelineResult<PostThreadResponse> {
    let hooks = &ctx.hooks.post_thread;

    let model = hooks.model.call_action(input_model, ctx.clone()).await?;
    let (cleaned, errors) = model.clean(input);
    if !errors.is_empty() {
        return Ok(PostThreadResponse {
            errors: Some(errors),
            thread: None,
            post: None,
        });
    }

    let mut validators = ValidatorSet::new();
    validators.add_field("category", CategoryExistsValidator);
    validators.add_field("category", CategoryIsOpenValidator);
    validators.add_root(UserIsAuthorizedRootValidator);

    let (cleaned, errors) = hooks
        .input
        .call_action(validate_input, (ctx.clone(), validators, cleaned, errors))
        .await?;

    if !errors.is_empty() {
        return Ok(PostThreadResponse {
            errors: Some(errors),
            thread: None,
            post: None,
        });
    }

    let (thread, post) = hooks
        .action
        .call_action(post_thread_action, (ctx.clone(), cleaned))
        .await?;

    Ok(PostThreadResponse {
        errors: None,
        thread: Some(thread),
        post: Some(post),
    })
}

async fn input_model(ctx: Arc<RequestContext>) -> PipelineResult<InputModel> {
    Ok(InputModel::builder()
        .positive_int("category")
        .text(
            "title",
            ctx.settings.thread_title_min_length,
            ctx.settings.thread_title_max_length,
        )
        .text(
            "body",
            ctx.settings.post_min_length,
            ctx.settings.post_max_length,
        )
        .build())
}

async fn post_thread_action(
    (ctx, cleaned): (Arc<RequestContext>, CleanedData),
) -> PipelineResult<(Thread, Post)> {
    let category = required(cleaned.entity::<Category>("category"), "category")?;
    let title = required(cleaned.text("title"), "title")?;
    let body = required(cleaned.text("body"), "body")?;

    let starter_id = ctx.user.as_ref().map(|u| u.id);

    let mut thread = Thread::new(0, category.id, title);
    thread.starter_id = starter_id;
    let mut thread = ctx.store.store_thread(thread).await?;

    let post = ctx
        .store
        .store_post(Post::new(0, thread.id, starter_id, body))
        .await?;

    thread.set_first_post(&post);
    let thread = ctx.store.store_thread(thread).await?;

    tracing::info!(
        request = %ctx.request_id,
        thread = thread.id,
        category = category.id,
        "posted thread"
    );
    Ok((thread, post))
}
