//! Close thread mutation
//!
//! Single-thread variant of close: moderators close or reopen one thread.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::core::{PipelineResult, RequestContext};
use crate::entities::Thread;
use crate::validation::{
    CategoryModeratorValidator, CleanedData, ErrorsList, InputModel, ThreadCategoryValidator,
    ThreadExistsValidator, UserIsAuthorizedRootValidator, ValidatorSet,
};

use super::{required, validate_input};

/// Response for the close-thread mutation
#[derive(Debug, Serialize)]
pub struct CloseThreadResponse {
    pub errors: Option<ErrorsList>,
    pub thread: Option<Thread>,
}

/// Resolve a close-thread request
pub async fn close_thread(
    ctx: &Arc<RequestContext>,
    input: &Value,
) -> PipelineResult<CloseThreadResponse> {
    let hooks = &ctx.hooks.close_thread;

    let model = hooks.model.call_action(input_model, ctx.clone()).await?;
    let (cleaned, errors) = model.clean(input);
    if !errors.is_empty() {
        return Ok(CloseThreadResponse {
            errors: Some(errors),
            thread: None,
        });
    }

    // Best-effort echo load
    let loaded = match cleaned.int("thread") {
        Some(id) => ctx.store.load_thread(id).await?,
        None => None,
    };

    let mut validators = ValidatorSet::new();
    validators.add_field("thread", ThreadExistsValidator);
    validators.add_field(
        "thread",
        ThreadCategoryValidator::new(CategoryModeratorValidator),
    );
    validators.add_root(UserIsAuthorizedRootValidator);

    let (cleaned, errors) = hooks
        .input
        .call_action(validate_input, (ctx.clone(), validators, cleaned, errors))
        .await?;

    if !errors.is_empty() {
        return Ok(CloseThreadResponse {
            errors: Some(errors),
            thread: loaded,
        });
    }

    let thread = hooks
        .action
        .call_action(close_thread_action, (ctx.clone(), cleaned))
        .await?;

    Ok(CloseThreadResponse {
        errors: None,
        thread: Some(thread),
    })
}

async fn input_model(_ctx: Arc<RequestContext>) -> PipelineResult<InputModel> {
    Ok(InputModel::builder()
        .positive_int("thread")
        .bool("is_closed")
        .build())
}

async fn close_thread_action(
    (ctx, cleaned): (Arc<RequestContext>, CleanedData),
) -> PipelineResult<Thread> {
    let thread = required(cleaned.entity::<Thread>("thread"), "thread")?;
    let is_closed = required(cleaned.bool("is_closed"), "is_closed")?;

    let mut thread = (*thread).clone();
    thread.set_closed(is_closed);

    tracing::info!(request = %ctx.request_id, thread = thread.id, is_closed, "closing thread");
    ctx.store.store_thread(thread).await
}
