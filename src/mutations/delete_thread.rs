//! Delete thread mutation
//!
//! Moderators remove a thread and its posts. The response carries the
//! deleted thread's id rather than the (gone) entity.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::core::{PipelineResult, RequestContext};
use crate::entities::{EntityId, Thread};
use crate::validation::{
    CategoryModeratorValidator, CleanedData, ErrorsList, InputModel, ThreadCategoryValidator,
    ThreadExistsValidator, UserIsAuthorizedRootValidator, ValidatorSet,
};

use super::{required, validate_input};

/// Response for the delete-thread mutation
#[derive(Debug, Serialize)]
pub struct DeleteThreadResponse {
    pub errors: Option<ErrorsList>,
    pub deleted: Option<EntityId>,
}

/// Resolve a delete-thread request
pub async fn delete_thread(
    ctx: &Arc<RequestContext>,
    input: &Value,
) -> PipelineResult<DeleteThreadResponse> {
    let hooks = &ctx.hooks.delete_thread;

    let model = hooks.model.call_action(input_model, ctx.clone()).await?;
    let (cleaned, errors) = model.clean(input);
    if !errors.is_empty() {
        return Ok(DeleteThreadResponse {
            errors: Some(errors),
            deleted: None,
        });
    }

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
        return Ok(DeleteThreadResponse {
            errors: Some(errors),
            deleted: None,
        });
    }

    let deleted = hooks
        .action
        .call_action(delete_thread_action, (ctx.clone(), cleaned))
        .await?;

    Ok(DeleteThreadResponse {
        errors: None,
        deleted: Some(deleted),
    })
}

async fn input_model(_ctx: Arc<RequestContext>) -> PipelineResult<InputModel> {
    Ok(InputModel::builder().positive_int("thread").build())
}

async fn delete_thread_action(
    (ctx, cleaned): (Arc<RequestContext>, CleanedData),
) -> PipelineResult<EntityId> {
    let thread = required(cleaned.entity::<Thread>("thread"), "thread")?;

    tracing::info!(request = %ctx.request_id, thread = thread.id, "deleting thread");
    ctx.store.delete_thread(thread.id).await?;

    Ok(thread.id)
}
