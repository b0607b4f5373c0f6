//! Edit thread title mutation
//!
//! The thread starter (or a moderator) retitles a thread. Title bounds come
//! from settings via the model hook; the slug refreshes with the title.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::core::{PipelineResult, RequestContext};
use crate::entities::Thread;
use crate::validation::{
    CategoryIsOpenValidator, CleanedData, ErrorsList, InputModel, ThreadAuthorValidator,
    ThreadCategoryValidator, ThreadExistsValidator, ThreadIsOpenValidator,
    UserIsAuthorizedRootValidator, ValidatorSet,
};

use super::{required, validate_input};

/// Response for the edit-thread-title mutation
#[derive(Debug, Serialize)]
pub struct EditThreadTitleResponse {
    pub errors: Option<ErrorsList>,
    pub thread: Option<Thread>,
}

/// Resolve an edit-thread-title request
pub async fn edit_thread_title(
    ctx: &Arc<RequestContext>,
    input: &Value,
) -> PipelineResult<EditThreadTitleResponse> {
    let hooks = &ctx.hooks.edit_thread_title;

    let model = hooks.model.call_action(input_model, ctx.clone()).await?;
    let (cleaned, errors) = model.clean(input);
    if !errors.is_empty() {
        return Ok(EditThreadTitleResponse {
            errors: Some(errors),
            thread: None,
        });
    }

    let loaded = match cleaned.int("thread") {
        Some(id) => ctx.store.load_thread(id).await?,
        None => None,
    };

    let mut validators = ValidatorSet::new();
    validators.add_field("thread", ThreadExistsValidator);
    validators.add_field("thread", ThreadAuthorValidator);
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
        return Ok(EditThreadTitleResponse {
            errors: Some(errors),
            thread: loaded,
        });
    }

    let thread = hooks
        .action
        .call_action(edit_thread_title_action, (ctx.clone(), cleaned))
        .await?;

    Ok(EditThreadTitleResponse {
        errors: None,
        thread: Some(thread),
    })
}

async fn input_model(ctx: Arc<RequestContext>) -> PipelineResult<InputModel> {
    Ok(InputModel::builder()
        .positive_int("thread")
        .text(
            "title",
            ctx.settings.thread_title_min_length,
            ctx.settings.thread_title_max_length,
        )
        .build())
}

async fn edit_thread_title_action(
    (ctx, cleaned): (Arc<RequestContext>, CleanedData),
) -> PipelineResult<Thread> {
    let thread = required(cleaned.entity::<Thread>("thread"), "thread")?;
    let title = required(cleaned.text("title"), "title")?;

    let mut thread = (*thread).clone();
    thread.edit_title(title);

    tracing::info!(request = %ctx.request_id, thread = thread.id, "editing thread title");
    ctx.store.store_thread(thread).await
}
