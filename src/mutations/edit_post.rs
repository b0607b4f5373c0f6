//! Edit post mutation
//!
//! The post's author (or a moderator of its thread's category) replaces the
//! post body. Body bounds come from settings via the model hook.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::core::{PipelineResult, RequestContext};
use crate::entities::Post;
use crate::validation::{
    CleanedData, ErrorsList, InputModel, PostAuthorValidator, PostExistsValidator,
    UserIsAuthorizedRootValidator, ValidatorSet,
};

use super::{required, validate_input};

/// Response for the edit-post mutation
#[derive(Debug, Serialize)]
pub struct EditPostResponse {
    pub errors: Option<ErrorsList>,
    pub post: Option<Post>,
}

/// Resolve an edit-post request
pub async fn edit_post(
    ctx: &Arc<RequestContext>,
    input: &Value,
) -> PipelineResult<EditPostResponse> {
    let hooks = &ctx.hooks.edit_post;

    let model = hooks.model.call_action(input_model, ctx.clone()).await?;
    let (cleaned, errors) = model.clean(input);
    if !errors.is_empty() {
        return Ok(EditPostResponse {
            errors: Some(errors),
            post: None,
        });
    }

    let loaded = match cleaned.int("post") {
        Some(id) => ctx.store.load_post(id).await?,
        None => None,
    };

    let mut validators = ValidatorSet::new();
    validators.add_field("post", PostExistsValidator);
    validators.add_field("post", PostAuthorValidator);
    validators.add_root(UserIsAuthorizedRootValidator);

    let (cleaned, errors) = hooks
        .input
        .call_action(validate_input, (ctx.clone(), validators, cleaned, errors))
        .await?;

    if !errors.is_empty() {
        return Ok(EditPostResponse {
            errors: Some(errors),
            post: loaded,
        });
    }

    let post = hooks
        .action
        .call_action(edit_post_action, (ctx.clone(), cleaned))
        .await?;

    Ok(EditPostResponse {
        errors: None,
        post: Some(post),
    })
}

async fn input_model(ctx: Arc<RequestContext>) -> PipelineResult<InputModel> {
    Ok(InputModel::builder()
        .positive_int("post")
        .text(
            "body",
            ctx.settings.post_min_length,
            ctx.settings.post_max_length,
        )
        .build())
}

async fn edit_post_action(
    (ctx, cleaned): (Arc<RequestContext>, CleanedData),
) -> PipelineResult<Post> {
    let post = required(cleaned.entity::<Post>("post"), "post")?;
    let body = required(cleaned.text("body"), "body")?;

    let mut post = (*post).clone();
    post.edit(body);

    tracing::info!(request = %ctx.request_id, post = post.id, "editing post");
    ctx.store.store_post(post).await
}
