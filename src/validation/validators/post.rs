//! Post validators

use async_trait::async_trait;

use crate::core::{PipelineError, PipelineResult, RequestContext};
use crate::entities::Post;
use crate::validation::errors::{codes, ErrorLocation, ErrorsList};
use crate::validation::pipeline::AsyncValidator;
use crate::validation::value::FieldValue;

/// Replaces a post id with the loaded post
pub struct PostExistsValidator;

#[async_trait]
impl AsyncValidator for PostExistsValidator {
    async fn validate(
        &self,
        ctx: &RequestContext,
        value: FieldValue,
        location: &ErrorLocation,
        errors: &mut ErrorsList,
    ) -> PipelineResult<Option<FieldValue>> {
        let id = value
            .as_int()
            .ok_or_else(|| PipelineError::unexpected_value("expected a post id"))?;

        match ctx.store.load_post(id).await? {
            Some(post) => Ok(Some(FieldValue::entity(post))),
            None => {
                errors.add(location.clone(), codes::POST_NOT_EXISTS);
                Ok(None)
            }
        }
    }
}

/// Requires the caller to be the post's author or a moderator of its
/// thread's category
pub struct PostAuthorValidator;

#[async_trait]
impl AsyncValidator for PostAuthorValidator {
    async fn validate(
        &self,
        ctx: &RequestContext,
        value: FieldValue,
        location: &ErrorLocation,
        errors: &mut ErrorsList,
    ) -> PipelineResult<Option<FieldValue>> {
        let post = value
            .downcast::<Post>()
            .ok_or_else(|| PipelineError::unexpected_value("expected a post entity"))?;

        let Some(user) = ctx.user.as_ref() else {
            errors.add(location.clone(), codes::NOT_AUTHOR);
            return Ok(None);
        };

        if post.poster_id == Some(user.id) {
            return Ok(Some(value));
        }

        let thread = ctx.store.load_thread(post.thread_id).await?.ok_or_else(|| {
            PipelineError::store(format!(
                "post {} references missing thread {}",
                post.id, post.thread_id
            ))
        })?;

        if user.can_moderate(thread.category_id) {
            Ok(Some(value))
        } else {
            errors.add(location.clone(), codes::NOT_AUTHOR);
            Ok(None)
        }
    }
}
