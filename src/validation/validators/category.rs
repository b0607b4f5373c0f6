//! Category validators

use async_trait::async_trait;

use crate::core::{PipelineError, PipelineResult, RequestContext};
use crate::entities::Category;
use crate::validation::errors::{codes, ErrorLocation, ErrorsList};
use crate::validation::pipeline::AsyncValidator;
use crate::validation::value::FieldValue;

fn category_value(value: &FieldValue) -> PipelineResult<std::sync::Arc<Category>> {
    value
        .downcast::<Category>()
        .ok_or_else(|| PipelineError::unexpected_value("expected a category entity"))
}

/// Replaces a category id with the loaded category
pub struct CategoryExistsValidator;

#[async_trait]
impl AsyncValidator for CategoryExistsValidator {
    async fn validate(
        &self,
        ctx: &RequestContext,
        value: FieldValue,
        location: &ErrorLocation,
        errors: &mut ErrorsList,
    ) -> PipelineResult<Option<FieldValue>> {
        let id = value
            .as_int()
            .ok_or_else(|| PipelineError::unexpected_value("expected a category id"))?;

        match ctx.store.load_category(id).await? {
            Some(category) => Ok(Some(FieldValue::entity(category))),
            None => {
                errors.add(location.clone(), codes::CATEGORY_NOT_EXISTS);
                Ok(None)
            }
        }
    }
}

/// Rejects closed categories for non-moderators
pub struct CategoryIsOpenValidator;

#[async_trait]
impl AsyncValidator for CategoryIsOpenValidator {
    async fn validate(
        &self,
        ctx: &RequestContext,
        value: FieldValue,
        location: &ErrorLocation,
        errors: &mut ErrorsList,
    ) -> PipelineResult<Option<FieldValue>> {
        let category = category_value(&value)?;

        let is_moderator = ctx
            .user
            .as_ref()
            .map(|u| u.can_moderate(category.id))
            .unwrap_or(false);

        if category.is_closed && !is_moderator {
            errors.add(location.clone(), codes::CATEGORY_CLOSED);
            return Ok(None);
        }

        Ok(Some(value))
    }
}

/// Requires moderation rights over the category
pub struct CategoryModeratorValidator;

#[async_trait]
impl AsyncValidator for CategoryModeratorValidator {
    async fn validate(
        &self,
        ctx: &RequestContext,
        value: FieldValue,
        location: &ErrorLocation,
        errors: &mut ErrorsList,
    ) -> PipelineResult<Option<FieldValue>> {
        let category = category_value(&value)?;

        let is_moderator = ctx
            .user
            .as_ref()
            .map(|u| u.can_moderate(category.id))
            .unwrap_or(false);

        if !is_moderator {
            errors.add(location.clone(), codes::NOT_MODERATOR);
            return Ok(None);
        }

        Ok(Some(value))
    }
}
