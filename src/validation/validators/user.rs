//! User and authorization validators

use async_trait::async_trait;

use crate::core::{PipelineError, PipelineResult, RequestContext};
use crate::validation::errors::{codes, ErrorLocation, ErrorsList};
use crate::validation::pipeline::AsyncValidator;
use crate::validation::value::FieldValue;

/// Operation-level check that the caller is authenticated
///
/// Registered under the root location; passes the cleaned mapping through
/// untouched.
pub struct UserIsAuthorizedRootValidator;

#[async_trait]
impl AsyncValidator for UserIsAuthorizedRootValidator {
    async fn validate(
        &self,
        ctx: &RequestContext,
        value: FieldValue,
        location: &ErrorLocation,
        errors: &mut ErrorsList,
    ) -> PipelineResult<Option<FieldValue>> {
        if ctx.user.is_none() {
            errors.add(location.clone(), codes::NOT_AUTHORIZED);
            return Ok(None);
        }
        Ok(Some(value))
    }
}

fn text_value(value: &FieldValue) -> PipelineResult<&str> {
    value
        .as_text()
        .ok_or_else(|| PipelineError::unexpected_value("expected a text value"))
}

/// Rejects usernames already registered
pub struct UsernameIsAvailableValidator;

#[async_trait]
impl AsyncValidator for UsernameIsAvailableValidator {
    async fn validate(
        &self,
        ctx: &RequestContext,
        value: FieldValue,
        location: &ErrorLocation,
        errors: &mut ErrorsList,
    ) -> PipelineResult<Option<FieldValue>> {
        let name = text_value(&value)?;

        if ctx.store.get_user_by_name(name).await?.is_some() {
            errors.add(location.clone(), codes::USERNAME_TAKEN);
            return Ok(None);
        }

        Ok(Some(value))
    }
}

/// Rejects emails already registered
pub struct EmailIsAvailableValidator;

#[async_trait]
impl AsyncValidator for EmailIsAvailableValidator {
    async fn validate(
        &self,
        ctx: &RequestContext,
        value: FieldValue,
        location: &ErrorLocation,
        errors: &mut ErrorsList,
    ) -> PipelineResult<Option<FieldValue>> {
        let email = text_value(&value)?;

        if ctx.store.get_user_by_email(email).await?.is_some() {
            errors.add(location.clone(), codes::EMAIL_TAKEN);
            return Ok(None);
        }

        Ok(Some(value))
    }
}
