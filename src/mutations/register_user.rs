//! Register user mutation
//!
//! Creates an account. Username and email shape are structural; their
//! availability is checked against the store by business validators. The
//! password is hashed by the collaborator and never stored raw.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::core::{PipelineResult, RequestContext};
use crate::entities::User;
use crate::validation::{
    CleanedData, EmailIsAvailableValidator, ErrorsList, InputModel, UsernameIsAvailableValidator,
    ValidatorSet,
};

use super::{required, validate_input};

/// Response for the register-user mutation
#[derive(Debug, Serialize)]
pub struct RegisterUserResponse {
    pub errors: Option<ErrorsList>,
    pub user: Option<User>,
}

/// Resolve a register-user request
///
/// The one mutation with no authorization requirement: registration is
/// anonymous by nature, so no root validator is assembled.
pub async fn register_user(
    ctx: &Arc<RequestContext>,
    input: &Value,
) -> PipelineResult<RegisterUserResponse> {
    let hooks = &ctx.hooks.register_user;

    let model = hooks.model.call_action(input_model, ctx.clone()).await?;
    let (cleaned, errors) = model.clean(input);
    if !errors.is_empty() {
        return Ok(RegisterUserResponse {
            errors: Some(errors),
            user: None,
        });
    }

    let mut validators = ValidatorSet::new();
    validators.add_field("name", UsernameIsAvailableValidator);
    validators.add_field("email", EmailIsAvailableValidator);

    let (cleaned, errors) = hooks
        .input
        .call_action(validate_input, (ctx.clone(), validators, cleaned, errors))
        .await?;

    if !errors.is_empty() {
        return Ok(RegisterUserResponse {
            errors: Some(errors),
            user: None,
        });
    }

    let user = hooks
        .action
        .call_action(register_user_action, (ctx.clone(), cleaned))
        .await?;

    Ok(RegisterUserResponse {
        errors: None,
        user: Some(user),
    })
}

async fn input_model(ctx: Arc<RequestContext>) -> PipelineResult<InputModel> {
    Ok(InputModel::builder()
        .username(
            "name",
            ctx.settings.username_min_length,
            ctx.settings.username_max_length,
        )
        .email("email")
        .text("password", ctx.settings.password_min_length, 1024)
        .build())
}

async fn register_user_action(
    (ctx, cleaned): (Arc<RequestContext>, CleanedData),
) -> PipelineResult<User> {
    let name = required(cleaned.text("name"), "name")?;
    let email = required(cleaned.text("email"), "email")?;
    let password = required(cleaned.text("password"), "password")?;

    let password_hash = ctx.password_hasher.hash(password)?;
    let user = ctx
        .store
        .store_user(User::new(0, name, email, password_hash))
        .await?;

    tracing::info!(request = %ctx.request_id, user = user.id, "registered user");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::{ForumStore, MemoryStore};
    use crate::validation::{codes, ErrorLocation};

    #[tokio::test]
    async fn test_registers_user_with_hashed_password() {
        let store = Arc::new(MemoryStore::new());
        let ctx = Arc::new(RequestContext::new(store.clone()));

        let response = register_user(
            &ctx,
            &json!({"name": "JohnDoe", "email": "John@Example.com", "password": "hunter22hunter"}),
        )
        .await
        .unwrap();

        assert!(response.errors.is_none());
        let user = response.user.unwrap();
        assert_eq!(user.name, "JohnDoe");
        assert_eq!(user.email, "john@example.com");
        assert_ne!(user.password_hash, "hunter22hunter");
        assert!(ctx
            .password_hasher
            .verify("hunter22hunter", &user.password_hash)
            .unwrap());

        assert!(store.get_user_by_name("johndoe").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_taken_name_and_email_both_surface() {
        let store = Arc::new(MemoryStore::new());
        store.seed_user(User::new(1, "JohnDoe", "john@example.com", "hash"));
        let ctx = Arc::new(RequestContext::new(store));

        let response = register_user(
            &ctx,
            &json!({"name": "johndoe", "email": "JOHN@example.com", "password": "hunter22hunter"}),
        )
        .await
        .unwrap();

        let errors = response.errors.unwrap();
        let entries: Vec<_> = errors.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].location, ErrorLocation::field("name"));
        assert_eq!(entries[0].code, codes::USERNAME_TAKEN);
        assert_eq!(entries[1].location, ErrorLocation::field("email"));
        assert_eq!(entries[1].code, codes::EMAIL_TAKEN);
        assert!(response.user.is_none());
    }

    #[tokio::test]
    async fn test_structural_shape_checks() {
        let ctx = Arc::new(RequestContext::new(Arc::new(MemoryStore::new())));

        let response = register_user(
            &ctx,
            &json!({"name": "no spaces", "email": "not-an-email", "password": "short"}),
        )
        .await
        .unwrap();

        let errors = response.errors.unwrap();
        assert_eq!(errors.len(), 3);
        let entries: Vec<_> = errors.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(
            entries,
            vec![codes::INVALID_USERNAME, codes::INVALID_EMAIL, codes::TEXT_TOO_SHORT]
        );
    }
}
