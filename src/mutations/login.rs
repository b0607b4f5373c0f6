//! Login mutation
//!
//! Verifies credentials and issues a user token. Two hooks wrap the flow:
//! `authenticate_user` around the credential check (extensions add ban
//! checks, rate limits, alternate credential sources) and
//! `create_user_token` around token creation, whose claims pass through the
//! `create_user_token_payload` hook before encoding.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::auth::Claims;
use crate::core::{PipelineResult, RequestContext};
use crate::entities::User;
use crate::validation::{codes, ErrorsList, InputModel};

/// Response for the login mutation
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub errors: Option<ErrorsList>,
    pub user: Option<User>,
    pub token: Option<String>,
}

/// Resolve a login request
pub async fn login(ctx: &Arc<RequestContext>, input: &Value) -> PipelineResult<LoginResponse> {
    let model = InputModel::builder()
        .text("username", 1, 255)
        .text("password", 1, 1024)
        .build();

    let (cleaned, errors) = model.clean(input);
    if !errors.is_empty() {
        return Ok(LoginResponse {
            errors: Some(errors),
            user: None,
            token: None,
        });
    }

    let username = cleaned.text("username").unwrap_or_default().to_string();
    let password = cleaned.text("password").unwrap_or_default().to_string();

    let user = ctx
        .hooks
        .authenticate_user
        .call_action(authenticate_user, (ctx.clone(), username, password))
        .await?;

    let Some(user) = user else {
        let mut errors = ErrorsList::new();
        errors.add_root(codes::INVALID_CREDENTIALS);
        return Ok(LoginResponse {
            errors: Some(errors),
            user: None,
            token: None,
        });
    };

    let token = ctx
        .hooks
        .create_user_token
        .call_action(create_user_token, (ctx.clone(), user.clone()))
        .await?;

    tracing::info!(request = %ctx.request_id, user = user.id, "login succeeded");
    Ok(LoginResponse {
        errors: None,
        user: Some(user),
        token: Some(token),
    })
}

/// Base credential check: lookup by name, verify against the stored hash
async fn authenticate_user(
    (ctx, username, password): (Arc<RequestContext>, String, String),
) -> PipelineResult<Option<User>> {
    let Some(user) = ctx.store.get_user_by_name(&username).await? else {
        return Ok(None);
    };

    if ctx.password_hasher.verify(&password, &user.password_hash)? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

/// Base token creation: claims → payload hook → issuer
async fn create_user_token((ctx, user): (Arc<RequestContext>, User)) -> PipelineResult<String> {
    let mut claims = Claims::new();
    claims.insert("sub".into(), serde_json::json!(user.id));
    claims.insert("name".into(), serde_json::json!(user.name));
    claims.insert(
        "exp".into(),
        serde_json::json!(Utc::now().timestamp() + ctx.settings.token_ttl_seconds),
    );

    let claims = ctx
        .hooks
        .create_user_token_payload
        .call_action(token_payload, (ctx.clone(), claims))
        .await?;

    ctx.token_issuer.encode(&claims)
}

/// Base payload transform: identity
async fn token_payload(
    (_ctx, claims): (Arc<RequestContext>, Claims),
) -> PipelineResult<Claims> {
    Ok(claims)
}
