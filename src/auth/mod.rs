//! Authentication collaborators
//!
//! Credential hashing and token issuance mechanics live outside this crate;
//! mutations reach them through these traits. The login pipeline routes
//! token claims through the `create_user_token_payload` hook before handing
//! them to the issuer, so extensions can enrich claims without touching the
//! encoding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::core::{PipelineError, PipelineResult};

/// Token claims passed through the payload hook
pub type Claims = serde_json::Map<String, serde_json::Value>;

/// Credential hashing contract
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage
    fn hash(&self, password: &str) -> PipelineResult<String>;

    /// Check a plaintext password against a stored hash
    fn verify(&self, password: &str, hash: &str) -> PipelineResult<bool>;
}

/// Token encoding contract
pub trait TokenIssuer: Send + Sync {
    /// Encode a claims set into an opaque token
    fn encode(&self, claims: &Claims) -> PipelineResult<String>;
}

/// Development stand-in hasher
///
/// Base64 obfuscation only - NOT a credential hash. Deployments supply a
/// real `PasswordHasher`; this one exists so demos and tests run without a
/// crypto dependency.
#[derive(Debug, Default)]
pub struct DevPasswordHasher;

impl DevPasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for DevPasswordHasher {
    fn hash(&self, password: &str) -> PipelineResult<String> {
        Ok(format!("dev${}", URL_SAFE_NO_PAD.encode(password)))
    }

    fn verify(&self, password: &str, hash: &str) -> PipelineResult<bool> {
        Ok(self.hash(password)? == hash)
    }
}

/// Development stand-in token issuer
///
/// Serializes claims to JSON and base64-encodes them, unsigned. Deployments
/// supply a signing `TokenIssuer`.
#[derive(Debug, Default)]
pub struct UnsignedTokenIssuer;

impl UnsignedTokenIssuer {
    pub fn new() -> Self {
        Self
    }
}

impl TokenIssuer for UnsignedTokenIssuer {
    fn encode(&self, claims: &Claims) -> PipelineResult<String> {
        let json = serde_json::to_vec(claims)
            .map_err(|e| PipelineError::auth(format!("claims encoding failed: {}", e)))?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }
}
