//! Request context - per-request state passed through the pipeline
//!
//! One `RequestContext` exists per mutation request. It carries the caller's
//! identity, the runtime settings snapshot, and the collaborator handles
//! every hook, validator and action reaches through. The hook registry it
//! references is process-wide, frozen, and shared by all concurrent
//! requests; the context itself is cheap to build and `Arc`-passed through
//! hook chains.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::{DevPasswordHasher, PasswordHasher, TokenIssuer, UnsignedTokenIssuer};
use crate::entities::User;
use crate::hooks::ForumHooks;
use crate::store::ForumStore;

use super::settings::ForumSettings;

/// Per-request pipeline state
pub struct RequestContext {
    /// Unique id for this request, for log correlation
    pub request_id: Uuid,

    /// Runtime limits consulted by model hooks
    pub settings: ForumSettings,

    /// The authenticated caller, if any
    pub user: Option<User>,

    /// Storage collaborator
    pub store: Arc<dyn ForumStore>,

    /// Credential hashing collaborator
    pub password_hasher: Arc<dyn PasswordHasher>,

    /// Token encoding collaborator
    pub token_issuer: Arc<dyn TokenIssuer>,

    /// Process-wide hook registry, frozen after startup
    pub hooks: Arc<ForumHooks>,
}

impl RequestContext {
    /// Create a context with default settings, collaborator stand-ins and
    /// an empty hook registry
    ///
    /// Use the `with_*` methods to install the real pieces:
    ///
    /// ```ignore
    /// let ctx = Arc::new(
    ///     RequestContext::new(store)
    ///         .with_settings(settings)
    ///         .with_hooks(hooks.clone())
    ///         .with_user(current_user),
    /// );
    /// ```
    pub fn new(store: Arc<dyn ForumStore>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            settings: ForumSettings::default(),
            user: None,
            store,
            password_hasher: Arc::new(DevPasswordHasher::new()),
            token_issuer: Arc::new(UnsignedTokenIssuer::new()),
            hooks: Arc::new(ForumHooks::new()),
        }
    }

    /// Set the settings snapshot
    pub fn with_settings(mut self, settings: ForumSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the authenticated caller
    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    /// Set the shared hook registry
    pub fn with_hooks(mut self, hooks: Arc<ForumHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Set the password hashing collaborator
    pub fn with_password_hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
        self.password_hasher = hasher;
        self
    }

    /// Set the token issuing collaborator
    pub fn with_token_issuer(mut self, issuer: Arc<dyn TokenIssuer>) -> Self {
        self.token_issuer = issuer;
        self
    }

    /// Check if the caller is authenticated
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("user", &self.user.as_ref().map(|u| u.id))
            .finish()
    }
}
