//! Forum hook registry
//!
//! One `ForumHooks` value holds every operation's extension points. It is
//! built at startup, extensions register their filters against it, and it
//! is then moved into `Arc` and shared read-only by every request context.
//!
//! # Example
//!
//! ```ignore
//! let mut hooks = ForumHooks::new();
//!
//! // An extension wrapping the move-threads action:
//! hooks.move_threads.action.register(AuditMovesFilter::new(audit_log));
//!
//! // Serving phase: frozen by construction
//! let hooks = Arc::new(hooks);
//! ```

use std::sync::Arc;

use crate::auth::Claims;
use crate::core::RequestContext;
use crate::entities::{EntityId, Post, Thread, User};
use crate::validation::{CleanedData, ErrorsList, InputModel, ValidatorSet};

use super::action::ActionHook;

/// Hook producing a validation model from the request context
pub type ModelHook = ActionHook<Arc<RequestContext>, InputModel>;

/// Arguments handed to an input hook's chain
pub type InputHookArgs = (Arc<RequestContext>, ValidatorSet, CleanedData, ErrorsList);

/// Hook running business validators over cleaned data
///
/// Filters can inject extra validators, replace the set, or rewrite the
/// cleaned data before/after the base pipeline runs.
pub type InputHook = ActionHook<InputHookArgs, (CleanedData, ErrorsList)>;

/// Hook executing an operation's side-effecting action
pub type MutationActionHook<O> = ActionHook<(Arc<RequestContext>, CleanedData), O>;

/// Hook transforming a token claims payload
pub type PayloadHook = ActionHook<(Arc<RequestContext>, Claims), Claims>;

/// The three extension points every mutation owns
#[derive(Debug)]
pub struct MutationHooks<O: Send + 'static> {
    /// Builds the operation's validation model
    pub model: ModelHook,

    /// Runs the operation's business validators
    pub input: InputHook,

    /// Executes the operation's action
    pub action: MutationActionHook<O>,
}

impl<O: Send + 'static> MutationHooks<O> {
    pub fn new() -> Self {
        Self {
            model: ModelHook::new(),
            input: InputHook::new(),
            action: MutationActionHook::new(),
        }
    }
}

impl<O: Send + 'static> Default for MutationHooks<O> {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide registry of every mutation's hooks
///
/// Mutated only during startup registration; `Arc`-shared and read-only
/// once requests are served.
#[derive(Debug, Default)]
pub struct ForumHooks {
    pub move_threads: MutationHooks<Vec<Thread>>,
    pub close_threads: MutationHooks<Vec<Thread>>,
    pub close_thread: MutationHooks<Thread>,
    pub delete_thread: MutationHooks<EntityId>,
    pub edit_thread_title: MutationHooks<Thread>,
    pub edit_post: MutationHooks<Post>,
    pub post_reply: MutationHooks<(Thread, Post)>,
    pub post_thread: MutationHooks<(Thread, Post)>,
    pub register_user: MutationHooks<User>,

    /// Wraps credential verification for login
    pub authenticate_user: ActionHook<(Arc<RequestContext>, String, String), Option<User>>,

    /// Wraps token creation for login
    pub create_user_token: ActionHook<(Arc<RequestContext>, User), String>,

    /// Transforms token claims before they are encoded
    pub create_user_token_payload: PayloadHook,
}

impl ForumHooks {
    /// Create a registry with no filters registered anywhere
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::core::PipelineResult;
    use crate::hooks::{ActionFilter, Next};

    struct Nop;

    #[async_trait]
    impl ActionFilter<(Arc<RequestContext>, CleanedData), Vec<Thread>> for Nop {
        async fn filter(
            &self,
            next: Next<'_, (Arc<RequestContext>, CleanedData), Vec<Thread>>,
            args: (Arc<RequestContext>, CleanedData),
        ) -> PipelineResult<Vec<Thread>> {
            next.call(args).await
        }
    }

    #[test]
    fn test_new_registry_is_empty() {
        let hooks = ForumHooks::new();
        assert!(hooks.move_threads.model.is_empty());
        assert!(hooks.move_threads.input.is_empty());
        assert!(hooks.move_threads.action.is_empty());
        assert!(hooks.create_user_token_payload.is_empty());
    }

    #[test]
    fn test_registration_counts() {
        let mut hooks = ForumHooks::new();
        hooks.move_threads.action.register(Nop);
        hooks.move_threads.action.register(Nop);

        assert_eq!(hooks.move_threads.action.len(), 2);
        assert!(hooks.close_threads.action.is_empty());
    }
}
