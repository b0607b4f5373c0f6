//! Mutations Module
//!
//! One module per write operation, each instantiating the same orchestrator
//! shape around its own hooks:
//!
//! 1. Build the validation model via the operation's **model hook**.
//! 2. Run structural validation; structural failure responds immediately.
//! 3. Pre-load referenced entities, best-effort, so they can be echoed back
//!    to the caller even when the operation fails.
//! 4. Assemble the operation's `ValidatorSet` and run it through the
//!    **input hook**, where extensions inject or replace validators.
//! 5. With errors: respond with the accumulated list plus any loaded
//!    entities. Without: run the **action hook** and respond with results.
//!
//! The orchestration is linear per request, and the action stage is only
//! entered once validation has fully succeeded — cancelling a request
//! future before that point cannot leave partial writes behind.
//!
//! Accumulated validation errors are response data; only collaborator
//! failures surface as `Err` from these resolvers.

pub mod close_thread;
pub mod close_threads;
pub mod delete_thread;
pub mod edit_post;
pub mod edit_thread_title;
pub mod login;
pub mod move_threads;
pub mod post_reply;
pub mod post_thread;
pub mod register_user;

pub use close_thread::{close_thread, CloseThreadResponse};
pub use close_threads::{close_threads, CloseThreadsResponse};
pub use delete_thread::{delete_thread, DeleteThreadResponse};
pub use edit_post::{edit_post, EditPostResponse};
pub use edit_thread_title::{edit_thread_title, EditThreadTitleResponse};
pub use login::{login, LoginResponse};
pub use move_threads::{move_threads, MoveThreadsResponse};
pub use post_reply::{post_reply, PostReplyResponse};
pub use post_thread::{post_thread, PostThreadResponse};
pub use register_user::{register_user, RegisterUserResponse};

use crate::core::{PipelineError, PipelineResult};
use crate::hooks::InputHookArgs;
use crate::validation::{validate_data, CleanedData, ErrorsList};

/// Base action for every input hook: run the assembled validator set
pub(crate) async fn validate_input(
    (ctx, validators, data, errors): InputHookArgs,
) -> PipelineResult<(CleanedData, ErrorsList)> {
    validate_data(&ctx, data, &validators, errors).await
}

/// Read a cleaned-data value an action depends on
///
/// Reaching this with `None` means validation let an operation through
/// without its field — a pipeline bug, not caller input.
pub(crate) fn required<T>(value: Option<T>, field: &str) -> PipelineResult<T> {
    value.ok_or_else(|| PipelineError::MissingField(field.to_string()))
}

/// Shape an entity list for a response: empty becomes `null`
pub(crate) fn list_or_none<T>(entities: Vec<T>) -> Option<Vec<T>> {
    if entities.is_empty() {
        None
    } else {
        Some(entities)
    }
}
