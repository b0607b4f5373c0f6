//! Built-in validators
//!
//! The business checks mutations assemble into their `ValidatorSet`s:
//! existence checks that replace ids with loaded entities, state checks,
//! authorization checks, and the bulk wrapper for list fields. Extensions
//! implement `AsyncValidator` for their own checks and inject them through
//! an operation's input hook.

mod bulk;
mod category;
mod post;
mod thread;
mod user;

pub use bulk::BulkValidator;
pub use category::{CategoryExistsValidator, CategoryIsOpenValidator, CategoryModeratorValidator};
pub use post::{PostAuthorValidator, PostExistsValidator};
pub use thread::{
    ThreadAuthorValidator, ThreadCategoryValidator, ThreadExistsValidator, ThreadIsOpenValidator,
};
pub use user::{EmailIsAvailableValidator, UserIsAuthorizedRootValidator, UsernameIsAvailableValidator};
