//! Validation Module
//!
//! Converts raw mutation input into typed, cleaned data or an accumulated
//! list of field-scoped errors.
//!
//! # Overview
//!
//! Validation happens in two stages:
//!
//! 1. **Structural** - an `InputModel` (built per-request by the model
//!    hook) coerces raw JSON against declarative field constraints. Any
//!    structural failure short-circuits the operation.
//! 2. **Business** - `validate_data` walks a `ValidatorSet` of async
//!    validators (existence, state, authorization, bulk), accumulating
//!    failures in an `ErrorsList`. Fields validate independently; nothing
//!    is fail-fast across fields.
//!
//! # Example
//!
//! ```ignore
//! let model = InputModel::builder()
//!     .id_list("threads", ctx.settings.bulk_action_limit)
//!     .positive_int("category")
//!     .build();
//! let (cleaned, errors) = model.clean(&raw_input);
//!
//! let mut validators = ValidatorSet::new();
//! validators.add_field(
//!     "threads",
//!     BulkValidator::new(ThreadExistsValidator)
//!         .and(ThreadCategoryValidator::new(CategoryModeratorValidator)),
//! );
//! validators.add_field("category", CategoryExistsValidator);
//! validators.add_field("category", CategoryIsOpenValidator);
//! validators.add_root(UserIsAuthorizedRootValidator);
//!
//! let (cleaned, errors) = validate_data(&ctx, cleaned, &validators, errors).await?;
//! ```

mod errors;
mod model;
mod pipeline;
mod validators;
mod value;

pub use errors::{codes, ErrorEntry, ErrorLocation, ErrorsList, ROOT_LOCATION};
pub use model::{FieldConstraint, FieldSpec, InputModel, InputModelBuilder};
pub use pipeline::{run_chain, validate_data, ArcValidator, AsyncValidator, ValidatorSet};
pub use validators::{
    BulkValidator, CategoryExistsValidator, CategoryIsOpenValidator, CategoryModeratorValidator,
    EmailIsAvailableValidator, PostAuthorValidator, PostExistsValidator, ThreadAuthorValidator,
    ThreadCategoryValidator, ThreadExistsValidator, ThreadIsOpenValidator,
    UserIsAuthorizedRootValidator, UsernameIsAvailableValidator,
};
pub use value::{CleanedData, FieldValue};
