//! Core types for the mutation pipeline
//!
//! This module provides the fundamental types used throughout the crate:
//! - `RequestContext` - per-request state passed through hooks and validators
//! - `ForumSettings` - runtime limits consulted by model hooks
//! - `PipelineError` - hard-failure error types

pub mod context;
pub mod error;
pub mod settings;

pub use context::RequestContext;
pub use error::{PipelineError, PipelineResult};
pub use settings::ForumSettings;
