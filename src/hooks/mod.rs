//! Hooks Module
//!
//! Overridable extension points wrapping every mutation's pipeline stages.
//!
//! # Overview
//!
//! Every mutation exposes three hooks:
//! - a **model hook** wrapping validation-model construction,
//! - an **input hook** wrapping the business-validation pipeline,
//! - an **action hook** wrapping the side-effecting operation;
//!
//! plus payload-style hooks around login's credential check and token
//! claims. Filters registered on a hook form an onion around the base
//! behavior: each receives the rest of the chain (`Next`) and the call's
//! arguments, and may delegate, rewrite, or short-circuit.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use forum_pipeline::hooks::ForumHooks;
//!
//! let mut hooks = ForumHooks::new();
//!
//! // Extensions register during startup, in load order:
//! hooks.move_threads.input.register(RequireTargetCategoryTag);
//! hooks.register_user.action.register(SendWelcomeEmail::new(mailer));
//!
//! // Freeze for the serving phase:
//! let hooks = Arc::new(hooks);
//! ```
//!
//! # Lifecycle
//!
//! | Phase | Access | Mutation |
//! |-------|--------|----------|
//! | Startup | `&mut ForumHooks` | `register()` in load order |
//! | Serving | `Arc<ForumHooks>` | none - read-only by construction |

mod action;
mod registry;

pub use action::{ActionFilter, ActionHook, ArcFilter, Next};
pub use registry::{
    ForumHooks, InputHook, InputHookArgs, ModelHook, MutationActionHook, MutationHooks,
    PayloadHook,
};
