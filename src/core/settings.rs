//! Forum settings
//!
//! Runtime configuration consulted when building validation models. Limits
//! live here rather than in a global schema so a model hook can bake the
//! current values into the per-request `InputModel`.

use serde::{Deserialize, Serialize};

/// Runtime limits for mutation input
///
/// Deserializable so deployments can load it from a config file; `Default`
/// provides the stock limits. Builder-style `with_*` methods cover the
/// common overrides:
///
/// ```ignore
/// let settings = ForumSettings::default()
///     .with_bulk_action_limit(10)
///     .with_password_min_length(12);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForumSettings {
    /// Maximum number of ids accepted by one bulk mutation
    pub bulk_action_limit: usize,

    /// Thread title length bounds (characters)
    pub thread_title_min_length: usize,
    pub thread_title_max_length: usize,

    /// Post body length bounds (characters)
    pub post_min_length: usize,
    pub post_max_length: usize,

    /// Username length bounds (characters)
    pub username_min_length: usize,
    pub username_max_length: usize,

    /// Minimum password length (characters)
    pub password_min_length: usize,

    /// Lifetime of issued user tokens, in seconds
    pub token_ttl_seconds: i64,
}

impl Default for ForumSettings {
    fn default() -> Self {
        Self {
            bulk_action_limit: 25,
            thread_title_min_length: 5,
            thread_title_max_length: 255,
            post_min_length: 5,
            post_max_length: 60_000,
            username_min_length: 4,
            username_max_length: 20,
            password_min_length: 8,
            token_ttl_seconds: 7 * 24 * 60 * 60,
        }
    }
}

impl ForumSettings {
    /// Set the bulk action id limit
    pub fn with_bulk_action_limit(mut self, limit: usize) -> Self {
        self.bulk_action_limit = limit;
        self
    }

    /// Set the thread title length bounds
    pub fn with_thread_title_length(mut self, min: usize, max: usize) -> Self {
        self.thread_title_min_length = min;
        self.thread_title_max_length = max;
        self
    }

    /// Set the post body length bounds
    pub fn with_post_length(mut self, min: usize, max: usize) -> Self {
        self.post_min_length = min;
        self.post_max_length = max;
        self
    }

    /// Set the minimum password length
    pub fn with_password_min_length(mut self, min: usize) -> Self {
        self.password_min_length = min;
        self
    }
}
