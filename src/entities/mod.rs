//! Forum domain entities
//!
//! Plain data types flowing through the mutation pipeline:
//! - `Category` - a board section threads live in
//! - `Thread` - a discussion thread
//! - `Post` - a single message in a thread
//! - `User` - a registered account

pub mod category;
pub mod post;
pub mod thread;
pub mod user;

pub use category::Category;
pub use post::Post;
pub use thread::Thread;
pub use user::User;

/// Entity id type used across the forum
pub type EntityId = i64;

/// Build a URL-safe slug from a title
///
/// Lowercases ASCII, maps runs of non-alphanumeric characters to single
/// dashes, trims leading/trailing dashes. Non-ASCII characters are dropped
/// rather than transliterated.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
