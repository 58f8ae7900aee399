//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, NewPost, PopulatedPost, Post, User};

/// User lookup. Users are managed elsewhere; this service only reads them.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DomainError>;
}

/// Post persistence.
#[async_trait::async_trait]
pub trait PostStore: Send + Sync {
    /// Newest posts first (ties broken by insertion order), at most `limit`,
    /// each with its author resolved.
    async fn find_recent(&self, limit: usize) -> Result<Vec<PopulatedPost>, DomainError>;

    /// Persist a new post. The store assigns `id` and `created_at`, starts
    /// `likes` at 0 and `comments` empty, and rejects a missing `content` with
    /// [`DomainError::Validation`].
    async fn insert(&self, post: NewPost) -> Result<Post, DomainError>;

    /// Atomically add one like. Returns the new count, or `None` when the post
    /// does not exist. Must not be implemented as a read followed by a write.
    async fn increment_likes(&self, post_id: &str) -> Result<Option<i64>, DomainError>;
}

/// Source of the avatar symbol attached to a newly created post.
pub trait AvatarPicker: Send + Sync {
    fn pick(&self) -> &'static str;
}
