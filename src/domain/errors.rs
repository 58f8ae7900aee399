//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// No user id could be resolved from the session or the request body.
    #[error("User authentication required")]
    Unauthenticated,

    #[error("User not found")]
    UserNotFound,

    #[error("Post not found")]
    PostNotFound,

    /// Input the store refused to persist (missing content, bad points, ...).
    #[error("Post validation failed: {0}")]
    Validation(String),

    #[error("Repository error: {0}")]
    Repo(String),
}

impl DomainError {
    /// True for the NotFound family (user or post missing).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound | Self::PostNotFound)
    }
}
