//! Core domain layer. No external I/O dependencies.
//!
//! Entities, shaping rules and errors live here. Dependencies flow inward.

pub mod entities;
pub mod errors;

pub use entities::{
    AVATARS, CreatedPost, DEFAULT_POINTS, NewPost, PopulatedPost, Post, PostAuthorView,
    PostSummary, RECENT_POSTS_LIMIT, User, content_from_json, points_from_json,
};
pub use errors::DomainError;
