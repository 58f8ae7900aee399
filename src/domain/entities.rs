//! Domain entities. Pure data structures for the community feed.
//!
//! No storage or HTTP types here; adapters map rows and requests into these.

use super::errors::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Points credited to a post when the author does not supply a truthy value.
pub const DEFAULT_POINTS: i64 = 10;

/// Upper bound on posts returned by the community listing.
pub const RECENT_POSTS_LIMIT: usize = 50;

/// Avatar symbols shown next to a freshly created post, in selection order.
pub const AVATARS: [&str; 10] = [
    "🌱", "🌍", "♻️", "🌳", "💧", "☀️", "🌿", "🦋", "🌺", "🍃",
];

/// A community member. Read-only from this service's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A stored community post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    /// Id of the authoring [`User`]. The post references, never owns, the user.
    pub author: String,
    pub content: String,
    /// Free-form task tag, kept exactly as submitted.
    pub task: Value,
    pub points: i64,
    pub likes: i64,
    pub comments: Vec<Value>,
    pub created_at: DateTime<Utc>,
}

/// A post as returned by the recent-posts query, with its author resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedPost {
    pub post: Post,
    /// `None` when the author row no longer exists.
    pub author: Option<User>,
}

/// Insert payload handed to the post store.
///
/// `content` stays optional: presence is enforced by the store, which rejects
/// the insert as a validation failure.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub author: String,
    pub content: Option<String>,
    pub task: Value,
    pub points: i64,
}

impl NewPost {
    /// Builds the insert payload, applying the falsy-points default.
    pub fn new(author: String, content: Option<String>, task: Value, points: Option<i64>) -> Self {
        Self {
            author,
            content,
            task,
            points: resolve_points(points),
        }
    }
}

/// `None` and `0` both fall back to [`DEFAULT_POINTS`].
pub fn resolve_points(points: Option<i64>) -> i64 {
    match points {
        Some(p) if p != 0 => p,
        _ => DEFAULT_POINTS,
    }
}

/// Lift `points` out of raw JSON. Falsy values mean "use the default";
/// integral numbers and numeric strings are accepted; anything else,
/// including negatives, is a validation failure.
pub fn points_from_json(value: &Value) -> Result<Option<i64>, DomainError> {
    let points = match value {
        Value::Null | Value::Bool(false) => return Ok(None),
        Value::String(s) if s.is_empty() => return Ok(None),
        Value::Number(n) => match n.as_i64() {
            Some(p) => p,
            None => match n.as_f64() {
                Some(f) if f == 0.0 => return Ok(None),
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => f as i64,
                _ => return Err(invalid_points(value)),
            },
        },
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid_points(value))?,
        _ => return Err(invalid_points(value)),
    };

    match points {
        0 => Ok(None),
        p if p > 0 => Ok(Some(p)),
        _ => Err(invalid_points(value)),
    }
}

fn invalid_points(value: &Value) -> DomainError {
    DomainError::Validation(format!("points must be a positive integer, got {value}"))
}

/// Lift `content` out of raw JSON. Missing or empty yields `None`, which the
/// store rejects; scalars are cast to text; arrays and objects are invalid.
pub fn content_from_json(value: &Value) -> Result<Option<String>, DomainError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(_) | Value::Bool(_) => Ok(Some(value.to_string())),
        other => Err(DomainError::Validation(format!(
            "content must be text, got {other}"
        ))),
    }
}

/// Listing shape. Author, points, likes and comments are intentionally absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub id: String,
    pub content: String,
    pub task: Value,
}

impl From<&PopulatedPost> for PostSummary {
    fn from(p: &PopulatedPost) -> Self {
        Self {
            id: p.post.id.clone(),
            content: p.post.content.clone(),
            task: p.post.task.clone(),
        }
    }
}

/// Author block attached to a freshly created post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostAuthorView {
    pub name: String,
    pub avatar: String,
}

/// Full shape returned after creating a post.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPost {
    pub id: String,
    pub content: String,
    pub task: Value,
    pub points: i64,
    pub likes: i64,
    pub comments_count: usize,
    pub created_at: DateTime<Utc>,
    pub user: PostAuthorView,
}

impl CreatedPost {
    pub fn new(post: Post, author: &User, avatar: &str) -> Self {
        Self {
            comments_count: post.comments.len(),
            id: post.id,
            content: post.content,
            task: post.task,
            points: post.points,
            likes: post.likes,
            created_at: post.created_at,
            user: PostAuthorView {
                name: author.name.clone(),
                avatar: avatar.to_string(),
            },
        }
    }
}
