//! Inbound port. The HTTP adapter calls into the application.

use crate::domain::{CreatedPost, DomainError, PostSummary};
use serde_json::Value;

/// Input for creating a post, lifted out of the HTTP request.
///
/// Body fields stay as raw JSON. They are only interpreted after the author
/// has been resolved and found, so a malformed field never masks a missing
/// or unknown user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatePostRequest {
    pub content: Value,
    pub task: Value,
    /// Falsy (`null`, `false`, `0`, `""`) means "use the default".
    pub points: Value,
    /// User id from the authenticated session, if any. Takes precedence.
    pub session_user_id: Option<String>,
    /// `userId` from the request body; only read when there is no session id.
    pub body_user_id: Value,
}

impl CreatePostRequest {
    /// Session id first, then body id. Falsy values count as absent; a
    /// numeric body id is cast to its decimal string.
    pub fn resolve_user_id(&self) -> Result<Option<String>, DomainError> {
        if let Some(id) = self.session_user_id.as_deref().filter(|id| !id.is_empty()) {
            return Ok(Some(id.to_string()));
        }

        match &self.body_user_id {
            Value::Null | Value::Bool(false) => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            Value::Number(n) if n.as_f64() == Some(0.0) => Ok(None),
            Value::Number(n) => Ok(Some(n.to_string())),
            other => Err(DomainError::Validation(format!(
                "userId must be a string, got {other}"
            ))),
        }
    }
}

/// Community use cases exposed to inbound adapters.
#[async_trait::async_trait]
pub trait CommunityPort: Send + Sync {
    /// Up to 50 most recent posts, newest first.
    async fn list_posts(&self) -> Result<Vec<PostSummary>, DomainError>;

    /// Create a post for the resolved user and return its full shape.
    async fn create_post(&self, req: CreatePostRequest) -> Result<CreatedPost, DomainError>;

    /// Add one like to a post and return the updated count.
    async fn like_post(&self, post_id: &str) -> Result<i64, DomainError>;
}
