//! Community handlers and the JSON envelopes they return.

use super::auth::AuthenticatedUser;
use super::error::ApiError;
use crate::domain::{CreatedPost, PostSummary};
use crate::ports::{CommunityPort, CreatePostRequest};
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub community: Arc<dyn CommunityPort>,
}

#[derive(Serialize)]
pub struct DataEnvelope<T> {
    success: bool,
    data: T,
}

impl<T> DataEnvelope<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Serialize)]
pub struct LikesEnvelope {
    success: bool,
    likes: i64,
}

/// Create-post body as sent by clients. Every field arrives as raw JSON and
/// is interpreted by the service once the author is known.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePostBody {
    pub content: Value,
    pub task: Value,
    pub points: Value,
    pub user_id: Value,
}

impl CreatePostBody {
    /// A body that is not a JSON object carries no fields.
    fn from_json(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

pub async fn list_posts_handler(
    State(state): State<AppState>,
) -> Result<Json<DataEnvelope<Vec<PostSummary>>>, ApiError> {
    let posts = state.community.list_posts().await?;
    Ok(Json(DataEnvelope::ok(posts)))
}

pub async fn create_post_handler(
    State(state): State<AppState>,
    session: Option<Extension<AuthenticatedUser>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<DataEnvelope<CreatedPost>>), ApiError> {
    // No JSON content type reads as an empty body, so identity checks still run.
    let body = match payload {
        Ok(Json(value)) => CreatePostBody::from_json(value),
        Err(JsonRejection::MissingJsonContentType(_)) => CreatePostBody::default(),
        Err(rejection) => return Err(rejection.into()),
    };

    let req = CreatePostRequest {
        content: body.content,
        task: body.task,
        points: body.points,
        session_user_id: session.map(|Extension(AuthenticatedUser(id))| id),
        body_user_id: body.user_id,
    };

    let created = state.community.create_post(req).await?;
    Ok((StatusCode::CREATED, Json(DataEnvelope::ok(created))))
}

pub async fn like_post_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<LikesEnvelope>, ApiError> {
    let likes = state.community.like_post(&post_id).await?;
    Ok(Json(LikesEnvelope {
        success: true,
        likes,
    }))
}
