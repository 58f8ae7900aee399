//! Session identity. The gateway in front of this service authenticates users
//! and forwards the user id in a trusted header; no token validation here.

use axum::{
    extract::{Request, State},
    http::HeaderName,
    middleware::Next,
    response::Response,
};

/// User id of the authenticated caller, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

/// Copies a non-empty trusted header into [`AuthenticatedUser`]. Requests
/// without it pass through unauthenticated.
pub async fn propagate_user(
    State(header): State<HeaderName>,
    mut req: Request,
    next: Next,
) -> Response {
    let user_id = req
        .headers()
        .get(&header)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned);

    if let Some(id) = user_id {
        req.extensions_mut().insert(AuthenticatedUser(id));
    }

    next.run(req).await
}
