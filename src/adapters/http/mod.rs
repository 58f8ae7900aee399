//! HTTP adapter. axum router over the CommunityPort inbound port.
//!
//! - `GET  /api/community/posts`               list recent posts
//! - `POST /api/community/posts`               create a post
//! - `POST /api/community/posts/:post_id/like` like a post

pub mod auth;
pub mod error;
pub mod routes;

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header::CONTENT_TYPE},
    middleware,
    routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

pub use auth::AuthenticatedUser;
pub use error::ApiError;
pub use routes::AppState;

use routes::{create_post_handler, like_post_handler, list_posts_handler};

/// Router-level settings taken from configuration.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Trusted header carrying the gateway-authenticated user id.
    pub user_header: HeaderName,
    /// Allowed CORS origin; any origin when `None`.
    pub cors_origin: Option<HeaderValue>,
}

/// Configured header or origin that is not valid HTTP.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("invalid user header {0:?}: {1}")]
    UserHeader(String, axum::http::header::InvalidHeaderName),
    #[error("invalid CORS origin {0:?}: {1}")]
    CorsOrigin(String, axum::http::header::InvalidHeaderValue),
}

impl HttpSettings {
    /// Parse configured strings. Header names are lowercased.
    pub fn from_parts(user_header: &str, cors_origin: Option<&str>) -> Result<Self, SettingsError> {
        let user_header = HeaderName::try_from(user_header)
            .map_err(|e| SettingsError::UserHeader(user_header.to_string(), e))?;
        let cors_origin = cors_origin
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|e| SettingsError::CorsOrigin(origin.to_string(), e))
            })
            .transpose()?;
        Ok(Self {
            user_header,
            cors_origin,
        })
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_header: HeaderName::from_static("x-user-id"),
            cors_origin: None,
        }
    }
}

pub fn router(state: AppState, settings: &HttpSettings) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, settings.user_header.clone()])
        .max_age(Duration::from_secs(60 * 60));
    let cors = match &settings.cors_origin {
        Some(origin) => cors.allow_origin(origin.clone()),
        None => cors.allow_origin(Any),
    };

    Router::new()
        .route(
            "/api/community/posts",
            get(list_posts_handler).post(create_post_handler),
        )
        .route("/api/community/posts/:post_id/like", post(like_post_handler))
        .layer(middleware::from_fn_with_state(
            settings.user_header.clone(),
            auth::propagate_user,
        ))
        .layer(cors)
        .with_state(state)
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "server running");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
