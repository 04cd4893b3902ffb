//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`       - Short link redirect (public)
//! - `GET  /health`       - Health check (public)
//! - `POST /user/signup`  - Account registration (public)
//! - `POST /user/signin`  - Authentication (public)
//! - everything else      - Bearer token required, see [`crate::api::routes`]
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Authentication** - Bearer JWT on the protected group
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::redirect_handler;
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// Static prefixes like `/health` or `/user` take precedence over the
/// `/{code}` redirect capture.
pub fn router(state: AppState) -> Router {
    let protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .merge(api::routes::public_routes())
        .merge(protected)
        .route("/{code}", get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer())
}

/// [`router`] wrapped with trailing-slash normalization, as served by the
/// binary.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
