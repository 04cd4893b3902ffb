//! API route configuration.
//!
//! Routes are split into a public group and a group that requires Bearer
//! token authentication via [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_link_handler, delete_link_handler, delete_user_handler, health_handler,
    list_links_handler, list_users_handler, sign_in_handler, sign_up_handler,
    update_link_handler, update_user_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Routes reachable without authentication.
///
/// # Endpoints
///
/// - `GET  /health`       - Liveness and store connectivity
/// - `POST /user/signup`  - Register an account, returns a bearer token
/// - `POST /user/signin`  - Authenticate, returns a bearer token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/user/signup", post(sign_up_handler))
        .route("/user/signin", post(sign_in_handler))
}

/// Routes protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /user/list`  - List accounts (admin)
/// - `PUT    /user`       - Update the caller's own account
/// - `DELETE /user/{id}`  - Delete an account with its links (admin)
/// - `POST   /url`        - Create a shortened link
/// - `GET    /url/list`   - List the caller's links (search/expired filters)
/// - `PUT    /url/{id}`   - Update a link (rotates the short code)
/// - `DELETE /url/{id}`   - Delete a link with its click history
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/user/list", get(list_users_handler))
        .route("/user", put(update_user_handler))
        .route("/user/{id}", delete(delete_user_handler))
        .route("/url", post(create_link_handler))
        .route("/url/list", get(list_links_handler))
        .route(
            "/url/{id}",
            put(update_link_handler).delete(delete_link_handler),
        )
}
