//! Handlers for link management endpoints (create, update, delete, list).
//!
//! All endpoints here sit behind bearer authentication and operate on the
//! calling account's own links. A link id owned by someone else is
//! indistinguishable from a missing one (404).

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::link::{
    CreateLinkRequest, LinkResponse, ListLinksQuery, ListedLinkResponse, UpdateLinkRequest,
};
use crate::domain::access::AuthUser;
use crate::domain::entities::LinkFilter;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a shortened link for the calling account.
///
/// # Endpoint
///
/// `POST /url`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "expires_at": "2026-12-31T23:59:59Z",  // optional
///   "password": "s3cret"                    // optional
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for an invalid destination or a non-future
/// expiry, 503 Service Unavailable when no unique code could be allocated.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create(
            auth_user.id,
            payload.url,
            payload.expires_at,
            payload.password,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_link(&link, &state.base_url)),
    ))
}

/// Partially updates one of the caller's links.
///
/// # Endpoint
///
/// `PUT /url/{id}`
///
/// Every update rotates the short code, so the previous short URL stops
/// resolving. See [`UpdateLinkRequest`] for the field semantics.
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist or belongs to another
/// account. Returns 400 Bad Request if validation fails.
pub async fn update_link_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .update(
            auth_user.id,
            id,
            payload.url,
            payload.expires_at,
            payload.password,
        )
        .await?;

    Ok(Json(LinkResponse::from_link(&link, &state.base_url)))
}

/// Deletes one of the caller's links together with its click history.
///
/// # Endpoint
///
/// `DELETE /url/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist or belongs to another
/// account.
pub async fn delete_link_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete(auth_user.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /url/list?search=<substring>&expired=<bool>`
///
/// `search` filters on the destination URL; `expired=true` keeps only
/// links whose expiry has already passed. Each entry carries the
/// timestamp of its most recent click.
pub async fn list_links_handler(
    Query(query): Query<ListLinksQuery>,
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<ListedLinkResponse>>, AppError> {
    let filter = LinkFilter {
        search: query.search,
        expired: query.expired,
    };

    let listed = state.link_service.list(auth_user.id, filter).await?;

    Ok(Json(
        listed
            .iter()
            .map(|l| ListedLinkResponse::from_listed(l, &state.base_url))
            .collect(),
    ))
}
