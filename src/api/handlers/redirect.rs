//! Handler for short URL redirect.

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

/// Query parameters for the resolution endpoint.
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// Password for protected links.
    pub ps: Option<String>,
}

/// Redirects a short code to its destination URL.
///
/// # Endpoint
///
/// `GET /{code}?ps=<password>`
///
/// # Request Flow
///
/// 1. Look up the code
/// 2. Reject expired links
/// 3. Check the password for protected links (`ps` query parameter)
/// 4. Record the click
/// 5. Return 307 Temporary Redirect
///
/// # Errors
///
/// - **404 Not Found**: unknown code
/// - **403 Forbidden**: the link has expired
/// - **401 Unauthorized**: missing or wrong password on a protected link
pub async fn redirect_handler(
    Path(code): Path<String>,
    Query(query): Query<ResolveQuery>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let destination = state
        .resolve_service
        .resolve(&code, query.ps.as_deref())
        .await?;

    Ok(Redirect::temporary(&destination))
}
