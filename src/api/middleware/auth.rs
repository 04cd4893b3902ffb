//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::domain::access::AuthUser;
use crate::{error::AppError, state::AppState};

/// Authenticates requests using Bearer tokens from the Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract token from `Authorization` header
/// 2. Verify the JWT signature and expiry
/// 3. Confirm the subject account still exists
/// 4. Attach an [`AuthUser`] extension with the account's current role
/// 5. Continue to next middleware/handler
///
/// The role comes from the store, not from the token, so a promotion or
/// demotion takes effect on the next request rather than at token renewal.
///
/// # Errors
///
/// Returns `401 Unauthorized` if:
/// - Authorization header is missing or malformed
/// - Token signature or expiry verification fails
/// - The account the token was issued for no longer exists
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let claims = st.auth_service.verify(&token)?;

    let user = st
        .user_repository
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| {
            AppError::unauthorized("Invalid or expired token", serde_json::json!({}))
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(AuthUser {
        id: user.id,
        role: user.role,
    });

    Ok(next.run(req).await)
}
