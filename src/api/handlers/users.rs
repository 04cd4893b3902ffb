//! Handlers for account and authentication endpoints.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::user::{
    SignInRequest, SignUpRequest, TokenResponse, UpdateUserRequest, UserResponse,
};
use crate::domain::access::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new account and returns a bearer token.
///
/// # Endpoint
///
/// `POST /user/signup`
///
/// # Errors
///
/// Returns 409 Conflict when the username is already taken, 400 Bad
/// Request when validation fails.
pub async fn sign_up_handler(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    payload.validate()?;

    let token = state
        .user_service
        .sign_up(payload.username, payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Authenticates an existing account and returns a bearer token.
///
/// # Endpoint
///
/// `POST /user/signin`
///
/// # Errors
///
/// Returns 400 Bad Request with "Invalid credentials" for an unknown
/// username or a wrong password; the two cases are indistinguishable.
pub async fn sign_in_handler(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.validate()?;

    let token = state
        .user_service
        .sign_in(&payload.username, &payload.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// Lists every account except the caller's own. Admin only.
///
/// # Endpoint
///
/// `GET /user/list`
pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.user_service.list_users(auth_user).await?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// Updates the caller's own account.
///
/// # Endpoint
///
/// `PUT /user`
///
/// # Errors
///
/// Returns 400 Bad Request when a new password is given without the
/// correct current one, 409 Conflict for a duplicate username.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    let user = state
        .user_service
        .update_user(
            auth_user,
            payload.username,
            payload.new_password,
            payload.current_password,
        )
        .await?;

    Ok(Json(UserResponse::from(&user)))
}

/// Deletes an account with all of its links and clicks. Admin only.
///
/// # Endpoint
///
/// `DELETE /user/{id}`
///
/// # Errors
///
/// Returns 403 Forbidden for non-admin callers and for an admin deleting
/// their own account, 404 Not Found when the target doesn't exist.
pub async fn delete_user_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<StatusCode, AppError> {
    state.user_service.delete_user(auth_user, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
