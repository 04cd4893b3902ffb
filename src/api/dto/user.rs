//! DTOs for account and authentication endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::access::Role;
use crate::domain::entities::User;

/// Request body for `POST /user/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1, max = 40))]
    pub username: String,

    #[validate(length(min = 5))]
    pub password: String,
}

/// Request body for `POST /user/signin`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Request body for `PUT /user` (self-update).
///
/// Setting a new password requires `current_password`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 40))]
    pub username: Option<String>,

    #[validate(length(min = 5))]
    pub new_password: Option<String>,

    pub current_password: Option<String>,
}

/// Bearer token issued on signup and signin.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Public representation of an account. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}
