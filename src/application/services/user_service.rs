//! User account management: registration, login and administration.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::application::services::AuthService;
use crate::domain::access::{self, Action, AuthUser, Role};
use crate::domain::entities::{NewUser, User, UserPatch};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::password::{hash_password, verify_password};

/// Service owning user accounts.
///
/// Registration and login are public; listing and deletion are admin-only,
/// gated through [`access::permits`]. Deleting an account removes its links
/// and their click rows in the same transaction.
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    auth_service: Arc<AuthService>,
}

impl UserService {
    pub fn new(user_repository: Arc<dyn UserRepository>, auth_service: Arc<AuthService>) -> Self {
        Self {
            user_repository,
            auth_service,
        }
    }

    /// Registers an account with the USER role and returns a signed token.
    ///
    /// # Errors
    ///
    /// [`AppError::Conflict`] when the username is already taken.
    pub async fn sign_up(&self, username: String, password: String) -> Result<String, AppError> {
        let password_hash = hash_password(&password)?;

        let new_user = NewUser {
            username: username.clone(),
            password_hash,
            role: Role::User,
        };

        let user = match self.user_repository.create(new_user).await {
            Ok(user) => user,
            Err(AppError::Conflict { .. }) => {
                return Err(AppError::conflict(
                    "Username already taken",
                    json!({ "username": username }),
                ));
            }
            Err(e) => return Err(e),
        };

        tracing::info!(user_id = %user.id, "account registered");
        self.auth_service.issue(&user)
    }

    /// Authenticates by username and password and returns a signed token.
    ///
    /// An unknown username and a wrong password produce the same
    /// [`AppError::InvalidArgument`], so login cannot be used to probe for
    /// existing usernames.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::invalid_argument("Invalid credentials", json!({})))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::invalid_argument("Invalid credentials", json!({})));
        }

        self.auth_service.issue(&user)
    }

    /// Lists every account except the caller's own. Admin only.
    pub async fn list_users(&self, caller: AuthUser) -> Result<Vec<User>, AppError> {
        if !access::permits(caller.role, Action::ListUsers, caller.id, caller.id) {
            return Err(AppError::forbidden("Admin access required", json!({})));
        }

        let mut users = self.user_repository.list().await?;
        users.retain(|u| u.id != caller.id);
        Ok(users)
    }

    /// Updates the caller's own account.
    ///
    /// Changing the password requires the current one; a missing or wrong
    /// current password is an [`AppError::InvalidArgument`]. A duplicate
    /// username maps to [`AppError::Conflict`].
    pub async fn update_user(
        &self,
        caller: AuthUser,
        username: Option<String>,
        new_password: Option<String>,
        current_password: Option<String>,
    ) -> Result<User, AppError> {
        let user = self
            .user_repository
            .find_by_id(caller.id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({})))?;

        let password_hash = match new_password.as_deref() {
            Some(new) => {
                let current = current_password.as_deref().ok_or_else(|| {
                    AppError::invalid_argument(
                        "Current password is required to set a new one",
                        json!({}),
                    )
                })?;

                if !verify_password(current, &user.password_hash)? {
                    return Err(AppError::invalid_argument(
                        "Current password is incorrect",
                        json!({}),
                    ));
                }

                Some(hash_password(new)?)
            }
            None => None,
        };

        let patch = UserPatch {
            username: username.clone(),
            password_hash,
            role: None,
        };

        match self.user_repository.update(user.id, patch).await {
            Ok(updated) => Ok(updated),
            Err(AppError::Conflict { .. }) => Err(AppError::conflict(
                "Username already taken",
                json!({ "username": username }),
            )),
            Err(e) => Err(e),
        }
    }

    /// Deletes an account and everything it owns. Admin only; admins cannot
    /// delete themselves.
    ///
    /// The role gate runs before the existence lookup, so a non-admin
    /// cannot use this path to probe which account ids exist.
    pub async fn delete_user(&self, caller: AuthUser, target_id: Uuid) -> Result<(), AppError> {
        if !access::permits(caller.role, Action::DeleteUser, target_id, caller.id) {
            let message = if caller.role == Role::Admin {
                "Admins cannot delete their own account"
            } else {
                "Admin access required"
            };
            return Err(AppError::forbidden(message, json!({})));
        }

        let target = self
            .user_repository
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": target_id })))?;

        self.user_repository.delete(target.id).await?;
        tracing::info!(user_id = %target.id, "account deleted");
        Ok(())
    }
}
