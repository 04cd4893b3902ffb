//! Repository trait for user account data access.

use crate::domain::entities::{NewUser, User, UserPatch};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for user accounts.
///
/// Usernames carry a uniqueness constraint; violations surface as
/// [`AppError::Conflict`] so signup and rename paths can report them.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryStore`] - in-memory, for
///   local development and tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the username is taken.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Finds an account by id. Returns `Ok(None)` when absent.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Finds an account by username. Returns `Ok(None)` when absent.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Lists every account, oldest first.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Applies a partial update; `None` fields are unchanged and
    /// `updated_at` is bumped.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] on a duplicate username and
    /// [`AppError::NotFound`] when the account does not exist.
    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, AppError>;

    /// Removes an account together with its links and their click rows in
    /// a single transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when the account does not exist.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}
