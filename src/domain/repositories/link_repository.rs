//! Repository trait for link and click data access.

use crate::domain::entities::{Link, LinkFilter, LinkPatch, ListedLink, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for links and their click log.
///
/// Covers the lifecycle operations plus the resolution-side primitives. The
/// `code` column carries a uniqueness constraint, and a violation of it is
/// the authoritative collision signal for generated codes.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryStore`] - in-memory, for
///   local development and tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the short code is already taken
    /// and [`AppError::Internal`] on other store errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code, regardless of owner.
    ///
    /// Used by public resolution; returns `Ok(None)` when no link carries
    /// the code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by id, scoped to its owner.
    ///
    /// Returns `Ok(None)` both when the id does not exist and when the link
    /// belongs to a different owner, so callers cannot tell the two apart.
    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Link>, AppError>;

    /// Applies a partial update.
    ///
    /// Only fields present in [`LinkPatch`] are modified; the patch always
    /// carries the freshly rotated code. `updated_at` is bumped.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the rotated code collides,
    /// [`AppError::NotFound`] when the link vanished underneath the caller.
    async fn update(&self, id: Uuid, patch: LinkPatch) -> Result<Link, AppError>;

    /// Removes a link and its click rows in a single transaction.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// Lists an owner's links, newest first, annotated with the most recent
    /// click timestamp per link.
    async fn list_owned(
        &self,
        owner_id: Uuid,
        filter: LinkFilter,
    ) -> Result<Vec<ListedLink>, AppError>;

    /// Records one successful resolution: inserts a click row and
    /// increments the link's `click_count` by exactly one, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when the link no longer exists.
    async fn record_resolution(&self, link_id: Uuid) -> Result<(), AppError>;

    /// Store liveness probe for the health endpoint.
    async fn ping(&self) -> Result<(), AppError>;
}
