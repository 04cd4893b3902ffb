//! Public short-code resolution.

use std::sync::Arc;

use serde_json::json;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::password::verify_password;

/// Service resolving a short code to its destination URL.
///
/// Checks run in a fixed order: existence, expiry, password gate. Only when
/// all three pass is the resolution recorded, as one click row plus a
/// counter increment applied atomically at the store. Application code
/// never read-modify-writes the counter, so concurrent resolutions of the
/// same code cannot lose clicks.
pub struct ResolveService {
    link_repository: Arc<dyn LinkRepository>,
}

impl ResolveService {
    pub fn new(link_repository: Arc<dyn LinkRepository>) -> Self {
        Self { link_repository }
    }

    /// Resolves `code` to its destination.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] - no link carries the code
    /// - [`AppError::Expired`] - the link exists but its expiry has passed
    /// - [`AppError::Unauthorized`] - the link is password-protected and
    ///   the password is absent or wrong (the two are indistinguishable)
    pub async fn resolve(&self, code: &str, password: Option<&str>) -> Result<String, AppError> {
        metrics::counter!("link_resolutions_total").increment(1);

        let link = self
            .link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))?;

        if link.is_expired() {
            return Err(AppError::expired(
                "The link has expired",
                json!({ "code": code }),
            ));
        }

        if let Some(hash) = link.password_hash.as_deref() {
            let provided = password.unwrap_or_default();
            if provided.is_empty() || !verify_password(provided, hash)? {
                return Err(AppError::unauthorized("Invalid password", json!({})));
            }
        }

        self.link_repository.record_resolution(link.id).await?;
        metrics::counter!("link_resolutions_success_total").increment(1);

        tracing::debug!(code, link_id = %link.id, "link resolved");
        Ok(link.destination)
    }
}
