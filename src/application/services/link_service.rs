//! Link lifecycle service: create, update, delete and owner-scoped listing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use url::Url;
use uuid::Uuid;

use crate::domain::entities::{Link, LinkFilter, LinkPatch, ListedLink, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::generate_code;
use crate::utils::password::hash_password;

/// Attempts at allocating a unique short code before giving up.
const MAX_CODE_ATTEMPTS: usize = 5;

/// Service owning the link lifecycle.
///
/// Every operation is scoped to the calling account: a link id that exists
/// but belongs to someone else behaves exactly like a missing one.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
}

impl LinkService {
    pub fn new(link_repository: Arc<dyn LinkRepository>) -> Self {
        Self { link_repository }
    }

    /// Creates a link for `owner_id`.
    ///
    /// The destination must be an absolute http(s) URL and a provided
    /// expiry must lie strictly in the future. The short code is generated
    /// here and inserted optimistically; a store uniqueness violation means
    /// a collision, retried with a fresh code up to [`MAX_CODE_ATTEMPTS`]
    /// times.
    ///
    /// # Errors
    ///
    /// [`AppError::InvalidArgument`] for a bad destination,
    /// [`AppError::InvalidExpiry`] for a non-future expiry,
    /// [`AppError::ServiceUnavailable`] when no unique code could be
    /// allocated.
    pub async fn create(
        &self,
        owner_id: Uuid,
        destination: String,
        expires_at: Option<DateTime<Utc>>,
        password: Option<String>,
    ) -> Result<Link, AppError> {
        validate_destination(&destination)?;
        if let Some(expiry) = expires_at {
            validate_expiry(expiry)?;
        }

        let password_hash = match password.as_deref() {
            Some(p) if !p.is_empty() => Some(hash_password(p)?),
            _ => None,
        };

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = match generate_code() {
                Ok(code) => code,
                Err(_) => continue,
            };

            let new_link = NewLink {
                owner_id,
                code,
                destination: destination.clone(),
                expires_at,
                password_hash: password_hash.clone(),
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => {
                    tracing::info!(link_id = %link.id, owner_id = %owner_id, "link created");
                    return Ok(link);
                }
                Err(AppError::Conflict { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(AppError::service_unavailable(
            "Could not allocate a unique short code",
            json!({ "attempts": MAX_CODE_ATTEMPTS }),
        ))
    }

    /// Applies a partial update to a link owned by `caller_id`.
    ///
    /// Always rotates the short code, deliberately invalidating the old
    /// short URL. `expires_at: Some(None)` clears the expiry;
    /// `password: Some("")` removes password protection.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when the link is missing or owned by someone
    /// else; the two are indistinguishable to the caller.
    pub async fn update(
        &self,
        caller_id: Uuid,
        id: Uuid,
        destination: Option<String>,
        expires_at: Option<Option<DateTime<Utc>>>,
        password: Option<String>,
    ) -> Result<Link, AppError> {
        let link = self
            .link_repository
            .find_owned(id, caller_id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;

        if let Some(dest) = destination.as_deref() {
            validate_destination(dest)?;
        }
        if let Some(Some(expiry)) = expires_at {
            validate_expiry(expiry)?;
        }

        let password_hash = match password.as_deref() {
            None => None,
            Some("") => Some(None),
            Some(p) => Some(Some(hash_password(p)?)),
        };

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = match generate_code() {
                Ok(code) => code,
                Err(_) => continue,
            };

            let patch = LinkPatch {
                code,
                destination: destination.clone(),
                expires_at,
                password_hash: password_hash.clone(),
            };

            match self.link_repository.update(link.id, patch).await {
                Ok(updated) => {
                    tracing::info!(link_id = %updated.id, "link updated, code rotated");
                    return Ok(updated);
                }
                Err(AppError::Conflict { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(AppError::service_unavailable(
            "Could not allocate a unique short code",
            json!({ "attempts": MAX_CODE_ATTEMPTS }),
        ))
    }

    /// Deletes a link owned by `caller_id` together with its click rows.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when missing or foreign-owned.
    pub async fn delete(&self, caller_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let link = self
            .link_repository
            .find_owned(id, caller_id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;

        self.link_repository.delete(link.id).await?;
        tracing::info!(link_id = %link.id, "link deleted");
        Ok(())
    }

    /// Lists the caller's links, newest first, annotated with their most
    /// recent click timestamp.
    pub async fn list(
        &self,
        owner_id: Uuid,
        filter: LinkFilter,
    ) -> Result<Vec<ListedLink>, AppError> {
        self.link_repository.list_owned(owner_id, filter).await
    }
}

fn validate_destination(destination: &str) -> Result<(), AppError> {
    let parsed = Url::parse(destination).map_err(|e| {
        AppError::invalid_argument(
            "Destination must be an absolute URL",
            json!({ "reason": e.to_string() }),
        )
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::invalid_argument(
            "Destination must use the http or https scheme",
            json!({ "scheme": parsed.scheme() }),
        ));
    }

    Ok(())
}

fn validate_expiry(expires_at: DateTime<Utc>) -> Result<(), AppError> {
    if expires_at <= Utc::now() {
        return Err(AppError::invalid_expiry(
            "Expiration date must be in the future",
            json!({ "expires_at": expires_at }),
        ));
    }
    Ok(())
}
