//! DTOs for the link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::{Link, ListedLink};

/// Request body for `POST /url`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Destination URL (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    /// Optional expiry timestamp, strictly in the future.
    pub expires_at: Option<DateTime<Utc>>,

    /// Optional password gating resolution of this link.
    pub password: Option<String>,
}

/// Request body for `PUT /url/{id}`.
///
/// All fields are optional — only provided fields are changed. The short
/// code is rotated on every update regardless of which fields are present.
///
/// # `expires_at` semantics
///
/// - **Absent** (`expires_at` not in JSON) → leave existing value unchanged
/// - **`null`** → clear expiry (link never expires)
/// - **Timestamp** → set new expiry (revalidated)
///
/// # `password` semantics
///
/// - **Absent** → leave protection unchanged
/// - **Empty string** → remove password protection
/// - **Value** → set a new password
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    /// New destination URL for this link.
    #[validate(url(message = "Invalid URL format"))]
    pub url: Option<String>,

    /// Expiry timestamp. Absent = no change, null = clear, value = set.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,

    /// Link password. Absent = no change, "" = remove, value = set.
    pub password: Option<String>,
}

/// Query parameters for `GET /url/list`.
#[derive(Debug, Default, Deserialize)]
pub struct ListLinksQuery {
    /// Substring match on the destination URL.
    pub search: Option<String>,

    /// When true, return only links whose expiry has already passed.
    #[serde(default)]
    pub expired: bool,
}

/// JSON representation of a link.
///
/// The password hash never appears here; protection is reported through
/// the derived `is_password_protected` flag.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: Uuid,
    pub code: String,
    pub short_url: String,
    pub destination: String,
    pub is_password_protected: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub click_count: i64,
}

impl LinkResponse {
    /// Builds the response, rendering `short_url` from the configured
    /// public base URL.
    pub fn from_link(link: &Link, base_url: &str) -> Self {
        Self {
            id: link.id,
            code: link.code.clone(),
            short_url: format!("{}/{}", base_url.trim_end_matches('/'), link.code),
            destination: link.destination.clone(),
            is_password_protected: link.is_password_protected(),
            expires_at: link.expires_at,
            created_at: link.created_at,
            updated_at: link.updated_at,
            click_count: link.click_count,
        }
    }
}

/// A listed link annotated with its most recent click timestamp.
#[derive(Debug, Serialize)]
pub struct ListedLinkResponse {
    #[serde(flatten)]
    pub link: LinkResponse,
    pub last_click: Option<DateTime<Utc>>,
}

impl ListedLinkResponse {
    pub fn from_listed(listed: &ListedLink, base_url: &str) -> Self {
        Self {
            link: LinkResponse::from_link(&listed.link, base_url),
            last_click: listed.last_click,
        }
    }
}
