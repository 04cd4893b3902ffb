//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A shortened URL link with metadata.
///
/// Maps a generated short code to a destination URL. Every link belongs to
/// exactly one owner and carries a lifetime click counter that only the
/// resolution path increments.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub code: String,
    pub destination: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub password_hash: Option<String>,
    pub click_count: i64,
}

impl Link {
    /// Creates a new Link instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        owner_id: Uuid,
        code: String,
        destination: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        password_hash: Option<String>,
        click_count: i64,
    ) -> Self {
        Self {
            id,
            owner_id,
            code,
            destination,
            created_at,
            updated_at,
            expires_at,
            password_hash,
            click_count,
        }
    }

    /// Returns true if the link's expiry instant is strictly in the past.
    ///
    /// A link with no expiry never expires; a link expiring exactly at the
    /// current instant is still live.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|e| e < Utc::now())
    }

    /// Whether resolving this link requires a password.
    ///
    /// Derived from the presence of a stored hash rather than tracked as a
    /// separate flag, so it can never drift out of sync.
    pub fn is_password_protected(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub owner_id: Uuid,
    pub code: String,
    pub destination: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub password_hash: Option<String>,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged. Every update rotates the short code,
/// so `code` is always present. `expires_at: Some(None)` clears the expiry;
/// `Some(Some(t))` sets it. `password_hash` follows the same convention:
/// `Some(None)` removes password protection.
#[derive(Debug, Clone)]
pub struct LinkPatch {
    pub code: String,
    pub destination: Option<String>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
    pub password_hash: Option<Option<String>>,
}

/// A link as returned by owner-scoped listing, annotated with the
/// timestamp of its most recent click (if any).
#[derive(Debug, Clone)]
pub struct ListedLink {
    pub link: Link,
    pub last_click: Option<DateTime<Utc>>,
}

/// Owner-scoped listing filter.
#[derive(Debug, Clone, Default)]
pub struct LinkFilter {
    /// Substring match on the destination URL.
    pub search: Option<String>,
    /// When `true`, keep only links whose expiry has already passed
    /// (`expires_at <= now` at query time).
    pub expired: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_link(expires_at: Option<DateTime<Utc>>, password_hash: Option<String>) -> Link {
        let now = Utc::now();
        Link::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "a1b2c3d4e5".to_string(),
            "https://example.com".to_string(),
            now,
            now,
            expires_at,
            password_hash,
            0,
        )
    }

    #[test]
    fn test_link_creation() {
        let link = make_link(None, None);

        assert_eq!(link.code, "a1b2c3d4e5");
        assert_eq!(link.destination, "https://example.com");
        assert_eq!(link.click_count, 0);
        assert!(!link.is_expired());
        assert!(!link.is_password_protected());
    }

    #[test]
    fn test_link_without_expiry_never_expires() {
        let link = make_link(None, None);
        assert!(!link.is_expired());
    }

    #[test]
    fn test_link_is_expired() {
        let link = make_link(Some(Utc::now() - Duration::seconds(1)), None);
        assert!(link.is_expired());
    }

    #[test]
    fn test_link_with_future_expiry_is_live() {
        let link = make_link(Some(Utc::now() + Duration::hours(1)), None);
        assert!(!link.is_expired());
    }

    #[test]
    fn test_password_protection_derived_from_hash() {
        let open = make_link(None, None);
        let gated = make_link(None, Some("$argon2id$v=19$m=19456,t=2,p=1$x$y".to_string()));

        assert!(!open.is_password_protected());
        assert!(gated.is_password_protected());
    }
}
