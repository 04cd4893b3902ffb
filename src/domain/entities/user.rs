//! User account entity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::access::Role;

/// A registered account.
///
/// `password_hash` never leaves the domain/application layers; response
/// DTOs are built from the other fields only.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        id: Uuid,
        username: String,
        password_hash: String,
        role: Role,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            password_hash,
            role,
            created_at,
            updated_at,
        }
    }
}

/// Input data for registering an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Partial update for an existing account. `None` fields are unchanged.
///
/// `role` is settable only through the admin CLI; the HTTP surface never
/// maps a request onto it.
#[derive(Debug, Clone)]
pub struct UserPatch {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}
