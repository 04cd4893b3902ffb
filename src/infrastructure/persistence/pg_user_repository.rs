//! PostgreSQL implementation of the user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::access::Role;
use crate::domain::entities::{NewUser, User, UserPatch};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// PostgreSQL repository for user accounts.
///
/// Account deletion cascades over the account's links and their click rows
/// inside one transaction; the schema deliberately leaves cascading to this
/// code so the removal order stays explicit.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse().map_err(|e: String| {
            tracing::error!(user_id = %row.id, error = %e, "corrupt role value in store");
            AppError::internal("Corrupt account record", json!({}))
        })?;

        Ok(User::new(
            row.id,
            row.username,
            row.password_hash,
            role,
            row.created_at,
            row.updated_at,
        ))
    }
}

const USER_COLUMNS: &str = "id, username, password_hash, role, created_at, updated_at";

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (id, username, password_hash, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        );

        let row: UserRow = sqlx::query_as(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_user.username)
            .bind(&new_user.password_hash)
            .bind(new_user.role.as_str())
            .fetch_one(self.pool.as_ref())
            .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");

        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(username)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC");

        let rows: Vec<UserRow> = sqlx::query_as(&sql).fetch_all(self.pool.as_ref()).await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, AppError> {
        let sql = format!(
            "UPDATE users SET \
                username      = COALESCE($2::TEXT, username), \
                password_hash = COALESCE($3::TEXT, password_hash), \
                role          = COALESCE($4::TEXT, role), \
                updated_at    = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(&patch.username)
            .bind(&patch.password_hash)
            .bind(patch.role.map(|r| r.as_str()))
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(TryInto::try_into)
            .transpose()?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": id })))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM clicks WHERE link_id IN (SELECT id FROM links WHERE owner_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM links WHERE owner_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::not_found("User not found", json!({ "id": id })));
        }

        tx.commit().await?;
        Ok(())
    }
}
