//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Link, LinkFilter, LinkPatch, ListedLink, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for links and their click log.
///
/// Uses prepared statements throughout. Queries are bound at runtime so the
/// crate builds without a reachable database; the schema lives in
/// `migrations/`.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: Uuid,
    owner_id: Uuid,
    code: String,
    destination: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    password_hash: Option<String>,
    click_count: i64,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link::new(
            row.id,
            row.owner_id,
            row.code,
            row.destination,
            row.created_at,
            row.updated_at,
            row.expires_at,
            row.password_hash,
            row.click_count,
        )
    }
}

#[derive(sqlx::FromRow)]
struct ListedLinkRow {
    id: Uuid,
    owner_id: Uuid,
    code: String,
    destination: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    password_hash: Option<String>,
    click_count: i64,
    last_click: Option<DateTime<Utc>>,
}

impl From<ListedLinkRow> for ListedLink {
    fn from(row: ListedLinkRow) -> Self {
        let last_click = row.last_click;
        ListedLink {
            link: Link::new(
                row.id,
                row.owner_id,
                row.code,
                row.destination,
                row.created_at,
                row.updated_at,
                row.expires_at,
                row.password_hash,
                row.click_count,
            ),
            last_click,
        }
    }
}

const LINK_COLUMNS: &str =
    "id, owner_id, code, destination, created_at, updated_at, expires_at, password_hash, click_count";

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let sql = format!(
            "INSERT INTO links (id, owner_id, code, destination, expires_at, password_hash) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {LINK_COLUMNS}"
        );

        let row: LinkRow = sqlx::query_as(&sql)
            .bind(Uuid::new_v4())
            .bind(new_link.owner_id)
            .bind(&new_link.code)
            .bind(&new_link.destination)
            .bind(new_link.expires_at)
            .bind(&new_link.password_hash)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE code = $1");

        let row: Option<LinkRow> = sqlx::query_as(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE id = $1 AND owner_id = $2");

        let row: Option<LinkRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn update(&self, id: Uuid, patch: LinkPatch) -> Result<Link, AppError> {
        let set_expiry = patch.expires_at.is_some();
        let new_expiry = patch.expires_at.flatten();
        let set_password = patch.password_hash.is_some();
        let new_password = patch.password_hash.flatten();

        let sql = format!(
            "UPDATE links SET \
                code          = $2, \
                destination   = COALESCE($3::TEXT, destination), \
                expires_at    = CASE WHEN $4 THEN $5::TIMESTAMPTZ ELSE expires_at END, \
                password_hash = CASE WHEN $6 THEN $7::TEXT ELSE password_hash END, \
                updated_at    = NOW() \
             WHERE id = $1 \
             RETURNING {LINK_COLUMNS}"
        );

        let row: Option<LinkRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(&patch.code)
            .bind(&patch.destination)
            .bind(set_expiry)
            .bind(new_expiry)
            .bind(set_password)
            .bind(&new_password)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Into::into)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM clicks WHERE link_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_owned(
        &self,
        owner_id: Uuid,
        filter: LinkFilter,
    ) -> Result<Vec<ListedLink>, AppError> {
        let rows: Vec<ListedLinkRow> = sqlx::query_as(
            "SELECT l.id, l.owner_id, l.code, l.destination, l.created_at, l.updated_at, \
                    l.expires_at, l.password_hash, l.click_count, \
                    MAX(c.clicked_at) AS last_click \
             FROM links l \
             LEFT JOIN clicks c ON c.link_id = l.id \
             WHERE l.owner_id = $1 \
               AND ($2::TEXT IS NULL OR l.destination LIKE '%' || $2 || '%') \
               AND (NOT $3 OR l.expires_at <= NOW()) \
             GROUP BY l.id \
             ORDER BY l.created_at DESC",
        )
        .bind(owner_id)
        .bind(&filter.search)
        .bind(filter.expired)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn record_resolution(&self, link_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // The UPDATE takes a row lock on the link, serializing concurrent
        // resolutions of the same code for the rest of the transaction.
        let updated = sqlx::query("UPDATE links SET click_count = click_count + 1 WHERE id = $1")
            .bind(link_id)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::not_found(
                "Link not found",
                json!({ "id": link_id }),
            ));
        }

        sqlx::query("INSERT INTO clicks (id, link_id) VALUES ($1, $2)")
            .bind(Uuid::new_v4())
            .bind(link_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
