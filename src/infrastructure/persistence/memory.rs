//! In-memory store for local development and the DB-free test suite.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{
    Click, Link, LinkFilter, LinkPatch, ListedLink, NewLink, NewUser, User, UserPatch,
};
use crate::domain::repositories::{LinkRepository, UserRepository};
use crate::error::AppError;

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    links: HashMap<Uuid, Link>,
    clicks: Vec<Click>,
}

/// In-memory implementation of both repository traits.
///
/// A single `RwLock` guards all three tables, so every operation is atomic
/// exactly like its transactional PostgreSQL counterpart; in particular
/// [`LinkRepository::record_resolution`] inserts the click row and bumps
/// the counter under one write lock. The uniqueness rules of the SQL
/// schema (link codes, usernames) are enforced by explicit scans.
///
/// No guard is ever held across an await point.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Click rows recorded for one link, in insertion order.
    pub fn clicks_for(&self, link_id: Uuid) -> Vec<Click> {
        self.inner
            .read()
            .clicks
            .iter()
            .filter(|c| c.link_id == link_id)
            .cloned()
            .collect()
    }
}

fn code_conflict() -> AppError {
    AppError::conflict(
        "Unique constraint violation",
        json!({ "constraint": "links_code_key" }),
    )
}

fn username_conflict() -> AppError {
    AppError::conflict(
        "Unique constraint violation",
        json!({ "constraint": "users_username_key" }),
    )
}

#[async_trait]
impl LinkRepository for MemoryStore {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut inner = self.inner.write();

        if inner.links.values().any(|l| l.code == new_link.code) {
            return Err(code_conflict());
        }

        let now = Utc::now();
        let link = Link::new(
            Uuid::new_v4(),
            new_link.owner_id,
            new_link.code,
            new_link.destination,
            now,
            now,
            new_link.expires_at,
            new_link.password_hash,
            0,
        );

        inner.links.insert(link.id, link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let inner = self.inner.read();
        Ok(inner.links.values().find(|l| l.code == code).cloned())
    }

    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Link>, AppError> {
        let inner = self.inner.read();
        Ok(inner
            .links
            .get(&id)
            .filter(|l| l.owner_id == owner_id)
            .cloned())
    }

    async fn update(&self, id: Uuid, patch: LinkPatch) -> Result<Link, AppError> {
        let mut inner = self.inner.write();

        if inner
            .links
            .values()
            .any(|l| l.id != id && l.code == patch.code)
        {
            return Err(code_conflict());
        }

        let link = inner
            .links
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;

        link.code = patch.code;
        if let Some(destination) = patch.destination {
            link.destination = destination;
        }
        if let Some(expires_at) = patch.expires_at {
            link.expires_at = expires_at;
        }
        if let Some(password_hash) = patch.password_hash {
            link.password_hash = password_hash;
        }
        link.updated_at = Utc::now();

        Ok(link.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut inner = self.inner.write();
        inner.clicks.retain(|c| c.link_id != id);
        inner.links.remove(&id);
        Ok(())
    }

    async fn list_owned(
        &self,
        owner_id: Uuid,
        filter: LinkFilter,
    ) -> Result<Vec<ListedLink>, AppError> {
        let inner = self.inner.read();
        let now = Utc::now();

        let mut links: Vec<&Link> = inner
            .links
            .values()
            .filter(|l| l.owner_id == owner_id)
            .filter(|l| {
                filter
                    .search
                    .as_deref()
                    .is_none_or(|s| l.destination.contains(s))
            })
            .filter(|l| !filter.expired || l.expires_at.is_some_and(|e| e <= now))
            .collect();

        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(links
            .into_iter()
            .map(|link| ListedLink {
                link: link.clone(),
                last_click: inner
                    .clicks
                    .iter()
                    .filter(|c| c.link_id == link.id)
                    .map(|c| c.clicked_at)
                    .max(),
            })
            .collect())
    }

    async fn record_resolution(&self, link_id: Uuid) -> Result<(), AppError> {
        let mut inner = self.inner.write();

        let link = inner
            .links
            .get_mut(&link_id)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": link_id })))?;

        link.click_count += 1;
        inner
            .clicks
            .push(Click::new(Uuid::new_v4(), link_id, Utc::now()));

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut inner = self.inner.write();

        if inner
            .users
            .values()
            .any(|u| u.username == new_user.username)
        {
            return Err(username_conflict());
        }

        let now = Utc::now();
        let user = User::new(
            Uuid::new_v4(),
            new_user.username,
            new_user.password_hash,
            new_user.role,
            now,
            now,
        );

        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.inner.read().users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.read();
        Ok(inner.users.values().find(|u| u.username == username).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let inner = self.inner.read();
        let mut users: Vec<User> = inner.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, AppError> {
        let mut inner = self.inner.write();

        if let Some(username) = patch.username.as_deref() {
            if inner
                .users
                .values()
                .any(|u| u.id != id && u.username == username)
            {
                return Err(username_conflict());
            }
        }

        let user = inner
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": id })))?;

        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(password_hash) = patch.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut inner = self.inner.write();

        if inner.users.remove(&id).is_none() {
            return Err(AppError::not_found("User not found", json!({ "id": id })));
        }

        let owned: Vec<Uuid> = inner
            .links
            .values()
            .filter(|l| l.owner_id == id)
            .map(|l| l.id)
            .collect();

        inner.clicks.retain(|c| !owned.contains(&c.link_id));
        inner.links.retain(|_, l| l.owner_id != id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::Role;
    use chrono::Duration;

    fn new_link(owner_id: Uuid, code: &str) -> NewLink {
        NewLink {
            owner_id,
            code: code.to_string(),
            destination: "https://example.com".to_string(),
            expires_at: None,
            password_hash: None,
        }
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$x$y".to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_code() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();

        let link = LinkRepository::create(&store, new_link(owner, "aaaaaaaaaa"))
            .await
            .unwrap();

        let found = store.find_by_code("aaaaaaaaaa").await.unwrap().unwrap();
        assert_eq!(found.id, link.id);
        assert_eq!(found.click_count, 0);
    }

    #[tokio::test]
    async fn test_duplicate_code_is_conflict() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();

        LinkRepository::create(&store, new_link(owner, "aaaaaaaaaa"))
            .await
            .unwrap();
        let err = LinkRepository::create(&store, new_link(owner, "aaaaaaaaaa"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_find_owned_masks_foreign_links() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let link = LinkRepository::create(&store, new_link(owner, "aaaaaaaaaa"))
            .await
            .unwrap();

        assert!(store.find_owned(link.id, owner).await.unwrap().is_some());
        assert!(store.find_owned(link.id, stranger).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_applies_double_option_fields() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let expiry = Utc::now() + Duration::hours(1);

        let mut nl = new_link(owner, "aaaaaaaaaa");
        nl.expires_at = Some(expiry);
        let link = LinkRepository::create(&store, nl).await.unwrap();

        // Absent field: expiry untouched.
        let updated = LinkRepository::update(
            &store,
            link.id,
            LinkPatch {
                code: "bbbbbbbbbb".to_string(),
                destination: None,
                expires_at: None,
                password_hash: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.expires_at, Some(expiry));

        // Null field: expiry cleared.
        let updated = LinkRepository::update(
            &store,
            link.id,
            LinkPatch {
                code: "cccccccccc".to_string(),
                destination: None,
                expires_at: Some(None),
                password_hash: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.expires_at, None);
    }

    #[tokio::test]
    async fn test_update_rejects_code_taken_by_another_link() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();

        LinkRepository::create(&store, new_link(owner, "aaaaaaaaaa"))
            .await
            .unwrap();
        let second = LinkRepository::create(&store, new_link(owner, "bbbbbbbbbb"))
            .await
            .unwrap();

        let err = LinkRepository::update(
            &store,
            second.id,
            LinkPatch {
                code: "aaaaaaaaaa".to_string(),
                destination: None,
                expires_at: None,
                password_hash: None,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_record_resolution_keeps_counter_and_rows_in_step() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();

        let link = LinkRepository::create(&store, new_link(owner, "aaaaaaaaaa"))
            .await
            .unwrap();

        for _ in 0..3 {
            store.record_resolution(link.id).await.unwrap();
        }

        let found = store.find_by_code("aaaaaaaaaa").await.unwrap().unwrap();
        assert_eq!(found.click_count, 3);
        assert_eq!(store.clicks_for(link.id).len(), 3);
    }

    #[tokio::test]
    async fn test_delete_removes_click_rows() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();

        let link = LinkRepository::create(&store, new_link(owner, "aaaaaaaaaa"))
            .await
            .unwrap();
        store.record_resolution(link.id).await.unwrap();

        LinkRepository::delete(&store, link.id).await.unwrap();

        assert!(store.find_by_code("aaaaaaaaaa").await.unwrap().is_none());
        assert!(store.clicks_for(link.id).is_empty());
    }

    #[tokio::test]
    async fn test_list_owned_filters_and_annotates() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();

        let mut nl = new_link(owner, "aaaaaaaaaa");
        nl.destination = "https://docs.rs/axum".to_string();
        let first = LinkRepository::create(&store, nl).await.unwrap();

        let mut nl = new_link(owner, "bbbbbbbbbb");
        nl.destination = "https://example.org".to_string();
        LinkRepository::create(&store, nl).await.unwrap();

        store.record_resolution(first.id).await.unwrap();

        let all = store
            .list_owned(owner, LinkFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let filtered = store
            .list_owned(
                owner,
                LinkFilter {
                    search: Some("docs.rs".to_string()),
                    expired: false,
                },
            )
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].link.id, first.id);
        assert!(filtered[0].last_click.is_some());
    }

    #[tokio::test]
    async fn test_expired_filter_excludes_unexpiring_links() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();

        LinkRepository::create(&store, new_link(owner, "aaaaaaaaaa"))
            .await
            .unwrap();

        let mut nl = new_link(owner, "bbbbbbbbbb");
        nl.expires_at = Some(Utc::now() - Duration::seconds(1));
        let expired = LinkRepository::create(&store, nl).await.unwrap();

        let listed = store
            .list_owned(
                owner,
                LinkFilter {
                    search: None,
                    expired: true,
                },
            )
            .await
            .unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].link.id, expired.id);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let store = MemoryStore::new();

        UserRepository::create(&store, new_user("alice")).await.unwrap();
        let err = UserRepository::create(&store, new_user("alice"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_user_delete_cascades_links_and_clicks() {
        let store = MemoryStore::new();

        let user = UserRepository::create(&store, new_user("alice")).await.unwrap();
        let link = LinkRepository::create(&store, new_link(user.id, "aaaaaaaaaa"))
            .await
            .unwrap();
        store.record_resolution(link.id).await.unwrap();

        UserRepository::delete(&store, user.id).await.unwrap();

        assert!(store.find_by_id(user.id).await.unwrap().is_none());
        assert!(store.find_by_code("aaaaaaaaaa").await.unwrap().is_none());
        assert!(store.clicks_for(link.id).is_empty());
    }

    #[tokio::test]
    async fn test_user_update_patches_fields() {
        let store = MemoryStore::new();

        let user = UserRepository::create(&store, new_user("alice")).await.unwrap();

        let updated = UserRepository::update(
            &store,
            user.id,
            UserPatch {
                username: Some("alice2".to_string()),
                password_hash: None,
                role: Some(Role::Admin),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.username, "alice2");
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.password_hash, user.password_hash);
    }
}
