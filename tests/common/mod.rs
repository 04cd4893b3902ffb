#![allow(dead_code)]

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use linkcut::application::services::AuthService;
use linkcut::domain::entities::NewLink;
use linkcut::domain::repositories::{LinkRepository, UserRepository};
use linkcut::infrastructure::persistence::MemoryStore;
use linkcut::routes::router;
use linkcut::state::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const BASE_URL: &str = "http://sho.rt";

/// In-memory app state plus a handle to the backing store for direct
/// inspection and seeding.
pub fn memory_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let auth_service = Arc::new(AuthService::new(TEST_SECRET));

    let state = AppState::new(
        store.clone() as Arc<dyn LinkRepository>,
        store.clone() as Arc<dyn UserRepository>,
        auth_service,
        BASE_URL.to_string(),
    );

    (state, store)
}

/// Full application router served over the in-memory store.
pub fn test_server() -> (TestServer, Arc<MemoryStore>) {
    let (state, store) = memory_state();
    let server = TestServer::new(router(state)).unwrap();
    (server, store)
}

/// Registers an account and returns its bearer token.
pub async fn sign_up(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/user/signup")
        .json(&json!({ "username": username, "password": password }))
        .await;

    response.assert_status(StatusCode::CREATED);
    response.json::<serde_json::Value>()["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Looks up an account id by username directly in the store.
pub async fn user_id(store: &MemoryStore, username: &str) -> Uuid {
    store
        .find_by_username(username)
        .await
        .unwrap()
        .expect("account should exist")
        .id
}

/// Creates a link through the API and returns the response body.
pub async fn create_link(
    server: &TestServer,
    token: &str,
    body: serde_json::Value,
) -> serde_json::Value {
    let response = server
        .post("/url")
        .authorization_bearer(token)
        .json(&body)
        .await;

    response.assert_status(StatusCode::CREATED);
    response.json()
}

/// Seeds an already-expired link directly into the store, bypassing the
/// create-time expiry validation.
pub async fn seed_expired_link(
    store: &MemoryStore,
    owner_id: Uuid,
    code: &str,
    destination: &str,
) -> Uuid {
    seed_link(
        store,
        owner_id,
        code,
        destination,
        Some(Utc::now() - chrono::Duration::hours(1)),
    )
    .await
}

/// Seeds a link directly into the store with an arbitrary expiry.
pub async fn seed_link(
    store: &MemoryStore,
    owner_id: Uuid,
    code: &str,
    destination: &str,
    expires_at: Option<DateTime<Utc>>,
) -> Uuid {
    LinkRepository::create(
        store,
        NewLink {
            owner_id,
            code: code.to_string(),
            destination: destination.to_string(),
            expires_at,
            password_hash: None,
        },
    )
    .await
    .unwrap()
    .id
}
