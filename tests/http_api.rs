//! HTTP surface tests: health, auth, account administration and the
//! error envelope.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use linkcut::domain::access::Role;
use linkcut::domain::entities::UserPatch;
use linkcut::domain::repositories::UserRepository;

async fn promote_to_admin(store: &linkcut::infrastructure::persistence::MemoryStore, id: Uuid) {
    store
        .update(
            id,
            UserPatch {
                username: None,
                password_hash: None,
                role: Some(Role::Admin),
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_health_reports_store_status() {
    let (server, _store) = common::test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["store"]["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_sign_up_then_sign_in_roundtrip() {
    let (server, _store) = common::test_server();
    common::sign_up(&server, "alice", "password123").await;

    let response = server
        .post("/user/signin")
        .json(&json!({ "username": "alice", "password": "password123" }))
        .await;
    response.assert_status_ok();

    let token = response.json::<serde_json::Value>()["token"]
        .as_str()
        .unwrap()
        .to_string();

    // The fresh token opens protected routes.
    server
        .get("/url/list")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_sign_in_with_wrong_password_is_rejected() {
    let (server, _store) = common::test_server();
    common::sign_up(&server, "alice", "password123").await;

    let response = server
        .post("/user/signin")
        .json(&json!({ "username": "alice", "password": "not-the-password" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "invalid_argument");
    assert_eq!(body["error"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_sign_in_unknown_user_matches_wrong_password_error() {
    let (server, _store) = common::test_server();
    common::sign_up(&server, "alice", "password123").await;

    let unknown = server
        .post("/user/signin")
        .json(&json!({ "username": "ghost", "password": "whatever" }))
        .await;
    let wrong = server
        .post("/user/signin")
        .json(&json!({ "username": "alice", "password": "whatever" }))
        .await;

    unknown.assert_status(StatusCode::BAD_REQUEST);
    wrong.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        unknown.json::<serde_json::Value>()["error"],
        wrong.json::<serde_json::Value>()["error"]
    );
}

#[tokio::test]
async fn test_duplicate_username_is_conflict() {
    let (server, _store) = common::test_server();
    common::sign_up(&server, "alice", "password123").await;

    let response = server
        .post("/user/signup")
        .json(&json!({ "username": "alice", "password": "different456" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "conflict"
    );
}

#[tokio::test]
async fn test_protected_routes_require_a_valid_bearer() {
    let (server, _store) = common::test_server();

    server
        .get("/url/list")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    server
        .post("/url")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let garbage = server
        .get("/url/list")
        .authorization_bearer("not-a-jwt")
        .await;
    garbage.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        garbage.json::<serde_json::Value>()["error"]["code"],
        "unauthorized"
    );
}

#[tokio::test]
async fn test_token_of_a_deleted_account_stops_working() {
    let (server, store) = common::test_server();
    let token = common::sign_up(&server, "alice", "password123").await;
    let id = common::user_id(&store, "alice").await;

    server
        .get("/url/list")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    UserRepository::delete(store.as_ref(), id).await.unwrap();

    server
        .get("/url/list")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_list_requires_admin_and_excludes_the_caller() {
    let (server, store) = common::test_server();
    let alice = common::sign_up(&server, "alice", "password123").await;
    common::sign_up(&server, "bob", "password123").await;

    let forbidden = server.get("/user/list").authorization_bearer(&alice).await;
    forbidden.assert_status(StatusCode::FORBIDDEN);

    promote_to_admin(&store, common::user_id(&store, "alice").await).await;

    // Promotion is picked up on the next request without a fresh token.
    let listed = server.get("/user/list").authorization_bearer(&alice).await;
    listed.assert_status_ok();

    let body = listed.json::<serde_json::Value>();
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "bob");
    assert_eq!(users[0]["role"], "user");
    assert!(users[0].get("password_hash").is_none());
}

#[tokio::test]
async fn test_admin_cannot_delete_own_account() {
    let (server, store) = common::test_server();
    let alice = common::sign_up(&server, "alice", "password123").await;
    let alice_id = common::user_id(&store, "alice").await;
    promote_to_admin(&store, alice_id).await;

    let response = server
        .delete(&format!("/user/{}", alice_id))
        .authorization_bearer(&alice)
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["message"],
        "Admins cannot delete their own account"
    );
}

#[tokio::test]
async fn test_non_admin_delete_is_forbidden_even_for_missing_ids() {
    let (server, _store) = common::test_server();
    let bob = common::sign_up(&server, "bob", "password123").await;

    // Forbidden, not 404: the role gate runs before the lookup.
    let response = server
        .delete(&format!("/user/{}", Uuid::new_v4()))
        .authorization_bearer(&bob)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_delete_cascades_links_and_invalidates_the_token() {
    let (server, store) = common::test_server();
    let alice = common::sign_up(&server, "alice", "password123").await;
    let bob = common::sign_up(&server, "bob", "password123").await;
    promote_to_admin(&store, common::user_id(&store, "alice").await).await;

    let created = common::create_link(&server, &bob, json!({ "url": "https://example.com" })).await;
    let code = created["code"].as_str().unwrap().to_string();
    let bob_id = common::user_id(&store, "bob").await;

    let response = server
        .delete(&format!("/user/{}", bob_id))
        .authorization_bearer(&alice)
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/{}", code))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/url/list")
        .authorization_bearer(&bob)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_delete_of_missing_user_is_not_found() {
    let (server, store) = common::test_server();
    let alice = common::sign_up(&server, "alice", "password123").await;
    promote_to_admin(&store, common::user_id(&store, "alice").await).await;

    let response = server
        .delete(&format!("/user/{}", Uuid::new_v4()))
        .authorization_bearer(&alice)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_password_change_requires_the_current_password() {
    let (server, _store) = common::test_server();
    let token = common::sign_up(&server, "alice", "password123").await;

    let missing = server
        .put("/user")
        .authorization_bearer(&token)
        .json(&json!({ "new_password": "changed456" }))
        .await;
    missing.assert_status(StatusCode::BAD_REQUEST);

    let wrong = server
        .put("/user")
        .authorization_bearer(&token)
        .json(&json!({ "new_password": "changed456", "current_password": "nope" }))
        .await;
    wrong.assert_status(StatusCode::BAD_REQUEST);

    let correct = server
        .put("/user")
        .authorization_bearer(&token)
        .json(&json!({ "new_password": "changed456", "current_password": "password123" }))
        .await;
    correct.assert_status_ok();

    // Old password no longer signs in, the new one does.
    server
        .post("/user/signin")
        .json(&json!({ "username": "alice", "password": "password123" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .post("/user/signin")
        .json(&json!({ "username": "alice", "password": "changed456" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_username_change_and_conflict() {
    let (server, store) = common::test_server();
    let alice = common::sign_up(&server, "alice", "password123").await;
    common::sign_up(&server, "bob", "password123").await;
    let alice_id = common::user_id(&store, "alice").await;

    let renamed = server
        .put("/user")
        .authorization_bearer(&alice)
        .json(&json!({ "username": "alicia" }))
        .await;
    renamed.assert_status_ok();

    let body = renamed.json::<serde_json::Value>();
    assert_eq!(body["username"], "alicia");
    assert_eq!(body["id"], alice_id.to_string());
    assert_eq!(body["role"], "user");

    let taken = server
        .put("/user")
        .authorization_bearer(&alice)
        .json(&json!({ "username": "bob" }))
        .await;
    taken.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_request_validation_failures_are_bad_requests() {
    let (server, _store) = common::test_server();

    let short_password = server
        .post("/user/signup")
        .json(&json!({ "username": "alice", "password": "abcd" }))
        .await;
    short_password.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        short_password.json::<serde_json::Value>()["error"]["code"],
        "invalid_argument"
    );

    let long_username = server
        .post("/user/signup")
        .json(&json!({ "username": "a".repeat(41), "password": "password123" }))
        .await;
    long_username.assert_status(StatusCode::BAD_REQUEST);

    let token = common::sign_up(&server, "alice", "password123").await;
    let bad_url = server
        .post("/url")
        .authorization_bearer(&token)
        .json(&json!({ "url": "not a url" }))
        .await;
    bad_url.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_created_link_response_shape() {
    let (server, _store) = common::test_server();
    let token = common::sign_up(&server, "alice", "password123").await;

    let created = common::create_link(
        &server,
        &token,
        json!({ "url": "https://example.com/path?q=1" }),
    )
    .await;

    let code = created["code"].as_str().unwrap();
    assert_eq!(code.len(), 10);
    assert_eq!(
        created["short_url"],
        format!("{}/{}", common::BASE_URL, code)
    );
    assert_eq!(created["destination"], "https://example.com/path?q=1");
    assert_eq!(created["is_password_protected"], false);
    assert_eq!(created["click_count"], 0);
    assert!(created["expires_at"].is_null());
    assert!(created["created_at"].is_string());
    assert!(created["updated_at"].is_string());
    assert!(created.get("password").is_none());
    assert!(created.get("password_hash").is_none());
}

#[tokio::test]
async fn test_update_with_empty_password_drops_the_gate() {
    let (server, _store) = common::test_server();
    let token = common::sign_up(&server, "alice", "password123").await;

    let created = common::create_link(
        &server,
        &token,
        json!({ "url": "https://example.com", "password": "s3cret" }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let updated = server
        .put(&format!("/url/{}", id))
        .authorization_bearer(&token)
        .json(&json!({ "password": "" }))
        .await;
    updated.assert_status_ok();

    let body = updated.json::<serde_json::Value>();
    assert_eq!(body["is_password_protected"], false);
    let code = body["code"].as_str().unwrap();

    server
        .get(&format!("/{}", code))
        .await
        .assert_status(StatusCode::TEMPORARY_REDIRECT);
}
