mod common;

use axum::http::StatusCode;
use serde_json::json;

use blogdesk_database::CredentialStore;
use blogdesk_entity::user::Role;

use common::{PASSWORD, get, post_json, spawn_app};

#[tokio::test]
async fn test_register_returns_token_and_default_role() {
    let app = spawn_app();
    let (status, body) = app
        .send(post_json(
            "/api/auth/register",
            json!({ "username": "alice", "email": "alice@example.com", "password": PASSWORD }),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["username"], "alice");
    assert_eq!(body["data"]["user"]["role"], "user");
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert!(body["data"]["user"].get("password_hash").is_none());

    let token = body["data"]["access_token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);

    let (status, me) = app.send(get("/api/auth/me", Some(token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_register_ignores_requested_role() {
    let app = spawn_app();
    let (status, body) = app
        .send(post_json(
            "/api/auth/register",
            json!({
                "username": "mallory",
                "email": "mallory@example.com",
                "password": PASSWORD,
                "role": "admin"
            }),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["role"], "user");
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = spawn_app();
    let first = json!({ "username": "bob", "email": "bob@example.com", "password": PASSWORD });
    let (status, _) = app.send(post_json("/api/auth/register", first)).await;
    assert_eq!(status, StatusCode::CREATED);

    let same_name = json!({ "username": "bob", "email": "other@example.com", "password": PASSWORD });
    let (status, body) = app.send(post_json("/api/auth/register", same_name)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");

    let same_email = json!({ "username": "robert", "email": "bob@example.com", "password": PASSWORD });
    let (status, _) = app.send(post_json("/api/auth/register", same_email)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_register_validation() {
    let app = spawn_app();

    let (status, body) = app
        .send(post_json(
            "/api/auth/register",
            json!({ "username": "carol", "email": "carol@example.com", "password": "short" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, body) = app
        .send(post_json(
            "/api/auth/register",
            json!({ "username": "carol", "email": "not-an-email", "password": PASSWORD }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = app
        .send(post_json("/api/auth/register", json!({ "username": "carol" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_login_by_username_and_email() {
    let app = spawn_app();
    app.create_account("dave", Role::Editor).await;

    let by_name = app.login("dave", PASSWORD).await;
    let by_email = app.login("dave@example.com", PASSWORD).await;

    for token in [by_name, by_email] {
        let (status, body) = app.send(get("/api/auth/me", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["role"], "editor");
    }
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let app = spawn_app();
    app.create_account("erin", Role::User).await;

    let (wrong_status, wrong_body) = app
        .send(post_json(
            "/api/auth/login",
            json!({ "username_or_email": "erin", "password": "not-the-password" }),
        ))
        .await;
    let (unknown_status, unknown_body) = app
        .send(post_json(
            "/api/auth/login",
            json!({ "username_or_email": "nobody", "password": PASSWORD }),
        ))
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_user_lookup() {
    let app = spawn_app();
    let token = app.token_for("frank", Role::User).await;
    let other = app.create_account("grace", Role::Editor).await;

    let (status, body) = app
        .send(get(&format!("/api/users/{}", other.id), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "grace");

    let (status, body) = app
        .send(get(&format!("/api/users/{}", uuid::Uuid::new_v4()), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, _) = app.send(get("/api/users/not-a-uuid", Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(get(&format!("/api/users/{}", other.id), None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app();
    let (status, body) = app.send(get("/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["store"], "connected");
    assert!(app.store.ping().await.is_ok());
}
