//! Contract Test: POST /api/login, GET|POST /api/logout

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::support::{build_app, create_user, post, send};

#[tokio::test]
async fn login_returns_token() {
    let test = build_app().await;
    create_user(&test.pool, "alice", "wonderland").await;

    let (status, body) = post(
        &test.app,
        "/api/login",
        json!({"username": "alice", "password": "wonderland"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("token must be a string");
    assert_eq!(token.len(), 40);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let test = build_app().await;
    create_user(&test.pool, "alice", "wonderland").await;

    let (status, body) = post(
        &test.app,
        "/api/login",
        json!({"username": "alice", "password": "nope"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["type"], "authentication_error");

    let (status, _) = post(
        &test.app,
        "/api/login",
        json!({"username": "ghost", "password": "nope"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_with_malformed_body_is_bad_request() {
    let test = build_app().await;

    let (status, body) = post(&test.app, "/api/login", json!({"username": "alice"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request_error");
}

#[tokio::test]
async fn login_rejects_get() {
    let test = build_app().await;

    let (status, _) = send(&test.app, Method::GET, "/api/login", None, None).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn anonymous_logout_is_ok_for_get_and_post() {
    let test = build_app().await;

    for method in [Method::GET, Method::POST] {
        let (status, body) = send(&test.app, method, "/api/logout", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));
    }
}

#[tokio::test]
async fn logout_revokes_every_token() {
    let test = build_app().await;
    create_user(&test.pool, "alice", "wonderland").await;
    let credentials = json!({"username": "alice", "password": "wonderland"});

    let (_, first) = post(&test.app, "/api/login", credentials.clone()).await;
    let (_, second) = post(&test.app, "/api/login", credentials).await;
    let first = first["token"].as_str().unwrap().to_string();
    let second = second["token"].as_str().unwrap().to_string();
    assert_ne!(first, second);

    let (status, body) = send(&test.app, Method::POST, "/api/logout", None, Some(&first)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM auth_tokens")
        .fetch_one(&test.pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    // 失効済みトークンは匿名扱い
    let (status, body) = send(&test.app, Method::GET, "/api/logout", None, Some(&second)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
}
