//! Integration Test: admin created from the environment can log in

use axum::http::{Method, StatusCode};
use serde_json::json;
use serial_test::serial;
use survey_server::auth::bootstrap::create_admin_from_env;

use crate::support::{build_app, post, send};

#[tokio::test]
#[serial]
async fn admin_from_env_logs_in_and_out() {
    std::env::set_var("SURVEY_ADMIN_USERNAME", "root");
    std::env::set_var("SURVEY_ADMIN_PASSWORD", "hunter2");
    let test = build_app().await;

    let created = create_admin_from_env(&test.pool).await.unwrap();
    std::env::remove_var("SURVEY_ADMIN_USERNAME");
    std::env::remove_var("SURVEY_ADMIN_PASSWORD");
    assert_eq!(created.as_deref(), Some("root"));

    let (status, body) = post(
        &test.app,
        "/api/login",
        json!({"username": "root", "password": "hunter2"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();

    let (status, body) = send(&test.app, Method::GET, "/api/logout", None, Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
}
