//! テスト共通ユーティリティ
//!
//! インメモリDBでアプリを組み立て、`tower::ServiceExt::oneshot` でリクエストを送る。

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use survey_common::config::SurveyConfig;
use survey_server::{api, auth, db, fixtures, AppState};
use tower::ServiceExt;

/// 日付テンプレート入りのフィクスチャ（受付中・終了済み・非公開・未開始のアンケート）
pub const SURVEY_FIXTURE: &str = r#"[
    {"model": "survey.survey", "pk": 1, "fields": {
        "name": "Coffee", "description": "Morning habits",
        "date_start": "{%TODAY-3%}", "date_end": "{%TODAY+30%}"}},
    {"model": "survey.survey", "pk": 2, "fields": {
        "name": "Old", "description": "Already closed",
        "date_start": "{%TODAY-30%}", "date_end": "{%TODAY-1%}"}},
    {"model": "survey.survey", "pk": 3, "fields": {
        "name": "Secret", "description": "Hidden from respondents",
        "date_start": "{%TODAY-3%}", "date_end": "{%TODAY+30%}", "is_hidden": true}},
    {"model": "survey.survey", "pk": 4, "fields": {
        "name": "Upcoming", "description": "Not started yet",
        "date_start": "{%TODAY+1%}", "date_end": "{%TODAY+30%}"}},
    {"model": "survey.question", "pk": 10, "fields": {
        "survey": 1, "name": "Why coffee?", "order": 0, "type": "STR"}},
    {"model": "survey.question", "pk": 11, "fields": {
        "survey": 1, "name": "Favourite roast?", "order": 1, "type": "SIN"}},
    {"model": "survey.question", "pk": 12, "fields": {
        "survey": 1, "name": "Which brewing methods?", "order": 2, "type": "MUL"}},
    {"model": "survey.question", "pk": 20, "fields": {
        "survey": 2, "name": "Closed question", "order": 0, "type": "STR"}},
    {"model": "survey.questionchoice", "pk": 110, "fields": {
        "question": 11, "name": "Light", "order": 0}},
    {"model": "survey.questionchoice", "pk": 111, "fields": {
        "question": 11, "name": "Dark", "order": 1}},
    {"model": "survey.questionchoice", "pk": 120, "fields": {
        "question": 12, "name": "Espresso", "order": 0}},
    {"model": "survey.questionchoice", "pk": 121, "fields": {
        "question": 12, "name": "Pour over", "order": 1}},
    {"model": "survey.questionchoice", "pk": 122, "fields": {
        "question": 12, "name": "French press", "order": 2}}
]"#;

/// テスト用アプリ
pub struct TestApp {
    /// ルーター
    pub app: Router,
    /// データベース接続プール
    pub pool: SqlitePool,
}

/// インメモリDBのプールを作成してマイグレーションする
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    db::migrations::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// 指定した設定でアプリを組み立てる
pub async fn build_app_with(config: &SurveyConfig) -> TestApp {
    let pool = test_pool().await;
    let routes =
        api::discover_routes(&config.installed_modules).expect("Endpoint discovery failed");
    let app = api::create_app(
        AppState {
            db_pool: pool.clone(),
        },
        &routes,
        config,
    );
    TestApp { app, pool }
}

/// 既定設定（host.docs, server, survey）でアプリを組み立てる
pub async fn build_app() -> TestApp {
    build_app_with(&SurveyConfig::default()).await
}

/// フィクスチャを今日の日付で展開して投入する
pub async fn load_survey_fixture(pool: &SqlitePool) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("surveys.json");
    let today = db::surveys::today();
    std::fs::write(&path, fixtures::replace_date(SURVEY_FIXTURE, today))
        .expect("Failed to write fixture");
    fixtures::load_file(pool, &path)
        .await
        .expect("Failed to load fixture");
}

/// ログイン可能なユーザーを作成する
pub async fn create_user(pool: &SqlitePool, username: &str, password: &str) {
    let hash = auth::password::hash_password(password).expect("Failed to hash password");
    db::users::create(pool, username, &hash, false)
        .await
        .expect("Failed to create user");
}

/// JSONリクエストを送り、ステータスとJSONボディを返す
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Token {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}

/// GETリクエスト
pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None, None).await
}

/// JSONボディ付きPOSTリクエスト
pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body), None).await
}
