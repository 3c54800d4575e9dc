//! Integration Test: render raw fixtures, load them and query the API

use axum::http::StatusCode;
use survey_server::{db, fixtures};

use crate::support::{build_app, get, SURVEY_FIXTURE};

#[tokio::test]
async fn rendered_fixture_is_served_by_the_api() {
    let test = build_app().await;
    let raw = tempfile::tempdir().unwrap();
    let ready = tempfile::tempdir().unwrap();
    std::fs::write(raw.path().join("surveys.json"), SURVEY_FIXTURE).unwrap();

    let names = fixtures::render_dir(raw.path(), ready.path(), db::surveys::today()).unwrap();
    assert_eq!(names, vec!["surveys.json"]);

    let rendered = std::fs::read_to_string(ready.path().join("surveys.json")).unwrap();
    assert!(!rendered.contains("{%TODAY"));

    let loaded = fixtures::load_file(&test.pool, &ready.path().join("surveys.json"))
        .await
        .unwrap();
    assert_eq!(loaded, 13);

    let (status, body) = get(&test.app, "/api/survey").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = get(&test.app, "/api/question?survey=1").await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn unrendered_fixture_fails_to_load() {
    let test = build_app().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw.json");
    std::fs::write(&path, SURVEY_FIXTURE).unwrap();

    let err = fixtures::load_file(&test.pool, &path).await.unwrap_err();

    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    let (_, body) = get(&test.app, "/api/survey").await;
    assert!(body.as_array().unwrap().is_empty());
}
