//! Integration Test: installed modules decide which endpoints are mounted

use axum::http::{Method, StatusCode};
use survey_common::config::SurveyConfig;
use survey_server::api;
use survey_server::registry::discovery::DiscoveryError;

use crate::support::{build_app_with, get, send};

fn config(modules: &[&str], prefix: &str) -> SurveyConfig {
    SurveyConfig {
        installed_modules: modules.iter().map(|m| m.to_string()).collect(),
        api_prefix: prefix.to_string(),
        ..SurveyConfig::default()
    }
}

#[tokio::test]
async fn only_installed_modules_are_mounted() {
    let test = build_app_with(&config(&["survey"], "api")).await;

    let (status, _) = get(&test.app, "/api/survey").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&test.app, Method::POST, "/api/logout", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // host.docs が無ければドキュメントも配信しない
    let (status, _) = get(&test.app, "/swagger.json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn custom_prefix_is_used_for_routes_and_docs() {
    let test = build_app_with(&config(&["host.docs", "server"], "v1")).await;

    let (status, body) = get(&test.app, "/v1/logout").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (status, _) = get(&test.app, "/api/logout").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, doc) = get(&test.app, "/swagger.json").await;
    assert!(doc["paths"]["/v1/login"].is_object());
}

#[tokio::test]
async fn unlisted_module_paths_do_not_exist() {
    let test = build_app_with(&config(&["server"], "api")).await;

    let (status, _) = get(&test.app, "/api/question?survey=1").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn unknown_module_fails_before_serving() {
    let err = api::discover_routes(&["server".to_string(), "billing".to_string()]).unwrap_err();

    assert!(matches!(err, DiscoveryError::UnknownModule(ref name) if name == "billing"));
    assert!(err.to_string().contains("billing"));
}

#[test]
fn host_modules_are_never_looked_up() {
    let routes = api::discover_routes(&["host.docs".to_string(), "host.admin".to_string()]).unwrap();

    assert!(routes.is_empty());
}
