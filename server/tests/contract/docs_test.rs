//! Contract Test: GET /swagger.json, /swagger, /swagger/

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use crate::support::{build_app, get};

#[tokio::test]
async fn swagger_json_describes_every_route() {
    let test = build_app().await;

    let (status, doc) = get(&test.app, "/swagger.json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["openapi"], "3.0.3");
    let paths = doc["paths"].as_object().unwrap();
    let mut names: Vec<&str> = paths.keys().map(String::as_str).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "/api/answer",
            "/api/login",
            "/api/logout",
            "/api/question",
            "/api/question_choice",
            "/api/survey",
            "/api/user_token",
        ]
    );
    assert!(paths["/api/answer"]["get"].is_object());
    assert!(paths["/api/answer"]["post"].is_object());
    assert!(paths["/api/user_token"].get("get").is_none());
}

#[tokio::test]
async fn swagger_ui_is_served_with_and_without_slash() {
    let test = build_app().await;

    for uri in ["/swagger", "/swagger/"] {
        let response = test
            .app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/swagger.json"));
        assert!(html.contains(r##"dom_id: "#swagger-ui""##));
        assert!(html.trim_end().ends_with("</html>"));
    }
}
