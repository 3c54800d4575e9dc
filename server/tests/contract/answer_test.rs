//! Contract Test: POST /api/user_token, GET|POST /api/answer

use axum::http::StatusCode;
use axum::Router;
use serde_json::{json, Value};

use crate::support::{build_app, get, load_survey_fixture, post};

async fn issue_token(app: &Router) -> String {
    let (status, body) = post(app, "/api/user_token", json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["date_issuance"].is_string());
    body["id"].as_str().unwrap().to_string()
}

async fn answer(app: &Router, body: Value) -> (StatusCode, Value) {
    post(app, "/api/answer", body).await
}

#[tokio::test]
async fn answers_for_each_question_type() {
    let test = build_app().await;
    load_survey_fixture(&test.pool).await;
    let user = issue_token(&test.app).await;

    let (status, body) = answer(
        &test.app,
        json!({"user": user, "question": 10, "text": "It smells nice"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["text"], "It smells nice");

    let (status, _) = answer(&test.app, json!({"user": user, "question": 11, "choices": [111]})).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = answer(
        &test.app,
        json!({"user": user, "question": 12, "choices": [122, 120]}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["choices"], json!([122, 120]));

    let (status, body) = get(&test.app, &format!("/api/answer?user={}", user)).await;
    assert_eq!(status, StatusCode::OK);
    let answers = body.as_array().unwrap();
    assert_eq!(answers.len(), 3);
    assert_eq!(answers[0]["question_id"], 10);
    assert_eq!(answers[1]["choices"], json!([111]));
    assert_eq!(answers[2]["choices"], json!([120, 122]));
    assert!(answers[2]["text"].is_null());
}

#[tokio::test]
async fn second_answer_to_same_question_is_conflict() {
    let test = build_app().await;
    load_survey_fixture(&test.pool).await;
    let user = issue_token(&test.app).await;
    let body = json!({"user": user, "question": 11, "choices": [110]});

    let (status, _) = answer(&test.app, body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) = answer(&test.app, body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["error"]["code"], "409");
}

#[tokio::test]
async fn invalid_answers_are_rejected() {
    let test = build_app().await;
    load_survey_fixture(&test.pool).await;
    let user = issue_token(&test.app).await;

    let cases = [
        // 自由記述に空テキスト
        json!({"user": user, "question": 10, "text": ""}),
        // 自由記述に選択肢
        json!({"user": user, "question": 10, "text": "x", "choices": [110]}),
        // 単一選択に2つ
        json!({"user": user, "question": 11, "choices": [110, 111]}),
        // 単一選択に0個
        json!({"user": user, "question": 11}),
        // 複数選択に0個
        json!({"user": user, "question": 12, "choices": []}),
        // 他の質問の選択肢
        json!({"user": user, "question": 12, "choices": [110]}),
        // 終了済みアンケートの質問
        json!({"user": user, "question": 20, "text": "late"}),
        // 存在しない質問
        json!({"user": user, "question": 9999, "text": "x"}),
        // 未発行の回答者トークン
        json!({"user": "00000000-0000-0000-0000-000000000000", "question": 10, "text": "x"}),
    ];

    for case in cases {
        let (status, body) = answer(&test.app, case.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "case {}", case);
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    let (_, body) = get(&test.app, &format!("/api/answer?user={}", user)).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn answers_of_unknown_user_are_not_found() {
    let test = build_app().await;

    let (status, _) = get(
        &test.app,
        "/api/answer?user=00000000-0000-0000-0000-000000000000",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&test.app, "/api/answer?user=not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
