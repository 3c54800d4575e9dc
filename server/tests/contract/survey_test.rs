//! Contract Test: GET /api/survey, /api/question, /api/question_choice

use axum::http::StatusCode;

use crate::support::{build_app, get, load_survey_fixture};

#[tokio::test]
async fn survey_lists_only_active_surveys() {
    let test = build_app().await;
    load_survey_fixture(&test.pool).await;

    let (status, body) = get(&test.app, "/api/survey").await;

    assert_eq!(status, StatusCode::OK);
    let surveys = body.as_array().unwrap();
    assert_eq!(surveys.len(), 1);
    assert_eq!(surveys[0]["id"], 1);
    assert_eq!(surveys[0]["name"], "Coffee");
    assert_eq!(surveys[0]["is_hidden"], false);
}

#[tokio::test]
async fn survey_filter_by_id() {
    let test = build_app().await;
    load_survey_fixture(&test.pool).await;

    let (_, body) = get(&test.app, "/api/survey?id=1").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // 終了済みのアンケートは指定しても返らない
    let (status, body) = get(&test.app, "/api/survey?id=2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn survey_with_invalid_id_is_bad_request() {
    let test = build_app().await;

    let (status, body) = get(&test.app, "/api/survey?id=abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "400");
}

#[tokio::test]
async fn questions_are_ordered_with_choices() {
    let test = build_app().await;
    load_survey_fixture(&test.pool).await;

    let (status, body) = get(&test.app, "/api/question?survey=1").await;

    assert_eq!(status, StatusCode::OK);
    let questions = body.as_array().unwrap();
    let ids: Vec<i64> = questions.iter().map(|q| q["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![10, 11, 12]);
    assert_eq!(questions[0]["type"], "STR");
    assert_eq!(questions[0]["type_display"], "string");
    assert!(questions[0]["choices"].as_array().unwrap().is_empty());
    assert_eq!(questions[2]["type_display"], "multiple choice");
    assert_eq!(questions[2]["choices"].as_array().unwrap().len(), 3);
    assert_eq!(questions[2]["choices"][1]["name"], "Pour over");
}

#[tokio::test]
async fn questions_of_inactive_survey_are_not_found() {
    let test = build_app().await;
    load_survey_fixture(&test.pool).await;

    for survey in [2, 3, 4, 999] {
        let (status, body) = get(&test.app, &format!("/api/question?survey={}", survey)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "survey {}", survey);
        assert_eq!(body["error"]["type"], "not_found_error");
    }
}

#[tokio::test]
async fn question_requires_survey_parameter() {
    let test = build_app().await;

    let (status, _) = get(&test.app, "/api/question").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn question_choice_lists_choices_in_order() {
    let test = build_app().await;
    load_survey_fixture(&test.pool).await;

    let (status, body) = get(&test.app, "/api/question_choice?question=11").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Light", "Dark"]);

    let (status, _) = get(&test.app, "/api/question_choice?question=20").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&test.app, "/api/question_choice?question=404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
