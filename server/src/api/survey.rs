//! アンケートAPI（`survey` モジュール）

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::{get, post, MethodRouter},
    Json,
};
use serde::Deserialize;
use survey_common::error::SurveyError;
use survey_common::types::{
    Answer, NewAnswer, QuestionChoice, QuestionWithChoices, Survey, UserToken,
};
use uuid::Uuid;

use super::error::AppError;
use super::view::{register, ApiView, ViewEndpoint};
use crate::db;
use crate::registry::EndpointRegistry;
use crate::AppState;

/// `survey` モジュールのAPIを登録する
pub fn register_api(registry: &mut EndpointRegistry<ViewEndpoint>) -> anyhow::Result<()> {
    register::<SurveyView>(registry)?;
    register::<QuestionView>(registry)?;
    register::<QuestionChoiceView>(registry)?;
    register::<UserTokenView>(registry)?;
    register::<AnswerView>(registry)?;
    Ok(())
}

/// 回答受付中のアンケート
pub struct SurveyView;

impl ApiView for SurveyView {
    const METHODS: &'static [&'static str] = &["get"];
    const SUMMARY: &'static str = "List active surveys";

    fn router() -> MethodRouter<AppState> {
        get(list_surveys)
    }
}

/// アンケートの質問
pub struct QuestionView;

impl ApiView for QuestionView {
    const METHODS: &'static [&'static str] = &["get"];
    const SUMMARY: &'static str = "List the questions of an active survey with their choices";

    fn router() -> MethodRouter<AppState> {
        get(list_questions)
    }
}

/// 質問の選択肢
pub struct QuestionChoiceView;

impl ApiView for QuestionChoiceView {
    const METHODS: &'static [&'static str] = &["get"];
    const SUMMARY: &'static str = "List the choices of a question";

    fn router() -> MethodRouter<AppState> {
        get(list_choices)
    }
}

/// 回答者トークン
pub struct UserTokenView;

impl ApiView for UserTokenView {
    const METHODS: &'static [&'static str] = &["post"];
    const SUMMARY: &'static str = "Issue an anonymous respondent token";

    fn router() -> MethodRouter<AppState> {
        post(issue_user_token)
    }
}

/// 回答
pub struct AnswerView;

impl ApiView for AnswerView {
    const METHODS: &'static [&'static str] = &["get", "post"];
    const SUMMARY: &'static str = "List or submit the answers of a respondent";

    fn router() -> MethodRouter<AppState> {
        get(list_answers).post(create_answer)
    }
}

#[derive(Debug, Deserialize)]
struct SurveyQuery {
    id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct QuestionQuery {
    survey: i64,
}

#[derive(Debug, Deserialize)]
struct ChoiceQuery {
    question: i64,
}

#[derive(Debug, Deserialize)]
struct AnswerQuery {
    user: Uuid,
}

// 受付中のアンケートに属する質問のみ公開する
async fn ensure_open_survey(state: &AppState, survey_id: i64) -> Result<Survey, SurveyError> {
    let today = db::surveys::today();
    db::surveys::find(&state.db_pool, survey_id)
        .await?
        .filter(|survey| survey.is_active_on(today))
        .ok_or_else(|| SurveyError::NotFound(format!("Survey {} is not active", survey_id)))
}

/// GET /api/survey
async fn list_surveys(
    State(state): State<AppState>,
    query: Result<Query<SurveyQuery>, QueryRejection>,
) -> Result<Json<Vec<Survey>>, AppError> {
    let Query(query) = query?;
    let surveys =
        db::surveys::list_active(&state.db_pool, db::surveys::today(), query.id).await?;
    Ok(Json(surveys))
}

/// GET /api/question?survey=<id>
async fn list_questions(
    State(state): State<AppState>,
    query: Result<Query<QuestionQuery>, QueryRejection>,
) -> Result<Json<Vec<QuestionWithChoices>>, AppError> {
    let Query(query) = query?;
    let survey = ensure_open_survey(&state, query.survey).await?;
    Ok(Json(db::surveys::list_questions(&state.db_pool, survey.id).await?))
}

/// GET /api/question_choice?question=<id>
async fn list_choices(
    State(state): State<AppState>,
    query: Result<Query<ChoiceQuery>, QueryRejection>,
) -> Result<Json<Vec<QuestionChoice>>, AppError> {
    let Query(query) = query?;
    let question = db::surveys::find_question(&state.db_pool, query.question)
        .await?
        .ok_or_else(|| SurveyError::NotFound(format!("Question {}", query.question)))?;
    ensure_open_survey(&state, question.survey_id).await?;
    Ok(Json(db::surveys::list_choices(&state.db_pool, question.id).await?))
}

/// POST /api/user_token
async fn issue_user_token(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<UserToken>), AppError> {
    let token = db::answers::issue_user_token(&state.db_pool).await?;
    Ok((StatusCode::CREATED, Json(token)))
}

/// GET /api/answer?user=<uuid>
async fn list_answers(
    State(state): State<AppState>,
    query: Result<Query<AnswerQuery>, QueryRejection>,
) -> Result<Json<Vec<Answer>>, AppError> {
    let Query(query) = query?;
    if db::answers::find_user_token(&state.db_pool, query.user)
        .await?
        .is_none()
    {
        return Err(SurveyError::NotFound(format!("User token {}", query.user)).into());
    }
    Ok(Json(db::answers::list_for_user(&state.db_pool, query.user).await?))
}

/// POST /api/answer
async fn create_answer(
    State(state): State<AppState>,
    payload: Result<Json<NewAnswer>, JsonRejection>,
) -> Result<(StatusCode, Json<Answer>), AppError> {
    let Json(answer) = payload?;
    let stored = db::answers::create(&state.db_pool, db::surveys::today(), answer).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}
