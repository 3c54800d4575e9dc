// 回答者トークンの発行と回答の保存

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use survey_common::error::SurveyError;
use survey_common::types::{Answer, NewAnswer, QuestionKind, UserToken};
use uuid::Uuid;

use super::surveys;

/// 回答者トークンを発行
pub async fn issue_user_token(pool: &SqlitePool) -> Result<UserToken, SurveyError> {
    let token = UserToken {
        id: Uuid::new_v4(),
        date_issuance: Utc::now(),
    };

    sqlx::query("INSERT INTO user_tokens (id, date_issuance) VALUES (?, ?)")
        .bind(token.id.to_string())
        .bind(token.date_issuance.to_rfc3339())
        .execute(pool)
        .await
        .map_err(|e| SurveyError::Database(format!("Failed to issue user token: {}", e)))?;

    tracing::debug!(user = %token.id, "Issued respondent token");
    Ok(token)
}

/// 回答者トークンを取得
pub async fn find_user_token(
    pool: &SqlitePool,
    id: Uuid,
) -> Result<Option<UserToken>, SurveyError> {
    let row: Option<(String,)> = sqlx::query_as("SELECT date_issuance FROM user_tokens WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await
        .map_err(|e| SurveyError::Database(format!("Failed to find user token: {}", e)))?;

    row.map(|(issued,)| {
        let date_issuance = DateTime::parse_from_rfc3339(&issued)
            .map_err(|e| SurveyError::Database(format!("Corrupted date_issuance: {}", e)))?
            .with_timezone(&Utc);
        Ok(UserToken { id, date_issuance })
    })
    .transpose()
}

/// 質問タイプに対して回答の形が妥当か検証する
///
/// 自由記述は空でないテキストのみ、単一選択はちょうど1つ、複数選択は1つ以上の選択肢。
/// 選択肢の重複は不可。
pub fn check_answer_shape(
    kind: QuestionKind,
    text: Option<&str>,
    choices: &[i64],
) -> Result<(), SurveyError> {
    let unique: HashSet<&i64> = choices.iter().collect();
    if unique.len() != choices.len() {
        return Err(SurveyError::validation("Choices must not repeat"));
    }

    match kind {
        QuestionKind::Str => {
            if text.map_or(true, |t| t.trim().is_empty()) {
                return Err(SurveyError::validation("Text answer must not be empty"));
            }
            if !choices.is_empty() {
                return Err(SurveyError::validation(
                    "Text question does not accept choices",
                ));
            }
        }
        QuestionKind::Single | QuestionKind::Multiple => {
            if text.is_some() {
                return Err(SurveyError::validation(
                    "Choice question does not accept text",
                ));
            }
            if kind == QuestionKind::Single && choices.len() != 1 {
                return Err(SurveyError::validation(
                    "Single choice question requires exactly one choice",
                ));
            }
            if choices.is_empty() {
                return Err(SurveyError::validation(
                    "Multiple choice question requires at least one choice",
                ));
            }
        }
    }
    Ok(())
}

/// 回答を検証して保存
///
/// # Arguments
/// * `pool` - データベース接続プール
/// * `today` - アンケートの受付期間判定に使う日付
/// * `answer` - 投稿された回答
///
/// # Returns
/// * `Ok(Answer)` - 保存された回答
/// * `Err(SurveyError::Common)` - 検証エラー
/// * `Err(SurveyError::Conflict)` - 同じ質問に回答済み
pub async fn create(
    pool: &SqlitePool,
    today: NaiveDate,
    answer: NewAnswer,
) -> Result<Answer, SurveyError> {
    if find_user_token(pool, answer.user).await?.is_none() {
        return Err(SurveyError::validation(format!(
            "Unknown user token: {}",
            answer.user
        )));
    }

    let question = surveys::find_question(pool, answer.question)
        .await?
        .ok_or_else(|| {
            SurveyError::validation(format!("Unknown question: {}", answer.question))
        })?;

    let survey_open = surveys::find(pool, question.survey_id)
        .await?
        .is_some_and(|survey| survey.is_active_on(today));
    if !survey_open {
        return Err(SurveyError::validation(format!(
            "Question {} does not belong to an active survey",
            question.id
        )));
    }

    check_answer_shape(question.kind, answer.text.as_deref(), &answer.choices)?;

    let valid_choices: HashSet<i64> = surveys::list_choices(pool, question.id)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();
    if let Some(foreign) = answer.choices.iter().find(|c| !valid_choices.contains(*c)) {
        return Err(SurveyError::validation(format!(
            "Choice {} does not belong to question {}",
            foreign, question.id
        )));
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| SurveyError::Database(format!("Failed to begin transaction: {}", e)))?;

    let answer_id: i64 = sqlx::query_scalar(
        "INSERT INTO answers (user_id, question_id, text) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(answer.user.to_string())
    .bind(question.id)
    .bind(answer.text.as_deref())
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            SurveyError::Conflict(format!(
                "User {} has already answered question {}",
                answer.user, question.id
            ))
        } else {
            SurveyError::Database(format!("Failed to store answer: {}", e))
        }
    })?;

    for choice_id in &answer.choices {
        sqlx::query("INSERT INTO answer_choices (answer_id, choice_id) VALUES (?, ?)")
            .bind(answer_id)
            .bind(choice_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| SurveyError::Database(format!("Failed to store answer choice: {}", e)))?;
    }

    tx.commit()
        .await
        .map_err(|e| SurveyError::Database(format!("Failed to commit answer: {}", e)))?;

    tracing::info!(user = %answer.user, question = question.id, "Answer stored");

    Ok(Answer {
        id: answer_id,
        user: answer.user,
        question_id: question.id,
        text: answer.text,
        choices: answer.choices,
    })
}

#[derive(sqlx::FromRow)]
struct AnswerRow {
    id: i64,
    question_id: i64,
    text: Option<String>,
}

/// 回答者の回答一覧（質問ID順）
pub async fn list_for_user(pool: &SqlitePool, user: Uuid) -> Result<Vec<Answer>, SurveyError> {
    let rows = sqlx::query_as::<_, AnswerRow>(
        "SELECT id, question_id, text FROM answers WHERE user_id = ? ORDER BY question_id, id",
    )
    .bind(user.to_string())
    .fetch_all(pool)
    .await
    .map_err(|e| SurveyError::Database(format!("Failed to list answers: {}", e)))?;

    let mut answers = Vec::with_capacity(rows.len());
    for row in rows {
        let choices: Vec<i64> = sqlx::query_scalar(
            "SELECT choice_id FROM answer_choices WHERE answer_id = ? ORDER BY choice_id",
        )
        .bind(row.id)
        .fetch_all(pool)
        .await
        .map_err(|e| SurveyError::Database(format!("Failed to list answer choices: {}", e)))?;

        answers.push(Answer {
            id: row.id,
            user,
            question_id: row.question_id,
            text: row.text,
            choices,
        });
    }
    Ok(answers)
}
