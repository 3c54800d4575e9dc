// アンケート・質問・選択肢の読み出しとフィクスチャ投入

use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};
use survey_common::error::SurveyError;
use survey_common::types::{Question, QuestionChoice, QuestionKind, QuestionWithChoices, Survey};

#[derive(sqlx::FromRow)]
struct SurveyRow {
    id: i64,
    name: String,
    description: String,
    date_start: NaiveDate,
    date_end: Option<NaiveDate>,
    is_hidden: bool,
}

impl From<SurveyRow> for Survey {
    fn from(row: SurveyRow) -> Self {
        Survey {
            id: row.id,
            name: row.name,
            description: row.description,
            date_start: row.date_start,
            date_end: row.date_end,
            is_hidden: row.is_hidden,
        }
    }
}

#[derive(sqlx::FromRow)]
struct QuestionRow {
    id: i64,
    survey_id: i64,
    name: String,
    order: i64,
    kind: String,
}

impl QuestionRow {
    fn into_question(self) -> Result<Question, SurveyError> {
        let kind: QuestionKind = self.kind.parse().map_err(|_| {
            SurveyError::Database(format!(
                "Question {} has unknown type '{}'",
                self.id, self.kind
            ))
        })?;
        Ok(Question {
            id: self.id,
            survey_id: self.survey_id,
            name: self.name,
            order: self.order,
            kind,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ChoiceRow {
    id: i64,
    question_id: i64,
    name: String,
    order: i64,
}

impl From<ChoiceRow> for QuestionChoice {
    fn from(row: ChoiceRow) -> Self {
        QuestionChoice {
            id: row.id,
            question_id: row.question_id,
            name: row.name,
            order: row.order,
        }
    }
}

/// 受付期間の判定に使う今日の日付（ローカルタイムゾーン）
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

const SURVEY_COLUMNS: &str = "id, name, description, date_start, date_end, is_hidden";
const QUESTION_COLUMNS: &str = "id, survey_id, name, \"order\" AS \"order\", type AS kind";
const CHOICE_COLUMNS: &str = "id, question_id, name, \"order\" AS \"order\"";

/// 指定日に回答受付中のアンケート一覧
///
/// 開始日が今日以前、非公開でない、終了日が未設定または今日以降のもの。
///
/// # Arguments
/// * `pool` - データベース接続プール
/// * `today` - 判定基準日
/// * `id` - 指定時はそのIDのアンケートのみ
pub async fn list_active(
    pool: &SqlitePool,
    today: NaiveDate,
    id: Option<i64>,
) -> Result<Vec<Survey>, SurveyError> {
    let sql = format!(
        "SELECT {SURVEY_COLUMNS} FROM surveys
         WHERE date_start <= ?1
           AND is_hidden = 0
           AND (date_end IS NULL OR date_end >= ?1)
           AND (?2 IS NULL OR id = ?2)
         ORDER BY date_start DESC, id"
    );
    let rows = sqlx::query_as::<_, SurveyRow>(&sql)
        .bind(today)
        .bind(id)
        .fetch_all(pool)
        .await
        .map_err(|e| SurveyError::Database(format!("Failed to list surveys: {}", e)))?;

    Ok(rows.into_iter().map(Survey::from).collect())
}

/// IDでアンケートを取得
pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Survey>, SurveyError> {
    let sql = format!("SELECT {SURVEY_COLUMNS} FROM surveys WHERE id = ?");
    let row = sqlx::query_as::<_, SurveyRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| SurveyError::Database(format!("Failed to find survey: {}", e)))?;

    Ok(row.map(Survey::from))
}

/// IDで質問を取得
pub async fn find_question(pool: &SqlitePool, id: i64) -> Result<Option<Question>, SurveyError> {
    let sql = format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?");
    let row = sqlx::query_as::<_, QuestionRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| SurveyError::Database(format!("Failed to find question: {}", e)))?;

    row.map(QuestionRow::into_question).transpose()
}

/// アンケートの質問を表示順に、選択肢付きで取得
pub async fn list_questions(
    pool: &SqlitePool,
    survey_id: i64,
) -> Result<Vec<QuestionWithChoices>, SurveyError> {
    let sql = format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE survey_id = ? ORDER BY \"order\", id"
    );
    let rows = sqlx::query_as::<_, QuestionRow>(&sql)
        .bind(survey_id)
        .fetch_all(pool)
        .await
        .map_err(|e| SurveyError::Database(format!("Failed to list questions: {}", e)))?;

    let mut questions = Vec::with_capacity(rows.len());
    for row in rows {
        let question = row.into_question()?;
        let choices = list_choices(pool, question.id).await?;
        questions.push(QuestionWithChoices {
            type_display: question.kind.display_name(),
            question,
            choices,
        });
    }
    Ok(questions)
}

/// 質問の選択肢を表示順に取得
pub async fn list_choices(
    pool: &SqlitePool,
    question_id: i64,
) -> Result<Vec<QuestionChoice>, SurveyError> {
    let sql = format!(
        "SELECT {CHOICE_COLUMNS} FROM question_choices WHERE question_id = ? ORDER BY \"order\", id"
    );
    let rows = sqlx::query_as::<_, ChoiceRow>(&sql)
        .bind(question_id)
        .fetch_all(pool)
        .await
        .map_err(|e| SurveyError::Database(format!("Failed to list choices: {}", e)))?;

    Ok(rows.into_iter().map(QuestionChoice::from).collect())
}

/// アンケートを主キー指定で投入（既存なら上書き）
pub async fn upsert_survey(conn: &mut SqliteConnection, survey: &Survey) -> Result<(), SurveyError> {
    sqlx::query(
        "INSERT INTO surveys (id, name, description, date_start, date_end, is_hidden)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             description = excluded.description,
             date_start = excluded.date_start,
             date_end = excluded.date_end,
             is_hidden = excluded.is_hidden",
    )
    .bind(survey.id)
    .bind(&survey.name)
    .bind(&survey.description)
    .bind(survey.date_start)
    .bind(survey.date_end)
    .bind(survey.is_hidden)
    .execute(conn)
    .await
    .map_err(|e| SurveyError::Database(format!("Failed to store survey {}: {}", survey.id, e)))?;
    Ok(())
}

/// 質問を主キー指定で投入（既存なら上書き）
pub async fn upsert_question(
    conn: &mut SqliteConnection,
    question: &Question,
) -> Result<(), SurveyError> {
    sqlx::query(
        "INSERT INTO questions (id, survey_id, name, \"order\", type)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
             survey_id = excluded.survey_id,
             name = excluded.name,
             \"order\" = excluded.\"order\",
             type = excluded.type",
    )
    .bind(question.id)
    .bind(question.survey_id)
    .bind(&question.name)
    .bind(question.order)
    .bind(question.kind.code())
    .execute(conn)
    .await
    .map_err(|e| {
        SurveyError::Database(format!("Failed to store question {}: {}", question.id, e))
    })?;
    Ok(())
}

/// 選択肢を主キー指定で投入（既存なら上書き）
pub async fn upsert_choice(
    conn: &mut SqliteConnection,
    choice: &QuestionChoice,
) -> Result<(), SurveyError> {
    sqlx::query(
        "INSERT INTO question_choices (id, question_id, name, \"order\")
         VALUES (?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
             question_id = excluded.question_id,
             name = excluded.name,
             \"order\" = excluded.\"order\"",
    )
    .bind(choice.id)
    .bind(choice.question_id)
    .bind(&choice.name)
    .bind(choice.order)
    .execute(conn)
    .await
    .map_err(|e| SurveyError::Database(format!("Failed to store choice {}: {}", choice.id, e)))?;
    Ok(())
}
