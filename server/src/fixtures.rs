//! フィクスチャ
//!
//! 生データ中の `{%TODAY+N%}` / `{%TODAY-N%}` を実行日基準の日付に置換し、
//! 完成したフィクスチャをデータベースへ投入する。

use std::path::Path;

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use serde_json::Value;
use sqlx::SqlitePool;
use survey_common::error::{CommonError, SurveyError};
use survey_common::types::{Question, QuestionChoice, QuestionKind, Survey};

use crate::db;

static TODAY_TEMPLATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{%TODAY([+-]\d+)%\}").unwrap());

/// テキスト中の日付テンプレートを置換する
///
/// ```
/// use chrono::NaiveDate;
/// use survey_server::fixtures::replace_date;
///
/// let today = NaiveDate::from_ymd_opt(2007, 6, 15).unwrap();
/// assert_eq!(replace_date("{%TODAY-5%}", today), "2007-06-10");
/// assert_eq!(replace_date("{%TODAY+365%}", today), "2008-06-14");
/// ```
pub fn replace_date(text: &str, today: NaiveDate) -> String {
    TODAY_TEMPLATE
        .replace_all(text, |caps: &Captures| {
            // 日数が i64 に収まらない・日付範囲外のものはそのまま残す
            caps[1]
                .parse::<i64>()
                .ok()
                .and_then(Duration::try_days)
                .and_then(|delta| today.checked_add_signed(delta))
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// `raw` 内の全 `*.json` を置換して `ready` に同名で書き出す
///
/// # Returns
/// * `Ok(Vec<String>)` - 処理したファイル名（名前順）
pub fn render_dir(raw: &Path, ready: &Path, today: NaiveDate) -> std::io::Result<Vec<String>> {
    std::fs::create_dir_all(ready)?;

    let mut names = Vec::new();
    for entry in std::fs::read_dir(raw)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };

        let text = std::fs::read_to_string(&path)?;
        std::fs::write(ready.join(&name), replace_date(&text, today))?;
        tracing::debug!(file = %name, "Rendered fixture");
        names.push(name);
    }

    names.sort();
    Ok(names)
}

#[derive(Debug, Deserialize)]
struct FixtureRecord {
    model: String,
    pk: i64,
    fields: Value,
}

#[derive(Debug, Deserialize)]
struct SurveyFields {
    name: String,
    #[serde(default)]
    description: String,
    date_start: NaiveDate,
    #[serde(default)]
    date_end: Option<NaiveDate>,
    #[serde(default)]
    is_hidden: bool,
}

#[derive(Debug, Deserialize)]
struct QuestionFields {
    survey: i64,
    name: String,
    #[serde(default)]
    order: i64,
    #[serde(rename = "type")]
    kind: QuestionKind,
}

#[derive(Debug, Deserialize)]
struct ChoiceFields {
    question: i64,
    name: String,
    #[serde(default)]
    order: i64,
}

fn fields<T: serde::de::DeserializeOwned>(record: &FixtureRecord) -> Result<T, SurveyError> {
    serde_json::from_value(record.fields.clone()).map_err(|e| {
        SurveyError::validation(format!(
            "Invalid fields for {} pk={}: {}",
            record.model, record.pk, e
        ))
    })
}

/// フィクスチャファイルを1トランザクションで投入する
///
/// 対応モデルは `survey.survey`、`survey.question`、`survey.questionchoice`。
/// 同じ主キーが既にあれば上書きする。
///
/// # Returns
/// * `Ok(usize)` - 投入したレコード数
/// * `Err(SurveyError)` - 読み込み・検証・投入の失敗（何も反映されない）
pub async fn load_file(pool: &SqlitePool, path: &Path) -> Result<usize, SurveyError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        SurveyError::Internal(format!("Failed to read fixture {}: {}", path.display(), e))
    })?;
    let records: Vec<FixtureRecord> =
        serde_json::from_str(&text).map_err(|e| SurveyError::Common(CommonError::from(e)))?;

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| SurveyError::Database(format!("Failed to begin transaction: {}", e)))?;

    for record in &records {
        match record.model.as_str() {
            "survey.survey" => {
                let f: SurveyFields = fields(record)?;
                let survey = Survey {
                    id: record.pk,
                    name: f.name,
                    description: f.description,
                    date_start: f.date_start,
                    date_end: f.date_end,
                    is_hidden: f.is_hidden,
                };
                db::surveys::upsert_survey(&mut *tx, &survey).await?;
            }
            "survey.question" => {
                let f: QuestionFields = fields(record)?;
                let question = Question {
                    id: record.pk,
                    survey_id: f.survey,
                    name: f.name,
                    order: f.order,
                    kind: f.kind,
                };
                db::surveys::upsert_question(&mut *tx, &question).await?;
            }
            "survey.questionchoice" => {
                let f: ChoiceFields = fields(record)?;
                let choice = QuestionChoice {
                    id: record.pk,
                    question_id: f.question,
                    name: f.name,
                    order: f.order,
                };
                db::surveys::upsert_choice(&mut *tx, &choice).await?;
            }
            other => {
                return Err(SurveyError::validation(format!(
                    "Unknown fixture model: {}",
                    other
                )));
            }
        }
    }

    tx.commit()
        .await
        .map_err(|e| SurveyError::Database(format!("Failed to commit fixture: {}", e)))?;

    tracing::info!(file = %path.display(), records = records.len(), "Loaded fixture");
    Ok(records.len())
}
