//! 共通型定義
//!
//! Survey, Question, QuestionChoice, Answer等のコアデータ型

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CommonError;

/// アンケート
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Survey {
    /// 一意識別子
    pub id: i64,
    /// アンケート名
    pub name: String,
    /// 説明
    pub description: String,
    /// 開始日
    pub date_start: NaiveDate,
    /// 終了日（未設定なら無期限）
    #[serde(default)]
    pub date_end: Option<NaiveDate>,
    /// 非公開フラグ
    #[serde(default)]
    pub is_hidden: bool,
}

impl Survey {
    /// 指定日に回答受付中か
    ///
    /// 開始済み・未終了・非公開でないこと。終了日が未設定のアンケートは無期限に受付中。
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        !self.is_hidden
            && self.date_start <= today
            && self.date_end.map_or(true, |end| end >= today)
    }
}

/// 質問タイプ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    /// 自由記述
    #[serde(rename = "STR")]
    Str,
    /// 単一選択
    #[serde(rename = "SIN")]
    Single,
    /// 複数選択
    #[serde(rename = "MUL")]
    Multiple,
}

impl QuestionKind {
    /// 保存用コード（"STR" / "SIN" / "MUL"）
    pub fn code(&self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Single => "SIN",
            Self::Multiple => "MUL",
        }
    }

    /// 表示名
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Single => "single choice",
            Self::Multiple => "multiple choice",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for QuestionKind {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STR" => Ok(Self::Str),
            "SIN" => Ok(Self::Single),
            "MUL" => Ok(Self::Multiple),
            other => Err(CommonError::Validation(format!(
                "Unknown question type: {}",
                other
            ))),
        }
    }
}

/// 質問
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    /// 一意識別子
    pub id: i64,
    /// 所属アンケートID
    pub survey_id: i64,
    /// 質問文
    pub name: String,
    /// アンケート内の表示順
    pub order: i64,
    /// 質問タイプ
    #[serde(rename = "type")]
    pub kind: QuestionKind,
}

/// 質問の選択肢
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionChoice {
    /// 一意識別子
    pub id: i64,
    /// 所属質問ID
    pub question_id: i64,
    /// 選択肢名
    pub name: String,
    /// 質問内の表示順
    pub order: i64,
}

/// 選択肢付きの質問（API応答用）
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QuestionWithChoices {
    /// 質問本体
    #[serde(flatten)]
    pub question: Question,
    /// 質問タイプの表示名
    pub type_display: &'static str,
    /// 表示順に並んだ選択肢
    pub choices: Vec<QuestionChoice>,
}

/// 回答者トークン（匿名回答者の識別子）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserToken {
    /// 回答者ID
    pub id: Uuid,
    /// 発行日時
    pub date_issuance: DateTime<Utc>,
}

/// 回答
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Answer {
    /// 一意識別子
    pub id: i64,
    /// 回答者ID
    pub user: Uuid,
    /// 回答対象の質問ID
    pub question_id: i64,
    /// 自由記述の回答
    pub text: Option<String>,
    /// 選択した選択肢ID
    pub choices: Vec<i64>,
}

/// 回答の投稿内容
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewAnswer {
    /// 回答者ID
    pub user: Uuid,
    /// 回答対象の質問ID
    pub question: i64,
    /// 自由記述の回答
    #[serde(default)]
    pub text: Option<String>,
    /// 選択した選択肢ID
    #[serde(default)]
    pub choices: Vec<i64>,
}

/// ログインユーザー
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// ユーザーID
    pub id: Uuid,
    /// ユーザー名
    pub username: String,
    /// パスワードハッシュ（bcrypt）
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// 管理者フラグ
    pub is_staff: bool,
    /// 作成日時
    pub created_at: DateTime<Utc>,
    /// 最終ログイン日時
    pub last_login: Option<DateTime<Utc>>,
}
