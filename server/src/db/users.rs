// ログインユーザーのCRUD操作

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use survey_common::error::SurveyError;
use survey_common::types::User;
use uuid::Uuid;

/// ユーザーを作成
///
/// # Arguments
/// * `pool` - データベース接続プール
/// * `username` - ユーザー名
/// * `password_hash` - bcryptハッシュ化されたパスワード
/// * `is_staff` - 管理者フラグ
///
/// # Returns
/// * `Ok(User)` - 作成されたユーザー
/// * `Err(SurveyError)` - 作成失敗（ユーザー名重複など）
pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    is_staff: bool,
) -> Result<User, SurveyError> {
    let id = Uuid::new_v4();
    let created_at = Utc::now();

    sqlx::query(
        "INSERT INTO users (id, username, password_hash, is_staff, created_at, last_login)
         VALUES (?, ?, ?, ?, ?, NULL)",
    )
    .bind(id.to_string())
    .bind(username)
    .bind(password_hash)
    .bind(is_staff as i32)
    .bind(created_at.to_rfc3339())
    .execute(pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            SurveyError::Conflict(format!("Username '{}' already exists", username))
        } else {
            SurveyError::Database(format!("Failed to create user: {}", e))
        }
    })?;

    Ok(User {
        id,
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        is_staff,
        created_at,
        last_login: None,
    })
}

/// ユーザー名でユーザーを検索
///
/// # Returns
/// * `Ok(Some(User))` - ユーザーが見つかった
/// * `Ok(None)` - ユーザーが見つからなかった
/// * `Err(SurveyError)` - 検索失敗
pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, SurveyError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, password_hash, is_staff, created_at, last_login FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
    .map_err(|e| SurveyError::Database(format!("Failed to find user: {}", e)))?;

    row.map(UserRow::into_user).transpose()
}

/// ユーザー数を取得
pub async fn count(pool: &SqlitePool) -> Result<i64, SurveyError> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .map_err(|e| SurveyError::Database(format!("Failed to count users: {}", e)))
}

/// 最終ログイン日時を更新
pub async fn update_last_login(pool: &SqlitePool, id: Uuid) -> Result<(), SurveyError> {
    sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(pool)
        .await
        .map_err(|e| SurveyError::Database(format!("Failed to update last login: {}", e)))?;
    Ok(())
}

// SQLiteから取得した生データ
#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    id: String,
    username: String,
    password_hash: String,
    is_staff: i32,
    created_at: String,
    last_login: Option<String>,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, SurveyError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| SurveyError::Database(format!("Corrupted user id {}: {}", self.id, e)))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| SurveyError::Database(format!("Corrupted created_at: {}", e)))?
            .with_timezone(&Utc);
        let last_login = self.last_login.as_ref().and_then(|s| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        });

        Ok(User {
            id,
            username: self.username,
            password_hash: self.password_hash,
            is_staff: self.is_staff != 0,
            created_at,
            last_login,
        })
    }
}
