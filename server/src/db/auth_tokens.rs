// ログイン用認証トークンの保存・検索・削除

use chrono::Utc;
use sqlx::SqlitePool;
use survey_common::error::SurveyError;
use survey_common::types::User;
use uuid::Uuid;

use super::users::UserRow;

/// トークンハッシュを保存
///
/// # Arguments
/// * `pool` - データベース接続プール
/// * `user_id` - トークン所有者
/// * `token_hash` - SHA-256ハッシュ（平文は保存しない）
pub async fn create(pool: &SqlitePool, user_id: Uuid, token_hash: &str) -> Result<(), SurveyError> {
    sqlx::query("INSERT INTO auth_tokens (token_hash, user_id, created_at) VALUES (?, ?, ?)")
        .bind(token_hash)
        .bind(user_id.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await
        .map_err(|e| SurveyError::Database(format!("Failed to store auth token: {}", e)))?;
    Ok(())
}

/// トークンハッシュから所有ユーザーを取得
///
/// # Returns
/// * `Ok(Some(User))` - 有効なトークン
/// * `Ok(None)` - 未知のトークン
pub async fn find_user(pool: &SqlitePool, token_hash: &str) -> Result<Option<User>, SurveyError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT u.id, u.username, u.password_hash, u.is_staff, u.created_at, u.last_login
         FROM auth_tokens t JOIN users u ON u.id = t.user_id
         WHERE t.token_hash = ?",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await
    .map_err(|e| SurveyError::Database(format!("Failed to resolve auth token: {}", e)))?;

    row.map(UserRow::into_user).transpose()
}

/// ユーザーの全トークンを削除
///
/// # Returns
/// * `Ok(u64)` - 削除した件数
pub async fn delete_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<u64, SurveyError> {
    let result = sqlx::query("DELETE FROM auth_tokens WHERE user_id = ?")
        .bind(user_id.to_string())
        .execute(pool)
        .await
        .map_err(|e| SurveyError::Database(format!("Failed to delete auth tokens: {}", e)))?;
    Ok(result.rows_affected())
}
