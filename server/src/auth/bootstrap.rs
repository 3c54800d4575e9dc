//! 初回起動時の管理者アカウント作成
//!
//! 環境変数から管理者を作成

use crate::auth::password::hash_password;
use crate::db;
use survey_common::config::get_env_with_fallback;
use survey_common::error::SurveyError;

/// 環境変数から管理者を作成
///
/// # Environment Variables
/// * `SURVEY_ADMIN_USERNAME` - 管理者ユーザー名（省略時: "admin"）
/// * `SURVEY_ADMIN_PASSWORD` - 管理者パスワード（未設定なら作成しない）
///
/// # Returns
/// * `Ok(Some(username))` - 管理者作成成功、または既に存在
/// * `Ok(None)` - パスワードが未設定（作成しない）
/// * `Err(SurveyError)` - 作成失敗
pub async fn create_admin_from_env(
    pool: &sqlx::SqlitePool,
) -> Result<Option<String>, SurveyError> {
    let password = match get_env_with_fallback("SURVEY_ADMIN_PASSWORD", "ADMIN_PASSWORD") {
        Some(p) if !p.is_empty() => p,
        _ => {
            tracing::debug!("SURVEY_ADMIN_PASSWORD not set, skipping admin creation from env");
            return Ok(None);
        }
    };

    let username = get_env_with_fallback("SURVEY_ADMIN_USERNAME", "ADMIN_USERNAME")
        .unwrap_or_else(|| "admin".to_string());

    if db::users::find_by_username(pool, &username).await?.is_some() {
        tracing::debug!("Admin user {} already exists, skipping creation", username);
        return Ok(Some(username));
    }

    let password_hash = hash_password(&password)?;

    match db::users::create(pool, &username, &password_hash, true).await {
        Ok(user) => {
            tracing::info!("Created admin user from env: username={}", username);
            Ok(Some(user.username))
        }
        Err(e) => {
            tracing::error!("Failed to create admin user from env: {}", e);
            Err(e)
        }
    }
}
