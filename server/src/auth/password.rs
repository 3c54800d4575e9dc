// ログイン資格情報の検証（bcrypt）

use sqlx::SqlitePool;
use survey_common::error::SurveyError;
use survey_common::types::User;

use crate::db;

/// 平文パスワードからbcryptハッシュを作る（コストは `bcrypt::DEFAULT_COST`）
pub fn hash_password(password: &str) -> Result<String, SurveyError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| SurveyError::PasswordHash(format!("bcrypt hash failed: {}", e)))
}

/// 保存済みハッシュと平文パスワードを照合する
///
/// ハッシュ文字列自体が壊れている場合のみエラーになる。
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, SurveyError> {
    bcrypt::verify(password, stored_hash)
        .map_err(|e| SurveyError::PasswordHash(format!("bcrypt verify failed: {}", e)))
}

/// ユーザー名とパスワードでユーザーを認証する
///
/// # Returns
/// * `Ok(User)` - 資格情報が正しい
/// * `Err(SurveyError::Authentication)` - ユーザーが存在しない、またはパスワード不一致
pub async fn verify_credentials(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<User, SurveyError> {
    let rejected = || SurveyError::Authentication("Invalid username or password".to_string());

    let Some(user) = db::users::find_by_username(pool, username).await? else {
        tracing::warn!(username, "Login rejected: unknown user");
        return Err(rejected());
    };

    if verify_password(password, &user.password_hash)? {
        Ok(user)
    } else {
        tracing::warn!(username, "Login rejected: wrong password");
        Err(rejected())
    }
}
