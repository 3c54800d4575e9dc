// 認証モジュール

/// パスワードハッシュ化・検証（bcrypt）
pub mod password;

/// 初回起動時の管理者アカウント作成
pub mod bootstrap;

use axum::http::{header, HeaderMap};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use survey_common::error::SurveyError;
use survey_common::types::User;

/// 発行する認証トークンの長さ
pub const AUTH_TOKEN_LENGTH: usize = 40;

/// ランダムトークン生成
pub fn generate_random_token(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// トークンのSHA-256ハッシュ（DBにはハッシュのみ保存する）
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let result = hasher.finalize();
    format!("{:x}", result)
}

/// Authorizationヘッダーからトークンを抽出する
///
/// `Token <key>` と `Bearer <key>` の両形式を受け付ける。
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;
    value
        .strip_prefix("Token ")
        .or_else(|| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// リクエストヘッダーから認証済みユーザーを解決する
///
/// # Returns
/// * `Ok(Some(User))` - 有効なトークン
/// * `Ok(None)` - トークンなし、または未知のトークン（匿名扱い）
/// * `Err(SurveyError)` - DBエラー
pub async fn authenticate(
    pool: &SqlitePool,
    headers: &HeaderMap,
) -> Result<Option<User>, SurveyError> {
    let Some(token) = extract_token(headers) else {
        return Ok(None);
    };
    crate::db::auth_tokens::find_user(pool, &hash_token(token)).await
}
