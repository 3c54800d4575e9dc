//! 認証API（`server` モジュール）
//!
//! ログインでトークンを発行し、ログアウトで失効させる。

use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post, MethodRouter},
    Json,
};
use serde::{Deserialize, Serialize};

use super::error::AppError;
use super::view::{register, ApiView, ViewEndpoint};
use crate::auth::{self, password::verify_credentials};
use crate::db;
use crate::registry::EndpointRegistry;
use crate::AppState;

/// `server` モジュールのAPIを登録する
pub fn register_api(registry: &mut EndpointRegistry<ViewEndpoint>) -> anyhow::Result<()> {
    register::<LoginView>(registry)?;
    register::<LogoutView>(registry)?;
    Ok(())
}

/// ログインリクエスト
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// ユーザー名
    pub username: String,
    /// パスワード
    pub password: String,
}

/// ログインレスポンス
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// `Authorization: Token <token>` に使う認証トークン
    pub token: String,
}

/// ログアウトレスポンス
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    /// 常に true
    pub ok: bool,
}

/// ユーザー名とパスワードで認証し、トークンを発行する
pub struct LoginView;

impl ApiView for LoginView {
    const METHODS: &'static [&'static str] = &["post"];
    const SUMMARY: &'static str = "Obtain an authentication token by username and password";

    fn router() -> MethodRouter<AppState> {
        post(login)
    }
}

/// ログアウト（匿名の場合は何もしない）
pub struct LogoutView;

impl ApiView for LogoutView {
    const METHODS: &'static [&'static str] = &["get", "post"];
    const SUMMARY: &'static str = "Log out and revoke every token of the current user";

    fn router() -> MethodRouter<AppState> {
        get(logout).post(logout)
    }
}

/// POST /api/login
///
/// # Returns
/// * `200 OK` - `{"token": "..."}`
/// * `401 Unauthorized` - ユーザー名またはパスワードが不正
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, axum::extract::rejection::JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(request) = payload?;

    let user =
        verify_credentials(&state.db_pool, &request.username, &request.password).await?;

    let token = auth::generate_random_token(auth::AUTH_TOKEN_LENGTH);
    db::auth_tokens::create(&state.db_pool, user.id, &auth::hash_token(&token)).await?;
    db::users::update_last_login(&state.db_pool, user.id).await?;

    tracing::info!(username = %user.username, "User logged in");
    Ok(Json(LoginResponse { token }))
}

/// GET/POST /api/logout
async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, AppError> {
    if let Some(user) = auth::authenticate(&state.db_pool, &headers).await? {
        let revoked = db::auth_tokens::delete_for_user(&state.db_pool, user.id).await?;
        tracing::info!(username = %user.username, revoked, "User logged out");
    }
    Ok(Json(LogoutResponse { ok: true }))
}
