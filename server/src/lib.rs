//! Survey backend server
//!
//! アンケート・質問・匿名回答を扱うREST APIサーバー。
//! 機能モジュールのビューは起動時に探索され、ビュー名から導出したパスに載る。

#![warn(missing_docs)]

/// REST APIハンドラー
pub mod api;

/// 認証（ログイントークン、パスワード、管理者作成）
pub mod auth;

/// CLIインターフェース
pub mod cli;

/// データベースアクセス
pub mod db;

/// フィクスチャの日付置換と投入
pub mod fixtures;

/// ロギング初期化ユーティリティ
pub mod logging;

/// エンドポイント登録・探索
pub mod registry;

/// axumサーバー起動・シャットダウン
pub mod server;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// データベース接続プール
    pub db_pool: sqlx::SqlitePool,
}
