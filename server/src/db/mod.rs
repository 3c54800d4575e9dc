//! データベースアクセス層
//!
//! SQLiteベースのデータ永続化

/// データベースマイグレーション
pub mod migrations;

/// ユーザー管理
pub mod users;

/// 認証トークン管理
pub mod auth_tokens;

/// アンケート・質問・選択肢
pub mod surveys;

/// 回答者トークンと回答
pub mod answers;
