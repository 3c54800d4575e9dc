//! Survey backend 共通ライブラリ
//!
//! サーバーとテストで共有するドメイン型・エラー型・設定ヘルパー

#![warn(missing_docs)]

/// 設定管理（環境変数ヘルパー、サーバー設定）
pub mod config;

/// エラー型定義
pub mod error;

/// アンケートのドメイン型
pub mod types;
