//! ログ初期化
//!
//! 標準出力へ常に出力し、`SURVEY_LOG_DIR` が設定されていれば
//! 日次ローテーションのJSONログファイルにも書き出す。

use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// ログファイル名のプレフィックス
pub const LOG_FILE_NAME: &str = "survey-server.log";

// ファイル出力のフラッシュ用ガード（プロセス終了まで保持）
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// ログレベル指定からフィルターを作る
///
/// 指定がないか解釈できなければ `info`。
pub fn build_filter(level: Option<&str>) -> EnvFilter {
    level
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// グローバルなtracing subscriberを設定する
///
/// レベルは `SURVEY_LOG_LEVEL`、なければ `RUST_LOG` から読む。
pub fn init() -> anyhow::Result<()> {
    let level = std::env::var("SURVEY_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok();
    let filter = build_filter(level.as_deref());

    let console_layer = fmt::layer().with_target(true);

    let file_layer = match std::env::var("SURVEY_LOG_DIR").ok().filter(|dir| !dir.is_empty()) {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().json().with_writer(writer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}
