//! serve サブコマンド
//!
//! ログ・データベース・管理者作成・エンドポイント探索を行い、APIサーバーを起動する。

use anyhow::Context;
use clap::Args;
use survey_common::config::SurveyConfig;
use tracing::info;

use crate::{api, auth, db, server, AppState};

/// serve サブコマンドの引数
///
/// 未指定の項目は環境変数（`SURVEY_HOST` / `SURVEY_PORT`）または既定値を使う。
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Bind address
    #[arg(short = 'H', long)]
    pub host: Option<String>,
}

impl ServeArgs {
    /// 引数で設定を上書きする
    pub fn apply(&self, mut config: SurveyConfig) -> SurveyConfig {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config
    }
}

/// サーバーを起動する
///
/// エンドポイント探索に失敗した場合はリクエストを受け付ける前に中止する。
pub async fn execute(args: &ServeArgs) -> anyhow::Result<()> {
    let config = args.apply(SurveyConfig::from_env());
    info!("Survey server v{}", env!("CARGO_PKG_VERSION"));

    let routes = api::discover_routes(&config.installed_modules)
        .context("Endpoint discovery failed; refusing to start")?;
    for entry in routes.entries() {
        info!(
            path = %api::mount_path(&config.api_prefix, &entry.path_segment),
            view = %entry.view_name,
            "Route mounted"
        );
    }

    let db_pool = db::migrations::initialize_database(&config.database_url)
        .await
        .context("Failed to initialize database")?;

    if let Some(username) = auth::bootstrap::create_admin_from_env(&db_pool).await? {
        info!("Admin account available: {}", username);
    }

    let state = AppState { db_pool };
    let app = api::create_app(state, &routes, &config);

    server::run(app, &config.bind_addr()).await
}
