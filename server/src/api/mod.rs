//! REST APIハンドラー
//!
//! 機能モジュールのビューを探索してルートテーブルを作り、axumルーターに載せる。

/// 認証API（`server` モジュール）
pub mod auth;
/// OpenAPI文書とSwagger UI（`host.docs`）
pub mod docs;
/// エラーレスポンス
pub mod error;
/// アンケートAPI（`survey` モジュール）
pub mod survey;
/// ビュー定義と登録
pub mod view;

use axum::Router;
use survey_common::config::SurveyConfig;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::registry::discovery::{Activator, DiscoveryError, FeatureModule};
use crate::registry::{EndpointRegistry, RouteTable};
use crate::AppState;
use view::ViewEndpoint;

/// APIビュー用のレジストリ
pub type ApiRegistry = EndpointRegistry<ViewEndpoint>;

/// 封印済みのAPIルートテーブル
pub type ApiRoutes = RouteTable<ViewEndpoint>;

/// ビルドに含まれる機能モジュール
pub fn feature_modules() -> Vec<FeatureModule<ViewEndpoint>> {
    vec![
        FeatureModule::with_api("server", auth::register_api),
        FeatureModule::with_api("survey", survey::register_api),
    ]
}

/// インストール済みモジュールを探索し、封印済みルートテーブルを返す
///
/// 失敗した場合はサーバーを起動してはならない。
pub fn discover_routes(installed: &[String]) -> Result<ApiRoutes, DiscoveryError> {
    Activator::new(feature_modules()).activate(installed)
}

/// マウント後のパス（`/<prefix>/<segment>`）
pub fn mount_path(api_prefix: &str, path_segment: &str) -> String {
    if api_prefix.is_empty() {
        format!("/{}", path_segment)
    } else {
        format!("/{}/{}", api_prefix, path_segment)
    }
}

/// アプリケーションのルーターを作成
///
/// ルートテーブルの全エンドポイントを `/<api_prefix>/<segment>` に載せ、
/// `host.docs` がインストールされていればドキュメントも配信する。
pub fn create_app(state: AppState, routes: &ApiRoutes, config: &SurveyConfig) -> Router {
    let mut app = Router::new();
    for entry in routes.entries() {
        app = app.route(
            &mount_path(&config.api_prefix, &entry.path_segment),
            entry.handler.router.clone(),
        );
    }

    if config
        .installed_modules
        .iter()
        .any(|name| name == docs::DOCS_MODULE)
    {
        app = app.merge(docs::docs_router(routes, &config.api_prefix));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
