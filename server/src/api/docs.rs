//! APIドキュメント（ホストモジュール `host.docs`）
//!
//! 封印済みルートテーブルからOpenAPI 3文書を生成し、Swagger UIとともに配信する。

use std::sync::Arc;

use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};

use super::{mount_path, ApiRoutes};
use crate::AppState;

/// ホストモジュール名
pub const DOCS_MODULE: &str = "host.docs";

const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Survey API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/swagger.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

/// ルートテーブルからOpenAPI文書を生成する
///
/// エンドポイントごとに1パス、対応メソッドごとに1オペレーションを出力する。
pub fn openapi_document(routes: &ApiRoutes, api_prefix: &str) -> Value {
    let mut paths = Map::new();
    for entry in routes.entries() {
        let mut operations = Map::new();
        for method in entry.handler.methods {
            operations.insert(
                (*method).to_string(),
                json!({
                    "operationId": format!("{}_{}", entry.path_segment.replace('/', "_"), method),
                    "summary": entry.handler.summary,
                    "tags": [entry.view_name],
                    "responses": {
                        "200": { "description": "Successful response" }
                    }
                }),
            );
        }
        paths.insert(
            mount_path(api_prefix, &entry.path_segment),
            Value::Object(operations),
        );
    }

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Survey API",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": Value::Object(paths),
    })
}

/// `/swagger.json`、`/swagger`、`/swagger/` のルーター
pub fn docs_router(routes: &ApiRoutes, api_prefix: &str) -> Router<AppState> {
    let document = Arc::new(openapi_document(routes, api_prefix));
    Router::new()
        .route(
            "/swagger.json",
            get(move || {
                let document = Arc::clone(&document);
                async move { Json(document.as_ref().clone()) }
            }),
        )
        .route("/swagger", get(swagger_ui))
        .route("/swagger/", get(swagger_ui))
}

async fn swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
