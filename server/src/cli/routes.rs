//! routes サブコマンド
//!
//! エンドポイント探索だけを実行し、ルートテーブルを表示する。

use survey_common::config::SurveyConfig;

use crate::api::{self, ApiRoutes};

/// ルートテーブルを1行1エンドポイントで整形する
///
/// 形式: `/<prefix>/<segment>  GET,POST  <ViewName>`
pub fn format_route_table(routes: &ApiRoutes, api_prefix: &str) -> Vec<String> {
    let paths: Vec<String> = routes
        .entries()
        .iter()
        .map(|entry| api::mount_path(api_prefix, &entry.path_segment))
        .collect();
    let width = paths.iter().map(String::len).max().unwrap_or(0);

    routes
        .entries()
        .iter()
        .zip(paths)
        .map(|(entry, path)| {
            let methods = entry
                .handler
                .methods
                .iter()
                .map(|m| m.to_uppercase())
                .collect::<Vec<_>>()
                .join(",");
            format!("{:<width$}  {:<8}  {}", path, methods, entry.view_name)
        })
        .collect()
}

/// 探索を実行してルートテーブルを標準出力へ表示する
pub fn execute() -> anyhow::Result<()> {
    let config = SurveyConfig::from_env();
    let routes = api::discover_routes(&config.installed_modules)?;
    for line in format_route_table(&routes, &config.api_prefix) {
        println!("{}", line);
    }
    Ok(())
}
