//! 機能モジュールの探索とエンドポイントの有効化
//!
//! 設定されたモジュール一覧（ホスト自身のモジュールを除く）を順に走査し、
//! 各モジュールの `api` ローダーを一度だけ実行してレジストリへ登録させる。
//! `api` を持たないモジュールは正常としてスキップし、ローダーの失敗は
//! その場で探索を打ち切って呼び出し元へ伝播する。

use super::{EndpointRegistry, RegistryError, RouteTable};
use std::collections::HashSet;
use survey_common::config::HOST_MODULE_PREFIX;
use thiserror::Error;

/// モジュールの `api` ローダー
///
/// モジュールが定義する全ビューをレジストリへ登録する。
pub type ApiLoader<H> = fn(&mut EndpointRegistry<H>) -> anyhow::Result<()>;

/// 探索エラー
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// パスの重複など、レジストリが登録を拒否した
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// モジュールの `api` の読み込み中に失敗した
    #[error("Failed to load api of module '{module}': {source}")]
    ModuleLoad {
        /// 失敗したモジュール名
        module: String,
        /// 元のエラー
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// 設定に書かれたモジュールがビルドに含まれていない
    #[error("Module '{0}' is installed but not part of this build")]
    UnknownModule(String),
}

/// 機能モジュール
///
/// `api` が `None` のモジュールはエンドポイントを持たない（エラーではない）。
pub struct FeatureModule<H> {
    name: &'static str,
    api: Option<ApiLoader<H>>,
}

impl<H> FeatureModule<H> {
    /// エンドポイントを持たないモジュール
    pub const fn new(name: &'static str) -> Self {
        Self { name, api: None }
    }

    /// `api` ローダーを持つモジュール
    pub const fn with_api(name: &'static str, api: ApiLoader<H>) -> Self {
        Self {
            name,
            api: Some(api),
        }
    }

    /// モジュール名
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `api` ローダーを持つか
    pub fn has_api(&self) -> bool {
        self.api.is_some()
    }
}

impl<H> std::fmt::Debug for FeatureModule<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureModule")
            .field("name", &self.name)
            .field("has_api", &self.has_api())
            .finish()
    }
}

/// 探索結果の要約
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    /// `api` を読み込んだモジュール（走査順）
    pub loaded: Vec<String>,
    /// `api` を持たなかったモジュール
    pub without_api: Vec<String>,
    /// ホスト自身のモジュールとして除外したもの
    pub host_modules: Vec<String>,
}

/// 探索・有効化を行うアクティベーター
pub struct Activator<H> {
    catalog: Vec<FeatureModule<H>>,
    host_prefix: String,
}

impl<H> Activator<H> {
    /// ビルドに含まれるモジュール一覧からアクティベーターを作成
    pub fn new(catalog: Vec<FeatureModule<H>>) -> Self {
        Self {
            catalog,
            host_prefix: HOST_MODULE_PREFIX.to_string(),
        }
    }

    /// ホストモジュールとみなす名前プレフィックスを変更する
    pub fn with_host_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.host_prefix = prefix.into();
        self
    }

    /// ホストモジュールか
    pub fn is_host_module(&self, name: &str) -> bool {
        name.starts_with(&self.host_prefix)
    }

    fn lookup(&self, name: &str) -> Option<&FeatureModule<H>> {
        self.catalog.iter().find(|module| module.name == name)
    }

    /// インストール済みモジュールを走査し、各 `api` をレジストリへ登録させる
    ///
    /// 同名モジュールは最初の1回だけ読み込む。失敗したモジュール以降は走査しない。
    pub fn discover(
        &self,
        installed: &[String],
        registry: &mut EndpointRegistry<H>,
    ) -> Result<DiscoveryReport, DiscoveryError> {
        let mut report = DiscoveryReport::default();
        let mut seen = HashSet::new();

        for name in installed {
            if !seen.insert(name.as_str()) {
                continue;
            }
            if self.is_host_module(name) {
                tracing::debug!(module = %name, "Skipping host module");
                report.host_modules.push(name.clone());
                continue;
            }

            let module = self
                .lookup(name)
                .ok_or_else(|| DiscoveryError::UnknownModule(name.clone()))?;

            let Some(load) = module.api else {
                tracing::debug!(module = %name, "Module has no api, skipping");
                report.without_api.push(name.clone());
                continue;
            };

            let before = registry.len();
            load(registry).map_err(|err| match err.downcast::<RegistryError>() {
                Ok(registry_error) => DiscoveryError::Registry(registry_error),
                Err(other) => DiscoveryError::ModuleLoad {
                    module: name.clone(),
                    source: other.into(),
                },
            })?;

            tracing::info!(
                module = %name,
                endpoints = registry.len() - before,
                "Loaded module api"
            );
            report.loaded.push(name.clone());
        }

        Ok(report)
    }

    /// 探索を実行し、封印済みのルートテーブルを返す
    pub fn activate(&self, installed: &[String]) -> Result<RouteTable<H>, DiscoveryError> {
        let mut registry = EndpointRegistry::new();
        let report = self.discover(installed, &mut registry)?;
        tracing::info!(
            modules = report.loaded.len(),
            routes = registry.len(),
            "Endpoint discovery completed"
        );
        Ok(registry.seal())
    }
}
