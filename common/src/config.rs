//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to deprecated variable names with warning logs, and the server settings
//! assembled from them.

/// ホストフレームワーク自身のモジュールを示す名前プレフィックス
///
/// このプレフィックスを持つモジュールはエンドポイント探索の対象外
pub const HOST_MODULE_PREFIX: &str = "host.";

/// Get an environment variable with fallback to a deprecated name
///
/// If the new variable name is set, returns its value.
/// If only the old (deprecated) variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Example
/// ```
/// use survey_common::config::get_env_with_fallback;
///
/// let port = get_env_with_fallback("SURVEY_PORT", "PORT");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Returns `default` if neither variable is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// カンマ区切りのモジュール一覧を分解する（空要素と前後の空白は除去）
pub fn parse_module_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// サーバー設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyConfig {
    /// ホストアドレス (デフォルト: "0.0.0.0")
    pub host: String,

    /// ポート番号 (デフォルト: 8000)
    pub port: u16,

    /// データベースURL (デフォルト: "sqlite://data/survey.db")
    pub database_url: String,

    /// APIのマウントプレフィックス (デフォルト: "api")
    pub api_prefix: String,

    /// インストール済みモジュール（探索順）
    pub installed_modules: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_database_url() -> String {
    "sqlite://data/survey.db".to_string()
}

fn default_api_prefix() -> String {
    "api".to_string()
}

fn default_installed_modules() -> Vec<String> {
    vec![
        "host.docs".to_string(),
        "server".to_string(),
        "survey".to_string(),
    ]
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            api_prefix: default_api_prefix(),
            installed_modules: default_installed_modules(),
        }
    }
}

impl SurveyConfig {
    /// 環境変数から設定を読み込む（未設定の項目はデフォルト値）
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let installed_modules =
            get_env_with_fallback("SURVEY_INSTALLED_MODULES", "INSTALLED_APPS")
                .map(|value| parse_module_list(&value))
                .unwrap_or(defaults.installed_modules);
        let api_prefix = get_env_with_fallback_or("SURVEY_API_PREFIX", "API_PREFIX", "api")
            .trim_matches('/')
            .to_string();

        Self {
            host: get_env_with_fallback_or("SURVEY_HOST", "HOST", &defaults.host),
            port: get_env_with_fallback_parse("SURVEY_PORT", "PORT", defaults.port),
            database_url: get_env_with_fallback_or(
                "SURVEY_DATABASE_URL",
                "DATABASE_URL",
                &defaults.database_url,
            ),
            api_prefix,
            installed_modules,
        }
    }

    /// バインドアドレス（host:port）
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
