//! ビュー名からURLパスセグメントへの変換
//!
//! `QuestionChoiceView` → `question_choice` のように、末尾の `View` を除去してから
//! CamelCase を snake_case に変換する。既存URLとの互換性のため、区切り挿入は
//! 2段階の正規表現置換の出力をそのまま再現する（連続大文字の扱いも含む）。

use once_cell::sync::Lazy;
use regex::Regex;

/// ビュー名の慣習的なサフィックス
pub const VIEW_SUFFIX: &str = "View";

/// 1段目: 大文字+小文字列で始まる語の前に区切りを入れる（`ABCFoo` → `ABC_Foo`）
static WORD_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"(.)([A-Z][a-z]+)").unwrap());

/// 2段目: 小文字・数字の直後の大文字の前に区切りを入れる（`fooBar` → `foo_Bar`）
static LOWER_UPPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").unwrap());

/// CamelCase を snake_case に変換する
///
/// 区切りの挿入対象はASCII大文字のみ。非ASCII文字は区切りを入れずに小文字化だけ行う。
pub fn camel_to_snake(name: &str) -> String {
    let name = WORD_START.replace_all(name, "${1}_${2}");
    let name = LOWER_UPPER.replace_all(&name, "${1}_${2}");
    name.to_lowercase()
}

/// ビュー名からパスセグメントを導出する
///
/// 末尾の `View` を1つだけ除去してから [`camel_to_snake`] を適用する。
///
/// # Example
/// ```
/// use survey_server::registry::naming::derive_path_segment;
///
/// assert_eq!(derive_path_segment("QuestionChoiceView"), "question_choice");
/// assert_eq!(derive_path_segment("OAuthTokenView"), "o_auth_token");
/// ```
pub fn derive_path_segment(view_name: &str) -> String {
    let stem = view_name.strip_suffix(VIEW_SUFFIX).unwrap_or(view_name);
    camel_to_snake(stem)
}
