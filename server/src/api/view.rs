//! APIビュー
//!
//! 各機能モジュールはビュー型を定義し、`register::<V>()` でレジストリに登録する。
//! パスはビュー名から導出されるが、`URL` を指定すればそちらが優先される。

use axum::routing::MethodRouter;

use crate::registry::{EndpointRegistry, RegistryError};
use crate::AppState;

/// ルートテーブルに格納されるハンドラー
#[derive(Clone)]
pub struct ViewEndpoint {
    /// メソッドごとのハンドラー
    pub router: MethodRouter<AppState>,
    /// 受け付けるHTTPメソッド（小文字、OpenAPI文書用）
    pub methods: &'static [&'static str],
    /// 概要（OpenAPI文書用）
    pub summary: &'static str,
}

impl std::fmt::Debug for ViewEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewEndpoint")
            .field("methods", &self.methods)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

/// APIビュー
pub trait ApiView {
    /// 明示的なパスセグメント（未指定ならビュー名から導出）
    const URL: Option<&'static str> = None;

    /// 受け付けるHTTPメソッド
    const METHODS: &'static [&'static str];

    /// 概要
    const SUMMARY: &'static str;

    /// メソッドごとのハンドラー
    fn router() -> MethodRouter<AppState>;

    /// ビュー名（既定では型名）
    fn view_name() -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    full.rsplit("::").next().unwrap_or(full)
}

/// ビューをレジストリへ登録する
pub fn register<V: ApiView>(registry: &mut EndpointRegistry<ViewEndpoint>) -> Result<(), RegistryError> {
    let endpoint = ViewEndpoint {
        router: V::router(),
        methods: V::METHODS,
        summary: V::SUMMARY,
    };
    registry.register(V::view_name(), V::URL, endpoint)?;
    Ok(())
}
