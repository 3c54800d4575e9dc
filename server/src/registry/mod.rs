//! エンドポイント登録管理
//!
//! 各機能モジュールが定義したビューをパスセグメントと対応付けて保持する。
//! 起動時の探索フェーズでのみ書き込み、[`EndpointRegistry::seal`] で
//! 読み取り専用の [`RouteTable`] に変換してからHTTP層へ渡す。

pub mod discovery;
pub mod naming;

use std::collections::HashMap;
use thiserror::Error;

/// エンドポイント登録エラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// 同じパスセグメントが既に登録されている
    #[error("api with <{path}> url already exist (registered by {existing}, rejected {candidate})")]
    DuplicateEndpoint {
        /// 衝突したパスセグメント
        path: String,
        /// 先に登録されたビュー名
        existing: String,
        /// 拒否されたビュー名
        candidate: String,
    },

    /// パスセグメントが空になった
    #[error("view {candidate} resolves to an empty url")]
    EmptyPath {
        /// 対象のビュー名
        candidate: String,
    },
}

/// 登録済みエンドポイント
#[derive(Debug, Clone)]
pub struct EndpointDefinition<H> {
    /// パスセグメント（レジストリ内で一意）
    pub path_segment: String,
    /// 登録元のビュー名
    pub view_name: String,
    /// リクエストを処理するハンドラー
    pub handler: H,
}

/// エンドポイントレジストリ
///
/// 挿入順を保持する。ルーティング自体は完全一致なので順序に依存しないが、
/// ルートテーブルの列挙順（ログ・OpenAPI文書・`routes` コマンド）は探索順になる。
#[derive(Debug)]
pub struct EndpointRegistry<H> {
    entries: Vec<EndpointDefinition<H>>,
    index: HashMap<String, usize>,
}

impl<H> EndpointRegistry<H> {
    /// 空のレジストリを作成
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// ハンドラーを登録する
    ///
    /// `explicit_path` が指定されていればそのまま使い、なければ `view_name` から
    /// [`naming::derive_path_segment`] で導出する。
    ///
    /// # Returns
    /// * `Ok(&str)` - 登録されたパスセグメント
    /// * `Err(RegistryError::DuplicateEndpoint)` - パスが既に使われている（起動を中止すべき）
    /// * `Err(RegistryError::EmptyPath)` - パスが空
    pub fn register(
        &mut self,
        view_name: &str,
        explicit_path: Option<&str>,
        handler: H,
    ) -> Result<&str, RegistryError> {
        // 空の明示パスは導出にフォールバックせず EmptyPath とする
        let path_segment = match explicit_path {
            Some(path) => path.to_string(),
            None => naming::derive_path_segment(view_name),
        };

        if path_segment.is_empty() {
            return Err(RegistryError::EmptyPath {
                candidate: view_name.to_string(),
            });
        }

        if let Some(&existing) = self.index.get(&path_segment) {
            return Err(RegistryError::DuplicateEndpoint {
                path: path_segment,
                existing: self.entries[existing].view_name.clone(),
                candidate: view_name.to_string(),
            });
        }

        tracing::debug!(view = view_name, path = %path_segment, "Registered endpoint");

        let position = self.entries.len();
        self.index.insert(path_segment.clone(), position);
        self.entries.push(EndpointDefinition {
            path_segment,
            view_name: view_name.to_string(),
            handler,
        });
        Ok(&self.entries[position].path_segment)
    }

    /// 登録済みの全ルートを登録順に返す
    pub fn all_routes(&self) -> Vec<(&str, &H)> {
        self.entries
            .iter()
            .map(|entry| (entry.path_segment.as_str(), &entry.handler))
            .collect()
    }

    /// パスセグメントが登録済みか
    pub fn contains(&self, path_segment: &str) -> bool {
        self.index.contains_key(path_segment)
    }

    /// 登録数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 探索フェーズを終了し、読み取り専用のルートテーブルに変換する
    ///
    /// レジストリは消費されるため、以降の登録はできない。
    pub fn seal(self) -> RouteTable<H> {
        RouteTable {
            entries: self.entries,
        }
    }
}

impl<H> Default for EndpointRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// 封印済みのルートテーブル
///
/// 生成後は変更されないため、HTTP層のワーカー間で読み取り専用に共有できる。
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    entries: Vec<EndpointDefinition<H>>,
}

impl<H> RouteTable<H> {
    /// 登録順のエンドポイント定義
    pub fn entries(&self) -> &[EndpointDefinition<H>] {
        &self.entries
    }

    /// 登録順のパスセグメント
    pub fn paths(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.path_segment.as_str())
            .collect()
    }

    /// パスセグメントでハンドラーを取得
    pub fn get(&self, path_segment: &str) -> Option<&H> {
        self.entries
            .iter()
            .find(|entry| entry.path_segment == path_segment)
            .map(|entry| &entry.handler)
    }

    /// エンドポイント数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H> IntoIterator for RouteTable<H> {
    type Item = EndpointDefinition<H>;
    type IntoIter = std::vec::IntoIter<EndpointDefinition<H>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
