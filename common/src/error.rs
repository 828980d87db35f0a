//! エラー型定義

use crate::types::Level;
use thiserror::Error;

/// レコードモデルのエラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// サイドカーJSONが1要素の配列でない
    #[error("サイドカー形式が不正: {0}")]
    InvalidSidecar(String),

    /// 最後の1件は削除できない（読みは除く）
    #[error("{0}は最後の1件のため削除できません")]
    LastElement(Level),

    /// 方言フラグが整数でない
    #[error("方言フラグは整数で指定してください: {0}")]
    InvalidDialectType(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
