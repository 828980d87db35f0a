//! サイドカーJSONの読み書き
//!
//! 形式: レコード1件を含む配列。
//! 非ASCII文字はエスケープせず、2スペースインデントで出力する。

use crate::error::{Error, Result};
use crate::types::LexicalRecord;

/// サイドカーJSONをパース
///
/// 配列でない・空配列の場合はエラー。
/// 2件以上ある場合は先頭のみを使う。
///
/// # Examples
/// ```
/// use lexicon_common::parse_sidecar;
///
/// let record = parse_sidecar(r#"[{"image": "a.png"}]"#).unwrap();
/// assert_eq!(record.image, "a.png");
/// ```
pub fn parse_sidecar(content: &str) -> Result<LexicalRecord> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let serde_json::Value::Array(items) = value else {
        return Err(Error::InvalidSidecar("トップレベルが配列ではありません".into()));
    };
    let Some(first) = items.into_iter().next() else {
        return Err(Error::InvalidSidecar("配列が空です".into()));
    };
    if !first.is_object() {
        return Err(Error::InvalidSidecar("要素がオブジェクトではありません".into()));
    }
    let record: LexicalRecord = serde_json::from_value(first)?;
    Ok(record)
}

/// レコードをサイドカーJSON文字列へ変換
pub fn to_sidecar_json(record: &LexicalRecord) -> Result<String> {
    let json = serde_json::to_string_pretty(&[record])?;
    Ok(json)
}
