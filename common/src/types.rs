//! 辞書レコードの型定義
//!
//! 1枚のページ画像につき1件の `LexicalRecord` を持つ。
//! 階層: レコード → 読み(pronunciations) → 品詞(entries) → 例文(examples)
//!
//! JSONのキー名は既存のサイドカーファイルと互換。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ページ情報（自由入力、数値チェックなし）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageInfo {
    pub page_num: String,
    pub word_num: String,
}

/// 例文
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Example {
    #[serde(rename = "壮文")]
    pub zhuang: String,

    #[serde(rename = "中文")]
    pub chinese: String,
}

/// 品詞ごとの語義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entry {
    pub part_of_speech: String,
    pub meaning: String,
    pub examples: Vec<Example>,
}

impl Default for Entry {
    fn default() -> Self {
        Self {
            part_of_speech: String::new(),
            meaning: String::new(),
            examples: vec![Example::default()],
        }
    }
}

/// 読み
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pronunciation {
    #[serde(rename = "zhuang_spelling")]
    pub spelling: String,

    pub ipa: String,

    /// 方言フラグ (0/1)
    pub dialect_type: i32,

    /// 未確定の添付画像パス（スクリーンショット・インポート）
    #[serde(rename = "imported_source_path")]
    pub attachment_pending_path: String,

    /// 最後に確定した添付画像パス
    #[serde(rename = "old_image_path")]
    pub attachment_committed_path: String,

    /// 確定済みファイル名（表示は末尾のみ）
    #[serde(rename = "imported_image")]
    pub attachment_images: Vec<String>,

    pub entries: Vec<Entry>,
}

impl Default for Pronunciation {
    fn default() -> Self {
        Self {
            spelling: String::new(),
            ipa: String::new(),
            dialect_type: 0,
            attachment_pending_path: String::new(),
            attachment_committed_path: String::new(),
            attachment_images: Vec::new(),
            entries: vec![Entry::default()],
        }
    }
}

impl Pronunciation {
    /// 未確定の添付があるか
    pub fn has_pending_attachment(&self) -> bool {
        !self.attachment_pending_path.is_empty()
            && self.attachment_pending_path != self.attachment_committed_path
    }

    /// 表示対象の確定済み画像（末尾）
    pub fn latest_image(&self) -> Option<&str> {
        self.attachment_images.last().map(|s| s.as_str())
    }
}

/// 1ページ分の辞書レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalRecord {
    /// 元画像のファイル名
    pub image: String,

    pub annotator: String,

    pub page_info: PageInfo,

    #[serde(rename = "simplified_Chinese_character")]
    pub simplified_chinese_character: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofread: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofread_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_wrong: Option<String>,

    pub pronunciations: Vec<Pronunciation>,

    /// 未知のキー（読み書きで保持する）
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for LexicalRecord {
    fn default() -> Self {
        Self {
            image: String::new(),
            annotator: String::new(),
            page_info: PageInfo::default(),
            simplified_chinese_character: String::new(),
            proofread: None,
            proofread_by: None,
            is_wrong: None,
            pronunciations: vec![Pronunciation::default()],
            extra: BTreeMap::new(),
        }
    }
}

impl LexicalRecord {
    /// 新規テンプレート
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Default::default()
        }
    }

    /// 空のコレクションを既定値1件で補う
    ///
    /// 読み込んだサイドカーが空配列を含んでいても、
    /// カーソルが常に有効な要素を指せるようにする。
    pub fn reseed_empty(&mut self) {
        if self.pronunciations.is_empty() {
            self.pronunciations.push(Pronunciation::default());
        }
        for pron in &mut self.pronunciations {
            if pron.entries.is_empty() {
                pron.entries.push(Entry::default());
            }
            for entry in &mut pron.entries {
                if entry.examples.is_empty() {
                    entry.examples.push(Example::default());
                }
            }
        }
    }

    /// 校正用フィールドを除いたコピー（比較用）
    pub fn without_proofread_fields(&self) -> Self {
        Self {
            proofread: None,
            proofread_by: None,
            is_wrong: None,
            ..self.clone()
        }
    }

    /// すべての階層が1件以上あるか
    pub fn is_well_formed(&self) -> bool {
        !self.pronunciations.is_empty()
            && self.pronunciations.iter().all(|p| {
                !p.entries.is_empty() && p.entries.iter().all(|e| !e.examples.is_empty())
            })
    }
}

/// カーソル階層
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Pronunciation,
    Entry,
    Example,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Pronunciation => write!(f, "読み"),
            Level::Entry => write!(f, "品詞"),
            Level::Example => write!(f, "例文"),
        }
    }
}

/// 移動方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}
