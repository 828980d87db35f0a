//! サイドカーレコードの保存先
//!
//! 読み込み優先順位:
//! 1. `proofread_file/<名前>.json`（校正済み）
//! 2. `output/<名前>.json`
//! 3. 新規テンプレート
//!
//! 保存は常に全体の上書き。

pub mod attachment;
pub mod proofread;

use crate::config::Layout;
use crate::error::{AnnotatorError, Result};
use lexicon_common::{parse_sidecar, to_sidecar_json, LexicalRecord, PageInfo};
use std::path::{Path, PathBuf};

/// ページをまたいで引き継ぐ値（注釈者・ページ情報）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarryOver {
    pub annotator: String,
    pub page_info: PageInfo,
}

impl CarryOver {
    pub fn from_record(record: &LexicalRecord) -> Self {
        Self {
            annotator: record.annotator.clone(),
            page_info: record.page_info.clone(),
        }
    }

    fn apply(&self, record: &mut LexicalRecord) {
        record.annotator = self.annotator.clone();
        record.page_info = self.page_info.clone();
    }
}

/// 読み込み元
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    Proofread,
    Output,
    Template,
}

impl std::fmt::Display for RecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordSource::Proofread => write!(f, "校正済み"),
            RecordSource::Output => write!(f, "保存済み"),
            RecordSource::Template => write!(f, "新規"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordStore {
    layout: Layout,
}

impl RecordStore {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// 画像名の拡張子を .json に替えたファイル名
    fn sidecar_name(image: &str) -> String {
        let stem = Path::new(image)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| image.to_string());
        format!("{}.json", stem)
    }

    pub fn output_path(&self, image: &str) -> PathBuf {
        self.layout.output_dir().join(Self::sidecar_name(image))
    }

    pub fn proofread_path(&self, image: &str) -> PathBuf {
        self.layout.proofread_dir().join(Self::sidecar_name(image))
    }

    /// 画像に対応するレコードを読み込む
    ///
    /// サイドカーの注釈者・ページ情報は使わず、`carry` の値で上書きする。
    pub fn load_record(&self, image_path: &Path, carry: &CarryOver) -> Result<(LexicalRecord, RecordSource)> {
        let image = image_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| AnnotatorError::NotFound(image_path.display().to_string()))?;

        let candidates = [
            (self.proofread_path(&image), RecordSource::Proofread),
            (self.output_path(&image), RecordSource::Output),
        ];

        for (path, source) in candidates {
            if !path.exists() {
                continue;
            }
            let mut record = read_sidecar(&path)?;
            record.reseed_empty();
            carry.apply(&mut record);
            tracing::debug!("{}を読み込み: {}", source, path.display());
            return Ok((record, source));
        }

        let mut record = LexicalRecord::new(image);
        carry.apply(&mut record);
        Ok((record, RecordSource::Template))
    }

    /// `output/<名前>.json` へ保存
    pub fn save_record(&self, record: &LexicalRecord) -> Result<PathBuf> {
        let path = self.output_path(&record.image);
        write_sidecar(&path, record)?;
        tracing::info!("保存: {}", path.display());
        Ok(path)
    }

    /// サイドカーの有無
    pub fn sidecar_status(&self, image: &str) -> (bool, bool) {
        (self.output_path(image).exists(), self.proofread_path(image).exists())
    }
}

/// サイドカーを読み込む
pub(crate) fn read_sidecar(path: &Path) -> Result<LexicalRecord> {
    let content = std::fs::read_to_string(path)?;
    parse_sidecar(&content).map_err(|e| AnnotatorError::Serialization {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// サイドカーを書き込む（ディレクトリがなければ作成）
pub(crate) fn write_sidecar(path: &Path, record: &LexicalRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = to_sidecar_json(record)?;
    std::fs::write(path, json)?;
    Ok(())
}
