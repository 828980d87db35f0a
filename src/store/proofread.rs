//! 校正結果の保存
//!
//! 校正済みレコードは `proofread_file/` にのみ書き込み、`output/` には触れない。
//! 標準のサイドカーと比較して差分があれば `is_wrong = "1"`。

use super::{read_sidecar, write_sidecar, RecordStore};
use crate::error::{AnnotatorError, Result};
use lexicon_common::LexicalRecord;
use std::path::PathBuf;

/// 校正保存の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofreadOutcome {
    pub path: PathBuf,
    pub is_wrong: bool,
}

impl RecordStore {
    /// 校正フィールドを除いて標準サイドカーと比較
    ///
    /// 標準サイドカーが存在しない・読めない場合は差分ありとみなす。
    pub fn differs_from_output(&self, record: &LexicalRecord) -> bool {
        let path = self.output_path(&record.image);
        if !path.exists() {
            return true;
        }
        match read_sidecar(&path) {
            Ok(original) => original.without_proofread_fields() != record.without_proofread_fields(),
            Err(e) => {
                tracing::warn!("比較元を読めません、差分ありとして扱います: {}", e);
                true
            }
        }
    }

    /// 校正結果を `proofread_file/<名前>.json` へ保存
    pub fn save_proofread_override(
        &self,
        record: &LexicalRecord,
        proofreader: &str,
    ) -> Result<ProofreadOutcome> {
        let name = proofreader.trim();
        if name.is_empty() {
            return Err(AnnotatorError::Validation("校正者名を入力してください".into()));
        }

        let is_wrong = self.differs_from_output(record);
        let mut checked = record.clone();
        checked.proofread = Some("1".to_string());
        checked.proofread_by = Some(name.to_string());
        checked.is_wrong = Some(if is_wrong { "1" } else { "0" }.to_string());

        let path = self.proofread_path(&record.image);
        write_sidecar(&path, &checked)?;
        tracing::info!("校正結果を保存: {} (差分: {})", path.display(), is_wrong);

        Ok(ProofreadOutcome { path, is_wrong })
    }
}
