//! 添付画像の確定・削除
//!
//! 未確定の画像（切り抜き・インポート）を `output_image/` へ移し、
//! `<読み>_<タイムスタンプ><拡張子>` の名前で記録する。

use super::RecordStore;
use crate::error::{AnnotatorError, Result};
use chrono::Local;
use lexicon_common::Pronunciation;
use regex::Regex;
use std::path::Path;

lazy_static::lazy_static! {
    // ファイル名に使えない文字
    static ref FORBIDDEN_RE: Regex = Regex::new(r#"[\\/*?:"<>|]"#).unwrap();
}

/// ファイル名に使えない文字を除去
pub fn sanitize_name(name: &str) -> String {
    FORBIDDEN_RE.replace_all(name, "").to_string()
}

/// 確定後のファイル名を生成
///
/// 読みが空なら `unnamed`、拡張子がなければ `.jpg`。
pub fn attachment_file_name(spelling: &str, source: &Path, timestamp: &str) -> String {
    let clean = sanitize_name(spelling);
    let name = if clean.trim().is_empty() { "unnamed" } else { clean.as_str() };
    let ext = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_else(|| ".jpg".to_string());
    format!("{}_{}{}", name, timestamp, ext)
}

fn timestamp() -> String {
    Local::now().format("%Y%m%d%H%M%S%6f").to_string()
}

/// 移動（デバイスをまたぐ場合はコピー後に削除）
fn move_file(source: &Path, dest: &Path) -> std::io::Result<()> {
    if std::fs::rename(source, dest).is_ok() {
        return Ok(());
    }
    std::fs::copy(source, dest)?;
    std::fs::remove_file(source)
}

/// 削除（失敗はログのみ）
fn remove_quietly(path: &Path) {
    if !path.exists() {
        return;
    }
    match std::fs::remove_file(path) {
        Ok(()) => tracing::info!("旧ファイルを削除: {}", path.display()),
        Err(e) => tracing::warn!("旧ファイルの削除に失敗 ({}): {}", path.display(), e),
    }
}

impl RecordStore {
    /// 1件の読みの添付画像を確定する
    ///
    /// 未確定パスが前回確定パスと同じなら何もしない（`None`）。
    /// 失敗時はその読みの添付フィールドを変更しない。
    pub fn commit_attachment(&self, pron: &mut Pronunciation) -> Result<Option<String>> {
        if pron.attachment_pending_path.is_empty()
            || pron.attachment_pending_path == pron.attachment_committed_path
        {
            return Ok(None);
        }

        let layout = self.layout();
        let source = layout.resolve(&pron.attachment_pending_path);
        if !source.is_file() {
            return Err(AnnotatorError::NotFound(format!(
                "{} (読み: {})",
                pron.attachment_pending_path, pron.spelling
            )));
        }

        let fail = |reason: std::io::Error| AnnotatorError::Attachment {
            spelling: pron.spelling.clone(),
            source_path: pron.attachment_pending_path.clone(),
            reason,
        };

        let dir = layout.attachment_dir();
        std::fs::create_dir_all(&dir).map_err(fail)?;

        let stamp = timestamp();
        let mut file_name = attachment_file_name(&pron.spelling, &source, &stamp);
        let mut suffix = 1;
        while dir.join(&file_name).exists() {
            file_name = attachment_file_name(&pron.spelling, &source, &format!("{}_{}", stamp, suffix));
            suffix += 1;
        }
        let dest = dir.join(&file_name);

        if layout.is_session_temporary(&source) {
            move_file(&source, &dest).map_err(fail)?;
        } else {
            std::fs::copy(&source, &dest).map(|_| ()).map_err(fail)?;
        }
        tracing::debug!("添付を確定: {} -> {}", source.display(), dest.display());

        let dest_str = layout.relativize(&dest);
        let previous = std::mem::replace(&mut pron.attachment_committed_path, dest_str.clone());
        pron.attachment_pending_path = dest_str;
        pron.attachment_images.push(file_name.clone());

        if !previous.is_empty() {
            let previous_path = layout.resolve(&previous);
            if previous_path != dest {
                remove_quietly(&previous_path);
            }
        }

        Ok(Some(file_name))
    }

    /// 全ての読みの添付を確定する
    ///
    /// 途中で失敗した場合、それ以前に確定した読みは元に戻さない。
    pub fn commit_attachments<'a>(
        &self,
        pronunciations: impl IntoIterator<Item = &'a mut Pronunciation>,
    ) -> Result<usize> {
        let mut committed = 0;
        for pron in pronunciations {
            if self.commit_attachment(pron)?.is_some() {
                committed += 1;
            }
        }
        Ok(committed)
    }

    /// 削除された読みの添付ファイルを片付ける
    ///
    /// 作業フォルダ管理下（output_image/, temp/）のファイルのみ削除する。
    pub fn discard_attachment(&self, pron: &Pronunciation) {
        let layout = self.layout();
        for stored in [&pron.attachment_pending_path, &pron.attachment_committed_path] {
            if stored.is_empty() {
                continue;
            }
            let path = layout.resolve(stored);
            if layout.is_managed(&path) {
                remove_quietly(&path);
            } else {
                tracing::debug!("管理外のファイルは残します: {}", path.display());
            }
        }
    }
}
