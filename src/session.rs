//! 注釈セッション
//!
//! 現在のページ番号と編集中レコードを保持し、ページ移動・送信・校正を
//! `RecordStore` と `RecordEditor` の間で順序立てて実行する。
//!
//! 表示層はこの型の戻り値から再描画するだけで、レコードを直接持たない。
//! 送信せずにページを移動すると編集内容は破棄される。

use crate::config::{Config, Layout};
use crate::error::{AnnotatorError, Result};
use crate::scanner::{self, ImageInfo};
use crate::store::proofread::ProofreadOutcome;
use crate::store::{CarryOver, RecordSource, RecordStore};
use lexicon_common::{Field, FormSnapshot, Level, RecordEditor};
use std::path::{Path, PathBuf};

pub struct Session {
    store: RecordStore,
    images: Vec<ImageInfo>,
    index: usize,
    editor: RecordEditor,
    source: RecordSource,
}

impl Session {
    /// 作業フォルダを開き、前回のページを表示する
    ///
    /// 並び順を取得できない画像は警告を出して除外する。
    pub fn open(layout: Layout) -> Result<Self> {
        Self::open_at(layout, None)
    }

    /// 作業フォルダを開く
    ///
    /// `page`（1始まり）を指定した場合はそのページを開き、読み込めなければエラー。
    /// 省略時は前回のページを開き、読み込めなければ先頭から順に読めるページを探す。
    pub fn open_at(layout: Layout, page: Option<&str>) -> Result<Self> {
        let scan = scanner::scan_source_images(&layout.image_dir())?;
        for name in &scan.skipped {
            tracing::warn!("ファイル名の形式が不正のため除外: {}", name);
        }
        let store = RecordStore::new(layout);

        match page {
            Some(input) => {
                let index = parse_page_number(input, scan.images.len())?;
                Self::start(store, scan.images, [index])
            }
            None => {
                let config = Config::load(store.layout());
                let start = if config.last_index < scan.images.len() {
                    config.last_index
                } else {
                    0
                };
                Self::with_images(store, scan.images, start)
            }
        }
    }

    /// 画像一覧を指定して開く
    ///
    /// `start` が読み込めない場合は先頭から順に読めるページを開く。
    pub fn with_images(store: RecordStore, images: Vec<ImageInfo>, start: usize) -> Result<Self> {
        let fallback: Vec<usize> = (0..images.len()).filter(|&i| i != start).collect();
        Self::start(store, images, std::iter::once(start).chain(fallback))
    }

    /// 候補のページを順に試し、最初に読み込めたページで開始する
    fn start(
        store: RecordStore,
        images: Vec<ImageInfo>,
        candidates: impl IntoIterator<Item = usize>,
    ) -> Result<Self> {
        let mut last_error = None;

        for index in candidates {
            let Some(image) = images.get(index) else {
                continue;
            };
            match store.load_record(&image.path, &CarryOver::default()) {
                Ok((record, source)) => {
                    tracing::info!("ページ {}/{} を開きました: {}", index + 1, images.len(), image.file_name);
                    return Ok(Self {
                        store,
                        images,
                        index,
                        editor: RecordEditor::new(record),
                        source,
                    });
                }
                Err(e) => {
                    tracing::error!("ページの読み込みに失敗 ({}): {}", image.file_name, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AnnotatorError::NotFound(format!(
                "{} に画像がありません",
                store.layout().image_dir().display()
            ))
        }))
    }

    pub fn page_count(&self) -> usize {
        self.images.len()
    }

    /// 現在のページ（0始まり）
    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_image(&self) -> &ImageInfo {
        &self.images[self.index]
    }

    pub fn record_source(&self) -> RecordSource {
        self.source
    }

    pub fn editor(&self) -> &RecordEditor {
        &self.editor
    }

    /// 見出し: "<画像名> (第k页/共N页)"
    pub fn title(&self) -> String {
        format!(
            "{} (第{}页/共{}页)",
            self.editor.record().image,
            self.index + 1,
            self.page_count()
        )
    }

    /// 指定ページを読み込む
    ///
    /// 読み込みに失敗した場合は現在のページをそのまま残す。
    pub fn open_page(&mut self, index: usize) -> Result<()> {
        let Some(image) = self.images.get(index) else {
            return Err(AnnotatorError::PageOutOfRange {
                input: index as i64 + 1,
                max: self.page_count(),
            });
        };

        let carry = CarryOver::from_record(self.editor.record());
        let (record, source) = self.store.load_record(&image.path, &carry).map_err(|e| {
            tracing::error!("ページの読み込みに失敗 ({}): {}", image.file_name, e);
            e
        })?;

        self.index = index;
        self.editor = RecordEditor::new(record);
        self.source = source;
        tracing::debug!("ページ {} を開きました ({})", index + 1, source);
        Ok(())
    }

    /// 前のページ（先頭では何もしない）
    pub fn goto_previous(&mut self) -> Result<bool> {
        if self.index == 0 {
            return Ok(false);
        }
        self.open_page(self.index - 1)?;
        Ok(true)
    }

    /// 次のページ（末尾では何もしない）
    pub fn goto_next(&mut self) -> Result<bool> {
        if self.index + 1 >= self.page_count() {
            return Ok(false);
        }
        self.open_page(self.index + 1)?;
        Ok(true)
    }

    /// 1始まりのページ番号で移動
    pub fn jump_to_page(&mut self, input: &str) -> Result<()> {
        let index = parse_page_number(input, self.page_count())?;
        self.open_page(index)
    }

    // --- 表示層向けの操作 ---

    pub fn count(&self, level: Level) -> usize {
        self.editor.count(level)
    }

    pub fn position(&self, level: Level) -> usize {
        self.editor.position(level)
    }

    pub fn next(&mut self, level: Level) -> bool {
        self.editor.next(level)
    }

    pub fn previous(&mut self, level: Level) -> bool {
        self.editor.previous(level)
    }

    pub fn add(&mut self, level: Level) -> usize {
        self.editor.add(level)
    }

    /// 選択中の要素を削除
    ///
    /// 読みを削除した場合は、その添付ファイルも片付ける。
    pub fn delete(&mut self, level: Level) -> Result<()> {
        if level == Level::Pronunciation {
            let removed = self.editor.delete_pronunciation();
            self.store.discard_attachment(&removed);
            return Ok(());
        }
        self.editor.delete(level)?;
        Ok(())
    }

    pub fn get_field(&self, field: Field) -> String {
        self.editor.get_field(field)
    }

    pub fn set_field(&mut self, field: Field, value: &str) -> Result<()> {
        self.editor.set_field(field, value)?;
        Ok(())
    }

    /// 入力中のフォーム値をモデルへ反映
    pub fn commit_form(&mut self, form: &FormSnapshot) -> Result<()> {
        self.editor.apply_form(form)?;
        Ok(())
    }

    /// 選択中の読みに画像を添付（送信時に確定）
    pub fn attach_pending_image(&mut self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(AnnotatorError::NotFound(path.display().to_string()));
        }
        let stored = self.store.layout().relativize(path);
        tracing::debug!("添付予定: {}", stored);
        self.editor.set_pending_attachment(stored);
        Ok(())
    }

    /// フォームを反映し、添付を確定してから `output/` へ保存
    ///
    /// 添付の確定に失敗した場合はJSONを書き込まない。
    pub fn submit(&mut self, form: &FormSnapshot) -> Result<PathBuf> {
        self.commit_form(form)?;
        self.store.commit_attachments(self.editor.pronunciations_mut())?;
        self.store.save_record(self.editor.record())
    }

    /// フォームを反映し、添付を確定してから校正結果を保存
    pub fn proofread(&mut self, form: &FormSnapshot, proofreader: &str) -> Result<ProofreadOutcome> {
        if proofreader.trim().is_empty() {
            return Err(AnnotatorError::Validation("校正者名を入力してください".into()));
        }
        self.commit_form(form)?;
        self.store.commit_attachments(self.editor.pronunciations_mut())?;
        self.store.save_proofread_override(self.editor.record(), proofreader)
    }

    /// 現在のページを config.json に保存して終了
    pub fn shutdown(self) -> Result<()> {
        let config = Config { last_index: self.index };
        config.save(self.store.layout())?;
        tracing::info!("終了: 最終ページ {}", self.index + 1);
        Ok(())
    }
}

/// 1始まりのページ番号を検証して0始まりの位置を返す
///
/// 整数として読めない入力は `PageNotNumeric`、範囲外（負数・桁あふれを含む）は
/// `PageOutOfRange`。
pub fn parse_page_number(input: &str, page_count: usize) -> Result<usize> {
    let trimmed = input.trim();
    let number = match trimmed.parse::<i64>() {
        Ok(n) => n,
        Err(_) if is_integer_literal(trimmed) => {
            if trimmed.starts_with('-') {
                i64::MIN
            } else {
                i64::MAX
            }
        }
        Err(_) => return Err(AnnotatorError::PageNotNumeric(input.to_string())),
    };
    if number < 1 || number > page_count as i64 {
        return Err(AnnotatorError::PageOutOfRange {
            input: number,
            max: page_count,
        });
    }
    Ok(number as usize - 1)
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
