//! レコード編集モデル
//!
//! `LexicalRecord` とカーソル（読み・品詞・例文の位置）を1つにまとめ、
//! 追加・削除・移動のたびにカーソルを有効範囲へ戻す。
//!
//! 不変条件:
//! - 読み・品詞・例文はどの階層も常に1件以上
//! - カーソルは常に各コレクションの範囲内
//! - 上位階層が変わったら下位のカーソルは0に戻る

use crate::error::{Error, Result};
use crate::field::{Field, FormSnapshot};
use crate::types::{Direction, Entry, Example, LexicalRecord, Level, Pronunciation};

/// 編集位置（セッション内のみ、保存しない）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub pronunciation: usize,
    pub entry: usize,
    pub example: usize,
}

impl Cursor {
    fn get(&self, level: Level) -> usize {
        match level {
            Level::Pronunciation => self.pronunciation,
            Level::Entry => self.entry,
            Level::Example => self.example,
        }
    }

    /// 指定階層を設定し、下位階層を0に戻す
    fn set(&mut self, level: Level, index: usize) {
        match level {
            Level::Pronunciation => {
                self.pronunciation = index;
                self.entry = 0;
                self.example = 0;
            }
            Level::Entry => {
                self.entry = index;
                self.example = 0;
            }
            Level::Example => self.example = index,
        }
    }
}

/// レコード + カーソル
#[derive(Debug, Clone)]
pub struct RecordEditor {
    record: LexicalRecord,
    cursor: Cursor,
}

impl RecordEditor {
    /// カーソルを (0,0,0) にして編集を開始
    pub fn new(mut record: LexicalRecord) -> Self {
        record.reseed_empty();
        debug_assert!(record.is_well_formed());
        Self {
            record,
            cursor: Cursor::default(),
        }
    }

    pub fn record(&self) -> &LexicalRecord {
        &self.record
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn current_pronunciation(&self) -> &Pronunciation {
        &self.record.pronunciations[self.cursor.pronunciation]
    }

    pub fn current_entry(&self) -> &Entry {
        &self.current_pronunciation().entries[self.cursor.entry]
    }

    pub fn current_example(&self) -> &Example {
        &self.current_entry().examples[self.cursor.example]
    }

    fn pronunciation_mut(&mut self) -> &mut Pronunciation {
        &mut self.record.pronunciations[self.cursor.pronunciation]
    }

    fn entry_mut(&mut self) -> &mut Entry {
        let entry = self.cursor.entry;
        &mut self.pronunciation_mut().entries[entry]
    }

    fn example_mut(&mut self) -> &mut Example {
        let example = self.cursor.example;
        &mut self.entry_mut().examples[example]
    }

    /// 選択中の親に属するコレクションの件数
    pub fn count(&self, level: Level) -> usize {
        match level {
            Level::Pronunciation => self.record.pronunciations.len(),
            Level::Entry => self.current_pronunciation().entries.len(),
            Level::Example => self.current_entry().examples.len(),
        }
    }

    /// 現在位置（0始まり）
    pub fn position(&self, level: Level) -> usize {
        self.cursor.get(level)
    }

    /// "2/3" 形式のページ表示
    pub fn page_label(&self, level: Level) -> String {
        format!("{}/{}", self.position(level) + 1, self.count(level))
    }

    /// カーソルを±1移動（端では何もしない）
    ///
    /// 移動したら `true`。
    pub fn navigate(&mut self, level: Level, direction: Direction) -> bool {
        let current = self.cursor.get(level);
        let last = self.count(level) - 1;
        let target = match direction {
            Direction::Previous if current > 0 => current - 1,
            Direction::Next if current < last => current + 1,
            _ => return false,
        };
        self.cursor.set(level, target);
        true
    }

    pub fn next(&mut self, level: Level) -> bool {
        self.navigate(level, Direction::Next)
    }

    pub fn previous(&mut self, level: Level) -> bool {
        self.navigate(level, Direction::Previous)
    }

    /// 選択中の親へ既定値の要素を追加し、カーソルを移す
    pub fn add(&mut self, level: Level) -> usize {
        let new_index = match level {
            Level::Pronunciation => {
                self.record.pronunciations.push(Pronunciation::default());
                self.record.pronunciations.len() - 1
            }
            Level::Entry => {
                let entries = &mut self.pronunciation_mut().entries;
                entries.push(Entry::default());
                entries.len() - 1
            }
            Level::Example => {
                let examples = &mut self.entry_mut().examples;
                examples.push(Example::default());
                examples.len() - 1
            }
        };
        self.cursor.set(level, new_index);
        new_index
    }

    /// 品詞・例文を削除
    ///
    /// 親コレクションが1件のみなら `Error::LastElement` を返し、何も変更しない。
    /// 読みの削除は `delete_pronunciation` を使う。
    pub fn delete(&mut self, level: Level) -> Result<()> {
        let index = self.cursor.get(level);
        match level {
            Level::Pronunciation => {
                self.delete_pronunciation();
                return Ok(());
            }
            _ if self.count(level) <= 1 => return Err(Error::LastElement(level)),
            Level::Entry => {
                self.pronunciation_mut().entries.remove(index);
            }
            Level::Example => {
                self.entry_mut().examples.remove(index);
            }
        }
        let clamped = index.min(self.count(level) - 1);
        self.cursor.set(level, clamped);
        debug_assert!(self.record.is_well_formed());
        Ok(())
    }

    /// 選択中の読みを削除して返す
    ///
    /// 最後の1件を削除した場合は既定値の読みを1件補う。
    /// 添付ファイルの削除は呼び出し側の責務。
    pub fn delete_pronunciation(&mut self) -> Pronunciation {
        let index = self.cursor.pronunciation;
        let removed = self.record.pronunciations.remove(index);
        if self.record.pronunciations.is_empty() {
            self.record.pronunciations.push(Pronunciation::default());
        }
        let clamped = index.min(self.record.pronunciations.len() - 1);
        self.cursor.set(Level::Pronunciation, clamped);
        debug_assert!(self.record.is_well_formed());
        removed
    }

    /// カーソル位置の項目値
    pub fn get_field(&self, field: Field) -> String {
        match field {
            Field::Annotator => self.record.annotator.clone(),
            Field::PageNumber => self.record.page_info.page_num.clone(),
            Field::WordNumber => self.record.page_info.word_num.clone(),
            Field::SimplifiedCharacter => self.record.simplified_chinese_character.clone(),
            Field::Spelling => self.current_pronunciation().spelling.clone(),
            Field::Ipa => self.current_pronunciation().ipa.clone(),
            Field::DialectType => self.current_pronunciation().dialect_type.to_string(),
            Field::PartOfSpeech => self.current_entry().part_of_speech.clone(),
            Field::Meaning => self.current_entry().meaning.clone(),
            Field::ExampleZhuang => self.current_example().zhuang.clone(),
            Field::ExampleChinese => self.current_example().chinese.clone(),
        }
    }

    /// カーソル位置の項目へ書き込む
    ///
    /// 方言フラグのみ整数へ変換する。それ以外は検証しない。
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<()> {
        match field {
            Field::Annotator => self.record.annotator = value.to_string(),
            Field::PageNumber => self.record.page_info.page_num = value.to_string(),
            Field::WordNumber => self.record.page_info.word_num = value.to_string(),
            Field::SimplifiedCharacter => {
                self.record.simplified_chinese_character = value.to_string()
            }
            Field::Spelling => self.pronunciation_mut().spelling = value.to_string(),
            Field::Ipa => self.pronunciation_mut().ipa = value.to_string(),
            Field::DialectType => {
                let flag = value
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| Error::InvalidDialectType(value.to_string()))?;
                self.pronunciation_mut().dialect_type = flag;
            }
            Field::PartOfSpeech => self.entry_mut().part_of_speech = value.to_string(),
            Field::Meaning => self.entry_mut().meaning = value.to_string(),
            Field::ExampleZhuang => self.example_mut().zhuang = value.to_string(),
            Field::ExampleChinese => self.example_mut().chinese = value.to_string(),
        }
        Ok(())
    }

    /// 現在のカーソル位置からフォーム値を作る
    pub fn form(&self) -> FormSnapshot {
        let mut form = FormSnapshot::default();
        for field in Field::ALL {
            form.set(field, self.get_field(field));
        }
        form
    }

    /// フォーム値をまとめてモデルへ反映
    ///
    /// 方言フラグが不正な場合は何も書き込まない。
    pub fn apply_form(&mut self, form: &FormSnapshot) -> Result<()> {
        let dialect = form.get(Field::DialectType);
        if dialect.trim().parse::<i32>().is_err() {
            return Err(Error::InvalidDialectType(dialect.to_string()));
        }
        for field in Field::ALL {
            self.set_field(field, form.get(field))?;
        }
        Ok(())
    }

    /// 選択中の読みに未確定の添付画像を設定
    pub fn set_pending_attachment(&mut self, path: impl Into<String>) {
        self.pronunciation_mut().attachment_pending_path = path.into();
    }

    /// 全読みの可変参照（添付確定用）
    pub fn pronunciations_mut(&mut self) -> impl Iterator<Item = &mut Pronunciation> {
        self.record.pronunciations.iter_mut()
    }
}
