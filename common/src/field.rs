//! フォーム項目の識別子とフォーム値
//!
//! 文字列キーではなく列挙型で項目を指定し、カーソル位置に応じて
//! 読み・品詞・例文のいずれかへ解決する。

/// 編集可能な項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Annotator,
    PageNumber,
    WordNumber,
    SimplifiedCharacter,
    Spelling,
    Ipa,
    DialectType,
    PartOfSpeech,
    Meaning,
    ExampleZhuang,
    ExampleChinese,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Annotator,
        Field::PageNumber,
        Field::WordNumber,
        Field::SimplifiedCharacter,
        Field::Spelling,
        Field::Ipa,
        Field::DialectType,
        Field::PartOfSpeech,
        Field::Meaning,
        Field::ExampleZhuang,
        Field::ExampleChinese,
    ];

    /// 画面表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            Field::Annotator => "标注作者",
            Field::PageNumber => "页码",
            Field::WordNumber => "字位置",
            Field::SimplifiedCharacter => "对应汉字",
            Field::Spelling => "壮文音",
            Field::Ipa => "国际音标",
            Field::DialectType => "方言",
            Field::PartOfSpeech => "词性",
            Field::Meaning => "意思",
            Field::ExampleZhuang => "例句（壮文）",
            Field::ExampleChinese => "例句（中文）",
        }
    }

    /// 複数行入力を許す項目
    pub fn is_multiline(&self) -> bool {
        matches!(self, Field::ExampleZhuang | Field::ExampleChinese)
    }
}

/// 画面上の入力中の値
///
/// 表示層はキー入力ごとにモデルへ書き戻さない。
/// 確定時に `RecordEditor::apply_form` でまとめて反映する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub annotator: String,
    pub page_num: String,
    pub word_num: String,
    pub simplified_character: String,
    pub spelling: String,
    pub ipa: String,
    pub dialect_type: String,
    pub part_of_speech: String,
    pub meaning: String,
    pub example_zhuang: String,
    pub example_chinese: String,
}

impl FormSnapshot {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Annotator => &self.annotator,
            Field::PageNumber => &self.page_num,
            Field::WordNumber => &self.word_num,
            Field::SimplifiedCharacter => &self.simplified_character,
            Field::Spelling => &self.spelling,
            Field::Ipa => &self.ipa,
            Field::DialectType => &self.dialect_type,
            Field::PartOfSpeech => &self.part_of_speech,
            Field::Meaning => &self.meaning,
            Field::ExampleZhuang => &self.example_zhuang,
            Field::ExampleChinese => &self.example_chinese,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Annotator => &mut self.annotator,
            Field::PageNumber => &mut self.page_num,
            Field::WordNumber => &mut self.word_num,
            Field::SimplifiedCharacter => &mut self.simplified_character,
            Field::Spelling => &mut self.spelling,
            Field::Ipa => &mut self.ipa,
            Field::DialectType => &mut self.dialect_type,
            Field::PartOfSpeech => &mut self.part_of_speech,
            Field::Meaning => &mut self.meaning,
            Field::ExampleZhuang => &mut self.example_zhuang,
            Field::ExampleChinese => &mut self.example_chinese,
        };
        *slot = value.into();
    }
}
