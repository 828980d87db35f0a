use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnnotatorError {
    /// 画像フォルダ・添付元ファイルが存在しない
    #[error("ファイルが見つかりません: {0}")]
    NotFound(String),

    /// 利用者が修正できる入力エラー
    #[error("入力エラー: {0}")]
    Validation(String),

    #[error("ページ番号は1〜{max}の範囲で指定してください: {input}")]
    PageOutOfRange { input: i64, max: usize },

    #[error("ページ番号は数字で指定してください: {0}")]
    PageNotNumeric(String),

    /// `xxx_<頁>_xxx_<字>.png` 形式でないファイル名
    #[error("ファイル名から並び順を取得できません: {0}")]
    MalformedFilename(String),

    /// 添付画像の移動・コピー失敗（送信は中断）
    #[error("添付画像の処理に失敗: {reason}\n読み: {spelling}\n元パス: {source_path}")]
    Attachment {
        spelling: String,
        source_path: String,
        #[source]
        reason: std::io::Error,
    },

    #[error("サイドカーJSONが不正 ({path}): {reason}")]
    Serialization { path: String, reason: String },

    #[error("選択範囲が小さすぎます: {width}x{height}")]
    SelectionTooSmall { width: u32, height: u32 },

    #[error("画像処理エラー: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),

    #[error(transparent)]
    Model(#[from] lexicon_common::Error),
}

pub type Result<T> = std::result::Result<T, AnnotatorError>;
