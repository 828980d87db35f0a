//! Lexicon Common Library
//!
//! 辞書レコードのモデル。ファイル入出力を持たず、
//! CLI・対話フロントエンドの双方から利用する。

pub mod types;
pub mod error;
pub mod field;
pub mod editor;
pub mod sidecar;

pub use types::{Direction, Entry, Example, LexicalRecord, Level, PageInfo, Pronunciation};
pub use error::{Error, Result};
pub use field::{Field, FormSnapshot};
pub use editor::{Cursor, RecordEditor};
pub use sidecar::{parse_sidecar, to_sidecar_json};
