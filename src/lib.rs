//! 壮語辞書ページ画像の注釈・校正ツール
//!
//! ページ画像ごとに読み・品詞・例文の階層レコードを編集し、
//! サイドカーJSONとして保存する。

pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod interactive;
pub mod scanner;
pub mod session;
pub mod store;
