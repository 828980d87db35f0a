use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lexicon")]
#[command(about = "壮語辞書ページ画像の注釈・校正ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 作業フォルダ（image/, output/ などを含む）
    #[arg(short, long, default_value = ".", global = true)]
    pub root: PathBuf,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ページ画像を並び順で一覧表示
    List {
        /// ファイル名の形式が不正な画像があればエラーにする
        #[arg(long)]
        strict: bool,
    },

    /// 各ページの保存・校正状況を表示
    Status,

    /// ページのレコードを表示（1始まり）
    Show {
        /// ページ番号
        page: String,
    },

    /// 対話式で注釈を入力
    Annotate {
        /// 開始ページ（省略時は前回のページ）
        #[arg(short, long)]
        page: Option<String>,

        /// 注釈者名（最初のページに設定）
        #[arg(short, long)]
        annotator: Option<String>,
    },

    /// 対話式で校正（proofread_file/ に保存）
    Proofread {
        /// ページ番号
        page: String,

        /// 校正者名
        #[arg(short, long)]
        name: String,
    },

    /// 取得済み画像を切り抜いて temp/ に保存
    Crop {
        /// 切り抜き元の画像
        bitmap: PathBuf,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,

        /// 表示座標から元画像座標への倍率
        #[arg(short, long, default_value = "1.0")]
        scale: f64,
    },
}
