//! 作業フォルダ構成と設定ファイル
//!
//! 作業フォルダ直下の構成:
//! - `image/`          元ページ画像
//! - `output/`         標準のサイドカーJSON
//! - `proofread_file/` 校正済みサイドカーJSON
//! - `output_image/`   確定済み添付画像
//! - `temp/`           一時ファイル（切り抜き画像など）
//! - `config.json`     最後に開いたページ

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";

/// 作業フォルダのディレクトリ構成
#[derive(Debug, Clone)]
pub struct Layout {
    pub root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn image_dir(&self) -> PathBuf {
        self.root.join("image")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    pub fn proofread_dir(&self) -> PathBuf {
        self.root.join("proofread_file")
    }

    pub fn attachment_dir(&self) -> PathBuf {
        self.root.join("output_image")
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.root.join("temp")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// レコード内のパス文字列を実パスへ（相対パスは作業フォルダ基準）
    pub fn resolve(&self, stored: &str) -> PathBuf {
        let path = Path::new(stored);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// 作業フォルダ内のパスは相対パス文字列にして記録する
    pub fn relativize(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }

    /// 作業フォルダが管理するファイルか（添付・一時フォルダ内）
    pub fn is_managed(&self, path: &Path) -> bool {
        path.starts_with(self.attachment_dir()) || path.starts_with(self.temp_dir())
    }

    /// 一時ファイルとみなすパスか（作業フォルダの temp/ 内のみ）
    ///
    /// 添付の確定時、一時ファイルは移動し、それ以外はコピーする。
    pub fn is_session_temporary(&self, path: &Path) -> bool {
        path.starts_with(self.temp_dir())
    }
}

/// config.json の内容
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub last_index: usize,
}

impl Config {
    /// 読み込み（存在しない・壊れている場合は既定値）
    pub fn load(layout: &Layout) -> Self {
        let config_path = layout.config_path();
        if !config_path.exists() {
            return Self::default();
        }

        let content = match std::fs::read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("設定ファイルを読めません ({}): {}", config_path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("設定ファイルが不正、既定値を使います: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, layout: &Layout) -> Result<()> {
        let config_path = layout.config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}
