//! 画像の切り抜き
//!
//! 取得済みの画像に対して表示座標のドラッグ範囲を受け取り、
//! 元画像の座標に換算して切り抜いた結果を `temp/` に保存する。
//! 画面全体の取得は表示層の担当。

use crate::config::Layout;
use crate::error::{AnnotatorError, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

/// 元画像座標での最小の切り抜きサイズ
pub const MIN_SELECTION: u32 = 10;

/// 表示座標でのドラッグ範囲
///
/// 始点と終点はどちら向きにドラッグしてもよい。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

/// 元画像座標の矩形
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Selection {
    pub fn new(start: (f64, f64), end: (f64, f64)) -> Self {
        Self { start, end }
    }

    /// 元画像座標へ換算（`floor(min * scale)` 〜 `floor(max * scale)`）
    pub fn to_source(&self, scale: f64) -> CropRect {
        let to_px = |v: f64| (v * scale).floor().max(0.0) as u32;
        let x0 = to_px(self.start.0.min(self.end.0));
        let y0 = to_px(self.start.1.min(self.end.1));
        let x1 = to_px(self.start.0.max(self.end.0));
        let y1 = to_px(self.start.1.max(self.end.1));
        CropRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }
}

impl CropRect {
    /// 画像の範囲内に収める
    fn clamp_to(self, image_width: u32, image_height: u32) -> Self {
        let x = self.x.min(image_width);
        let y = self.y.min(image_height);
        Self {
            x,
            y,
            width: self.width.min(image_width - x),
            height: self.height.min(image_height - y),
        }
    }

    fn check_size(&self) -> Result<()> {
        if self.width < MIN_SELECTION || self.height < MIN_SELECTION {
            return Err(AnnotatorError::SelectionTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// 切り抜いて `temp/cropped_<タイムスタンプ>.png` に保存
pub fn crop_to_temp(
    layout: &Layout,
    bitmap: &Path,
    selection: Selection,
    scale: f64,
) -> Result<PathBuf> {
    let rect = selection.to_source(scale);
    rect.check_size()?;

    let img = image::open(bitmap)?;
    let rect = rect.clamp_to(img.width(), img.height());
    rect.check_size()?;

    let cropped = img.crop_imm(rect.x, rect.y, rect.width, rect.height);

    let temp_dir = layout.temp_dir();
    std::fs::create_dir_all(&temp_dir)?;
    let stamp = Local::now().format("%Y%m%d%H%M%S%6f");
    let dest = temp_dir.join(format!("cropped_{}.png", stamp));
    cropped.save(&dest)?;

    tracing::debug!(
        "切り抜き: {} ({}x{} @ {},{}) -> {}",
        bitmap.display(),
        rect.width,
        rect.height,
        rect.x,
        rect.y,
        dest.display()
    );
    Ok(dest)
}
