use crate::error::{AnnotatorError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    /// (頁番号, 頁内の字番号)
    pub sort_key: (i64, i64),
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// スキャン結果（並び順を取得できなかったファイルを含む）
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub images: Vec<ImageInfo>,
    pub skipped: Vec<String>,
}

/// ファイル名から並び順キーを取得
///
/// 拡張子を除いた名前を `_` で区切り、2番目と4番目を整数として読む。
/// 例: `word_3_part_7.png` → (3, 7)
pub fn sort_key(file_name: &str) -> Result<(i64, i64)> {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let parts: Vec<&str> = stem.split('_').collect();

    let parse = |index: usize| -> Result<i64> {
        parts
            .get(index)
            .and_then(|s| s.trim().parse::<i64>().ok())
            .ok_or_else(|| AnnotatorError::MalformedFilename(file_name.to_string()))
    };

    Ok((parse(1)?, parse(3)?))
}

fn is_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// 画像フォルダを走査して並び順キー付きで返す
///
/// 並び順を取得できないファイルは `skipped` に入れる。
pub fn scan_source_images(folder: &Path) -> Result<ScanResult> {
    if !folder.is_dir() {
        return Err(AnnotatorError::NotFound(folder.display().to_string()));
    }

    let mut result = ScanResult::default();

    for entry in WalkDir::new(folder)
        .max_depth(1)  // 直下のみ
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() || !is_image_extension(path) {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        match sort_key(&file_name) {
            Ok(key) => result.images.push(ImageInfo {
                path: path.to_path_buf(),
                file_name,
                sort_key: key,
            }),
            Err(_) => result.skipped.push(file_name),
        }
    }

    result
        .images
        .sort_by(|a, b| a.sort_key.cmp(&b.sort_key).then_with(|| a.file_name.cmp(&b.file_name)));
    result.skipped.sort();

    Ok(result)
}

/// 画像一覧を並び順で返す
///
/// 形式外のファイル名が1つでもあれば `MalformedFilename`。
pub fn list_source_images(folder: &Path) -> Result<Vec<ImageInfo>> {
    let scan = scan_source_images(folder)?;
    if let Some(name) = scan.skipped.into_iter().next() {
        return Err(AnnotatorError::MalformedFilename(name));
    }
    Ok(scan.images)
}
