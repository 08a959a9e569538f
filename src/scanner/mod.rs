use crate::error::{NodeError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 保存ノードに渡せる入力画像の拡張子
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "gif"];

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

/// 入力画像を収集
///
/// ファイルならそのまま、フォルダなら直下の画像をファイル名順で返す
pub fn collect_images(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.exists() {
        return Err(NodeError::FolderNotFound(input.display().to_string()));
    }

    let mut images: Vec<PathBuf> = WalkDir::new(input)
        .max_depth(1) // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| is_image_extension(&ext.to_string_lossy()))
        })
        .collect();

    if images.is_empty() {
        return Err(NodeError::NoImagesFound(input.display().to_string()));
    }

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(images)
}
