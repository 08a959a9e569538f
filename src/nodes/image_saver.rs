//! 画像保存ノード
//!
//! ビジョンモデルに画像を説明させ、そのキーワードをファイル名にしてPNG保存する。

use super::{Connection, NodeOutput};
use crate::error::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, GenericImageView, ImageFormat};
use ollama_nodes_common::filename::FALLBACK_KEYWORD;
use ollama_nodes_common::{build_image_filename, sanitize_keywords, DEFAULT_KEYWORD_PROMPT};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSaveOptions {
    /// 保存先（なければ作成）
    pub folder_path: PathBuf,
    /// ビジョンモデルへの指示
    pub prompt: String,
    pub filename_prefix: String,
    /// ファイル名に `{W}x{H}` を含める
    pub include_dimensions: bool,
}

impl Default for ImageSaveOptions {
    fn default() -> Self {
        Self {
            folder_path: PathBuf::from("output"),
            prompt: DEFAULT_KEYWORD_PROMPT.to_string(),
            filename_prefix: String::new(),
            include_dimensions: true,
        }
    }
}

/// 保存結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    pub path: PathBuf,
    pub keywords: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageSaverNode;

impl ImageSaverNode {
    pub const CLASS_NAME: &'static str = "OllamaImageSaver";
    pub const DISPLAY_NAME: &'static str = "Ollama Image Saver";

    /// 複数画像を順に保存し、保存パスの一覧を出力する
    pub async fn save_images(
        &self,
        images: &[DynamicImage],
        options: &ImageSaveOptions,
        conn: &Connection,
    ) -> Result<(NodeOutput, Vec<SavedImage>)> {
        let mut saved = Vec::with_capacity(images.len());
        for image in images {
            saved.push(self.save_image(image, options, conn).await?);
        }

        let text = saved
            .iter()
            .map(|s| s.path.display().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Ok((NodeOutput::text(text), saved))
    }

    /// 1枚保存
    pub async fn save_image(
        &self,
        image: &DynamicImage,
        options: &ImageSaveOptions,
        conn: &Connection,
    ) -> Result<SavedImage> {
        let (width, height) = image.dimensions();
        let png = encode_png(image)?;

        let keywords = self.describe(&png, options, conn).await;

        std::fs::create_dir_all(&options.folder_path)?;
        let dimensions = options.include_dimensions.then_some((width, height));
        let path = next_available_path(
            &options.folder_path,
            &options.filename_prefix,
            &keywords,
            dimensions,
        );

        std::fs::write(&path, &png)?;
        info!("画像を保存: {}", path.display());

        Ok(SavedImage {
            path,
            keywords,
            width,
            height,
        })
    }

    /// ビジョンモデルでキーワードを取得（失敗時は "image"）
    async fn describe(&self, png: &[u8], options: &ImageSaveOptions, conn: &Connection) -> String {
        let request = conn
            .request(options.prompt.as_str())
            .images(vec![STANDARD.encode(png)]);

        let generated = match conn.client() {
            Ok(client) => client.generate(&request).await,
            Err(e) => Err(e),
        };

        match generated {
            Ok(raw) => {
                debug!("画像キーワード: {}", raw.trim());
                sanitize_keywords(&raw)
            }
            Err(e) => {
                warn!("画像の説明に失敗したため既定名を使用: {}", e);
                FALLBACK_KEYWORD.to_string()
            }
        }
    }
}

/// PNGにエンコード
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// 未使用の連番でパスを決める
fn next_available_path(
    folder: &Path,
    prefix: &str,
    keywords: &str,
    dimensions: Option<(u32, u32)>,
) -> PathBuf {
    let mut counter = 1u32;
    loop {
        let path = folder.join(build_image_filename(prefix, keywords, dimensions, counter));
        if !path.exists() || counter == u32::MAX {
            return path;
        }
        counter += 1;
    }
}
