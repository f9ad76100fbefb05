//! 画像の読み込み・検証・保存
//!
//! アップロード画像は内容から形式を判定し、デコードできなければ InvalidFile。
//! 長辺が max_size を超える画像は縮小してから Data URL にする。

use crate::error::{FitCreateError, Result};
use fitcreate_common::{ImageRef, WardrobeItem};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use rayon::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// 画像ファイルを読み込んで Data URL に変換
pub fn load_image_file(path: &Path, max_size: u32) -> Result<ImageRef> {
    if !path.is_file() {
        return Err(FitCreateError::FileNotFound(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;
    load_image_bytes(&bytes, &path.display().to_string(), max_size)
}

/// バイト列を検証して Data URL に変換
pub fn load_image_bytes(bytes: &[u8], name: &str, max_size: u32) -> Result<ImageRef> {
    let format = image::guess_format(bytes)
        .map_err(|_| FitCreateError::InvalidFile(name.to_string()))?;
    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| FitCreateError::InvalidFile(format!("{}: {}", name, e)))?;

    if decoded.width().max(decoded.height()) <= max_size {
        return Ok(ImageRef::from_bytes(format.to_mime_type(), bytes));
    }

    debug!(
        name,
        width = decoded.width(),
        height = decoded.height(),
        max_size,
        "downscale image"
    );
    let resized = decoded.resize(max_size, max_size, FilterType::Lanczos3);
    // JPEGはアルファ非対応なのでRGBに落とす
    let (out_format, out) = if format == ImageFormat::Jpeg {
        (ImageFormat::Jpeg, DynamicImage::ImageRgb8(resized.to_rgb8()))
    } else {
        (ImageFormat::Png, resized)
    };

    let mut buffer = Cursor::new(Vec::new());
    out.write_to(&mut buffer, out_format)
        .map_err(|e| FitCreateError::InvalidFile(format!("{}: {}", name, e)))?;
    Ok(ImageRef::from_bytes(out_format.to_mime_type(), &buffer.into_inner()))
}

/// ワードローブ項目の画像を生成サービスに渡せる形に解決
///
/// - Data URL: そのまま
/// - http(s): ダウンロードして検証
/// - それ以外: ローカルパス
pub async fn resolve_wardrobe_image(
    client: &reqwest::Client,
    item: &WardrobeItem,
    max_size: u32,
) -> Result<ImageRef> {
    let source = item.image_ref.as_str();

    if item.image_ref.is_data_url() {
        return Ok(item.image_ref.clone());
    }

    if source.starts_with("http://") || source.starts_with("https://") {
        debug!(id = %item.id, url = source, "download wardrobe image");
        let response = client
            .get(source)
            .send()
            .await
            .map_err(|e| FitCreateError::Download(format!("{}: {}", item.name, e)))?;
        if !response.status().is_success() {
            return Err(FitCreateError::Download(format!(
                "{}: HTTP {}",
                item.name,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FitCreateError::Download(format!("{}: {}", item.name, e)))?;
        return load_image_bytes(&bytes, &item.name, max_size);
    }

    load_image_file(Path::new(source), max_size)
}

/// フォルダ直下の衣服画像をまとめて読み込む
///
/// 読み込めないファイルは警告を出してスキップ。結果はファイル名順
pub fn scan_garment_folder(folder: &Path, max_size: u32) -> Result<Vec<(String, ImageRef)>> {
    if !folder.is_dir() {
        return Err(FitCreateError::FileNotFound(folder.display().to_string()));
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1) // 直下のみ
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_image_path(p))
        .collect();
    paths.sort();

    let garments = paths
        .par_iter()
        .filter_map(|path| match load_image_file(path, max_size) {
            Ok(image) => Some((garment_name(path), image)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skip garment file");
                None
            }
        })
        .collect();

    Ok(garments)
}

/// 表示画像をファイルに保存（"Save Look"）
///
/// `target` がディレクトリなら `fitCREATE-<timestamp>.<ext>` を作成する
pub fn write_image(target: &Path, image: &ImageRef) -> Result<PathBuf> {
    let bytes = image.to_bytes()?;
    let path = if target.is_dir() {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        target.join(format!("fitCREATE-{}.{}", stamp, image.file_extension()))
    } else {
        target.to_path_buf()
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, bytes)?;
    Ok(path)
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn garment_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "garment".to_string())
}
