//! 画像読み込み・保存のテスト

use fitcreate::error::FitCreateError;
use fitcreate::media::{load_image_file, scan_garment_folder, write_image};
use fitcreate_common::ImageRef;
use image::{ImageFormat, RgbImage};
use std::path::Path;
use tempfile::tempdir;

fn write_png(path: &Path, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, image::Rgb([200, 120, 80]))
        .save_with_format(path, ImageFormat::Png)
        .expect("PNG書き込み失敗");
}

fn dimensions(image: &ImageRef) -> (u32, u32) {
    let decoded = image::load_from_memory(&image.to_bytes().unwrap()).unwrap();
    (decoded.width(), decoded.height())
}

#[test]
fn test_load_small_image_keeps_size() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("photo.png");
    write_png(&path, 40, 20);

    let image = load_image_file(&path, 1536).unwrap();
    assert_eq!(image.mime_type().unwrap(), "image/png");
    assert_eq!(dimensions(&image), (40, 20));
}

/// 長辺が上限を超えると縮小（縦横比維持）
#[test]
fn test_load_large_image_is_downscaled() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("big.png");
    write_png(&path, 400, 200);

    let image = load_image_file(&path, 100).unwrap();
    assert_eq!(dimensions(&image), (100, 50));
}

/// 拡張子ではなく内容で判定する
#[test]
fn test_load_detects_format_from_content() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("photo.jpg");
    write_png(&path, 10, 10);

    let image = load_image_file(&path, 1536).unwrap();
    assert_eq!(image.mime_type().unwrap(), "image/png");
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = load_image_file(&dir.path().join("nope.png"), 1536);
    assert!(matches!(result, Err(FitCreateError::FileNotFound(_))));
}

#[test]
fn test_load_non_image_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("notes.png");
    std::fs::write(&path, "just text").unwrap();

    let result = load_image_file(&path, 1536);
    assert!(matches!(result, Err(FitCreateError::InvalidFile(_))));
}

/// フォルダ直下の画像のみ、ファイル名順。壊れた画像はスキップ
#[test]
fn test_scan_garment_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_png(&dir.path().join("b-skirt.png"), 8, 8);
    write_png(&dir.path().join("a-shirt.png"), 8, 8);
    std::fs::write(dir.path().join("broken.png"), "oops").unwrap();
    std::fs::write(dir.path().join("readme.txt"), "ignore me").unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    write_png(&dir.path().join("nested").join("c-hat.png"), 8, 8);

    let garments = scan_garment_folder(dir.path(), 1536).unwrap();
    let names: Vec<&str> = garments.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["a-shirt", "b-skirt"]);
}

#[test]
fn test_scan_missing_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scan_garment_folder(&dir.path().join("missing"), 1536);
    assert!(matches!(result, Err(FitCreateError::FileNotFound(_))));
}

/// ディレクトリ指定ならタイムスタンプ付きのファイル名で保存
#[test]
fn test_write_image_into_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let image = ImageRef::from_bytes("image/png", b"png-bytes");

    let path = write_image(dir.path(), &image).unwrap();
    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("fitCREATE-"));
    assert!(file_name.ends_with(".png"));
    assert_eq!(std::fs::read(&path).unwrap(), b"png-bytes");
}

#[test]
fn test_write_image_to_file_path() {
    let dir = tempdir().expect("Failed to create temp dir");
    let target = dir.path().join("looks").join("date-night.jpg");
    let image = ImageRef::from_bytes("image/jpeg", b"jpeg-bytes");

    let path = write_image(&target, &image).unwrap();
    assert_eq!(path, target);
    assert_eq!(std::fs::read(&target).unwrap(), b"jpeg-bytes");
}
