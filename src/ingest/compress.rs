//! 画像圧縮
//!
//! デコード → 縮小（拡大はしない）→ JPEG再エンコード → Data URI

use crate::config::Config;
use crate::error::{Result, WizardError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use gift_wizard_common::image_bounds::{target_dimensions, JPEG_QUALITY, MAX_HEIGHT, MAX_WIDTH};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{GenericImageView, ImageFormat};
use std::path::Path;

/// 圧縮設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressOptions {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG品質 (1-100)
    pub quality: u8,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            max_width: MAX_WIDTH,
            max_height: MAX_HEIGHT,
            quality: JPEG_QUALITY,
        }
    }
}

impl From<&Config> for CompressOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_width: config.max_width,
            max_height: config.max_height,
            quality: config.jpeg_quality,
        }
    }
}

/// 圧縮結果
#[derive(Debug, Clone)]
pub struct CompressedImage {
    pub original_size: (u32, u32),
    pub size: (u32, u32),
    pub jpeg: Vec<u8>,
}

impl CompressedImage {
    /// "data:image/jpeg;base64,..." 形式
    pub fn data_uri(&self) -> String {
        format!("data:image/jpeg;base64,{}", STANDARD.encode(&self.jpeg))
    }
}

/// MIMEタイプを判定（拡張子優先、だめなら中身から推測）
pub fn detect_mime_type(path: &Path, bytes: &[u8]) -> Option<&'static str> {
    ImageFormat::from_path(path)
        .ok()
        .or_else(|| image::guess_format(bytes).ok())
        .map(|format| format.to_mime_type())
}

pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// 画像バイト列を圧縮
pub fn compress_image(bytes: &[u8], options: &CompressOptions) -> Result<CompressedImage> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| WizardError::ImageDecode(e.to_string()))?;

    let (width, height) = image.dimensions();
    let (target_w, target_h) =
        target_dimensions(width, height, options.max_width, options.max_height);

    let resized = if (target_w, target_h) == (width, height) {
        image
    } else {
        image.resize_exact(target_w, target_h, FilterType::Triangle)
    };

    // JPEGはアルファなし
    let rgb = resized.to_rgb8();
    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, options.quality.clamp(1, 100));
    encoder
        .encode_image(&rgb)
        .map_err(|e| WizardError::ImageEncode(e.to_string()))?;

    Ok(CompressedImage {
        original_size: (width, height),
        size: (rgb.width(), rgb.height()),
        jpeg,
    })
}
