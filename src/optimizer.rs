//! 画像最適化
//!
//! 撮影画像をAI解析向けに縮小・再圧縮し、JPEGのData URLにする。
//! - EXIFの向きを反映
//! - 長辺を max_dimension 以下に（拡大はしない）
//! - ベースラインJPEGで再エンコード

use crate::scanner::exif::extract_orientation;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use shelf_ai_common::{extract_base64_from_data_url, to_data_url, Error, Result};
use std::path::Path;

pub const DEFAULT_MAX_DIMENSION: u32 = 1024;
pub const DEFAULT_JPEG_QUALITY: u8 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOptimizer {
    pub max_dimension: u32,
    pub jpeg_quality: u8,
}

impl Default for ImageOptimizer {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// 最適化済み画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizedImage {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
    /// JPEGのバイト数
    pub byte_len: usize,
}

impl OptimizedImage {
    /// Data URLからJPEGバイト列を取り出す
    pub fn jpeg_bytes(&self) -> Result<Vec<u8>> {
        let payload = extract_base64_from_data_url(&self.data_url)
            .ok_or_else(|| Error::Decode("Data URLではありません".into()))?;
        STANDARD
            .decode(payload)
            .map_err(|e| Error::Decode(format!("Base64デコードエラー: {}", e)))
    }
}

impl ImageOptimizer {
    pub fn new(max_dimension: u32, jpeg_quality: u8) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.max_image_size, config.jpeg_quality)
    }

    /// 画像バイト列を最適化
    pub fn optimize(&self, bytes: &[u8]) -> Result<OptimizedImage> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| Error::Decode(format!("画像をデコードできません: {}", e)))?;
        let oriented = apply_orientation(decoded, extract_orientation(bytes));

        let (width, height) = target_dimensions(oriented.width(), oriented.height(), self.max_dimension);
        let resized = if (width, height) == (oriented.width(), oriented.height()) {
            oriented
        } else {
            oriented.resize_exact(width, height, FilterType::Triangle)
        };

        let jpeg = self.encode_jpeg(resized)?;
        Ok(OptimizedImage {
            data_url: to_data_url("image/jpeg", &STANDARD.encode(&jpeg)),
            width,
            height,
            byte_len: jpeg.len(),
        })
    }

    /// Data URL形式の入力を最適化
    pub fn optimize_data_url(&self, data_url: &str) -> Result<OptimizedImage> {
        let payload = extract_base64_from_data_url(data_url)
            .ok_or_else(|| Error::Decode("Data URLではありません".into()))?;
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| Error::Decode(format!("Base64デコードエラー: {}", e)))?;
        self.optimize(&bytes)
    }

    pub fn optimize_file(&self, path: &Path) -> Result<OptimizedImage> {
        let bytes = std::fs::read(path)?;
        self.optimize(&bytes)
    }

    fn encode_jpeg(&self, image: DynamicImage) -> Result<Vec<u8>> {
        // JPEGはアルファ非対応
        let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, self.jpeg_quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| Error::Decode(format!("JPEGエンコードエラー: {}", e)))?;
        Ok(buffer)
    }
}

/// 縮小後のサイズ。長辺を max に合わせ、比率を保つ
pub fn target_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    let scale = |side: u32, long: u32| -> u32 {
        ((side as f64 * max as f64 / long as f64).round() as u32).max(1)
    };
    if width >= height {
        (max, scale(height, width))
    } else {
        (scale(width, height), max)
    }
}

fn apply_orientation(image: DynamicImage, orientation: Option<u32>) -> DynamicImage {
    match orientation {
        Some(2) => image.fliph(),
        Some(3) => image.rotate180(),
        Some(4) => image.flipv(),
        Some(5) => image.rotate90().fliph(),
        Some(6) => image.rotate90(),
        Some(7) => image.rotate270().fliph(),
        Some(8) => image.rotate270(),
        _ => image,
    }
}
