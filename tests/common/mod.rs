//! 統合テスト用の決定的なフェイククライアント

#![allow(dead_code)]

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use shelf_ai_common::{
    AnalysisClient, AnalysisResult, Error, Impact, InventoryItem, MerchandisingSuggestion, Photo,
    Result,
};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct FakeClient {
    /// analyze の応答（呼ぶたびに先頭から消費、尽きたら最後を繰り返す）
    pub analyses: Mutex<Vec<std::result::Result<AnalysisResult, String>>>,
    pub mockup_failure: Option<String>,
    pub analyze_calls: AtomicUsize,
    pub mockup_calls: AtomicUsize,
}

impl FakeClient {
    pub fn returning(result: AnalysisResult) -> Self {
        Self::sequence(vec![Ok(result)])
    }

    pub fn failing(reason: &str) -> Self {
        Self::sequence(vec![Err(reason.to_string())])
    }

    pub fn sequence(analyses: Vec<std::result::Result<AnalysisResult, String>>) -> Self {
        Self {
            analyses: Mutex::new(analyses),
            mockup_failure: None,
            analyze_calls: AtomicUsize::new(0),
            mockup_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AnalysisClient for FakeClient {
    async fn analyze(&self, _credential: &str, _photos: &[Photo]) -> Result<AnalysisResult> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        let next = {
            let mut analyses = self.analyses.lock().unwrap();
            if analyses.len() > 1 {
                analyses.remove(0)
            } else {
                analyses[0].clone()
            }
        };
        next.map_err(Error::classify_service_failure)
    }

    async fn generate_mockup(&self, _credential: &str, suggestion: &MerchandisingSuggestion) -> Result<String> {
        self.mockup_calls.fetch_add(1, Ordering::SeqCst);
        match &self.mockup_failure {
            Some(reason) => Err(Error::classify_service_failure(reason.clone())),
            None => Ok(format!("data:image/png;base64,{}", suggestion.id)),
        }
    }
}

pub fn item(category: &str, color: &str, quantity: u32) -> InventoryItem {
    InventoryItem {
        category: category.to_string(),
        color: color.to_string(),
        quantity,
        ..Default::default()
    }
}

pub fn suggestion(title: &str, impact: Impact) -> MerchandisingSuggestion {
    MerchandisingSuggestion {
        title: title.to_string(),
        description: format!("{} description", title),
        impact,
        reasoning: "better flow".to_string(),
        ..Default::default()
    }
}

/// 3行・2提案の解析結果（IDはサービス側で付けない）
pub fn sample_result() -> AnalysisResult {
    AnalysisResult {
        items: vec![
            item("tops", "black", 12),
            item("bottoms", "blue", 8),
            item("accessories", "gold", 4),
        ],
        suggestions: vec![
            suggestion("Color story wall", Impact::High),
            suggestion("Front table refresh", Impact::Low),
        ],
    }
}

pub fn photo(id: &str) -> Photo {
    Photo::new(id, format!("data:image/jpeg;base64,{}", id))
}

/// テスト用のPNGを書き出す
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 251) as u8, (y % 241) as u8, 90]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .expect("PNGエンコード失敗");
    let path = dir.join(name);
    std::fs::write(&path, buf.into_inner()).expect("書き込み失敗");
    path
}
