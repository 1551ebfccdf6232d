//! データモデルの型定義
//!
//! - Photo: 撮影・取込した写真（作成後は不変）
//! - InventoryItem: AI解析で抽出された在庫行
//! - MerchandisingSuggestion: 陳列改善の提案
//! - AnalysisResult: AnalysisClient の出力（items + suggestions）

use serde::{Deserialize, Deserializer, Serialize};

/// 撮影した写真
///
/// `encoded_data` は最適化済みのアップロード用データ（Data URL）。
/// `display_url` はプレビュー用で、通常は `encoded_data` と同じ値。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    id: String,
    display_url: String,
    encoded_data: String,
}

impl Photo {
    /// プレビューにアップロード用データをそのまま使う写真を作成
    pub fn new(id: impl Into<String>, encoded_data: impl Into<String>) -> Self {
        let encoded_data = encoded_data.into();
        Self {
            id: id.into(),
            display_url: encoded_data.clone(),
            encoded_data,
        }
    }

    /// プレビュー参照を別に持つ写真を作成
    pub fn with_preview(
        id: impl Into<String>,
        display_url: impl Into<String>,
        encoded_data: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_url: display_url.into(),
            encoded_data: encoded_data.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_url(&self) -> &str {
        &self.display_url
    }

    pub fn encoded_data(&self) -> &str {
        &self.encoded_data
    }
}

/// 在庫アイテム
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryItem {
    pub id: String,
    pub category: String,     // tops / bottoms / outerwear / accessories
    pub color: String,
    pub pattern: String,
    #[serde(deserialize_with = "deserialize_quantity")]
    pub quantity: u32,
    pub style_tags: Vec<String>,
}

/// 提案のインパクト
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Impact {
    High,
    #[default]
    Medium,
    Low,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "High",
            Impact::Medium => "Medium",
            Impact::Low => "Low",
        }
    }
}

impl From<String> for Impact {
    /// 大文字小文字を区別せず変換。不明な値は Medium 扱い
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "high" => Impact::High,
            "low" => Impact::Low,
            _ => Impact::Medium,
        }
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 陳列改善の提案
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MerchandisingSuggestion {
    pub id: String,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    pub reasoning: String,

    /// モックアップ画像（生成成功時にのみ設定）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mockup_image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_applied: Option<bool>,
}

impl MerchandisingSuggestion {
    pub fn is_applied(&self) -> bool {
        self.is_applied.unwrap_or(false)
    }
}

/// AI解析結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    pub items: Vec<InventoryItem>,
    pub suggestions: Vec<MerchandisingSuggestion>,
}

/// 数量をデシリアライズ（小数は四捨五入、負数は0、文字列も許容）
fn deserialize_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number
        .filter(|n| n.is_finite())
        .map(|n| n.round().clamp(0.0, u32::MAX as f64) as u32)
        .unwrap_or(0))
}
