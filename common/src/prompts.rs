//! プロンプト生成モジュール
//!
//! CLIと他のホストで共有されるプロンプト:
//! - SYSTEM_INSTRUCTION: 在庫監査用のシステム指示
//! - ANALYSIS_TASK: 画像と一緒に送るタスク文
//! - analysis_response_schema: 構造化出力スキーマ
//! - build_mockup_prompt: 提案1件分のモックアップ生成プロンプト

use crate::types::MerchandisingSuggestion;
use serde_json::{json, Value};

/// 在庫カテゴリ
pub const CATEGORIES: &[&str] = &["tops", "bottoms", "outerwear", "accessories"];

/// スタイルタグ
pub const STYLE_TAGS: &[&str] = &["casual", "formal", "athletic", "boho", "minimal"];

pub const SYSTEM_INSTRUCTION: &str = "You are an expert inventory auditor for a B2B clothing retailer. \
Analyze store shelf/rack photos and extract structured inventory data. \
Categories: tops, bottoms, outerwear, accessories. \
Style tags: casual, formal, athletic, boho, minimal. \
Provide realistic quantity estimates based on visual density. \
Generate visual merchandising suggestions to improve store layout.";

pub const ANALYSIS_TASK: &str =
    "Extract inventory data and provide 3-4 specific visual merchandising suggestions from these images.";

/// 解析レスポンスのJSONスキーマ（Gemini responseSchema形式）
pub fn analysis_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "items": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "category": { "type": "STRING" },
                        "color": { "type": "STRING" },
                        "pattern": { "type": "STRING" },
                        "quantity": { "type": "NUMBER" },
                        "styleTags": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["category", "color", "quantity"]
                }
            },
            "suggestions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "impact": { "type": "STRING", "enum": ["High", "Medium", "Low"] },
                        "reasoning": { "type": "STRING" }
                    }
                }
            }
        }
    })
}

/// モックアップ生成プロンプト（提案のタイトルと説明から生成）
pub fn build_mockup_prompt(suggestion: &MerchandisingSuggestion) -> String {
    format!(
        "A professional high-quality 3D render of a retail clothing store display for a high-end brand.\n\
The display shows: {title}.\n\
Visual details: {description}.\n\
Setting: Minimalist, clean lighting, focus on garment organization and color story.\n\
No people in the shot, just the merchandising display.",
        title = suggestion.title.trim(),
        description = suggestion.description.trim(),
    )
}
