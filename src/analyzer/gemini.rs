//! Gemini API クライアント
//!
//! - 在庫解析: 写真 + タスク文を送り、構造化JSONで受け取る
//! - モックアップ: 提案からプロンプトを作り、インライン画像で受け取る
//!
//! どちらも1回きりの呼び出し。失敗理由は共通のエラー分類に通す。

use super::types::*;
use crate::config::Config;
use async_trait::async_trait;
use shelf_ai_common::prompts::{
    analysis_response_schema, build_mockup_prompt, ANALYSIS_TASK, SYSTEM_INSTRUCTION,
};
use shelf_ai_common::{
    extract_base64_from_data_url, extract_mime_type_from_data_url, parse_analysis_response,
    to_data_url, AnalysisClient, AnalysisResult, Error, MerchandisingSuggestion, Photo, Result,
};
use tracing::{debug, warn};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    model: String,
    mockup_model: String,
}

impl GeminiClient {
    pub fn new(model: impl Into<String>, mockup_model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: GEMINI_API_BASE.to_string(),
            model: model.into(),
            mockup_model: mockup_model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.model.clone(), config.mockup_model.clone())
    }

    /// 接続先を差し替える（プロキシ・検証用）
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/{}:generateContent", self.api_base, model)
    }

    /// Gemini API呼び出し（共通処理）
    async fn call(&self, model: &str, credential: &str, request: &GeminiRequest) -> Result<GeminiResponse> {
        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", credential)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(model, error = %e, "Gemini API request failed");
                Error::Service(format!("request failed: {}", e))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Service(format!("response read failed: {}", e)))?;

        if !status.is_success() {
            let err = classify_http_failure(status.as_u16(), &body);
            warn!(model, status = status.as_u16(), error = %err, "Gemini API error");
            return Err(err);
        }

        debug!(model, bytes = body.len(), "Gemini API response");
        serde_json::from_str(&body).map_err(|e| Error::Service(format!("invalid response: {}", e)))
    }
}

#[async_trait]
impl AnalysisClient for GeminiClient {
    async fn analyze(&self, credential: &str, photos: &[Photo]) -> Result<AnalysisResult> {
        let request = build_analysis_request(photos);
        let response = self.call(&self.model, credential, &request).await?;

        let text = response_text(&response).ok_or_else(|| {
            Error::Service(format!(
                "Analysis failed to complete: empty response (finish reason: {})",
                finish_reason(&response).unwrap_or("none")
            ))
        })?;

        parse_analysis_response(&text).map_err(|e| {
            warn!(error = %e, "analysis response could not be parsed");
            Error::Service(format!(
                "Analysis failed to complete. Please try with clearer photos. ({})",
                e
            ))
        })
    }

    async fn generate_mockup(&self, credential: &str, suggestion: &MerchandisingSuggestion) -> Result<String> {
        let request = build_mockup_request(suggestion);
        let response = self.call(&self.mockup_model, credential, &request).await?;

        response_image(&response).ok_or_else(|| {
            Error::Service("Visual generation failed or model returned text instead of image.".into())
        })
    }
}

pub(crate) fn build_analysis_request(photos: &[Photo]) -> GeminiRequest {
    let mut parts: Vec<Part> = photos
        .iter()
        .map(|photo| {
            let encoded = photo.encoded_data();
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: extract_mime_type_from_data_url(encoded).to_string(),
                    data: extract_base64_from_data_url(encoded).unwrap_or(encoded).to_string(),
                },
            }
        })
        .collect();
    parts.push(Part::Text {
        text: ANALYSIS_TASK.to_string(),
    });

    GeminiRequest {
        contents: vec![Content { parts }],
        system_instruction: Some(Content {
            parts: vec![Part::Text {
                text: SYSTEM_INSTRUCTION.to_string(),
            }],
        }),
        generation_config: GenerationConfig {
            response_mime_type: Some("application/json".into()),
            response_schema: Some(analysis_response_schema()),
            ..Default::default()
        },
    }
}

pub(crate) fn build_mockup_request(suggestion: &MerchandisingSuggestion) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![Part::Text {
                text: build_mockup_prompt(suggestion),
            }],
        }],
        system_instruction: None,
        generation_config: GenerationConfig {
            response_modalities: Some(vec!["TEXT".into(), "IMAGE".into()]),
            ..Default::default()
        },
    }
}

/// 先頭候補のテキストパートを連結
pub(crate) fn response_text(response: &GeminiResponse) -> Option<String> {
    let text: String = response
        .candidates
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn finish_reason(response: &GeminiResponse) -> Option<&str> {
    response.candidates.first()?.finish_reason.as_deref()
}

/// 先頭候補の最初のインライン画像をData URLにする
pub(crate) fn response_image(response: &GeminiResponse) -> Option<String> {
    response
        .candidates
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .find_map(|p| p.inline_data.as_ref())
        .filter(|d| !d.data.is_empty())
        .map(|d| to_data_url(d.mime_type.as_deref().unwrap_or("image/png"), &d.data))
}

pub(crate) fn classify_http_failure(status: u16, body: &str) -> Error {
    let detail = serde_json::from_str::<GeminiErrorBody>(body)
        .map(|b| format!("{} {}", b.error.status, b.error.message).trim().to_string())
        .unwrap_or_else(|_| body.chars().take(200).collect());
    Error::classify_service_failure(format!("API error {}: {}", status, detail))
}
