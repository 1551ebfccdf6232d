//! APIレスポンスパーサー
//!
//! AIサービスのレスポンスからJSONを抽出し、AnalysisResultにパースする

use crate::analyzer::normalize_result;
use crate::error::{Error, Result};
use crate::types::AnalysisResult;

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト
/// 3. 生の [...] 配列
/// 4. エラー
///
/// # Examples
/// ```
/// use shelf_ai_common::extract_json;
///
/// let response = "Result: {\"items\": []}";
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "{\"items\": []}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    // ```json ... ``` ブロックを探す
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(start), Some(end)) = (response.find(open), response.rfind(close)) {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// 在庫解析レスポンスをパース
///
/// items / suggestions が欠けていても空として扱う。
/// IDの採番とタグの重複除去まで行った結果を返す。
pub fn parse_analysis_response(response: &str) -> Result<AnalysisResult> {
    if response.trim().is_empty() {
        return Err(Error::Parse("レスポンスが空です".into()));
    }

    let json_str = extract_json(response)?;
    let value: serde_json::Value = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("解析結果 JSONパースエラー: {}", e)))?;

    if !value.is_object() {
        return Err(Error::Parse("解析結果がJSONオブジェクトではありません".into()));
    }

    let result: AnalysisResult = serde_json::from_value(value)
        .map_err(|e| Error::Parse(format!("解析結果 JSONパースエラー: {}", e)))?;

    Ok(normalize_result(result))
}
