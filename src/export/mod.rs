//! レポート出力
//!
//! ユーザーが明示的に指示したときだけファイルに書き出す。

pub mod excel;

use crate::cli::ExportFormat;
use crate::error::{Result, ShelfAiError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use shelf_ai_common::{
    extract_base64_from_data_url, extract_mime_type_from_data_url, InventoryItem, InventoryReport,
    MerchandisingSuggestion,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// JSONレポートの中身
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument<'a> {
    pub generated_at: String,
    pub summary: InventoryReport,
    pub items: &'a [InventoryItem],
    pub suggestions: &'a [MerchandisingSuggestion],
}

fn output_path_for_format(output: &Path, title: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", title, extension))
    } else {
        output.with_extension(extension)
    }
}

pub fn generated_at() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// レポートを出力し、書き出したファイルを返す
pub fn export_report(
    items: &[InventoryItem],
    suggestions: &[MerchandisingSuggestion],
    format: ExportFormat,
    output: &Path,
    title: &str,
) -> Result<Vec<PathBuf>> {
    if output.extension().is_none() {
        std::fs::create_dir_all(output)?;
    }

    let summary = InventoryReport::build(items, suggestions);
    let stamp = generated_at();
    let mut written = Vec::new();

    if matches!(format, ExportFormat::Json | ExportFormat::Both) {
        let path = output_path_for_format(output, title, "json");
        println!("- JSONを生成中...");
        let document = ReportDocument {
            generated_at: stamp.clone(),
            summary: summary.clone(),
            items,
            suggestions,
        };
        std::fs::write(&path, serde_json::to_string_pretty(&document)?)?;
        println!("✔ JSON出力: {}", path.display());
        written.push(path);
    }

    if matches!(format, ExportFormat::Excel | ExportFormat::Both) {
        let path = output_path_for_format(output, title, "xlsx");
        println!("- Excelを生成中...");
        excel::generate_excel(&summary, items, suggestions, &stamp, &path)?;
        println!("✔ Excel出力: {}", path.display());
        written.push(path);
    }

    Ok(written)
}

/// 生成済みモックアップを画像ファイルとして保存
pub fn save_mockups(suggestions: &[MerchandisingSuggestion], output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let mut used = HashSet::new();

    for suggestion in suggestions {
        let Some(data_url) = suggestion.mockup_image.as_deref() else {
            continue;
        };
        let payload = extract_base64_from_data_url(data_url)
            .ok_or_else(|| ShelfAiError::Export(format!("モックアップの形式が不正: {}", suggestion.id)))?;
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| ShelfAiError::Export(format!("モックアップのデコードに失敗: {}", e)))?;

        let extension = match extract_mime_type_from_data_url(data_url) {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            _ => "png",
        };

        std::fs::create_dir_all(output_dir)?;
        let mut stem = format!("mockup_{}", sanitize_file_stem(&suggestion.id));
        let mut suffix = 1;
        while !used.insert(stem.clone()) {
            stem = format!("mockup_{}-{}", sanitize_file_stem(&suggestion.id), suffix);
            suffix += 1;
        }
        let path = output_dir.join(format!("{}.{}", stem, extension));
        std::fs::write(&path, bytes)?;
        written.push(path);
    }

    Ok(written)
}

/// ファイル名に使えない文字を `_` に置き換える
fn sanitize_file_stem(id: &str) -> String {
    let stem: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "unnamed".to_string()
    } else {
        stem
    }
}
