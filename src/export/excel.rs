//! Excel生成（CLI版）
//!
//! 共通ライブラリでバッファを作り、ファイルに書き出す

use crate::error::{Result, ShelfAiError};
use shelf_ai_common::export::excel_core::generate_report_buffer;
use shelf_ai_common::{InventoryItem, InventoryReport, MerchandisingSuggestion};
use std::path::Path;

pub fn generate_excel(
    report: &InventoryReport,
    items: &[InventoryItem],
    suggestions: &[MerchandisingSuggestion],
    generated_at: &str,
    output_path: &Path,
) -> Result<()> {
    let buffer = generate_report_buffer(report, items, suggestions, generated_at)
        .map_err(ShelfAiError::Export)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
