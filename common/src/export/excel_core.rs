//! Excel生成（共通ライブラリ）
//!
//! レポートを3シート構成のExcelにする:
//! - Summary: 合計・カテゴリ別・色別・スタイルタグ別
//! - Inventory: 在庫行一覧
//! - Suggestions: 陳列改善の提案一覧

use crate::report::{BreakdownRow, InventoryReport};
use crate::types::{InventoryItem, MerchandisingSuggestion};
use rust_xlsxwriter::*;

/// Excelをバッファに生成
///
/// # Arguments
/// * `report` - 集計済みレポート
/// * `items` - 在庫行
/// * `suggestions` - 作業中の提案リスト
/// * `generated_at` - 出力日時（表示用文字列）
pub fn generate_report_buffer(
    report: &InventoryReport,
    items: &[InventoryItem],
    suggestions: &[MerchandisingSuggestion],
    generated_at: &str,
) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_size(10.0)
        .set_font_color(Color::RGB(0x333333))
        .set_background_color(Color::RGB(0xE8EAF6))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let title_format = Format::new().set_bold().set_font_size(14.0);

    let wrap_format = Format::new()
        .set_text_wrap()
        .set_align(FormatAlign::Top);

    {
        let sheet = workbook.add_worksheet();
        write_summary(sheet, report, generated_at, &title_format, &header_format)
            .map_err(|e| format!("Summaryシート生成エラー: {}", e))?;
    }
    {
        let sheet = workbook.add_worksheet();
        write_inventory(sheet, items, &header_format)
            .map_err(|e| format!("Inventoryシート生成エラー: {}", e))?;
    }
    {
        let sheet = workbook.add_worksheet();
        write_suggestions(sheet, suggestions, &header_format, &wrap_format)
            .map_err(|e| format!("Suggestionsシート生成エラー: {}", e))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

fn write_summary(
    sheet: &mut Worksheet,
    report: &InventoryReport,
    generated_at: &str,
    title_format: &Format,
    header_format: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name("Summary")?;
    sheet.set_column_width(0, 24)?;
    sheet.set_column_width(1, 12)?;
    sheet.set_column_width(2, 12)?;
    sheet.set_column_width(3, 12)?;

    sheet.write_string_with_format(0, 0, "Inventory Intelligence Report", title_format)?;
    sheet.write_string(1, 0, format!("Generated: {}", generated_at))?;

    let totals: [(&str, f64); 5] = [
        ("Total units", report.total_units as f64),
        ("Inventory lines", report.line_count as f64),
        ("Applied suggestions", report.applied_suggestions as f64),
        ("Pending suggestions", report.pending_suggestions as f64),
        ("High impact suggestions", report.high_impact_suggestions as f64),
    ];
    let mut row: u32 = 3;
    for (label, value) in totals {
        sheet.write_string(row, 0, label)?;
        sheet.write_number(row, 1, value)?;
        row += 1;
    }

    for (title, rows) in [
        ("Category", &report.by_category),
        ("Color", &report.by_color),
        ("Style tag", &report.style_tags),
    ] {
        row += 1;
        write_breakdown(sheet, row, title, rows, report, header_format)?;
        row += rows.len() as u32 + 1;
    }

    Ok(())
}

fn write_breakdown(
    sheet: &mut Worksheet,
    start_row: u32,
    title: &str,
    rows: &[BreakdownRow],
    report: &InventoryReport,
    header_format: &Format,
) -> Result<(), XlsxError> {
    for (col, header) in [title, "Lines", "Units", "Share %"].iter().enumerate() {
        sheet.write_string_with_format(start_row, col as u16, *header, header_format)?;
    }
    for (offset, r) in rows.iter().enumerate() {
        let row = start_row + 1 + offset as u32;
        sheet.write_string(row, 0, &r.label)?;
        sheet.write_number(row, 1, r.lines as f64)?;
        sheet.write_number(row, 2, r.units as f64)?;
        sheet.write_number(row, 3, (report.unit_share(r) * 10.0).round() / 10.0)?;
    }
    Ok(())
}

fn write_inventory(
    sheet: &mut Worksheet,
    items: &[InventoryItem],
    header_format: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name("Inventory")?;
    let headers = ["ID", "Category", "Color", "Pattern", "Quantity", "Style tags"];
    let widths = [10, 16, 14, 14, 10, 30];
    for (col, (header, width)) in headers.iter().zip(widths).enumerate() {
        sheet.set_column_width(col as u16, width)?;
        sheet.write_string_with_format(0, col as u16, *header, header_format)?;
    }

    for (index, item) in items.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_string(row, 0, &item.id)?;
        sheet.write_string(row, 1, &item.category)?;
        sheet.write_string(row, 2, &item.color)?;
        sheet.write_string(row, 3, &item.pattern)?;
        sheet.write_number(row, 4, item.quantity as f64)?;
        sheet.write_string(row, 5, item.style_tags.join(", "))?;
    }
    Ok(())
}

fn write_suggestions(
    sheet: &mut Worksheet,
    suggestions: &[MerchandisingSuggestion],
    header_format: &Format,
    wrap_format: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name("Suggestions")?;
    let headers = ["ID", "Title", "Impact", "Applied", "Description", "Reasoning"];
    let widths = [10, 28, 10, 10, 50, 50];
    for (col, (header, width)) in headers.iter().zip(widths).enumerate() {
        sheet.set_column_width(col as u16, width)?;
        sheet.write_string_with_format(0, col as u16, *header, header_format)?;
    }

    for (index, suggestion) in suggestions.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_string(row, 0, &suggestion.id)?;
        sheet.write_string(row, 1, &suggestion.title)?;
        sheet.write_string(row, 2, suggestion.impact.as_str())?;
        sheet.write_string(row, 3, if suggestion.is_applied() { "yes" } else { "no" })?;
        sheet.write_string_with_format(row, 4, &suggestion.description, wrap_format)?;
        sheet.write_string_with_format(row, 5, &suggestion.reasoning, wrap_format)?;
    }
    Ok(())
}
