//! 在庫レポートの集計
//!
//! レポート画面とエクスポートで使う集計値を items / suggestions から作る。

use crate::types::{Impact, InventoryItem, MerchandisingSuggestion};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 集計行
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownRow {
    pub label: String,
    /// 該当する在庫行の数
    pub lines: usize,
    /// 数量の合計
    pub units: u64,
}

/// 在庫レポート
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    pub total_units: u64,
    pub line_count: usize,
    pub by_category: Vec<BreakdownRow>,
    pub by_color: Vec<BreakdownRow>,
    pub style_tags: Vec<BreakdownRow>,
    pub applied_suggestions: usize,
    pub pending_suggestions: usize,
    pub high_impact_suggestions: usize,
}

impl InventoryReport {
    pub fn build(items: &[InventoryItem], suggestions: &[MerchandisingSuggestion]) -> Self {
        let applied = suggestions.iter().filter(|s| s.is_applied()).count();

        Self {
            total_units: items.iter().map(|i| i.quantity as u64).sum(),
            line_count: items.len(),
            by_category: breakdown(items, |i| vec![label_or_unknown(&i.category)]),
            by_color: breakdown(items, |i| vec![label_or_unknown(&i.color)]),
            style_tags: breakdown(items, |i| i.style_tags.iter().map(|t| t.to_lowercase()).collect()),
            applied_suggestions: applied,
            pending_suggestions: suggestions.len() - applied,
            high_impact_suggestions: suggestions.iter().filter(|s| s.impact == Impact::High).count(),
        }
    }

    /// 全数量に対する割合（%）
    pub fn unit_share(&self, row: &BreakdownRow) -> f64 {
        if self.total_units == 0 {
            return 0.0;
        }
        row.units as f64 * 100.0 / self.total_units as f64
    }
}

fn label_or_unknown(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        "unknown".to_string()
    } else {
        value.to_lowercase()
    }
}

/// ラベルごとに集計し、数量の多い順（同数はラベル順）に並べる
fn breakdown<F>(items: &[InventoryItem], labels: F) -> Vec<BreakdownRow>
where
    F: Fn(&InventoryItem) -> Vec<String>,
{
    let mut rows: HashMap<String, BreakdownRow> = HashMap::new();
    for item in items {
        for label in labels(item) {
            let row = rows.entry(label.clone()).or_insert_with(|| BreakdownRow {
                label,
                ..Default::default()
            });
            row.lines += 1;
            row.units += item.quantity as u64;
        }
    }

    let mut rows: Vec<BreakdownRow> = rows.into_values().collect();
    rows.sort_by(|a, b| b.units.cmp(&a.units).then_with(|| a.label.cmp(&b.label)));
    rows
}
