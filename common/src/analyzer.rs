//! 解析結果の後処理（ホスト共通）
//!
//! サービスが返した生の結果にIDを振り、スタイルタグの重複を除く。
//! 解析画面用のカテゴリ絞り込みもここに置く。

use crate::types::{AnalysisResult, InventoryItem};
use std::collections::HashSet;

/// カテゴリフィルタの「すべて」
pub const ALL_CATEGORIES: &str = "all";

/// サービス出力を正規化
///
/// - IDが空または重複している行には `item-<index>` / `sug-<index>` を割り当てる
/// - スタイルタグは集合として扱い、出現順を保ったまま重複を除く
pub fn normalize_result(mut result: AnalysisResult) -> AnalysisResult {
    let mut seen = HashSet::new();
    for (index, item) in result.items.iter_mut().enumerate() {
        assign_id(&mut item.id, "item", index, &mut seen);
        item.style_tags = dedup_tags(&item.style_tags);
    }

    let mut seen = HashSet::new();
    for (index, suggestion) in result.suggestions.iter_mut().enumerate() {
        assign_id(&mut suggestion.id, "sug", index, &mut seen);
        // 生成物はローカル状態なのでサービス由来の値は持ち込まない
        suggestion.mockup_image = None;
        suggestion.is_applied = None;
    }

    result
}

fn assign_id(id: &mut String, prefix: &str, index: usize, seen: &mut HashSet<String>) {
    if !id.trim().is_empty() && seen.insert(id.clone()) {
        return;
    }
    let mut candidate = format!("{}-{}", prefix, index);
    let mut suffix = 1;
    while !seen.insert(candidate.clone()) {
        candidate = format!("{}-{}-{}", prefix, index, suffix);
        suffix += 1;
    }
    *id = candidate;
}

fn dedup_tags(tags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// 絞り込み候補のカテゴリ一覧（先頭は "all"、以降は出現順）
pub fn categories(items: &[InventoryItem]) -> Vec<String> {
    let mut seen = HashSet::new();
    std::iter::once(ALL_CATEGORIES.to_string())
        .chain(
            items
                .iter()
                .filter(|i| seen.insert(i.category.clone()))
                .map(|i| i.category.clone()),
        )
        .collect()
}

/// カテゴリで絞り込み（大文字小文字を区別しない、"all" は全件）
pub fn filter_by_category<'a>(items: &'a [InventoryItem], filter: &str) -> Vec<&'a InventoryItem> {
    if filter.eq_ignore_ascii_case(ALL_CATEGORIES) {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|i| i.category.to_lowercase() == filter.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MerchandisingSuggestion;

    fn item(id: &str, category: &str) -> InventoryItem {
        InventoryItem {
            id: id.to_string(),
            category: category.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_assigns_sequential_ids() {
        let result = AnalysisResult {
            items: vec![item("", "tops"), item("", "bottoms")],
            suggestions: vec![MerchandisingSuggestion::default(), MerchandisingSuggestion::default()],
        };

        let normalized = normalize_result(result);
        assert_eq!(normalized.items[0].id, "item-0");
        assert_eq!(normalized.items[1].id, "item-1");
        assert_eq!(normalized.suggestions[0].id, "sug-0");
        assert_eq!(normalized.suggestions[1].id, "sug-1");
    }

    #[test]
    fn test_normalize_keeps_service_ids_and_fixes_duplicates() {
        let result = AnalysisResult {
            items: vec![item("rack-a", "tops"), item("rack-a", "tops"), item("rack-b", "tops")],
            suggestions: vec![],
        };

        let normalized = normalize_result(result);
        let ids: Vec<&str> = normalized.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["rack-a", "item-1", "rack-b"]);
    }

    #[test]
    fn test_normalize_avoids_collision_with_service_id() {
        let result = AnalysisResult {
            items: vec![item("item-2", "tops"), item("", "tops"), item("", "tops")],
            suggestions: vec![],
        };

        let normalized = normalize_result(result);
        let ids: Vec<&str> = normalized.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["item-2", "item-1", "item-2-1"]);
    }

    #[test]
    fn test_normalize_dedups_style_tags() {
        let mut raw = item("", "tops");
        raw.style_tags = vec!["casual".into(), "Casual".into(), " minimal ".into(), "".into()];

        let normalized = normalize_result(AnalysisResult { items: vec![raw], suggestions: vec![] });
        assert_eq!(normalized.items[0].style_tags, vec!["casual", "minimal"]);
    }

    #[test]
    fn test_normalize_drops_service_mockups() {
        let suggestion = MerchandisingSuggestion {
            mockup_image: Some("data:image/png;base64,AAAA".to_string()),
            is_applied: Some(true),
            ..Default::default()
        };
        let normalized = normalize_result(AnalysisResult { items: vec![], suggestions: vec![suggestion] });
        assert!(normalized.suggestions[0].mockup_image.is_none());
        assert!(normalized.suggestions[0].is_applied.is_none());
    }

    #[test]
    fn test_categories_in_first_seen_order() {
        let items = vec![item("1", "tops"), item("2", "outerwear"), item("3", "tops")];
        assert_eq!(categories(&items), vec!["all", "tops", "outerwear"]);
    }

    #[test]
    fn test_filter_by_category() {
        let items = vec![item("1", "Tops"), item("2", "bottoms"), item("3", "tops")];

        assert_eq!(filter_by_category(&items, "all").len(), 3);
        let tops = filter_by_category(&items, "tops");
        assert_eq!(tops.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["1", "3"]);
        assert!(filter_by_category(&items, "accessories").is_empty());
    }
}
