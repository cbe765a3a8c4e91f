use crate::models::PlanResult;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Prefix turning a dish name into a "nearby" map search.
pub const LOCALITY_PREFIX: &str = "附近";

pub const MAX_KEYWORDS: usize = 3;

// 便当 / 套餐 / 盖饭 anywhere, a bare 饭 only at the end
static DESCRIPTOR_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new("便当|套餐|盖饭|饭$").expect("descriptor pattern is valid"));

/// Strips descriptor words from a template title.
pub fn strip_descriptors(title: &str) -> String {
    DESCRIPTOR_WORDS.replace_all(title, "").into_owned()
}

/// Derives up to three distinct "nearby + dish" search keywords for the
/// dine-in scene, in plan order. Templates without tags contribute nothing.
pub fn dine_in_keywords(plans: &[PlanResult]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut keywords: Vec<String> = Vec::new();

    for plan in plans {
        if plan.template.tags.is_empty() {
            continue;
        }

        let keyword = format!("{}{}", LOCALITY_PREFIX, strip_descriptors(&plan.template.title));
        if seen.insert(keyword.clone()) {
            keywords.push(keyword);
        }
    }

    keywords.truncate(MAX_KEYWORDS);
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, MatchTier, SceneTag, Taste, Template};
    use std::sync::Arc;

    fn plan(id: u64, title: &str, tags: &[&str]) -> PlanResult {
        PlanResult {
            category: Category::Cheap,
            name: Category::Cheap.display_name(),
            description: Category::Cheap.description(),
            template: Arc::new(Template {
                id,
                scene: SceneTag::Both,
                category: Category::Cheap,
                taste: Taste::All,
                budget_level: 15.0,
                title: title.to_string(),
                search_keywords: String::new(),
                remark_phrases: Vec::new(),
                price_range_text: String::new(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                avoid_tips: String::new(),
            }),
            remark_text: String::new(),
            tier: MatchTier::Preferred,
        }
    }

    #[test]
    fn test_strip_descriptors() {
        assert_eq!(strip_descriptors("黄焖鸡米饭"), "黄焖鸡米");
        assert_eq!(strip_descriptors("鱼香肉丝盖饭"), "鱼香肉丝");
        assert_eq!(strip_descriptors("日式鸡排便当"), "日式鸡排");
        assert_eq!(strip_descriptors("麻辣烫套餐"), "麻辣烫");
        assert_eq!(strip_descriptors("炒饭小炒"), "炒饭小炒");
        assert_eq!(strip_descriptors("牛肉面"), "牛肉面");
    }

    #[test]
    fn test_keywords_dedup_and_cap() {
        let plans = vec![
            plan(1, "鱼香肉丝盖饭", &["川菜"]),
            plan(2, "鱼香肉丝套餐", &["川菜", "下饭"]),
            plan(3, "牛肉面", &["面食"]),
            plan(4, "麻辣烫", &["麻辣"]),
            plan(5, "沙拉", &["轻食"]),
        ];
        assert_eq!(
            dine_in_keywords(&plans),
            vec!["附近鱼香肉丝", "附近牛肉面", "附近麻辣烫"]
        );
    }

    #[test]
    fn test_untagged_templates_are_skipped() {
        let plans = vec![plan(1, "牛肉面", &[]), plan(2, "沙拉", &["轻食"])];
        assert_eq!(dine_in_keywords(&plans), vec!["附近沙拉"]);
    }
}
