//! Rule-based classification of a record into a group and a subcategory.

pub mod rules;

use serde::Serialize;

use crate::model::Group;
use rules::{GroupRule, SubcategoryRule};

pub use rules::{
    decision_table, DecisionTable, DEFAULT_GROUP, DEFAULT_GROUP_RULE, DEFAULT_SUBCATEGORY,
    GROUP_RULES, SUBCATEGORY_RULES, TAXONOMY_VERSION,
};

/// Uppercase, then strip Turkish diacritics. Every keyword comparison runs on
/// folded text.
pub fn fold(value: &str) -> String {
    value
        .to_uppercase()
        .chars()
        .map(|c| match c {
            'Ç' => 'C',
            'Ğ' => 'G',
            'İ' => 'I',
            'Ö' => 'O',
            'Ş' => 'S',
            'Ü' => 'U',
            'Â' => 'A',
            'Î' => 'I',
            'Û' => 'U',
            other => other,
        })
        .collect()
}

/// Folded code truncated at the first `.`, then at the first `-`, with any
/// trailing serial digits dropped (`KHV001` and `KHV-001` share prefix `KHV`).
pub fn code_prefix(folded_code: &str) -> &str {
    let head = folded_code.split('.').next().unwrap_or_default();
    let head = head.split('-').next().unwrap_or_default();
    head.trim_end_matches(|c: char| c.is_ascii_digit())
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Folded inputs to the group decision list.
#[derive(Debug, Clone)]
pub struct Signals {
    code: String,
    name: String,
    info: String,
}

impl Signals {
    pub fn new(code: Option<&str>, name: &str, info: Option<&str>) -> Self {
        Self {
            code: fold(code.unwrap_or_default().trim()),
            name: fold(name),
            info: fold(info.unwrap_or_default()),
        }
    }

    pub fn prefix(&self) -> &str {
        code_prefix(&self.code)
    }

    /// True when name or info contains one of `keywords`.
    fn mentions(&self, keywords: &[&str]) -> bool {
        contains_any(&self.name, keywords) || contains_any(&self.info, keywords)
    }
}

impl GroupRule {
    /// Group this rule assigns to `signals`, or `None` when it does not fire.
    pub fn evaluate(&self, signals: &Signals) -> Option<Group> {
        let prefix = signals.prefix();
        let by_prefix = !prefix.is_empty() && self.prefixes.contains(&prefix);
        let by_marker = contains_any(&signals.code, self.code_markers);
        let guarded = self.keyword_guard.iter().any(|set| set.contains(&prefix));
        let by_keyword = !guarded && signals.mentions(self.keywords);

        if !(by_prefix || by_marker || by_keyword) {
            return None;
        }
        match &self.divert {
            Some(divert) if signals.mentions(divert.keywords) => Some(divert.group),
            _ => Some(self.group),
        }
    }
}

impl SubcategoryRule {
    pub fn matches(&self, folded_name: &str) -> bool {
        self.all.iter().all(|k| folded_name.contains(k))
            && (self.any.is_empty() || contains_any(folded_name, self.any))
            && !contains_any(folded_name, self.none)
    }
}

/// Outcome of classifying one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub group: Group,
    pub subcategory: &'static str,
    /// Id of the group rule that fired, or `"default"`.
    pub rule: &'static str,
}

/// Walk the group decision list; first match wins.
pub fn assign_group(signals: &Signals) -> (Group, &'static str) {
    GROUP_RULES
        .iter()
        .find_map(|rule| rule.evaluate(signals).map(|g| (g, rule.id)))
        .unwrap_or((DEFAULT_GROUP, DEFAULT_GROUP_RULE))
}

/// Walk the subcategory decision list against the name only.
pub fn assign_subcategory(name: &str) -> &'static str {
    let folded = fold(name);
    SUBCATEGORY_RULES
        .iter()
        .find(|rule| rule.matches(&folded))
        .map(|rule| rule.label)
        .unwrap_or(DEFAULT_SUBCATEGORY)
}

pub fn classify(code: Option<&str>, name: &str, info: Option<&str>) -> Classification {
    let (group, rule) = assign_group(&Signals::new(code, name, info));
    Classification {
        group,
        subcategory: assign_subcategory(name),
        rule,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_of(code: &str, name: &str) -> (Group, &'static str) {
        let c = classify(Some(code), name, None);
        (c.group, c.rule)
    }

    #[test]
    fn fold_strips_turkish_marks() {
        assert_eq!(fold("çğıöşü"), "CGIOSU");
        assert_eq!(fold("ÇĞİÖŞÜ"), "CGIOSU");
        assert_eq!(fold("Kağıt Havlu"), "KAGIT HAVLU");
        assert_eq!(fold("Baskılı"), "BASKILI");
    }

    #[test]
    fn prefix_truncates_at_dot_then_dash() {
        assert_eq!(code_prefix("KHV-001.A"), "KHV");
        assert_eq!(code_prefix("MASTER.12-3"), "MASTER");
        assert_eq!(code_prefix("PST001"), "PST");
        assert_eq!(code_prefix("12345"), "");
        assert_eq!(code_prefix(""), "");
    }

    #[test]
    fn printed_marker_overrides_everything() {
        assert_eq!(
            group_of("KHV-001", "Baskılı Kahve Bardağı"),
            (Group::PrintedModel, "printed-model")
        );
        let c = classify(Some("MASTER-1"), "Havlu", Some("logo baskili"));
        assert_eq!(c.group, Group::PrintedModel);
    }

    #[test]
    fn printed_code_markers() {
        assert_eq!(group_of("PST-BLI-01", "Poşet").0, Group::PrintedModel);
        assert_eq!(group_of("KRT.AMR", "Kutu").0, Group::PrintedModel);
        assert_eq!(group_of("X.SFT", "Kutu").0, Group::PrintedModel);
    }

    #[test]
    fn food_by_prefix_without_keyword() {
        assert_eq!(group_of("KHV001", "Turkish Coffee 250g"), (Group::Food, "food"));
        assert_eq!(group_of("SKR-10", "Küp 1kg").0, Group::Food);
    }

    #[test]
    fn food_by_keyword() {
        assert_eq!(group_of("", "Nescafe Gold 100g").0, Group::Food);
        assert_eq!(group_of("ABC", "Doğuş Çay 1kg").0, Group::Food);
    }

    #[test]
    fn chemical_by_prefix_and_keyword() {
        assert_eq!(group_of("KMY-5", "Ultra 5L").0, Group::Chemical);
        assert_eq!(group_of("ABC", "Bulaşık Deterjanı 5L").0, Group::Chemical);
    }

    #[test]
    fn chemical_keyword_ignored_for_claimed_prefixes() {
        assert_eq!(
            group_of("PLS-100", "Kova Deterjan İçin"),
            (Group::Plastic, "plastic")
        );
        assert_eq!(group_of("MASTER.4", "Sabunluk").0, Group::Paper);
    }

    #[test]
    fn stationery_and_bag_diversion() {
        assert_eq!(
            group_of("", "Fotokopi Kağıdı A4"),
            (Group::Stationery, "stationery")
        );
        assert_eq!(
            group_of("", "Fiş Poşeti 100 lü"),
            (Group::Packaging, "stationery")
        );
        assert_eq!(group_of("KGT-1", "Rulo").0, Group::Stationery);
    }

    #[test]
    fn paper_plastic_packaging() {
        assert_eq!(group_of("MASTER-12", "Ürün X"), (Group::Paper, "paper"));
        assert_eq!(group_of("", "Z Katlı Havlu").0, Group::Paper);
        assert_eq!(group_of("", "Nitril Eldiven M"), (Group::Plastic, "plastic"));
        assert_eq!(
            group_of("", "Streç Film 30cm"),
            (Group::Packaging, "packaging")
        );
    }

    #[test]
    fn generic_and_default_fallbacks() {
        assert_eq!(
            group_of("", "Ürün 42"),
            (Group::Packaging, "generic-product")
        );
        assert_eq!(group_of("", "Xyz"), (Group::Packaging, DEFAULT_GROUP_RULE));
    }

    #[test]
    fn subcategories_first_match_wins() {
        assert_eq!(assign_subcategory("Z HAVLU 200'LÜ"), "Z-Fold Towels");
        assert_eq!(assign_subcategory("Tuvalet Kağıdı 32'li"), "Toilet Paper");
        assert_eq!(
            assign_subcategory("İçten Çekme Tuvalet Kağıdı"),
            "Center-Pull Toilet Paper"
        );
        assert_eq!(assign_subcategory("Karton Bardak 7oz"), "Paper Cups");
        assert_eq!(assign_subcategory("Bardak 180cc"), "Plastic Cups");
        assert_eq!(assign_subcategory("Çöp Poşeti Büyük Boy"), "Garbage Bags");
        assert_eq!(assign_subcategory("Kilitli Poşet 10x15"), "Zip-Lock Bags");
        assert_eq!(assign_subcategory("Koli Bant 45mm"), "Packing Tape");
        assert_eq!(
            assign_subcategory("Bulaşık Deterjanı"),
            "Dishwashing Chemicals"
        );
        assert_eq!(assign_subcategory("Turkish Coffee 250g"), "Coffee Solutions");
        assert_eq!(assign_subcategory("Xyz"), DEFAULT_SUBCATEGORY);
    }

    #[test]
    fn subcategory_rule_triples() {
        let rule = SubcategoryRule {
            label: "Test",
            all: &["RULO"],
            any: &["KRAFT", "GAZETE"],
            none: &["POSET"],
        };
        assert!(rule.matches("KRAFT RULO 50CM"));
        assert!(!rule.matches("KRAFT RULO POSET"));
        assert!(!rule.matches("RULO 50CM"));
        assert!(!rule.matches("KRAFT 50CM"));
        assert_eq!(assign_subcategory("Kraft Rulo 50cm"), "Roll Products");
        assert_eq!(assign_subcategory("Rulo Poşet"), "Carrier Bags");
    }

    #[test]
    fn subcategory_ignores_info() {
        let c = classify(None, "Xyz", Some("Tuvalet Kağıdı"));
        assert_eq!(c.subcategory, DEFAULT_SUBCATEGORY);
        assert_eq!(c.group, Group::Paper);
    }
}
