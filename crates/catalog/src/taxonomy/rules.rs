//! The authoritative taxonomy decision table.
//!
//! Every keyword and prefix is stored in folded form (see [`super::fold`]):
//! uppercase ASCII with Turkish diacritics stripped. Rules are evaluated top to
//! bottom and the first match wins. Bump [`TAXONOMY_VERSION`] whenever a rule,
//! a keyword list, or the rule order changes.

use serde::Serialize;

use crate::model::Group;

pub const TAXONOMY_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Prefix sets (assigned by the supplier at catalog-entry time)
// ---------------------------------------------------------------------------

pub const FOOD_PREFIXES: &[&str] = &["BHR", "CAY", "KHV", "SKR"];
pub const CHEMICAL_PREFIXES: &[&str] = &["KMY"];
pub const STATIONERY_PREFIXES: &[&str] = &["KGT"];
pub const PAPER_PREFIXES: &[&str] = &["MASTER"];
pub const PLASTIC_PREFIXES: &[&str] = &["PLS", "ELD", "HJY", "APR", "EKJ"];
pub const PACKAGING_PREFIXES: &[&str] = &[
    "PST", "ALM", "KRT", "STR", "LST", "BNT", "SZD", "AHS", "KRS",
];

/// Markers anywhere in the code that flag a printed/custom model.
pub const PRINTED_CODE_MARKERS: &[&str] = &["-BLI", ".AMR", ".SFT"];

// ---------------------------------------------------------------------------
// Keyword sets
// ---------------------------------------------------------------------------

pub const PRINTED_KEYWORDS: &[&str] = &["BASKILI"];

pub const FOOD_KEYWORDS: &[&str] = &[
    "KAHVE", "NESCAFE", "CAFE", "CAY", "LIPTON", "DOGUS", "BAHARAT", "KARABIBER", "PULBIBER",
    "TUZ", "SEKER",
];

pub const CHEMICAL_KEYWORDS: &[&str] = &[
    "DETERJAN", "TEMIZLEYICI", "SABUN", "PARLATICI", "SOKUCU", "YUMUSATICI", "PARFUM", "KIREC",
    "PAS", "CAM", "KREM",
];

pub const STATIONERY_KEYWORDS: &[&str] =
    &["FOTOKOPI", "YAZARKASA", "YAZAR KASA", "FIS", "Z RAPORU"];

/// Bag terms that turn a stationery match into packaging.
pub const PACKAGING_BAG_KEYWORDS: &[&str] = &["POSET", "CANTA", "TORBA", "KESE"];

pub const PAPER_KEYWORDS: &[&str] = &[
    "HAVLU", "PECETE", "TUVALET", "KAGIDI", "KAGIT", "DISPENSER", "ICHTEN", "ICTEN", "JUMBO",
];

pub const PLASTIC_KEYWORDS: &[&str] = &[
    "PLASTIK", "ELDIVEN", "PIPET", "SOS", "BARDAK", "TABAK", "KASE", "BONE", "GALOS", "KOLLUK",
    "MOP", "KOVA", "CEKPAS", "SAP", "FIRCA", "APARAT",
];

pub const PACKAGING_KEYWORDS: &[&str] = &[
    "POSET", "ALUMINYUM", "STREC", "KILIT", "SIZDIRMAZ", "KUTU", "TEPSI", "KAPAK", "KAP", "KASA",
    "LASTIK", "RULO", "MUAYENE", "MASA", "ORTUSU", "KRAFT", "GAZETE", "CANTA", "SERVIS",
];

pub const GENERIC_PRODUCT_KEYWORDS: &[&str] = &["URUN"];

// ---------------------------------------------------------------------------
// Group rules
// ---------------------------------------------------------------------------

/// Redirects a rule's result when extra keywords are also present.
#[derive(Debug, Serialize)]
pub struct Divert {
    pub keywords: &'static [&'static str],
    pub group: Group,
}

/// One row of the group decision list.
///
/// A rule fires when the code prefix is in `prefixes`, the code contains one of
/// `code_markers`, or name/info contains one of `keywords`. The keyword branch
/// is skipped when the code prefix belongs to any set in `keyword_guard`.
#[derive(Debug, Serialize)]
pub struct GroupRule {
    pub id: &'static str,
    pub group: Group,
    pub prefixes: &'static [&'static str],
    pub code_markers: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub keyword_guard: &'static [&'static [&'static str]],
    pub divert: Option<Divert>,
}

pub const GROUP_RULES: &[GroupRule] = &[
    GroupRule {
        id: "printed-model",
        group: Group::PrintedModel,
        prefixes: &[],
        code_markers: PRINTED_CODE_MARKERS,
        keywords: PRINTED_KEYWORDS,
        keyword_guard: &[],
        divert: None,
    },
    GroupRule {
        id: "food",
        group: Group::Food,
        prefixes: FOOD_PREFIXES,
        code_markers: &[],
        keywords: FOOD_KEYWORDS,
        keyword_guard: &[],
        divert: None,
    },
    GroupRule {
        id: "chemical",
        group: Group::Chemical,
        prefixes: CHEMICAL_PREFIXES,
        code_markers: &[],
        keywords: CHEMICAL_KEYWORDS,
        keyword_guard: &[
            PLASTIC_PREFIXES,
            PACKAGING_PREFIXES,
            STATIONERY_PREFIXES,
            PAPER_PREFIXES,
        ],
        divert: None,
    },
    GroupRule {
        id: "stationery",
        group: Group::Stationery,
        prefixes: STATIONERY_PREFIXES,
        code_markers: &[],
        keywords: STATIONERY_KEYWORDS,
        keyword_guard: &[],
        divert: Some(Divert {
            keywords: PACKAGING_BAG_KEYWORDS,
            group: Group::Packaging,
        }),
    },
    GroupRule {
        id: "paper",
        group: Group::Paper,
        prefixes: PAPER_PREFIXES,
        code_markers: &[],
        keywords: PAPER_KEYWORDS,
        keyword_guard: &[],
        divert: None,
    },
    GroupRule {
        id: "plastic",
        group: Group::Plastic,
        prefixes: PLASTIC_PREFIXES,
        code_markers: &[],
        keywords: PLASTIC_KEYWORDS,
        keyword_guard: &[],
        divert: None,
    },
    GroupRule {
        id: "packaging",
        group: Group::Packaging,
        prefixes: PACKAGING_PREFIXES,
        code_markers: &[],
        keywords: PACKAGING_KEYWORDS,
        keyword_guard: &[],
        divert: None,
    },
    GroupRule {
        id: "generic-product",
        group: Group::Packaging,
        prefixes: &[],
        code_markers: &[],
        keywords: GENERIC_PRODUCT_KEYWORDS,
        keyword_guard: &[],
        divert: None,
    },
];

pub const DEFAULT_GROUP: Group = Group::Packaging;
pub const DEFAULT_GROUP_RULE: &str = "default";

// ---------------------------------------------------------------------------
// Subcategory rules
// ---------------------------------------------------------------------------

/// One row of the subcategory decision list, matched against the folded name.
///
/// Fires when every `all` keyword is present, at least one `any` keyword is
/// present (ignored when `any` is empty), and no `none` keyword is present.
#[derive(Debug, Serialize)]
pub struct SubcategoryRule {
    pub label: &'static str,
    pub all: &'static [&'static str],
    pub any: &'static [&'static str],
    pub none: &'static [&'static str],
}

const fn any_of(label: &'static str, any: &'static [&'static str]) -> SubcategoryRule {
    SubcategoryRule {
        label,
        all: &[],
        any,
        none: &[],
    }
}

const fn all_of(label: &'static str, all: &'static [&'static str]) -> SubcategoryRule {
    SubcategoryRule {
        label,
        all,
        any: &[],
        none: &[],
    }
}

pub const SUBCATEGORY_RULES: &[SubcategoryRule] = &[
    // Paper
    any_of("Table Covers", &["MASA ORTUSU"]),
    any_of("Z-Fold Towels", &["Z HAVLU"]),
    any_of("Auto-Cut Towel Rolls", &["HAREKETLI HAVLU"]),
    any_of("Center-Pull Towels", &["ICTEN CEKME HAVLU"]),
    any_of("Mini Center-Pull Papers", &["MINI ICTEN CEKME"]),
    any_of("Mini Jumbo Toilet Paper", &["MINI JUMBO"]),
    any_of("Center-Pull Toilet Paper", &["ICTEN CEKME TUVALET KAGIDI"]),
    any_of("Household Towels", &["EV TIPI HAVLU"]),
    any_of("Toilet Paper", &["TUVALET KAGIDI"]),
    any_of("V-Fold Paper Products", &["V KAT"]),
    any_of("Dispenser Napkins", &["DISPENSER PECETE"]),
    any_of("Waiter Napkins", &["GARSON PECETE"]),
    any_of("Square Napkins", &["KARE PECETE"]),
    any_of("Tissues", &["MENDIL"]),
    any_of("Paper Towels", &["HAVLU"]),
    // Disposables
    any_of("Disposable Gloves", &["ELDIVEN"]),
    any_of("Personal Protective Products", &["BONE", "GALOS", "KOLLUK"]),
    any_of("Straws", &["PIPET"]),
    any_of("Sauce Cups", &["SOS KAP"]),
    SubcategoryRule {
        label: "Paper Cups",
        all: &["BARDAK"],
        any: &["KARTON", "PAP"],
        none: &[],
    },
    any_of("Plastic Cups", &["BARDAK"]),
    any_of("Serving Plates", &["TABAK"]),
    any_of("Serving Bowls", &["KASE"]),
    any_of("Stretch Films", &["STREC"]),
    // Containers and packing
    all_of("Aluminium Lids", &["ALUMINYUM", "KAPAK"]),
    any_of("Aluminium Containers", &["ALUMINYUM"]),
    any_of("Leak-Proof Containers", &["SIZDIRMAZ"]),
    any_of("Packing Elastic Bands", &["LASTIK"]),
    any_of("Serving Accessories", &["KARISTIRICI", "KURDAN"]),
    any_of("Packing Tape", &["BANT"]),
    // Bags
    SubcategoryRule {
        label: "Garbage Bags",
        all: &["POSET"],
        any: &["COP", "KONTEYNER", "DOK"],
        none: &[],
    },
    all_of("Zip-Lock Bags", &["POSET", "KILITLI"]),
    SubcategoryRule {
        label: "Food Bags",
        all: &["POSET"],
        any: &["GIDA", "SARKUTERI"],
        none: &[],
    },
    all_of("Reinforced Carrier Bags", &["POSET", "TAKVIYELI"]),
    any_of("Carrier Bags", &["POSET"]),
    SubcategoryRule {
        label: "Roll Products",
        all: &["RULO"],
        any: &[],
        none: &["POSET"],
    },
    // Office and paper goods
    any_of("Office Paper", &["FOTOKOP", "A4"]),
    any_of("Cash Register & POS Rolls", &["KASA", "POS"]),
    any_of("Placemats", &["AMERIKAN SERVIS"]),
    any_of("Newsprint", &["GAZETE"]),
    any_of("Printed Papers", &["SULFIT"]),
    any_of("Paper Bags", &["CANTA"]),
    any_of("Paper Sacks & Pouches", &["KESE", "TORBA", "POGACA"]),
    // Beverages
    any_of("Coffee Solutions", &["KAHVE", "NESCAF", "COFFE"]),
    any_of("Tea Solutions", &["CAY", "LIPTON", "DOGUS"]),
    // Cleaning
    any_of("Cologne", &["KOLONYA"]),
    any_of("Liquid Soaps", &["SIVI SABUN", "KOPUK SABUN"]),
    any_of("Dishwashing Chemicals", &["BULASIK"]),
    any_of("Heavy-Duty Degreasers", &["YAG SOKUCU", "KIREC PAS"]),
    any_of("Laundry Products", &["CAMASIR"]),
    any_of("Surface Cleaners", &["YUZEY TEMIZLEYICI"]),
    any_of("Glass Cleaners", &["CAM TEMIZLEYICI"]),
    any_of("WC Hygiene Products", &["WC"]),
    any_of("Cleaning Aids", &["SUNGER", "BEZ", "TOPTEL"]),
    any_of(
        "Professional Cleaning Equipment",
        &["MOP", "CEKPAS", "APARAT", "SAP", "FIRCA", "TEMIZLIK ARABASI"],
    ),
    any_of("Toilet Seat Covers", &["KLOZET KAPAK ORTUSU"]),
    // Pantry
    any_of("Sugar & Salt", &["SEKER", "TUZ"]),
    any_of("Spices", &["BAHARAT", "KARABIBER", "PULBIBER"]),
];

pub const DEFAULT_SUBCATEGORY: &str = "General Products";

// ---------------------------------------------------------------------------
// Table export
// ---------------------------------------------------------------------------

/// Read-only view of the whole decision table, as listed by `prodcat rules`.
#[derive(Debug, Serialize)]
pub struct DecisionTable {
    pub version: u32,
    pub group_rules: &'static [GroupRule],
    pub default_group: Group,
    pub subcategory_rules: &'static [SubcategoryRule],
    pub default_subcategory: &'static str,
}

pub fn decision_table() -> DecisionTable {
    DecisionTable {
        version: TAXONOMY_VERSION,
        group_rules: GROUP_RULES,
        default_group: DEFAULT_GROUP,
        subcategory_rules: SUBCATEGORY_RULES,
        default_subcategory: DEFAULT_SUBCATEGORY,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::taxonomy::fold;

    fn all_keywords() -> Vec<&'static str> {
        let mut out = Vec::new();
        for rule in GROUP_RULES {
            out.extend_from_slice(rule.prefixes);
            out.extend_from_slice(rule.code_markers);
            out.extend_from_slice(rule.keywords);
            if let Some(divert) = &rule.divert {
                out.extend_from_slice(divert.keywords);
            }
        }
        for rule in SUBCATEGORY_RULES {
            out.extend_from_slice(rule.all);
            out.extend_from_slice(rule.any);
            out.extend_from_slice(rule.none);
        }
        out
    }

    #[test]
    fn every_keyword_is_stored_folded() {
        for keyword in all_keywords() {
            assert_eq!(fold(keyword), keyword, "keyword '{keyword}' is not folded");
            assert!(!keyword.is_empty());
        }
    }

    #[test]
    fn group_rule_ids_are_unique() {
        let ids: HashSet<_> = GROUP_RULES.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), GROUP_RULES.len());
        assert!(!ids.contains(DEFAULT_GROUP_RULE));
    }

    #[test]
    fn printed_model_is_evaluated_first() {
        assert_eq!(GROUP_RULES[0].group, Group::PrintedModel);
    }

    #[test]
    fn subcategory_labels_are_unique_and_have_triggers() {
        let mut labels = HashSet::new();
        for rule in SUBCATEGORY_RULES {
            assert!(labels.insert(rule.label), "duplicate label {}", rule.label);
            assert!(
                !rule.all.is_empty() || !rule.any.is_empty(),
                "rule {} has no trigger",
                rule.label
            );
        }
        assert!(!labels.contains(DEFAULT_SUBCATEGORY));
    }

    #[test]
    fn decision_table_serializes() {
        let json = serde_json::to_value(decision_table()).unwrap();
        assert_eq!(json["version"], TAXONOMY_VERSION);
        assert_eq!(json["group_rules"][0]["id"], "printed-model");
        assert_eq!(json["group_rules"][0]["group"], "PrintedModel");
        assert_eq!(json["default_subcategory"], DEFAULT_SUBCATEGORY);
    }
}
