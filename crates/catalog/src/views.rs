//! Cross-cutting compatibility views over the assembled catalog.

use crate::model::{CatalogView, Group, Product};
use crate::taxonomy::fold;

/// A named selection: a product belongs when its group is listed, its
/// subcategory is listed, or its folded name contains one of the keywords.
#[derive(Debug)]
pub struct ViewDef {
    pub name: &'static str,
    pub groups: &'static [Group],
    pub subcategories: &'static [&'static str],
    pub name_keywords: &'static [&'static str],
}

impl ViewDef {
    pub fn includes(&self, product: &Product) -> bool {
        if self.groups.contains(&product.group) {
            return true;
        }
        let subcategory = fold(&product.subcategory);
        if self.subcategories.iter().any(|s| fold(s) == subcategory) {
            return true;
        }
        if self.name_keywords.is_empty() {
            return false;
        }
        let name = fold(&product.name);
        self.name_keywords.iter().any(|k| name.contains(k))
    }
}

pub const COMPAT_VIEWS: &[ViewDef] = &[
    ViewDef {
        name: "paper-products",
        groups: &[Group::Paper],
        subcategories: &[
            "Paper Towels",
            "Z-Fold Towels",
            "Auto-Cut Towel Rolls",
            "Center-Pull Towels",
            "Household Towels",
            "V-Fold Paper Products",
            "Dispenser Napkins",
            "Waiter Napkins",
            "Square Napkins",
            "Tissues",
            "Toilet Paper",
            "Mini Jumbo Toilet Paper",
            "Center-Pull Toilet Paper",
            "Mini Center-Pull Papers",
            "Office Paper",
            "Newsprint",
            "Paper Bags",
            "Paper Sacks & Pouches",
            "Placemats",
            "Table Covers",
        ],
        name_keywords: &[],
    },
    ViewDef {
        name: "cleaning",
        groups: &[Group::Chemical],
        subcategories: &[
            "Professional Cleaning Equipment",
            "Cleaning Aids",
            "Disposable Gloves",
            "Personal Protective Products",
            "Garbage Bags",
            "Toilet Seat Covers",
        ],
        name_keywords: &[],
    },
    ViewDef {
        name: "food",
        groups: &[Group::Food],
        subcategories: &[],
        name_keywords: &[],
    },
    ViewDef {
        name: "stationery",
        groups: &[Group::Stationery],
        subcategories: &["Office Paper", "Cash Register & POS Rolls"],
        name_keywords: &[],
    },
    ViewDef {
        name: "printed",
        groups: &[Group::PrintedModel],
        subcategories: &[],
        name_keywords: &["BASKILI"],
    },
];

/// Build every compatibility view from the sorted catalog; order is preserved.
pub fn build_views(sorted: &[Product]) -> Vec<CatalogView> {
    COMPAT_VIEWS
        .iter()
        .map(|view| CatalogView {
            name: view.name,
            products: sorted.iter().filter(|p| view.includes(p)).cloned().collect(),
        })
        .collect()
}
