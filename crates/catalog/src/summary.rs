use std::collections::BTreeMap;

use crate::model::{CatalogSummary, Group, Product};

/// Compute group counts and reconciliation totals for the final catalog.
/// Only groups with at least one product appear in `groups`.
pub fn compute_summary(
    products: &[Product],
    records_in: usize,
    duplicates_resolved: usize,
) -> CatalogSummary {
    let mut groups: BTreeMap<Group, usize> = BTreeMap::new();
    for p in products {
        *groups.entry(p.group).or_insert(0) += 1;
    }

    CatalogSummary {
        total_products: products.len(),
        records_in,
        duplicates_resolved,
        groups,
    }
}
