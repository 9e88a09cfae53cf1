//! Identity keys and cross-source reconciliation.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::PricePolicy;
use crate::model::Product;
use crate::normalize::identity_text;

/// Decides whether two records are the same catalog entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    /// Trimmed, case-folded code. Authoritative when present.
    Code(String),
    /// Whitespace-collapsed, case-folded name and info.
    NameInfo(String, String),
}

pub fn identity_key(code: Option<&str>, name: &str, info: Option<&str>) -> IdentityKey {
    match code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => IdentityKey::Code(code.to_uppercase()),
        None => IdentityKey::NameInfo(identity_text(name), identity_text(info.unwrap_or_default())),
    }
}

impl IdentityKey {
    pub fn of(product: &Product) -> Self {
        identity_key(
            product.code.as_deref(),
            &product.name,
            product.info.as_deref(),
        )
    }
}

fn overwrite(slot: &mut Option<String>, incoming: &Option<String>) {
    if let Some(value) = incoming.as_ref().filter(|v| !v.is_empty()) {
        *slot = Some(value.clone());
    }
}

/// Fold `incoming` into `existing`: non-empty incoming values win for every
/// field; the price follows `policy`.
///
/// A fallback name (derived from the code, not read from the source) never
/// replaces a supplied one. Group and subcategory are taken from `incoming`
/// only when its name is, since they were classified from that name.
pub fn merge(existing: &mut Product, incoming: &Product, policy: PricePolicy) {
    let takes_name = !incoming.name.is_empty()
        && (!incoming.name_is_fallback || existing.name_is_fallback);

    overwrite(&mut existing.code, &incoming.code);
    if takes_name {
        existing.name = incoming.name.clone();
        existing.name_is_fallback = incoming.name_is_fallback;
    }
    overwrite(&mut existing.info, &incoming.info);
    overwrite(&mut existing.unit, &incoming.unit);
    overwrite(&mut existing.vat, &incoming.vat);
    if takes_name {
        if !incoming.subcategory.is_empty() {
            existing.subcategory = incoming.subcategory.clone();
        }
        existing.group = incoming.group;
    }
    overwrite(&mut existing.image, &incoming.image);

    match policy {
        PricePolicy::LatestSource => existing.price = incoming.price.clone(),
        PricePolicy::LatestPresent => overwrite(&mut existing.price, &incoming.price),
    }
}

/// Insertion-ordered index of products keyed by identity.
#[derive(Debug, Default)]
pub struct MergeIndex {
    products: Vec<Product>,
    positions: HashMap<IdentityKey, usize>,
    merged: usize,
}

impl MergeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product, merging it into an earlier one with the same key.
    pub fn insert(&mut self, product: Product, policy: PricePolicy) {
        let key = IdentityKey::of(&product);
        match self.positions.get(&key).copied() {
            Some(pos) => {
                debug!(?key, name = %product.name, "merging duplicate record");
                merge(&mut self.products[pos], &product, policy);
                self.merged += 1;
            }
            None => {
                self.positions.insert(key, self.products.len());
                self.products.push(product);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Number of inserts that merged into an existing entry.
    pub fn merged(&self) -> usize {
        self.merged
    }

    pub fn into_products(self) -> Vec<Product> {
        self.products
    }
}

/// Keep the first product per normalized display name; later ones are dropped.
/// Returns the survivors in input order and the number dropped.
pub fn collapse_by_name(products: Vec<Product>) -> (Vec<Product>, usize) {
    let mut seen = HashSet::new();
    let mut dropped = 0;
    let kept = products
        .into_iter()
        .filter(|p| {
            let fresh = seen.insert(identity_text(&p.name));
            if !fresh {
                debug!(name = %p.name, "dropping duplicate name");
                dropped += 1;
            }
            fresh
        })
        .collect();
    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Group;

    fn product(code: Option<&str>, name: &str, info: Option<&str>, price: Option<&str>) -> Product {
        Product {
            code: code.map(String::from),
            name: name.to_string(),
            info: info.map(String::from),
            unit: None,
            vat: None,
            price: price.map(String::from),
            subcategory: "General Products".into(),
            group: Group::Packaging,
            image: None,
            name_is_fallback: false,
        }
    }

    #[test]
    fn code_key_is_case_folded() {
        assert_eq!(
            identity_key(Some(" ab1 "), "x", None),
            identity_key(Some("AB1"), "y", Some("z"))
        );
    }

    #[test]
    fn blank_code_falls_back_to_name_and_info() {
        assert_eq!(
            identity_key(Some("  "), "Z  Havlu", Some("200 lü")),
            IdentityKey::NameInfo("Z HAVLU".into(), "200 LÜ".into())
        );
    }

    #[test]
    fn merge_keeps_present_fields_and_takes_latest_price() {
        let mut existing = product(Some("A1"), "Old", None, Some("10"));
        let incoming = product(Some("A1"), "", None, Some("12"));
        merge(&mut existing, &incoming, PricePolicy::LatestSource);
        assert_eq!(existing.code.as_deref(), Some("A1"));
        assert_eq!(existing.name, "Old");
        assert_eq!(existing.price.as_deref(), Some("12"));
    }

    #[test]
    fn latest_source_price_policy_clears_price() {
        let mut existing = product(Some("A1"), "Old", None, Some("10"));
        let incoming = product(Some("A1"), "New", None, None);
        merge(&mut existing, &incoming, PricePolicy::LatestSource);
        assert_eq!(existing.price, None);
        assert_eq!(existing.name, "New");
    }

    #[test]
    fn latest_present_price_policy_keeps_price() {
        let mut existing = product(Some("A1"), "Old", None, Some("10"));
        let incoming = product(Some("A1"), "New", None, None);
        merge(&mut existing, &incoming, PricePolicy::LatestPresent);
        assert_eq!(existing.price.as_deref(), Some("10"));
    }

    #[test]
    fn merge_overwrites_non_empty_fields() {
        let mut existing = product(Some("A1"), "Old", Some("old info"), None);
        existing.unit = Some("KOLI".into());
        let mut incoming = product(Some("a1"), "New", None, None);
        incoming.vat = Some("%20".into());
        incoming.group = Group::Paper;
        incoming.subcategory = "Paper Towels".into();
        merge(&mut existing, &incoming, PricePolicy::LatestSource);
        assert_eq!(existing.code.as_deref(), Some("a1"));
        assert_eq!(existing.name, "New");
        assert_eq!(existing.info.as_deref(), Some("old info"));
        assert_eq!(existing.unit.as_deref(), Some("KOLI"));
        assert_eq!(existing.vat.as_deref(), Some("%20"));
        assert_eq!(existing.group, Group::Paper);
        assert_eq!(existing.subcategory, "Paper Towels");
    }

    #[test]
    fn fallback_name_never_replaces_supplied_name() {
        let mut existing = product(Some("A1"), "Old", None, Some("10"));
        existing.group = Group::Paper;
        existing.subcategory = "Paper Towels".into();
        let mut incoming = product(Some("A1"), "A1", None, Some("12"));
        incoming.name_is_fallback = true;

        merge(&mut existing, &incoming, PricePolicy::LatestSource);
        assert_eq!(existing.name, "Old");
        assert!(!existing.name_is_fallback);
        assert_eq!(existing.group, Group::Paper);
        assert_eq!(existing.subcategory, "Paper Towels");
        assert_eq!(existing.price.as_deref(), Some("12"));
    }

    #[test]
    fn supplied_name_replaces_fallback_name() {
        let mut existing = product(Some("A1"), "A1", None, None);
        existing.name_is_fallback = true;
        let mut incoming = product(Some("A1"), "Bardak", None, None);
        incoming.group = Group::Plastic;

        merge(&mut existing, &incoming, PricePolicy::LatestSource);
        assert_eq!(existing.name, "Bardak");
        assert!(!existing.name_is_fallback);
        assert_eq!(existing.group, Group::Plastic);
    }

    #[test]
    fn index_merges_case_colliding_codes() {
        let mut index = MergeIndex::new();
        index.insert(product(Some("ab1"), "One", None, Some("1")), PricePolicy::LatestSource);
        index.insert(product(Some("AB1"), "Two", None, Some("2")), PricePolicy::LatestSource);
        assert_eq!(index.len(), 1);
        assert_eq!(index.merged(), 1);
        let products = index.into_products();
        assert_eq!(products[0].name, "Two");
        assert_eq!(products[0].price.as_deref(), Some("2"));
    }

    #[test]
    fn index_name_info_identity() {
        let mut index = MergeIndex::new();
        let policy = PricePolicy::LatestSource;
        index.insert(product(None, "Peçete 100'lü", Some("beyaz"), None), policy);
        index.insert(product(None, "peçete  100'LÜ", Some("Beyaz"), None), policy);
        index.insert(product(None, "Peçete 100'lü", Some("renkli"), None), policy);
        assert_eq!(index.len(), 2);
        assert_eq!(index.merged(), 1);
    }

    #[test]
    fn index_preserves_first_insertion_order() {
        let mut index = MergeIndex::new();
        let policy = PricePolicy::LatestSource;
        index.insert(product(Some("B"), "b", None, None), policy);
        index.insert(product(Some("A"), "a", None, None), policy);
        index.insert(product(Some("B"), "b2", None, None), policy);
        let names: Vec<_> = index.into_products().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["b2", "a"]);
    }

    #[test]
    fn collapse_keeps_first_by_name() {
        let products = vec![
            product(Some("1"), "Z Havlu", None, Some("5")),
            product(Some("2"), "z  HAVLU", Some("other"), Some("6")),
            product(Some("3"), "Peçete", None, None),
        ];
        let (kept, dropped) = collapse_by_name(products);
        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].code.as_deref(), Some("1"));
        assert_eq!(kept[1].name, "Peçete");
    }
}
