use crate::model::{Group, GroupCatalog, Product};
use crate::taxonomy::fold;

/// Order products by group display order, then folded subcategory, then
/// folded name. Stable: full ties keep insertion order.
pub fn sort_catalog(products: &mut [Product]) {
    products.sort_by_cached_key(|p| (p.group, fold(&p.subcategory), fold(&p.name)));
}

/// One sub-catalog per present group, in display order. Expects `sorted` to
/// already be in catalog order, so each group stays sorted by
/// (subcategory, name).
pub fn group_catalogs(sorted: &[Product]) -> Vec<GroupCatalog> {
    Group::ALL
        .into_iter()
        .filter_map(|group| {
            let products: Vec<Product> = sorted.iter().filter(|p| p.group == group).cloned().collect();
            if products.is_empty() {
                None
            } else {
                Some(GroupCatalog {
                    group,
                    slug: group.slug(),
                    products,
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(group: Group, subcategory: &str, name: &str, info: Option<&str>) -> Product {
        Product {
            code: None,
            name: name.into(),
            info: info.map(String::from),
            unit: None,
            vat: None,
            price: None,
            subcategory: subcategory.into(),
            group,
            image: None,
            name_is_fallback: false,
        }
    }

    #[test]
    fn sorts_by_group_then_subcategory_then_name() {
        let mut products = vec![
            product(Group::Food, "Tea Solutions", "Lipton", None),
            product(Group::Paper, "Toilet Paper", "B", None),
            product(Group::Paper, "Paper Towels", "Z", None),
            product(Group::PrintedModel, "General Products", "A", None),
            product(Group::Paper, "Toilet Paper", "a", None),
        ];
        sort_catalog(&mut products);
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Z", "a", "B", "Lipton", "A"]);
    }

    #[test]
    fn folded_comparison_ignores_accents() {
        let mut products = vec![
            product(Group::Paper, "X", "Şeker", None),
            product(Group::Paper, "X", "Peçete", None),
            product(Group::Paper, "X", "Sabun", None),
        ];
        sort_catalog(&mut products);
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Peçete", "Sabun", "Şeker"]);
    }

    #[test]
    fn full_ties_keep_insertion_order() {
        let mut products = vec![
            product(Group::Paper, "Paper Towels", "Havlu", Some("first")),
            product(Group::Food, "Tea Solutions", "Çay", None),
            product(Group::Paper, "Paper Towels", "Havlu", Some("second")),
        ];
        sort_catalog(&mut products);
        assert_eq!(products[0].info.as_deref(), Some("first"));
        assert_eq!(products[1].info.as_deref(), Some("second"));
    }

    #[test]
    fn groups_only_present_in_display_order() {
        let mut products = vec![
            product(Group::Stationery, "Office Paper", "A4", None),
            product(Group::Paper, "Paper Towels", "Havlu", None),
            product(Group::Stationery, "Cash Register & POS Rolls", "Rulo", None),
        ];
        sort_catalog(&mut products);
        let groups = group_catalogs(&products);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group, Group::Paper);
        assert_eq!(groups[1].slug, "stationery");
        let names: Vec<_> = groups[1].products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Rulo", "A4"]);
    }
}
