use tracing::{debug, info};

use crate::assemble::{group_catalogs, sort_catalog};
use crate::config::{CatalogConfig, DedupeStrategy, SourceKind};
use crate::error::CatalogError;
use crate::identity::{collapse_by_name, MergeIndex};
use crate::model::{CatalogInput, CatalogMeta, CatalogResult, Group, Product, SourceStats};
use crate::normalize::{clean_scalar, normalize_record, repair_text, NormalizeOptions};
use crate::source::{parse_delimited, parse_structured, ParsedSource, SourceRecord};
use crate::summary::compute_summary;
use crate::taxonomy::{classify, TAXONOMY_VERSION};
use crate::views::build_views;

/// Build the catalog per config from pre-loaded sources.
///
/// Sources are processed in `input` order, which is also the merge order: a
/// later source overrides an earlier one.
pub fn run(config: &CatalogConfig, input: &CatalogInput) -> Result<CatalogResult, CatalogError> {
    let opts = NormalizeOptions {
        currency_symbol: &config.currency_symbol,
        placeholder_name: &config.placeholder_name,
    };

    let mut stats = Vec::with_capacity(input.sources.len());
    let mut products = Vec::new();

    for loaded in &input.sources {
        let source = config
            .source(&loaded.name)
            .ok_or_else(|| CatalogError::UnknownSource(loaded.name.clone()))?;

        let parsed: ParsedSource = match source.kind {
            SourceKind::Csv => parse_delimited(&source.name, &loaded.text, &source.layout)?,
            SourceKind::Json => parse_structured(&source.name, &loaded.text),
        };

        info!(
            source = %source.name,
            kind = %source.kind,
            records = parsed.records.len(),
            skipped = parsed.skipped,
            "loaded source"
        );

        stats.push(SourceStats {
            name: source.name.clone(),
            kind: source.kind,
            records: parsed.records.len(),
            skipped: parsed.skipped,
        });

        products.extend(
            parsed
                .records
                .iter()
                .map(|record| build_product(record, config.reclassify_legacy, &opts)),
        );
    }

    let records_in = products.len();
    let (mut catalog, duplicates_resolved) = match config.dedupe {
        DedupeStrategy::MergeByKey => {
            let mut index = MergeIndex::new();
            for product in products {
                index.insert(product, config.price_policy);
            }
            let merged = index.merged();
            (index.into_products(), merged)
        }
        DedupeStrategy::CollapseByName => collapse_by_name(products),
    };

    sort_catalog(&mut catalog);
    let summary = compute_summary(&catalog, records_in, duplicates_resolved);

    info!(
        records_in,
        products = catalog.len(),
        duplicates_resolved,
        dedupe = %config.dedupe,
        "catalog assembled"
    );

    Ok(CatalogResult {
        meta: CatalogMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            taxonomy_version: TAXONOMY_VERSION,
            dedupe: config.dedupe,
            sources: stats,
        },
        summary,
        groups: group_catalogs(&catalog),
        views: build_views(&catalog),
        catalog,
    })
}

/// Normalize and classify one record. A stored group/subcategory from a
/// previously exported entry is kept unless `reclassify` is set.
fn build_product(record: &SourceRecord, reclassify: bool, opts: &NormalizeOptions<'_>) -> Product {
    let clean = normalize_record(&record.raw, opts);
    let classification = classify(clean.code.as_deref(), &clean.name, clean.info.as_deref());

    let (stored_group, stored_subcategory) = if reclassify {
        (None, None)
    } else {
        let group = record.stored.group.as_deref().and_then(|label| {
            let parsed = Group::parse(&repair_text(label));
            if parsed.is_none() {
                debug!(
                    source = %record.origin.source,
                    row = record.origin.row,
                    label,
                    "unrecognised stored group; classifying"
                );
            }
            parsed
        });
        let subcategory = record
            .stored
            .subcategory
            .as_deref()
            .and_then(|s| clean_scalar(&repair_text(s)));
        (group, subcategory)
    };

    Product {
        code: clean.code,
        name: clean.name,
        info: clean.info,
        unit: clean.unit,
        vat: clean.vat,
        price: clean.price,
        subcategory: stored_subcategory.unwrap_or_else(|| classification.subcategory.to_string()),
        group: stored_group.unwrap_or(classification.group),
        image: record.stored.image.clone(),
        name_is_fallback: clean.name_is_fallback,
    }
}
