use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{DedupeStrategy, SourceKind};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Where a raw record came from. For delimited sources `row` is the 1-based
/// physical line the record starts on; for structured sources it is the
/// 1-based entry position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOrigin {
    pub source: String,
    pub row: usize,
}

/// Free-text fields exactly as read from a delimited source.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    pub code: String,
    pub name: String,
    pub info: String,
    pub unit: String,
    pub vat: String,
    pub price: String,
}

impl RawRecord {
    pub fn is_blank(&self) -> bool {
        [&self.code, &self.name, &self.info, &self.unit, &self.vat, &self.price]
            .iter()
            .all(|f| f.trim().is_empty())
    }
}

/// Text of one configured source, already decoded to UTF-8.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub name: String,
    pub text: String,
}

/// Pre-loaded sources in processing order. Absent optional sources are omitted.
#[derive(Debug, Default)]
pub struct CatalogInput {
    pub sources: Vec<LoadedSource>,
}

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

/// Top-level taxonomy bucket. Declaration order is the catalog display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Group {
    Paper,
    Plastic,
    Chemical,
    Packaging,
    Food,
    Stationery,
    PrintedModel,
}

impl Group {
    pub const ALL: [Group; 7] = [
        Group::Paper,
        Group::Plastic,
        Group::Chemical,
        Group::Packaging,
        Group::Food,
        Group::Stationery,
        Group::PrintedModel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paper => "Paper",
            Self::Plastic => "Plastic",
            Self::Chemical => "Chemical",
            Self::Packaging => "Packaging",
            Self::Food => "Food",
            Self::Stationery => "Stationery",
            Self::PrintedModel => "PrintedModel",
        }
    }

    /// File-name friendly identifier used for per-group outputs.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Paper => "paper",
            Self::Plastic => "plastic",
            Self::Chemical => "chemical",
            Self::Packaging => "packaging",
            Self::Food => "food",
            Self::Stationery => "stationery",
            Self::PrintedModel => "printed-model",
        }
    }

    /// Label used by earlier catalog exports for this group.
    pub fn legacy_label(&self) -> &'static str {
        match self {
            Self::Paper => "Kağıt Grubu",
            Self::Plastic => "Plastik Grubu",
            Self::Chemical => "Kimyasal Grubu",
            Self::Packaging => "Ambalaj Grubu",
            Self::Food => "Gıda Grubu",
            Self::Stationery => "Kırtasiye Grubu",
            Self::PrintedModel => "Baskılı Model Grubu",
        }
    }

    /// Parse a group from its canonical name, slug, or legacy label (folded comparison).
    pub fn parse(label: &str) -> Option<Group> {
        let wanted = crate::taxonomy::fold(label.trim());
        if wanted.is_empty() {
            return None;
        }
        Group::ALL.into_iter().find(|g| {
            [g.as_str(), g.slug(), g.legacy_label()]
                .iter()
                .any(|candidate| crate::taxonomy::fold(candidate) == wanted)
        })
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Canonical entity
// ---------------------------------------------------------------------------

/// One catalog entity after normalization and classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub code: Option<String>,
    pub name: String,
    pub info: Option<String>,
    pub unit: Option<String>,
    pub vat: Option<String>,
    pub price: Option<String>,
    pub subcategory: String,
    pub group: Group,
    pub image: Option<String>,
    /// `name` was derived from the code or the placeholder, not read from the source.
    #[serde(skip)]
    pub name_is_fallback: bool,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct GroupCatalog {
    pub group: Group,
    pub slug: &'static str,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    pub name: &'static str,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceStats {
    pub name: String,
    pub kind: SourceKind,
    pub records: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub total_products: usize,
    pub records_in: usize,
    pub duplicates_resolved: usize,
    pub groups: BTreeMap<Group, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogMeta {
    pub config_name: String,
    pub engine_version: String,
    pub taxonomy_version: u32,
    pub dedupe: DedupeStrategy,
    pub sources: Vec<SourceStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogResult {
    pub meta: CatalogMeta,
    pub summary: CatalogSummary,
    pub catalog: Vec<Product>,
    pub groups: Vec<GroupCatalog>,
    pub views: Vec<CatalogView>,
}
