use std::collections::HashSet;

use serde::Deserialize;

use crate::error::CatalogError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    pub name: String,
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub dedupe: DedupeStrategy,
    #[serde(default)]
    pub price_policy: PricePolicy,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_placeholder_name")]
    pub placeholder_name: String,
    /// Ignore stored group/subcategory on structured-catalog entries.
    #[serde(default)]
    pub reclassify_legacy: bool,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_currency_symbol() -> String {
    "₺".into()
}

fn default_placeholder_name() -> String {
    "Unnamed Product".into()
}

// ---------------------------------------------------------------------------
// Dedupe + price policy
// ---------------------------------------------------------------------------

/// How records from different sources are reconciled into one entity.
///
/// Exactly one strategy runs per build. `MergeByKey` folds records with the
/// same identity key field by field; `CollapseByName` keeps the first record
/// per normalized display name and drops the rest untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupeStrategy {
    #[default]
    MergeByKey,
    CollapseByName,
}

impl std::fmt::Display for DedupeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MergeByKey => write!(f, "merge_by_key"),
            Self::CollapseByName => write!(f, "collapse_by_name"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PricePolicy {
    /// The most recently processed record always sets the price, even when absent.
    #[default]
    LatestSource,
    /// An absent incoming price keeps the existing one.
    LatestPresent,
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub kind: SourceKind,
    pub file: String,
    /// Defaults to `true` for csv sources, `false` for json.
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub layout: ColumnLayout,
}

impl SourceConfig {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(self.kind == SourceKind::Csv)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Csv,
    Json,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column layout
// ---------------------------------------------------------------------------

/// A column is addressed by 0-based position or by its header label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Index(usize),
    Header(String),
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(i) => write!(f, "#{i}"),
            Self::Header(h) => write!(f, "{h}"),
        }
    }
}

/// Positional layout of the delimited exports. The defaults describe the
/// accounting export: four preamble rows, then `_;_;code;name;info;unit;vat;price`.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnLayout {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default = "default_skip_rows")]
    pub skip_rows: usize,
    /// Row holding header labels. Defaults to the last skipped row.
    #[serde(default)]
    pub header_row: Option<usize>,
    #[serde(default = "col_code")]
    pub code: ColumnRef,
    #[serde(default = "col_name")]
    pub name: ColumnRef,
    #[serde(default = "col_info")]
    pub info: ColumnRef,
    #[serde(default = "col_unit")]
    pub unit: ColumnRef,
    #[serde(default = "col_vat")]
    pub vat: ColumnRef,
    #[serde(default = "col_price")]
    pub price: ColumnRef,
}

fn default_delimiter() -> String {
    ";".into()
}
fn default_skip_rows() -> usize {
    4
}
fn col_code() -> ColumnRef {
    ColumnRef::Index(2)
}
fn col_name() -> ColumnRef {
    ColumnRef::Index(3)
}
fn col_info() -> ColumnRef {
    ColumnRef::Index(4)
}
fn col_unit() -> ColumnRef {
    ColumnRef::Index(5)
}
fn col_vat() -> ColumnRef {
    ColumnRef::Index(6)
}
fn col_price() -> ColumnRef {
    ColumnRef::Index(7)
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            skip_rows: default_skip_rows(),
            header_row: None,
            code: col_code(),
            name: col_name(),
            info: col_info(),
            unit: col_unit(),
            vat: col_vat(),
            price: col_price(),
        }
    }
}

impl ColumnLayout {
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b';')
    }

    pub fn columns(&self) -> [(&'static str, &ColumnRef); 6] {
        [
            ("code", &self.code),
            ("name", &self.name),
            ("info", &self.info),
            ("unit", &self.unit),
            ("vat", &self.vat),
            ("price", &self.price),
        ]
    }

    pub fn uses_headers(&self) -> bool {
        self.columns()
            .iter()
            .any(|(_, c)| matches!(c, ColumnRef::Header(_)))
    }

    /// Row index holding header labels, if one can be determined.
    pub fn header_row_index(&self) -> Option<usize> {
        match self.header_row {
            Some(row) => Some(row),
            None if self.skip_rows > 0 => Some(self.skip_rows - 1),
            None => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_out_dir")]
    pub dir: String,
    #[serde(default = "default_catalog_file")]
    pub catalog: String,
    #[serde(default = "default_groups_dir")]
    pub groups_dir: String,
    #[serde(default = "default_views_dir")]
    pub views_dir: String,
    #[serde(default = "default_summary_file")]
    pub summary: String,
}

fn default_out_dir() -> String {
    "data".into()
}
fn default_catalog_file() -> String {
    "catalog.json".into()
}
fn default_groups_dir() -> String {
    "groups".into()
}
fn default_views_dir() -> String {
    "views".into()
}
fn default_summary_file() -> String {
    "summary.json".into()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_out_dir(),
            catalog: default_catalog_file(),
            groups_dir: default_groups_dir(),
            views_dir: default_views_dir(),
            summary: default_summary_file(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl CatalogConfig {
    pub fn from_toml(input: &str) -> Result<Self, CatalogError> {
        let config: CatalogConfig =
            toml::from_str(input).map_err(|e| CatalogError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.sources.is_empty() {
            return Err(CatalogError::ConfigValidation(
                "at least one source is required".into(),
            ));
        }

        if self.placeholder_name.trim().is_empty() {
            return Err(CatalogError::ConfigValidation(
                "placeholder_name must not be empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.name.as_str()) {
                return Err(CatalogError::ConfigValidation(format!(
                    "duplicate source name '{}'",
                    source.name
                )));
            }

            if source.file.trim().is_empty() {
                return Err(CatalogError::ConfigValidation(format!(
                    "source '{}': file must not be empty",
                    source.name
                )));
            }

            if source.kind == SourceKind::Csv {
                let layout = &source.layout;
                if layout.delimiter.len() != 1 {
                    return Err(CatalogError::ConfigValidation(format!(
                        "source '{}': delimiter must be a single ASCII character, got '{}'",
                        source.name, layout.delimiter
                    )));
                }
                if layout.uses_headers() && layout.header_row_index().is_none() {
                    return Err(CatalogError::ConfigValidation(format!(
                        "source '{}': header-labelled columns need skip_rows > 0 or header_row",
                        source.name
                    )));
                }
                if let Some(row) = layout.header_row {
                    if row >= layout.skip_rows {
                        return Err(CatalogError::ConfigValidation(format!(
                            "source '{}': header_row {row} must be one of the {} skipped rows",
                            source.name, layout.skip_rows
                        )));
                    }
                }
            }
        }

        // A catalog built only from best-effort inputs could silently come out empty.
        let has_required_csv = self
            .sources
            .iter()
            .any(|s| s.kind == SourceKind::Csv && s.is_required());
        if !has_required_csv {
            return Err(CatalogError::ConfigValidation(
                "at least one required csv source is needed".into(),
            ));
        }

        Ok(())
    }

    pub fn source(&self, name: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.name == name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
