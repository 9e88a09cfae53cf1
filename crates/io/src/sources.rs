use std::path::{Path, PathBuf};

use prodcat_catalog::config::SourceConfig;
use prodcat_catalog::{CatalogConfig, CatalogInput, LoadedSource};
use tracing::{info, warn};

use crate::error::IoError;
use crate::text::read_text;

/// Read and validate a catalog config file.
pub fn load_config(path: &Path) -> Result<CatalogConfig, IoError> {
    let text = read_text(path)?;
    Ok(CatalogConfig::from_toml(&text)?)
}

/// Resolve a configured path relative to the config file's directory.
pub fn resolve_path(base_dir: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Load every configured source in config order.
///
/// All required sources are checked before anything is read; if any are
/// absent the error lists every one of them. Optional sources that are absent
/// or cannot be read are skipped with a warning.
pub fn load_sources(config: &CatalogConfig, base_dir: &Path) -> Result<CatalogInput, IoError> {
    let missing: Vec<PathBuf> = config
        .sources
        .iter()
        .filter(|s| s.is_required())
        .map(|s| resolve_path(base_dir, &s.file))
        .filter(|p| !p.is_file())
        .collect();
    if !missing.is_empty() {
        return Err(IoError::MissingSources(missing));
    }

    let mut input = CatalogInput::default();
    for source in &config.sources {
        let path = resolve_path(base_dir, &source.file);
        if !path.is_file() {
            warn!(source = %source.name, path = %path.display(), "optional source not found; skipping");
            continue;
        }
        let Some(text) = tolerate_optional(source, read_text(&path))? else {
            continue;
        };
        info!(source = %source.name, path = %path.display(), bytes = text.len(), "read source");
        input.sources.push(LoadedSource {
            name: source.name.clone(),
            text,
        });
    }
    Ok(input)
}

/// Required sources propagate read errors; optional ones become `None`.
fn tolerate_optional(
    source: &SourceConfig,
    read: Result<String, IoError>,
) -> Result<Option<String>, IoError> {
    match read {
        Ok(text) => Ok(Some(text)),
        Err(e) if !source.is_required() => {
            warn!(source = %source.name, error = %e, "optional source unreadable; skipping");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
