use std::collections::HashSet;
use std::path::{Path, PathBuf};

use prodcat_catalog::config::OutputConfig;
use prodcat_catalog::model::{CatalogMeta, CatalogSummary};
use prodcat_catalog::CatalogResult;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::IoError;

/// Write `value` as pretty-printed UTF-8 JSON with a trailing newline,
/// creating parent directories as needed.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), IoError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| IoError::write(parent, e))?;
    }
    let mut text = serde_json::to_string_pretty(value).map_err(|e| IoError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;
    text.push('\n');
    std::fs::write(path, text).map_err(|e| IoError::write(path, e))
}

#[derive(Serialize)]
struct SummaryDocument<'a> {
    meta: &'a CatalogMeta,
    #[serde(flatten)]
    summary: &'a CatalogSummary,
}

/// Write every output document under `out_dir`. Returns the written paths.
///
/// Group and view directories only ever hold this run's documents: stale
/// `.json` files left by an earlier build are removed.
pub fn write_outputs(
    result: &CatalogResult,
    out_dir: &Path,
    output: &OutputConfig,
) -> Result<Vec<PathBuf>, IoError> {
    let mut written = Vec::new();

    let catalog_path = out_dir.join(&output.catalog);
    write_json(&catalog_path, &result.catalog)?;
    written.push(catalog_path);

    let groups_dir = out_dir.join(&output.groups_dir);
    let mut group_files = Vec::new();
    for group in &result.groups {
        let path = groups_dir.join(format!("{}.json", group.slug));
        write_json(&path, &group.products)?;
        group_files.push(path);
    }
    prune_stale(&groups_dir, &group_files)?;
    written.extend(group_files);

    let views_dir = out_dir.join(&output.views_dir);
    let mut view_files = Vec::new();
    for view in &result.views {
        let path = views_dir.join(format!("{}.json", view.name));
        write_json(&path, &view.products)?;
        view_files.push(path);
    }
    prune_stale(&views_dir, &view_files)?;
    written.extend(view_files);

    let summary_path = out_dir.join(&output.summary);
    write_json(
        &summary_path,
        &SummaryDocument {
            meta: &result.meta,
            summary: &result.summary,
        },
    )?;
    written.push(summary_path);

    info!(dir = %out_dir.display(), files = written.len(), "wrote catalog outputs");
    Ok(written)
}

fn prune_stale(dir: &Path, keep: &[PathBuf]) -> Result<(), IoError> {
    let keep: HashSet<&PathBuf> = keep.iter().collect();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(IoError::read(dir, e)),
    };
    for entry in entries {
        let path = entry.map_err(|e| IoError::read(dir, e))?.path();
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        if is_json && path.is_file() && !keep.contains(&path) {
            debug!(path = %path.display(), "removing stale output");
            std::fs::remove_file(&path).map_err(|e| IoError::write(&path, e))?;
        }
    }
    Ok(())
}
