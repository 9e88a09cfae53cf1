//! `prodcat build|validate|classify|rules`: catalog commands.

use std::path::{Path, PathBuf};

use prodcat_catalog::model::CatalogResult;
use prodcat_catalog::taxonomy::{self, rules::DecisionTable, TAXONOMY_VERSION};
use prodcat_catalog::CatalogConfig;
use prodcat_io::IoError;
use serde::Serialize;

use crate::exit_codes::{catalog_exit_code, io_exit_code, EXIT_USAGE, EXIT_WRITE};
use crate::CliError;

fn io_err(err: IoError) -> CliError {
    let code = io_exit_code(&err);
    let hint = match &err {
        IoError::MissingSources(_) => {
            Some("source paths are resolved relative to the config file's directory")
        }
        IoError::Decode { .. } => Some("export the file as UTF-8, Windows-1254 or Windows-1252"),
        _ => None,
    };
    let cli = CliError::new(code, err.to_string());
    match hint {
        Some(h) => cli.with_hint(h),
        None => cli,
    }
}

fn read_config(path: &Path) -> Result<CatalogConfig, CliError> {
    prodcat_io::load_config(path).map_err(|err| match err {
        IoError::Read { .. } => CliError::new(EXIT_USAGE, err.to_string())
            .with_hint("pass the path to a catalog .toml config"),
        other => io_err(other),
    })
}

fn config_dir(config_path: &Path) -> &Path {
    config_path.parent().unwrap_or_else(|| Path::new("."))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::new(EXIT_WRITE, format!("JSON serialization error: {e}")))
}

// ============================================================================
// build
// ============================================================================

pub fn cmd_build(
    config_path: PathBuf,
    output_dir: Option<PathBuf>,
    json_output: bool,
    dry_run: bool,
) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    let base_dir = config_dir(&config_path);

    let input = prodcat_io::load_sources(&config, base_dir).map_err(io_err)?;
    let result = prodcat_catalog::run(&config, &input)
        .map_err(|e| CliError::new(catalog_exit_code(&e), e.to_string()))?;

    let out_dir =
        output_dir.unwrap_or_else(|| prodcat_io::resolve_path(base_dir, &config.output.dir));
    if dry_run {
        eprintln!("dry run: nothing written (would write to {})", out_dir.display());
    } else {
        let written =
            prodcat_io::write_outputs(&result, &out_dir, &config.output).map_err(io_err)?;
        eprintln!("wrote {} file(s) to {}", written.len(), out_dir.display());
    }

    if json_output {
        println!("{}", to_json(&result.summary)?);
    }

    eprintln!("{}", summary_line(&result));
    Ok(())
}

fn summary_line(result: &CatalogResult) -> String {
    let s = &result.summary;
    let groups = s
        .groups
        .iter()
        .map(|(group, count)| format!("{} {count}", group.slug()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "catalog '{}': {} product(s) from {} record(s), {} duplicate(s) resolved ({})",
        result.meta.config_name, s.total_products, s.records_in, s.duplicates_resolved, groups,
    )
}

// ============================================================================
// validate
// ============================================================================

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    let required = config.sources.iter().filter(|s| s.is_required()).count();
    eprintln!(
        "valid: catalog '{}' with {} source(s) ({} required), dedupe {}",
        config.name,
        config.sources.len(),
        required,
        config.dedupe,
    );
    Ok(())
}

// ============================================================================
// classify
// ============================================================================

#[derive(Serialize)]
struct ClassifyOutput<'a> {
    group: prodcat_catalog::Group,
    subcategory: &'a str,
    rule: &'a str,
    taxonomy_version: u32,
}

pub fn cmd_classify(
    code: &str,
    name: &str,
    info: Option<&str>,
    json_output: bool,
) -> Result<(), CliError> {
    if name.trim().is_empty() {
        return Err(CliError::new(EXIT_USAGE, "--name must not be empty"));
    }
    let code = Some(code).filter(|c| !c.trim().is_empty());
    let c = taxonomy::classify(code, name, info);

    if json_output {
        let out = ClassifyOutput {
            group: c.group,
            subcategory: c.subcategory,
            rule: c.rule,
            taxonomy_version: TAXONOMY_VERSION,
        };
        println!("{}", to_json(&out)?);
    } else {
        println!("group:        {}", c.group);
        println!("subcategory:  {}", c.subcategory);
        println!("rule:         {}", c.rule);
    }
    Ok(())
}

// ============================================================================
// rules
// ============================================================================

pub fn cmd_rules(json_output: bool) -> Result<(), CliError> {
    let table = taxonomy::decision_table();
    if json_output {
        println!("{}", to_json(&table)?);
    } else {
        print!("{}", render_table(&table));
    }
    Ok(())
}

fn list(words: &[&str]) -> String {
    words.join(", ")
}

fn render_table(table: &DecisionTable) -> String {
    let mut out = format!("taxonomy version {}\n\ngroup rules (first match wins):\n", table.version);
    for (i, rule) in table.group_rules.iter().enumerate() {
        out.push_str(&format!("{:>3}. {:<16} -> {}\n", i + 1, rule.id, rule.group));
        if !rule.prefixes.is_empty() {
            out.push_str(&format!("       prefixes: {}\n", list(rule.prefixes)));
        }
        if !rule.code_markers.is_empty() {
            out.push_str(&format!("       code markers: {}\n", list(rule.code_markers)));
        }
        out.push_str(&format!("       keywords: {}\n", list(rule.keywords)));
        if !rule.keyword_guard.is_empty() {
            let guarded: Vec<&str> = rule
                .keyword_guard
                .iter()
                .flat_map(|set| set.iter().copied())
                .collect();
            out.push_str(&format!("       keywords ignored for prefixes: {}\n", list(&guarded)));
        }
        if let Some(divert) = &rule.divert {
            out.push_str(&format!(
                "       -> {} when also: {}\n",
                divert.group,
                list(divert.keywords)
            ));
        }
    }
    out.push_str(&format!("  default -> {}\n", table.default_group));

    out.push_str("\nsubcategory rules (name only, first match wins):\n");
    for (i, rule) in table.subcategory_rules.iter().enumerate() {
        let mut parts = Vec::new();
        if !rule.all.is_empty() {
            parts.push(format!("all [{}]", list(rule.all)));
        }
        if !rule.any.is_empty() {
            parts.push(format!("any [{}]", list(rule.any)));
        }
        if !rule.none.is_empty() {
            parts.push(format!("none [{}]", list(rule.none)));
        }
        out.push_str(&format!("{:>3}. {:<32} {}\n", i + 1, rule.label, parts.join(" ")));
    }
    out.push_str(&format!("  default -> {}\n", table.default_subcategory));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_table_lists_rules_in_order() {
        let text = render_table(&taxonomy::decision_table());
        let printed = text.find("printed-model").unwrap();
        let food = text.find("food").unwrap();
        assert!(printed < food);
        assert!(text.contains("default -> Packaging"));
        assert!(text.contains("default -> General Products"));
        assert!(text.contains("none [POSET]"));
    }
}
