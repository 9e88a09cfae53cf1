//! Field-level cleanup applied to every record before classification.
//!
//! Exports arrive in whatever code page the accounting package happened to
//! use, so text is first repaired against a fixed table of known mis-decodings,
//! then collapsed (multi-line fields) or trimmed (scalar fields).

use crate::model::RawRecord;

/// Separator used when a multi-line field is collapsed to one line.
pub const LINE_JOINER: &str = " | ";

/// Mis-decoded sequences and the characters they stand for.
///
/// The multi-character entries are UTF-8 byte pairs that were read as
/// Windows-1252; the single-character entries are Windows-1254 letters read as
/// Latin-1. Longer sequences must come first so that a pair is never split by
/// a single-character replacement.
const REPAIRS: &[(&str, &str)] = &[
    // UTF-8 read as Windows-1252
    ("Ã§", "ç"),
    ("Ã‡", "Ç"),
    ("Ã¶", "ö"),
    ("Ã–", "Ö"),
    ("Ã¼", "ü"),
    ("Ãœ", "Ü"),
    ("Ä±", "ı"),
    ("Ä°", "İ"),
    ("ÄŸ", "ğ"),
    ("Äž", "Ğ"),
    ("ÅŸ", "ş"),
    ("Åž", "Ş"),
    ("Ã¢", "â"),
    ("Ã®", "î"),
    ("Ã»", "û"),
    // Windows-1254 read as Latin-1
    ("Ð", "Ğ"),
    ("ð", "ğ"),
    ("Ý", "İ"),
    ("ý", "ı"),
    ("Þ", "Ş"),
    ("þ", "ş"),
];

/// Leading characters that replace a currency glyph lost in transcoding.
const CORRUPT_CURRENCY_MARKERS: &[char] = &['\u{FFFD}', '¤', '?'];

/// Replace known mis-decoded sequences with the intended characters.
pub fn repair_text(value: &str) -> String {
    let mut out = value.to_string();
    for (broken, fixed) in REPAIRS {
        if out.contains(broken) {
            out = out.replace(broken, fixed);
        }
    }
    out
}

/// Collapse a possibly multi-line field to one line joined by [`LINE_JOINER`].
///
/// Returns `None` when no non-empty line remains.
pub fn collapse_multiline(value: &str) -> Option<String> {
    let parts: Vec<&str> = value
        .split(|c| c == '\r' || c == '\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(LINE_JOINER))
    }
}

/// Trim a scalar field; empty becomes `None`.
pub fn clean_scalar(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Restore the currency glyph when a price starts with a corruption marker.
pub fn repair_price(price: &str, currency_symbol: &str) -> String {
    match price.chars().next() {
        Some(first) if CORRUPT_CURRENCY_MARKERS.contains(&first) => {
            format!("{currency_symbol}{}", &price[first.len_utf8()..])
        }
        _ => price.to_string(),
    }
}

/// Collapse whitespace runs and case-fold. Used for identity comparison only.
pub fn identity_text(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Options that shape how a raw record is cleaned.
#[derive(Debug, Clone)]
pub struct NormalizeOptions<'a> {
    pub currency_symbol: &'a str,
    pub placeholder_name: &'a str,
}

/// A raw record with every field cleaned, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanRecord {
    pub code: Option<String>,
    pub name: String,
    pub info: Option<String>,
    pub unit: Option<String>,
    pub vat: Option<String>,
    pub price: Option<String>,
    /// The record carried no name; `name` is the code or the placeholder.
    pub name_is_fallback: bool,
}

/// Clean every field of a raw record. The name falls back to the code, then to
/// the configured placeholder, so it is never empty.
pub fn normalize_record(raw: &RawRecord, opts: &NormalizeOptions<'_>) -> CleanRecord {
    let code = clean_scalar(&repair_text(&raw.code));
    let supplied = collapse_multiline(&repair_text(&raw.name));
    let name_is_fallback = supplied.is_none();
    let name = supplied
        .or_else(|| code.clone())
        .unwrap_or_else(|| opts.placeholder_name.to_string());

    CleanRecord {
        name,
        name_is_fallback,
        info: collapse_multiline(&repair_text(&raw.info)),
        unit: clean_scalar(&repair_text(&raw.unit)),
        vat: clean_scalar(&repair_text(&raw.vat)),
        price: clean_scalar(&repair_text(&raw.price))
            .map(|p| repair_price(&p, opts.currency_symbol)),
        code,
    }
}
