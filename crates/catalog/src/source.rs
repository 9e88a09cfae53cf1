//! Turn decoded source text into raw records.
//!
//! Two shapes are supported: semicolon-style delimited exports with a fixed
//! preamble, and catalogs written by an earlier run (or an older tool) as JSON.

use serde_json::{Map, Value};
use tracing::warn;

use crate::config::{ColumnLayout, ColumnRef};
use crate::error::CatalogError;
use crate::model::{RawRecord, RecordOrigin};
use crate::taxonomy::fold;

/// Classification carried by a previously exported entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredFields {
    pub group: Option<String>,
    pub subcategory: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SourceRecord {
    pub origin: RecordOrigin,
    pub raw: RawRecord,
    pub stored: StoredFields,
}

/// Records read from one source plus the number of rows/entries skipped.
#[derive(Debug, Default)]
pub struct ParsedSource {
    pub records: Vec<SourceRecord>,
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Delimited
// ---------------------------------------------------------------------------

/// Parse delimited text per `layout`.
///
/// The first `skip_rows` physical lines are preamble, empty lines included.
/// Empty lines after the preamble are ignored; rows whose cells are all blank
/// count as skipped. Short rows are padded with empty cells.
pub fn parse_delimited(
    source_name: &str,
    text: &str,
    layout: &ColumnLayout,
) -> Result<ParsedSource, CatalogError> {
    let malformed = |e: csv::Error| CatalogError::MalformedSource {
        source_name: source_name.into(),
        reason: e.to_string(),
    };

    let (preamble, body) = split_preamble(text, layout.skip_rows);
    if preamble.len() < layout.skip_rows || body.trim().is_empty() {
        return Ok(ParsedSource::default());
    }

    let header = match layout.header_row_index().filter(|_| layout.uses_headers()) {
        Some(idx) => match preamble.get(idx) {
            Some(line) => header_cells(line, layout.delimiter_byte()).map_err(malformed)?,
            None => None,
        },
        None => None,
    };
    let indices = resolve_columns(source_name, header.as_ref(), layout)?;
    let cell = |row: &csv::StringRecord, idx: usize| row.get(idx).unwrap_or_default().to_string();

    let mut reader = csv_reader(body, layout.delimiter_byte());
    let mut parsed = ParsedSource::default();
    for row in reader.records() {
        let row = row.map_err(malformed)?;
        let raw = RawRecord {
            code: cell(&row, indices[0]),
            name: cell(&row, indices[1]),
            info: cell(&row, indices[2]),
            unit: cell(&row, indices[3]),
            vat: cell(&row, indices[4]),
            price: cell(&row, indices[5]),
        };
        if raw.is_blank() {
            parsed.skipped += 1;
            continue;
        }
        let line = row.position().map_or(0, |p| p.line() as usize);
        parsed.records.push(SourceRecord {
            origin: RecordOrigin {
                source: source_name.to_string(),
                row: layout.skip_rows + line,
            },
            raw,
            stored: StoredFields::default(),
        });
    }
    Ok(parsed)
}

fn csv_reader(text: &str, delimiter: u8) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes())
}

/// Split off the first `skip_rows` physical lines (`\n` or `\r\n`).
fn split_preamble(text: &str, skip_rows: usize) -> (Vec<&str>, &str) {
    let mut preamble = Vec::with_capacity(skip_rows);
    let mut rest = text;
    while preamble.len() < skip_rows && !rest.is_empty() {
        let (line, tail) = match rest.find('\n') {
            Some(end) => (&rest[..end], &rest[end + 1..]),
            None => (rest, ""),
        };
        preamble.push(line.strip_suffix('\r').unwrap_or(line));
        rest = tail;
    }
    (preamble, rest)
}

fn header_cells(line: &str, delimiter: u8) -> Result<Option<csv::StringRecord>, csv::Error> {
    csv_reader(line, delimiter).records().next().transpose()
}

/// Resolve the six field columns to positions, in `ColumnLayout::columns` order.
fn resolve_columns(
    source_name: &str,
    header: Option<&csv::StringRecord>,
    layout: &ColumnLayout,
) -> Result<[usize; 6], CatalogError> {
    let mut out = [0usize; 6];
    for (slot, (field, column)) in out.iter_mut().zip(layout.columns()) {
        *slot = match column {
            ColumnRef::Index(idx) => *idx,
            ColumnRef::Header(label) => {
                let wanted = fold(label.trim());
                header
                    .and_then(|h| h.iter().position(|cell| fold(cell.trim()) == wanted))
                    .ok_or_else(|| CatalogError::MissingColumn {
                        source_name: source_name.into(),
                        column: format!("{field} ({label})"),
                    })?
            }
        };
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Structured (previously exported) catalogs
// ---------------------------------------------------------------------------

const WRAPPER_KEYS: &[&str] = &["items", "products", "data"];

const CODE_KEYS: &[&str] = &["code", "kod"];
const NAME_KEYS: &[&str] = &["name", "isim"];
const INFO_KEYS: &[&str] = &["info", "bilgi"];
const UNIT_KEYS: &[&str] = &["unit", "birim"];
const VAT_KEYS: &[&str] = &["vat", "kdv"];
const PRICE_KEYS: &[&str] = &["price", "fiyat"];
const SUBCATEGORY_KEYS: &[&str] = &["subcategory", "kategori", "category"];
const GROUP_KEYS: &[&str] = &["group", "grup"];
const IMAGE_KEYS: &[&str] = &["image", "resim"];

/// Parse a structured catalog. Never fails: a document that does not parse
/// yields zero records and bad entries are skipped, both logged at warn.
pub fn parse_structured(source_name: &str, text: &str) -> ParsedSource {
    let mut parsed = ParsedSource::default();

    let doc: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            warn!(source = source_name, error = %e, "structured source does not parse; ignoring");
            return parsed;
        }
    };

    let Some(entries) = entry_list(&doc) else {
        warn!(source = source_name, "structured source has no entry list; ignoring");
        return parsed;
    };

    for (pos, entry) in entries.iter().enumerate() {
        let row = pos + 1;
        let Some(record) = entry.as_object().and_then(entry_record) else {
            warn!(source = source_name, entry = row, "skipping malformed entry");
            parsed.skipped += 1;
            continue;
        };
        if record.0.is_blank() {
            parsed.skipped += 1;
            continue;
        }
        parsed.records.push(SourceRecord {
            origin: RecordOrigin {
                source: source_name.to_string(),
                row,
            },
            raw: record.0,
            stored: record.1,
        });
    }
    parsed
}

fn entry_list(doc: &Value) -> Option<&Vec<Value>> {
    match doc {
        Value::Array(items) => Some(items),
        Value::Object(map) => WRAPPER_KEYS
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_array)),
        _ => None,
    }
}

/// Text of the first alias present. `Err` when the value is not a scalar.
fn field(map: &Map<String, Value>, keys: &[&str]) -> Result<String, ()> {
    let Some(value) = keys.iter().find_map(|k| map.get(*k).filter(|v| !v.is_null())) else {
        return Ok(String::new());
    };
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(()),
    }
}

fn optional_field(map: &Map<String, Value>, keys: &[&str]) -> Result<Option<String>, ()> {
    let value = field(map, keys)?;
    Ok(Some(value).filter(|v| !v.trim().is_empty()))
}

fn entry_record(map: &Map<String, Value>) -> Option<(RawRecord, StoredFields)> {
    let build = || -> Result<(RawRecord, StoredFields), ()> {
        let raw = RawRecord {
            code: field(map, CODE_KEYS)?,
            name: field(map, NAME_KEYS)?,
            info: field(map, INFO_KEYS)?,
            unit: field(map, UNIT_KEYS)?,
            vat: field(map, VAT_KEYS)?,
            price: field(map, PRICE_KEYS)?,
        };
        let stored = StoredFields {
            group: optional_field(map, GROUP_KEYS)?,
            subcategory: optional_field(map, SUBCATEGORY_KEYS)?,
            image: optional_field(map, IMAGE_KEYS)?,
        };
        Ok((raw, stored))
    };
    build().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
Firm;;;;;;;
Price list;;;;;;;
;;;;;;;
No;Brand;Code;Name;Info;Unit;VAT;Price
1;X;KHV001;Turkish Coffee 250g;;PK;%10;40.00
;;;;;;;
2;X;MASTER.01;\"Z Havlu\n200 lü\";beyaz;KOLI;%20;₺120
3;X;PST-9;Short row
";

    #[test]
    fn delimited_default_layout() {
        let parsed = parse_delimited("a", EXPORT, &ColumnLayout::default()).unwrap();
        assert_eq!(parsed.records.len(), 3);
        assert_eq!(parsed.skipped, 1);

        let first = &parsed.records[0];
        assert_eq!(first.origin.row, 5);
        assert_eq!(first.raw.code, "KHV001");
        assert_eq!(first.raw.name, "Turkish Coffee 250g");
        assert_eq!(first.raw.price, "40.00");

        assert_eq!(parsed.records[1].raw.name, "Z Havlu\n200 lü");
        assert_eq!(parsed.records[1].origin.row, 7);

        let short = &parsed.records[2].raw;
        assert_eq!(short.name, "Short row");
        assert_eq!(short.price, "");
    }

    #[test]
    fn empty_preamble_lines_count_as_rows() {
        let text = "FIRM\n\nPrice list\nNo;Brand;Code;Name;Info;Unit;VAT;Price\n\
1;X;KHV001;Coffee;;PK;%10;40\n\
2;X;PST-1;Poset;;KOLI;%20;5\n";
        let parsed = parse_delimited("a", text, &ColumnLayout::default()).unwrap();
        let codes: Vec<_> = parsed.records.iter().map(|r| r.raw.code.as_str()).collect();
        assert_eq!(codes, vec!["KHV001", "PST-1"]);
        assert_eq!(parsed.records[0].origin.row, 5);
        assert_eq!(parsed.records[1].origin.row, 6);
    }

    #[test]
    fn header_row_is_found_after_empty_lines() {
        let layout = ColumnLayout {
            skip_rows: 3,
            code: ColumnRef::Header("Kod".into()),
            name: ColumnRef::Header("Urun Adi".into()),
            ..ColumnLayout::default()
        };
        let text = "FIRM\r\n\r\nNo;Kod;Urun Adi\r\n1;A1;Bardak\r\n\r\n2;A2;Tabak\r\n";
        let parsed = parse_delimited("a", text, &layout).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].raw.code, "A1");
        assert_eq!(parsed.records[0].raw.name, "Bardak");
        assert_eq!(parsed.records[1].raw.code, "A2");
    }

    #[test]
    fn delimited_preamble_only_is_empty() {
        let text = "a;b\nc;d\n;\nNo;Brand;Code;Name\n";
        let parsed = parse_delimited("a", text, &ColumnLayout::default()).unwrap();
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.skipped, 0);
        assert!(parse_delimited("a", "", &ColumnLayout::default())
            .unwrap()
            .records
            .is_empty());
    }

    #[test]
    fn delimited_header_columns() {
        let layout = ColumnLayout {
            delimiter: ",".into(),
            skip_rows: 1,
            header_row: None,
            code: ColumnRef::Header("Kod".into()),
            name: ColumnRef::Header("İsim".into()),
            info: ColumnRef::Index(9),
            unit: ColumnRef::Header("birim".into()),
            vat: ColumnRef::Index(9),
            price: ColumnRef::Header("FIYAT".into()),
        };
        let text = "kod,isim,birim,fiyat\nA1,Peçete,PK,12\n";
        let parsed = parse_delimited("b", text, &layout).unwrap();
        assert_eq!(parsed.records.len(), 1);
        let raw = &parsed.records[0].raw;
        assert_eq!(raw.code, "A1");
        assert_eq!(raw.name, "Peçete");
        assert_eq!(raw.unit, "PK");
        assert_eq!(raw.price, "12");
        assert_eq!(raw.info, "");
    }

    #[test]
    fn delimited_missing_header_column() {
        let layout = ColumnLayout {
            skip_rows: 1,
            code: ColumnRef::Header("sku".into()),
            ..ColumnLayout::default()
        };
        let err = parse_delimited("b", "name;price\nx;1\n", &layout).unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn { .. }));
        assert!(err.to_string().contains("sku"));
    }

    #[test]
    fn structured_bare_list_with_aliases() {
        let text = r#"[
            {"kod": "A1", "isim": "Peçete", "fiyat": 12.5, "grup": "Kağıt Grubu", "kategori": "Kare Peçeteler", "resim": "img/a1.png"},
            {"code": null, "name": "Z Havlu", "info": "beyaz", "group": "Paper"}
        ]"#;
        let parsed = parse_structured("legacy", text);
        assert_eq!(parsed.records.len(), 2);
        let first = &parsed.records[0];
        assert_eq!(first.raw.code, "A1");
        assert_eq!(first.raw.price, "12.5");
        assert_eq!(first.stored.group.as_deref(), Some("Kağıt Grubu"));
        assert_eq!(first.stored.subcategory.as_deref(), Some("Kare Peçeteler"));
        assert_eq!(first.stored.image.as_deref(), Some("img/a1.png"));
        assert_eq!(parsed.records[1].raw.code, "");
        assert_eq!(parsed.records[1].stored.subcategory, None);
    }

    #[test]
    fn structured_wrappers() {
        for key in ["items", "products", "data"] {
            let text = format!(r#"{{"{key}": [{{"name": "Bardak"}}]}}"#);
            assert_eq!(parse_structured("w", &text).records.len(), 1, "{key}");
        }
        assert!(parse_structured("w", r#"{"other": []}"#).records.is_empty());
    }

    #[test]
    fn structured_bad_entries_are_skipped() {
        let text = r#"[1, {"name": ["x"]}, {}, {"name": "ok"}]"#;
        let parsed = parse_structured("bad", text);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].origin.row, 4);
        assert_eq!(parsed.skipped, 3);
    }

    #[test]
    fn structured_unparseable_document_is_empty() {
        let parsed = parse_structured("bad", "{ not json");
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.skipped, 0);
    }
}
