use std::path::Path;

use encoding_rs::{Encoding, WINDOWS_1252, WINDOWS_1254};
use tracing::debug;

use crate::error::IoError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Single-byte encodings tried, in order, when the bytes are not UTF-8.
const FALLBACKS: &[&Encoding] = &[WINDOWS_1254, WINDOWS_1252];

/// Decode bytes with the fallback chain: UTF-8 (BOM stripped), then
/// Windows-1254, then Windows-1252. Returns the text and the encoding name.
pub fn decode_bytes(bytes: &[u8]) -> Option<(String, &'static str)> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(body) {
        return Some((text.to_string(), "UTF-8"));
    }

    FALLBACKS.iter().find_map(|encoding| {
        encoding
            .decode_without_bom_handling_and_without_replacement(body)
            .map(|text| (text.into_owned(), encoding.name()))
    })
}

/// Read a file and decode it with [`decode_bytes`].
pub fn read_text(path: &Path) -> Result<String, IoError> {
    let bytes = std::fs::read(path).map_err(|e| IoError::read(path, e))?;
    let (text, encoding) = decode_bytes(&bytes).ok_or_else(|| IoError::Decode {
        path: path.to_path_buf(),
    })?;
    debug!(path = %path.display(), encoding, "decoded");
    Ok(text)
}
