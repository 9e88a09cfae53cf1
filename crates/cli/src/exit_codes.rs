//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! # Exit Codes
//!
//! | Code | Domain    | Description                                       |
//! |------|-----------|---------------------------------------------------|
//! | 0    | Universal | Success                                           |
//! | 1    | Universal | General error (unspecified)                       |
//! | 2    | Universal | CLI usage error (bad args, unreadable config)     |
//! | 3    | build     | One or more required sources are missing          |
//! | 4    | build     | A source could not be decoded or parsed           |
//! | 5    | config    | Config does not parse or fails validation         |
//! | 6    | build     | An output document could not be written           |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use prodcat_catalog::CatalogError;
use prodcat_io::IoError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, config file cannot be read.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Build (3-6)
// =============================================================================

/// Required source file(s) absent. Raised before anything is written.
pub const EXIT_MISSING_SOURCE: u8 = 3;

/// Source bytes undecodable under every encoding tried, or delimited data
/// that cannot be parsed (including a header-labelled column that is absent).
pub const EXIT_MALFORMED_SOURCE: u8 = 4;

/// Config TOML does not parse or fails validation.
pub const EXIT_INVALID_CONFIG: u8 = 5;

/// Output directory or document cannot be written.
pub const EXIT_WRITE: u8 = 6;

// =============================================================================
// Error mapping
// =============================================================================

/// Map an engine error to its exit code.
pub fn catalog_exit_code(err: &CatalogError) -> u8 {
    match err {
        CatalogError::ConfigParse(_) | CatalogError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        CatalogError::MalformedSource { .. } | CatalogError::MissingColumn { .. } => {
            EXIT_MALFORMED_SOURCE
        }
        CatalogError::UnknownSource(_) => EXIT_ERROR,
    }
}

/// Map an I/O error to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::MissingSources(_) => EXIT_MISSING_SOURCE,
        IoError::Read { .. } => EXIT_ERROR,
        IoError::Decode { .. } => EXIT_MALFORMED_SOURCE,
        IoError::Write { .. } | IoError::Serialize { .. } => EXIT_WRITE,
        IoError::Catalog(e) => catalog_exit_code(e),
    }
}
