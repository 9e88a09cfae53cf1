use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Config validation error (duplicate source, bad layout, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),

    /// Delimited data could not be parsed.
    #[error("source '{source_name}': malformed data: {reason}")]
    MalformedSource { source_name: String, reason: String },

    /// A header-keyed column reference did not match any header cell.
    #[error("source '{source_name}': missing column '{column}'")]
    MissingColumn { source_name: String, column: String },

    /// Loaded input does not match the configured sources.
    #[error("source '{0}' is not declared in the config")]
    UnknownSource(String),
}
