// File I/O operations: everything the catalog engine needs from the filesystem.

pub mod error;
pub mod json;
pub mod sources;
pub mod text;

pub use error::IoError;
pub use json::{write_json, write_outputs};
pub use sources::{load_config, load_sources, resolve_path};
pub use text::{decode_bytes, read_text};
