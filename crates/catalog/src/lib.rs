//! `prodcat-catalog`: product catalog classification and reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded source text, returns the assembled
//! catalog. No CLI or filesystem dependencies.

pub mod assemble;
pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod model;
pub mod normalize;
pub mod source;
pub mod summary;
pub mod taxonomy;
pub mod views;

pub use config::CatalogConfig;
pub use engine::run;
pub use error::CatalogError;
pub use model::{CatalogInput, CatalogResult, Group, LoadedSource, Product};
pub use taxonomy::{classify, Classification};
