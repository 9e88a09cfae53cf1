use std::path::{Path, PathBuf};

use prodcat_catalog::CatalogError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    /// One or more required sources do not exist. Lists every missing path.
    #[error("missing required source file(s): {}", join_paths(.0))]
    MissingSources(Vec<PathBuf>),

    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Bytes are not valid under any encoding in the fallback chain.
    #[error("cannot decode {} as UTF-8, Windows-1254 or Windows-1252", .path.display())]
    Decode { path: PathBuf },

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot serialize {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl IoError {
    pub(crate) fn read(path: &Path, source: std::io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn write(path: &Path, source: std::io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}
