use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt catalog cache {path}: {source}")]
    Cache {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported cache version {found} (expected {expected})")]
    CacheVersion { found: u32, expected: u32 },
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
