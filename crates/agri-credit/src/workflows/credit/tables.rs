use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Failure to build an injected lookup table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read table {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid table JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("loss fraction for '{disease}' must lie in [0, 1], got {value}")]
    InvalidLoss { disease: String, value: f64 },
    #[error("market price for '{crop}' must be finite and non-negative, got {value}")]
    InvalidPrice { crop: String, value: f64 },
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, TableError> {
    let file = std::fs::File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(std::io::BufReader::new(file)).map_err(|source| TableError::Json {
        path: path.to_path_buf(),
        source,
    })
}
