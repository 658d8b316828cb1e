//! Loading of historical yield exports whose schema is only known at runtime.

mod discovery;
mod normalizer;
mod parser;
pub mod schema;

pub use normalizer::title_case;
pub(crate) use normalizer::contains_ignore_case;
pub use schema::{
    ColumnPattern, ColumnRole, ResolvedColumn, ResolvedSchema, SchemaAmbiguity, SchemaMapping,
};

use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One census row reduced to the fields scoring needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldRecord {
    pub region: String,
    pub crop: String,
    /// Tons per hectare.
    pub yield_value: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("yield data directory not found: {}", .dir.display())]
    DirectoryMissing { dir: PathBuf },
    #[error("could not find a yield dataset in {}; found: {files:?}", .dir.display())]
    NoYieldFile { dir: PathBuf, files: Vec<String> },
    #[error("yield dataset has no {role} column; headers: {headers:?}")]
    MissingColumn { role: ColumnRole, headers: Vec<String> },
    #[error("failed to read yield dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid yield CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// In-memory yield table, read-only once loaded.
#[derive(Debug, Clone)]
pub struct YieldDataset {
    source: Option<PathBuf>,
    columns: Vec<String>,
    schema: ResolvedSchema,
    records: Vec<YieldRecord>,
    skipped_rows: usize,
}

impl YieldDataset {
    /// File the dataset was read from, when it came from disk.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Normalized headers in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn schema(&self) -> &ResolvedSchema {
        &self.schema
    }

    pub fn records(&self) -> &[YieldRecord] {
        &self.records
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Finds and parses the yield export using a declared schema mapping.
#[derive(Debug, Clone, Default)]
pub struct YieldDatasetLoader {
    mapping: SchemaMapping,
}

impl YieldDatasetLoader {
    pub fn new(mapping: SchemaMapping) -> Self {
        Self { mapping }
    }

    pub fn load_dir<P: AsRef<Path>>(&self, dir: P) -> Result<YieldDataset, LoadError> {
        let path = discovery::select_yield_file(dir.as_ref())?;
        info!(file = %path.display(), "loading yield context");
        self.load_file(path)
    }

    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<YieldDataset, LoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let mut dataset = self.parse_reader(file)?;
        dataset.source = Some(path.to_path_buf());
        Ok(dataset)
    }

    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<YieldDataset, LoadError> {
        let table = parser::parse_table(reader, &self.mapping)?;

        for column in table.schema.columns() {
            info!(role = %column.role, header = %column.header, "mapped yield column");
        }
        for ambiguity in table.schema.ambiguities() {
            warn!(
                role = %ambiguity.role,
                chosen = %ambiguity.chosen,
                ignored = %ambiguity.ignored,
                "ambiguous yield column; keeping the first match"
            );
        }
        if table.skipped_rows > 0 {
            warn!(
                skipped = table.skipped_rows,
                "dropped rows without a numeric yield"
            );
        }
        info!(rows = table.records.len(), "yield dataset loaded");

        Ok(YieldDataset {
            source: None,
            columns: table.columns,
            schema: table.schema,
            records: table.records,
            skipped_rows: table.skipped_rows,
        })
    }
}
