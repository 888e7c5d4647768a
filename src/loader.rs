//! Benchmark record loading.
//!
//! This module locates each dataset's CSV file under the results directory
//! and reads it into a [`Table`] of typed fields.

use crate::error::AnalysisError;
use crate::models::{Dataset, Field, Record, Table};
use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads dataset CSV files from a results directory.
#[derive(Debug, Clone)]
pub struct RecordLoader {
    results_dir: PathBuf,
}

impl RecordLoader {
    /// Create a loader rooted at `results_dir`.
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    /// Path of the CSV file for `dataset`.
    pub fn path_for(&self, dataset: Dataset) -> PathBuf {
        self.results_dir.join(dataset.csv_file_name())
    }

    /// Fail on the first dataset whose input file is absent.
    pub fn check_inputs(&self, datasets: &[Dataset]) -> Result<(), AnalysisError> {
        for &dataset in datasets {
            let path = self.path_for(dataset);
            if !path.is_file() {
                return Err(AnalysisError::MissingInput { path });
            }
        }
        Ok(())
    }

    /// Load `dataset` and check its header carries the required columns.
    pub fn load(&self, dataset: Dataset) -> Result<Table, AnalysisError> {
        let path = self.path_for(dataset);
        load_table(dataset, &path)
    }
}

/// Read a dataset from a CSV file on disk.
pub fn load_table(dataset: Dataset, path: &Path) -> Result<Table, AnalysisError> {
    if !path.is_file() {
        return Err(AnalysisError::MissingInput {
            path: path.to_path_buf(),
        });
    }

    debug!("Reading {} from {}", dataset, path.display());
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    parse_table(dataset, file)
}

/// Read a dataset from any CSV source with a header row.
pub fn parse_table<R: Read>(dataset: Dataset, reader: R) -> Result<Table, AnalysisError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        records.push(Record {
            fields: row.iter().map(Field::parse).collect(),
        });
    }

    let table = Table::new(dataset, columns, records);
    table.require_columns(dataset.required_columns())?;

    debug!("Loaded {} rows for {}", table.len(), dataset);
    Ok(table)
}
