//! Summary report assembly.

pub mod formatter;

pub use formatter::*;

use crate::analysis::DatasetStats;
use crate::error::DatasetError;
use crate::models::Dataset;

/// Outcome of one dataset's pipeline, as the report sees it.
#[derive(Debug)]
pub struct Section {
    pub dataset: Dataset,
    pub outcome: Result<DatasetStats, DatasetError>,
}

impl Section {
    pub fn new(dataset: Dataset, outcome: Result<DatasetStats, DatasetError>) -> Self {
        Self { dataset, outcome }
    }
}

/// All sections of the summary, held in report order.
#[derive(Debug, Default)]
pub struct SummaryReport {
    sections: Vec<Section>,
}

impl SummaryReport {
    /// Build a report; sections are reordered into the fixed dataset order.
    pub fn new(mut sections: Vec<Section>) -> Self {
        sections.sort_by_key(|s| s.dataset);
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Errors of every section that could not be computed.
    pub fn failures(&self) -> Vec<&DatasetError> {
        self.sections
            .iter()
            .filter_map(|s| s.outcome.as_ref().err())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failures().is_empty()
    }
}
