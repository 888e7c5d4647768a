//! Error types for loading and analyzing benchmark datasets.

use crate::models::Dataset;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while turning one dataset into a chart and
/// a report section.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A required column is missing, or holds a value of the wrong kind.
    #[error("schema error in column `{column}`: {reason}")]
    Schema { column: String, reason: String },

    /// Two series compared pointwise do not share the same x values.
    #[error("series `{left}` and `{right}` are not aligned: {detail}")]
    Alignment {
        left: String,
        right: String,
        detail: String,
    },

    /// A named series or group does not exist.
    #[error("no series named `{key}`")]
    Key { key: String },

    /// Not enough points for the requested statistic.
    #[error("insufficient data: need at least {required} point(s), got {points}")]
    InsufficientData { points: usize, required: usize },

    /// Every x value is the same, so no line can be fitted.
    #[error("degenerate fit: all {points} point(s) share x={x}")]
    DegenerateFit { points: usize, x: f64 },

    /// A ratio or normalization hit a zero denominator.
    #[error("zero denominator at x={x} in `{series}`")]
    ZeroDenominator { series: String, x: f64 },

    /// A required dataset file does not exist.
    #[error("missing input file: {}", path.display())]
    MissingInput { path: PathBuf },

    /// The CSV file could not be read.
    #[error("failed to read records: {0}")]
    Csv(#[from] csv::Error),

    /// The chart backend failed to draw or encode the image.
    #[error("failed to render chart: {0}")]
    Render(String),
}

impl AnalysisError {
    pub fn missing_column(column: &str) -> Self {
        AnalysisError::Schema {
            column: column.to_string(),
            reason: "column not present".to_string(),
        }
    }

    /// Paired x and y values of different lengths.
    pub fn length_mismatch(xs: usize, ys: usize) -> Self {
        AnalysisError::Alignment {
            left: "x".to_string(),
            right: "y".to_string(),
            detail: format!("{} x values vs {} y values", xs, ys),
        }
    }

    /// Wrap any displayable backend error as a render failure.
    pub fn render<E: std::fmt::Display>(err: E) -> Self {
        AnalysisError::Render(err.to_string())
    }
}

/// An [`AnalysisError`] tagged with the dataset it came from.
#[derive(Debug, Error)]
#[error("{dataset}: {source}")]
pub struct DatasetError {
    pub dataset: Dataset,
    #[source]
    pub source: AnalysisError,
}

impl DatasetError {
    pub fn new(dataset: Dataset, source: AnalysisError) -> Self {
        Self { dataset, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_error_names_dataset() {
        let err = DatasetError::new(Dataset::AblationM, AnalysisError::missing_column("speedup"));
        let message = err.to_string();
        assert!(message.starts_with("ablation_m:"));
        assert!(message.contains("speedup"));
    }

    #[test]
    fn test_missing_input_names_path() {
        let err = AnalysisError::MissingInput {
            path: PathBuf::from("results/ost_performance.csv"),
        };
        assert!(err.to_string().contains("results/ost_performance.csv"));
    }

    #[test]
    fn test_length_mismatch_message() {
        let err = AnalysisError::length_mismatch(3, 2);
        assert!(matches!(err, AnalysisError::Alignment { .. }));
        assert!(err.to_string().contains("3 x values vs 2 y values"));
    }
}
