//! Data models for benchmark records and derived statistics.
//!
//! This module contains the dataset catalogue, the in-memory table a CSV
//! file loads into, and the series/statistic types the aggregator produces.

use crate::error::AnalysisError;
use std::fmt;

/// One of the benchmark datasets the harness writes.
///
/// Variant order is the fixed order of sections in the summary report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dataset {
    OstPerformance,
    JosephusComparison,
    PomPerformance,
    AblationM,
    AblationDepth,
    AblationPomPatterns,
}

impl Dataset {
    /// Every dataset, in report order.
    pub const ALL: [Dataset; 6] = [
        Dataset::OstPerformance,
        Dataset::JosephusComparison,
        Dataset::PomPerformance,
        Dataset::AblationM,
        Dataset::AblationDepth,
        Dataset::AblationPomPatterns,
    ];

    /// File stem shared by the input CSV and the output PNG.
    pub fn name(&self) -> &'static str {
        match self {
            Dataset::OstPerformance => "ost_performance",
            Dataset::JosephusComparison => "josephus_comparison",
            Dataset::PomPerformance => "pom_performance",
            Dataset::AblationM => "ablation_m",
            Dataset::AblationDepth => "ablation_depth",
            Dataset::AblationPomPatterns => "ablation_pom_patterns",
        }
    }

    pub fn csv_file_name(&self) -> String {
        format!("{}.csv", self.name())
    }

    pub fn chart_file_name(&self) -> String {
        format!("{}.png", self.name())
    }

    /// Columns that must be present in the CSV header.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Dataset::OstPerformance => &["n", "insert_time", "select_time", "delete_time"],
            Dataset::JosephusComparison => &["n", "m", "ost_time", "naive_time", "speedup"],
            Dataset::PomPerformance => {
                &["intervals", "insert_time", "findpom_time", "delete_time"]
            }
            Dataset::AblationM => &["m", "ost_time", "naive_time", "speedup"],
            Dataset::AblationDepth => &["n", "log2n", "avg_select_time"],
            Dataset::AblationPomPatterns => &["pattern", "insert_time", "findpom_time"],
        }
    }

    /// Heading of this dataset's report section, including its number.
    pub fn heading(&self) -> &'static str {
        match self {
            Dataset::OstPerformance => "1. ORDER STATISTIC TREE PERFORMANCE",
            Dataset::JosephusComparison => "2. JOSEPHUS PERMUTATION: OST vs NAIVE",
            Dataset::PomPerformance => "3. POM TREE PERFORMANCE",
            Dataset::AblationM => "4. ABLATION STUDY: IMPACT OF PARAMETER m",
            Dataset::AblationDepth => "5. ABLATION STUDY: TREE DEPTH ANALYSIS",
            Dataset::AblationPomPatterns => "6. ABLATION STUDY: POM VALUE PATTERNS",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single CSV cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Number(f64),
    Label(String),
}

impl Field {
    /// Classify a raw cell: anything that parses as a float is numeric.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(v) => Field::Number(v),
            Err(_) => Field::Label(raw.trim().to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Field::Number(v) => Some(*v),
            Field::Label(_) => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Number(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{:.0}", v),
            Field::Number(v) => write!(f, "{}", v),
            Field::Label(s) => write!(f, "{}", s),
        }
    }
}

/// One row of a dataset. Fields follow the owning table's column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub fields: Vec<Field>,
}

/// All rows of one dataset, in file order.
#[derive(Debug, Clone)]
pub struct Table {
    pub dataset: Dataset,
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn new(dataset: Dataset, columns: Vec<String>, records: Vec<Record>) -> Self {
        Self {
            dataset,
            columns,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of `name` in the header.
    pub fn column_index(&self, name: &str) -> Result<usize, AnalysisError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| AnalysisError::missing_column(name))
    }

    /// Fail on the first of `columns` that is not in the header.
    pub fn require_columns(&self, columns: &[&str]) -> Result<(), AnalysisError> {
        for column in columns {
            self.column_index(column)?;
        }
        Ok(())
    }

    /// The cell at `row` in `column`.
    pub fn field(&self, row: usize, column: usize) -> Option<&Field> {
        self.records.get(row).and_then(|r| r.fields.get(column))
    }

    /// Every value of a numeric column, in row order.
    pub fn numbers(&self, column: &str) -> Result<Vec<f64>, AnalysisError> {
        let idx = self.column_index(column)?;
        self.records
            .iter()
            .enumerate()
            .map(|(row, record)| {
                record
                    .fields
                    .get(idx)
                    .and_then(Field::as_number)
                    .ok_or_else(|| AnalysisError::Schema {
                        column: column.to_string(),
                        reason: format!("row {} is not numeric", row + 1),
                    })
            })
            .collect()
    }

    /// Numeric value of `column` in `row`.
    pub fn number_at(&self, row: usize, column: &str) -> Result<f64, AnalysisError> {
        let idx = self.column_index(column)?;
        self.field(row, idx)
            .and_then(Field::as_number)
            .ok_or_else(|| AnalysisError::Schema {
                column: column.to_string(),
                reason: format!("row {} is not numeric", row + 1),
            })
    }
}

/// A single (x, y) observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A labelled, ordered sequence of points: one plotted line or one statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<Point>,
}

impl Series {
    pub fn new(label: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    /// Build from parallel x and y slices of equal length.
    pub fn from_xy(
        label: impl Into<String>,
        xs: &[f64],
        ys: &[f64],
    ) -> Result<Self, AnalysisError> {
        if xs.len() != ys.len() {
            return Err(AnalysisError::length_mismatch(xs.len(), ys.len()));
        }
        let points = xs.iter().zip(ys).map(|(&x, &y)| Point::new(x, y)).collect();
        Ok(Self::new(label, points))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    /// The same points under a new label.
    pub fn relabel(self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            points: self.points,
        }
    }
}

/// Which end of a series [`crate::analysis::extremum`] looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremumKind {
    Min,
    Max,
}

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination of the fit over its input points.
    pub r_squared: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Fitted y at every input x, for trend-line overlays.
    pub fn fitted(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict(x)).collect()
    }
}
