//! Chart description and rendering.
//!
//! Figure builders turn a dataset into a backend-neutral [`Figure`]; a
//! [`ChartRenderer`] turns that figure into an image on disk.

pub mod figures;
pub mod renderer;

pub use figures::*;
pub use renderer::PlottersRenderer;

use crate::error::AnalysisError;
use crate::models::Series;
use std::path::Path;

/// Point marker drawn on top of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    None,
    Circle,
    Square,
    Triangle,
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotLine {
    pub series: Series,
    pub marker: Marker,
    pub dashed: bool,
    /// Whether the series label appears in the panel legend.
    pub in_legend: bool,
}

impl PlotLine {
    pub fn solid(series: Series, marker: Marker) -> Self {
        Self {
            series,
            marker,
            dashed: false,
            in_legend: true,
        }
    }

    pub fn dashed(series: Series, marker: Marker) -> Self {
        Self {
            dashed: true,
            ..Self::solid(series, marker)
        }
    }

    pub fn without_legend(mut self) -> Self {
        self.in_legend = false;
        self
    }
}

/// What a panel plots.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    Lines(Vec<PlotLine>),
    /// Grouped bars: one series per bar group, x = category index.
    Bars {
        categories: Vec<String>,
        groups: Vec<Series>,
    },
}

/// A single set of axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub content: PanelContent,
    /// Logarithmic y axis.
    pub log_y: bool,
    /// Horizontal reference line, e.g. speedup = 1.
    pub reference_line: Option<f64>,
}

impl Panel {
    pub fn lines(title: &str, x_label: &str, y_label: &str, lines: Vec<PlotLine>) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            content: PanelContent::Lines(lines),
            log_y: false,
            reference_line: None,
        }
    }

    pub fn bars(
        title: &str,
        x_label: &str,
        y_label: &str,
        categories: Vec<String>,
        groups: Vec<Series>,
    ) -> Self {
        Self {
            content: PanelContent::Bars { categories, groups },
            ..Self::lines(title, x_label, y_label, Vec::new())
        }
    }

    pub fn with_log_y(mut self) -> Self {
        self.log_y = true;
        self
    }

    pub fn with_reference(mut self, y: f64) -> Self {
        self.reference_line = Some(y);
        self
    }
}

/// Panels laid out side by side in one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub panels: Vec<Panel>,
}

/// Anything that can turn a [`Figure`] into an image file.
pub trait ChartRenderer {
    fn render(&self, figure: &Figure, path: &Path) -> Result<(), AnalysisError>;
}
