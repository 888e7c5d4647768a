//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.benchplot.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".benchplot.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Run behaviour.
    #[serde(default)]
    pub run: RunConfig,

    /// Statistics settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Chart appearance.
    #[serde(default)]
    pub style: StyleConfig,
}

/// Where datasets are read from and artifacts written to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the dataset CSV files.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Directory the PNG charts are written to.
    #[serde(default = "default_figures_dir")]
    pub figures_dir: PathBuf,

    /// Summary file name, relative to `results_dir`.
    #[serde(default = "default_summary_file")]
    pub summary_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            figures_dir: default_figures_dir(),
            summary_file: default_summary_file(),
        }
    }
}

impl PathsConfig {
    pub fn summary_path(&self) -> PathBuf {
        self.results_dir.join(&self.summary_file)
    }
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_figures_dir() -> PathBuf {
    PathBuf::from("figures")
}

fn default_summary_file() -> String {
    "summary.txt".to_string()
}

/// How failures and optional outputs are handled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Stop at the first failing dataset without writing a report.
    #[serde(default)]
    pub fail_fast: bool,

    /// Render PNG charts (the report is always written).
    #[serde(default = "default_true")]
    pub charts: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            charts: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Statistics settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Pattern the relative pattern chart is normalized to.
    #[serde(default = "default_pattern_baseline")]
    pub pattern_baseline: String,

    /// Minimum R² for the depth fit to be reported as logarithmic.
    #[serde(default = "default_r2_threshold")]
    pub log_fit_r2_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pattern_baseline: default_pattern_baseline(),
            log_fit_r2_threshold: default_r2_threshold(),
        }
    }
}

fn default_pattern_baseline() -> String {
    "all_positive".to_string()
}

fn default_r2_threshold() -> f64 {
    0.9
}

/// Chart appearance, handed to the renderer when it is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Width of one panel in pixels; figures are this times the panel count.
    #[serde(default = "default_panel_width")]
    pub panel_width: u32,

    #[serde(default = "default_panel_height")]
    pub panel_height: u32,

    #[serde(default = "default_title_font_size")]
    pub title_font_size: u32,

    #[serde(default = "default_label_font_size")]
    pub label_font_size: u32,

    #[serde(default = "default_legend_font_size")]
    pub legend_font_size: u32,

    #[serde(default = "default_line_width")]
    pub line_width: u32,

    #[serde(default = "default_marker_size")]
    pub marker_size: u32,

    /// Opacity of the major grid lines (0.0 - 1.0).
    #[serde(default = "default_grid_alpha")]
    pub grid_alpha: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            panel_width: default_panel_width(),
            panel_height: default_panel_height(),
            title_font_size: default_title_font_size(),
            label_font_size: default_label_font_size(),
            legend_font_size: default_legend_font_size(),
            line_width: default_line_width(),
            marker_size: default_marker_size(),
            grid_alpha: default_grid_alpha(),
        }
    }
}

fn default_panel_width() -> u32 {
    640
}

fn default_panel_height() -> u32 {
    480
}

fn default_title_font_size() -> u32 {
    22
}

fn default_label_font_size() -> u32 {
    16
}

fn default_legend_font_size() -> u32 {
    14
}

fn default_line_width() -> u32 {
    2
}

fn default_marker_size() -> u32 {
    4
}

fn default_grid_alpha() -> f64 {
    0.3
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.results_dir {
            self.paths.results_dir = dir.clone();
        }
        if let Some(ref dir) = args.figures_dir {
            self.paths.figures_dir = dir.clone();
        }

        // Flags only ever switch behaviour on
        if args.fail_fast {
            self.run.fail_fast = true;
        }
        if args.no_charts {
            self.run.charts = false;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
