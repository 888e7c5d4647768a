//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Benchplot - charts and a summary report for benchmark results
///
/// Reads the benchmark CSV files from the results directory, renders one
/// PNG chart per dataset and writes a plain-text summary of the derived
/// statistics.
///
/// Examples:
///   benchplot
///   benchplot --results-dir out/results --figures-dir out/figures
///   benchplot --no-charts --fail-fast
///   benchplot --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory holding the benchmark CSV files
    ///
    /// The summary report is written here as well. Defaults to `results`.
    #[arg(long, value_name = "DIR", env = "BENCHPLOT_RESULTS_DIR")]
    pub results_dir: Option<PathBuf>,

    /// Directory the PNG charts are written to
    ///
    /// Created if missing. Defaults to `figures`.
    #[arg(long, value_name = "DIR", env = "BENCHPLOT_FIGURES_DIR")]
    pub figures_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .benchplot.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Stop at the first failing dataset without writing the report
    #[arg(long)]
    pub fail_fast: bool,

    /// Skip chart rendering and only write the summary report
    #[arg(long)]
    pub no_charts: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .benchplot.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref dir) = self.results_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(format!(
                    "Results path is not a directory: {}",
                    dir.display()
                ));
            }
        }

        if let Some(ref dir) = self.figures_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(format!(
                    "Figures path is not a directory: {}",
                    dir.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn make_args() -> Args {
        Args {
            results_dir: None,
            figures_dir: None,
            config: None,
            fail_fast: false,
            no_charts: false,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "benchplot",
            "--results-dir",
            "out",
            "--no-charts",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.results_dir, Some(PathBuf::from("out")));
        assert!(args.no_charts);
        assert!(args.verbose);
        assert!(!args.fail_fast);
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());

        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_results_path_is_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut args = make_args();
        args.results_dir = Some(file.path().to_path_buf());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        let mut args = make_args();
        args.figures_dir = Some(PathBuf::from("plots"));
        args.no_charts = true;

        config.merge_with_args(&args);
        assert_eq!(config.paths.figures_dir, PathBuf::from("plots"));
        assert_eq!(config.paths.results_dir, PathBuf::from("results"));
        assert!(!config.run.charts);
        assert!(!config.run.fail_fast);
    }
}
