//! Per-dataset orchestration: load, aggregate, render, report.
//!
//! Each dataset runs to completion on its own fresh values before the next
//! starts. A failing dataset only loses its own chart and section unless
//! fail-fast is requested.

use crate::analysis::{compute_stats, DatasetStats, StatsOptions};
use crate::chart::{build_figure, ChartRenderer, FigureOptions};
use crate::config::Config;
use crate::error::{AnalysisError, DatasetError};
use crate::loader::RecordLoader;
use crate::models::Dataset;
use crate::report::{write_summary, Section, SummaryReport};
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Settings for a single dataset pipeline.
#[derive(Debug, Clone, Default)]
pub struct DatasetOptions {
    pub stats: StatsOptions,
    pub figures: FigureOptions,
    /// Where charts go; `None` disables rendering.
    pub figures_dir: Option<PathBuf>,
}

impl DatasetOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            stats: StatsOptions {
                log_fit_r2_threshold: config.analysis.log_fit_r2_threshold,
                pattern_baseline: config.analysis.pattern_baseline.clone(),
            },
            figures: FigureOptions {
                pattern_baseline: config.analysis.pattern_baseline.clone(),
            },
            figures_dir: config
                .run
                .charts
                .then(|| config.paths.figures_dir.clone()),
        }
    }
}

/// What a completed run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: SummaryReport,
    pub summary_path: PathBuf,
    pub charts: Vec<PathBuf>,
}

/// Load, aggregate and (optionally) chart one dataset.
///
/// Returns the statistics and the path of the rendered chart, if any.
pub fn process_dataset(
    loader: &RecordLoader,
    dataset: Dataset,
    options: &DatasetOptions,
    renderer: Option<&dyn ChartRenderer>,
) -> Result<(DatasetStats, Option<PathBuf>), DatasetError> {
    let tag = |err: AnalysisError| DatasetError::new(dataset, err);

    let table = loader.load(dataset).map_err(tag)?;
    let stats = compute_stats(&table, &options.stats).map_err(tag)?;

    let chart = match (renderer, &options.figures_dir) {
        (Some(renderer), Some(dir)) => {
            let figure = build_figure(&table, &options.figures).map_err(tag)?;
            let path = dir.join(dataset.chart_file_name());
            renderer.render(&figure, &path).map_err(tag)?;
            info!("Generated chart: {}", path.display());
            Some(path)
        }
        _ => None,
    };

    Ok((stats, chart))
}

/// Run every dataset and write the summary report.
///
/// Fails before producing anything if an input file is missing, and, in
/// fail-fast mode, at the first dataset error without writing the report.
pub fn run(
    config: &Config,
    renderer: Option<&dyn ChartRenderer>,
    progress: &ProgressBar,
) -> Result<RunOutcome> {
    let loader = RecordLoader::new(&config.paths.results_dir);
    loader.check_inputs(&Dataset::ALL)?;

    let options = DatasetOptions::from_config(config);
    if let Some(ref dir) = options.figures_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create figures directory: {}", dir.display()))?;
    }

    progress.set_length(Dataset::ALL.len() as u64);

    let mut sections = Vec::with_capacity(Dataset::ALL.len());
    let mut charts = Vec::new();

    for dataset in Dataset::ALL {
        progress.set_message(dataset.name());
        debug!("Processing dataset {}", dataset);

        let outcome = match process_dataset(&loader, dataset, &options, renderer) {
            Ok((stats, chart)) => {
                charts.extend(chart);
                Ok(stats)
            }
            Err(err) if config.run.fail_fast => {
                progress.abandon();
                return Err(err.into());
            }
            Err(err) => {
                warn!("Dataset failed: {}", err);
                Err(err)
            }
        };

        sections.push(Section::new(dataset, outcome));
        progress.inc(1);
    }
    progress.finish_and_clear();

    let report = SummaryReport::new(sections);
    let summary_path = config.paths.summary_path();
    write_summary(&report, &summary_path)?;
    info!("Generated report: {}", summary_path.display());

    Ok(RunOutcome {
        report,
        summary_path,
        charts,
    })
}
