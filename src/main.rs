//! Benchplot - charts and a summary report for benchmark results
//!
//! A CLI tool that reads the benchmark CSV files of the OST/POM tree
//! experiments, renders one PNG chart per dataset and writes a plain-text
//! summary of the derived statistics.
//!
//! Exit codes:
//!   0 - Every dataset produced its chart and report section
//!   1 - Runtime error, missing input, or at least one dataset failed

mod analysis;
mod chart;
mod cli;
mod config;
mod error;
mod loader;
mod models;
mod pipeline;
mod report;

use anyhow::{Context, Result};
use chart::{ChartRenderer, PlottersRenderer};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("Benchplot v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(&args) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .benchplot.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize paths, the pattern baseline and chart style.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run every dataset and report the outcome. Returns the exit code.
fn run(args: &Args) -> Result<i32> {
    let start_time = Instant::now();

    let mut config = load_config(args)?;
    config.merge_with_args(args);
    debug!("Effective config: {:?}", config);

    if !args.quiet {
        println!(
            "📂 Reading benchmark results from: {}",
            config.paths.results_dir.display()
        );
    }

    let plotters = PlottersRenderer::new(config.style.clone());
    let renderer: Option<&dyn ChartRenderer> = if config.run.charts {
        Some(&plotters)
    } else {
        info!("Chart rendering disabled");
        None
    };

    let progress = make_progress_bar(args.quiet);
    let outcome = pipeline::run(&config, renderer, &progress)?;

    if !args.quiet {
        println!("\n📊 Run Summary:");
        println!("   Charts written: {}", outcome.charts.len());
        for chart in &outcome.charts {
            println!("     🖼️  {}", chart.display());
        }
        println!("   Report: {}", outcome.summary_path.display());
        println!("   Duration: {:.1}s", start_time.elapsed().as_secs_f64());
    }

    if outcome.report.is_complete() {
        if !args.quiet {
            println!("\n✅ All datasets processed.");
        }
        return Ok(0);
    }

    let failures = outcome.report.failures();
    eprintln!("\n⛔ {} dataset(s) failed:", failures.len());
    for failure in &failures {
        eprintln!("   - {}", failure);
    }
    Ok(1)
}

fn make_progress_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(0);
    let template = "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}";
    match ProgressStyle::default_bar().template(template) {
        Ok(style) => pb.set_style(style.progress_chars("#>-")),
        Err(e) => debug!("Falling back to default progress style: {}", e),
    }
    pb
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
