//! Per-dataset statistics feeding the summary report.

use super::aggregator::{extremum, linear_fit, mean};
use super::series::{column_series, xy_series};
use crate::error::AnalysisError;
use crate::models::{Dataset, ExtremumKind, LinearFit, Point, Table};

/// Statistics for the order statistic tree benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct OstStats {
    pub min_n: f64,
    pub max_n: f64,
    pub last_n: f64,
    pub last_insert_time: f64,
    /// Mean select time divided by mean tree size.
    pub avg_select_per_op: f64,
}

/// Statistics for the Josephus OST-vs-naive comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct JosephusStats {
    pub max_speedup: f64,
    pub max_at_n: f64,
    pub max_at_m: f64,
    pub avg_speedup: f64,
}

/// Statistics for the POM tree benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct PomStats {
    pub min_intervals: f64,
    pub max_intervals: f64,
    pub last_intervals: f64,
    pub last_findpom_time: f64,
}

/// Best and worst speedup over the m sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct AblationMStats {
    pub min_m: f64,
    pub max_m: f64,
    /// `x` is m, `y` the speedup.
    pub best: Point,
    pub worst: Point,
}

/// Select time regressed against log2(n).
#[derive(Debug, Clone, PartialEq)]
pub struct DepthStats {
    pub fit: LinearFit,
    /// Whether R² reaches the configured threshold.
    pub logarithmic: bool,
}

/// Timings for one value pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternTiming {
    pub pattern: String,
    pub insert_time: f64,
    pub findpom_time: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternStats {
    pub patterns: Vec<PatternTiming>,
}

/// Derived statistics of any dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetStats {
    Ost(OstStats),
    Josephus(JosephusStats),
    Pom(PomStats),
    AblationM(AblationMStats),
    Depth(DepthStats),
    Patterns(PatternStats),
}

/// Knobs for statistics that involve a judgement call.
#[derive(Debug, Clone)]
pub struct StatsOptions {
    /// Minimum R² for the depth fit to count as logarithmic growth.
    pub log_fit_r2_threshold: f64,
    /// Pattern the other patterns are compared against; must be present.
    pub pattern_baseline: String,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            log_fit_r2_threshold: 0.9,
            pattern_baseline: "all_positive".to_string(),
        }
    }
}

/// Compute the statistics matching `table.dataset`.
pub fn compute_stats(table: &Table, options: &StatsOptions) -> Result<DatasetStats, AnalysisError> {
    table.require_columns(table.dataset.required_columns())?;

    let stats = match table.dataset {
        Dataset::OstPerformance => DatasetStats::Ost(ost_stats(table)?),
        Dataset::JosephusComparison => DatasetStats::Josephus(josephus_stats(table)?),
        Dataset::PomPerformance => DatasetStats::Pom(pom_stats(table)?),
        Dataset::AblationM => DatasetStats::AblationM(ablation_m_stats(table)?),
        Dataset::AblationDepth => DatasetStats::Depth(depth_stats(table, options)?),
        Dataset::AblationPomPatterns => DatasetStats::Patterns(pattern_stats(table, options)?),
    };
    Ok(stats)
}

/// Min and max y of `column`.
fn column_range(table: &Table, column: &str) -> Result<(f64, f64), AnalysisError> {
    let series = column_series(table, column)?;
    Ok((
        extremum(&series, ExtremumKind::Min)?.y,
        extremum(&series, ExtremumKind::Max)?.y,
    ))
}

fn last_row(table: &Table) -> Result<usize, AnalysisError> {
    if table.is_empty() {
        return Err(AnalysisError::InsufficientData {
            points: 0,
            required: 1,
        });
    }
    Ok(table.len() - 1)
}

fn ost_stats(table: &Table) -> Result<OstStats, AnalysisError> {
    let (min_n, max_n) = column_range(table, "n")?;
    let last = last_row(table)?;

    Ok(OstStats {
        min_n,
        max_n,
        last_n: table.number_at(last, "n")?,
        last_insert_time: table.number_at(last, "insert_time")?,
        avg_select_per_op: mean(&table.numbers("select_time")?)? / mean(&table.numbers("n")?)?,
    })
}

fn josephus_stats(table: &Table) -> Result<JosephusStats, AnalysisError> {
    let speedups = column_series(table, "speedup")?;
    let best = extremum(&speedups, ExtremumKind::Max)?;
    let row = best.x as usize;

    Ok(JosephusStats {
        max_speedup: best.y,
        max_at_n: table.number_at(row, "n")?,
        max_at_m: table.number_at(row, "m")?,
        avg_speedup: mean(&speedups.ys())?,
    })
}

fn pom_stats(table: &Table) -> Result<PomStats, AnalysisError> {
    let (min_intervals, max_intervals) = column_range(table, "intervals")?;
    let last = last_row(table)?;

    Ok(PomStats {
        min_intervals,
        max_intervals,
        last_intervals: table.number_at(last, "intervals")?,
        last_findpom_time: table.number_at(last, "findpom_time")?,
    })
}

fn ablation_m_stats(table: &Table) -> Result<AblationMStats, AnalysisError> {
    let (min_m, max_m) = column_range(table, "m")?;
    let speedup = xy_series(table, "m", "speedup")?;

    Ok(AblationMStats {
        min_m,
        max_m,
        best: extremum(&speedup, ExtremumKind::Max)?,
        worst: extremum(&speedup, ExtremumKind::Min)?,
    })
}

fn depth_stats(table: &Table, options: &StatsOptions) -> Result<DepthStats, AnalysisError> {
    let fit = linear_fit(&table.numbers("log2n")?, &table.numbers("avg_select_time")?)?;

    Ok(DepthStats {
        fit,
        logarithmic: fit.r_squared >= options.log_fit_r2_threshold,
    })
}

fn pattern_stats(table: &Table, options: &StatsOptions) -> Result<PatternStats, AnalysisError> {
    let pattern_idx = table.column_index("pattern")?;
    let inserts = table.numbers("insert_time")?;
    let finds = table.numbers("findpom_time")?;

    let patterns = (0..table.len())
        .map(|row| PatternTiming {
            pattern: table
                .field(row, pattern_idx)
                .map(|f| f.to_string())
                .unwrap_or_default(),
            insert_time: inserts[row],
            findpom_time: finds[row],
        })
        .collect::<Vec<PatternTiming>>();

    if !patterns.iter().any(|p| p.pattern == options.pattern_baseline) {
        return Err(AnalysisError::Key {
            key: options.pattern_baseline.clone(),
        });
    }

    Ok(PatternStats { patterns })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_table;

    fn stats_for(dataset: Dataset, csv: &str) -> Result<DatasetStats, AnalysisError> {
        let table = parse_table(dataset, csv.as_bytes()).unwrap();
        compute_stats(&table, &StatsOptions::default())
    }

    #[test]
    fn test_ost_stats() {
        let csv = "n,insert_time,select_time,delete_time\n\
                   1000,150,20,120\n\
                   10000,1800,260,1500\n\
                   100000,21000,3020,17000\n";
        let DatasetStats::Ost(stats) = stats_for(Dataset::OstPerformance, csv).unwrap() else {
            panic!("wrong stats variant");
        };
        assert_eq!(stats.min_n, 1000.0);
        assert_eq!(stats.max_n, 100000.0);
        assert_eq!(stats.last_n, 100000.0);
        assert_eq!(stats.last_insert_time, 21000.0);
        assert!((stats.avg_select_per_op - 1100.0 / 37000.0).abs() < 1e-12);
    }

    #[test]
    fn test_josephus_max_speedup_location() {
        let csv = "n,m,ost_time,naive_time,speedup\n\
                   100,2,10,20,2.0\n\
                   1000,2,50,400,8.0\n\
                   1000,7,40,320,8.0\n\
                   100,7,12,24,2.0\n";
        let DatasetStats::Josephus(stats) = stats_for(Dataset::JosephusComparison, csv).unwrap()
        else {
            panic!("wrong stats variant");
        };
        assert_eq!(stats.max_speedup, 8.0);
        assert_eq!((stats.max_at_n, stats.max_at_m), (1000.0, 2.0));
        assert_eq!(stats.avg_speedup, 5.0);
    }

    #[test]
    fn test_ablation_m_best_and_worst() {
        let csv = "m,ost_time,naive_time,speedup\n1,10,20,2.0\n2,5,50,10.0\n";
        let DatasetStats::AblationM(stats) = stats_for(Dataset::AblationM, csv).unwrap() else {
            panic!("wrong stats variant");
        };
        assert_eq!(stats.best, Point::new(2.0, 10.0));
        assert_eq!(stats.worst, Point::new(1.0, 2.0));
        assert_eq!((stats.min_m, stats.max_m), (1.0, 2.0));
    }

    #[test]
    fn test_depth_stats_threshold() {
        let csv = "n,log2n,avg_select_time\n1024,10,0.5\n4096,12,0.6\n16384,14,0.7\n";
        let DatasetStats::Depth(stats) = stats_for(Dataset::AblationDepth, csv).unwrap() else {
            panic!("wrong stats variant");
        };
        assert!((stats.fit.slope - 0.05).abs() < 1e-9);
        assert!(stats.fit.intercept.abs() < 1e-9);
        assert!(stats.logarithmic);
    }

    #[test]
    fn test_depth_stats_single_row() {
        let csv = "n,log2n,avg_select_time\n1024,10,0.5\n";
        assert!(matches!(
            stats_for(Dataset::AblationDepth, csv),
            Err(AnalysisError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_empty_dataset_is_insufficient() {
        let csv = "intervals,insert_time,findpom_time,delete_time\n";
        assert!(matches!(
            stats_for(Dataset::PomPerformance, csv),
            Err(AnalysisError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_pattern_stats_keep_file_order() {
        let csv = "pattern,insert_time,findpom_time\nmixed,1500,4.2\nall_positive,1200,3.1\n";
        let DatasetStats::Patterns(stats) = stats_for(Dataset::AblationPomPatterns, csv).unwrap()
        else {
            panic!("wrong stats variant");
        };
        let names: Vec<&str> = stats.patterns.iter().map(|p| p.pattern.as_str()).collect();
        assert_eq!(names, vec!["mixed", "all_positive"]);
        assert_eq!(stats.patterns[1].findpom_time, 3.1);
    }

    #[test]
    fn test_pattern_stats_require_baseline() {
        let csv = "pattern,insert_time,findpom_time\nmixed,1500,4.2\nalternating,1200,3.1\n";
        match stats_for(Dataset::AblationPomPatterns, csv) {
            Err(AnalysisError::Key { key }) => assert_eq!(key, "all_positive"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
