//! Per-dataset figure layouts.

use super::{Figure, Marker, Panel, PlotLine};
use crate::analysis::{
    build_series, group_rows, linear_fit, normalize_to_baseline, per_item, profile_series,
    xy_series,
};
use crate::error::AnalysisError;
use crate::models::{Dataset, Point, Series, Table};
use crate::report::title_case;

const TIME_AXIS: &str = "Time (μs)";
const SPEEDUP_AXIS: &str = "Speedup (Naive/OST)";
const SIZE_AXIS: &str = "Number of Elements (n)";

/// Dataset-independent settings for figure construction.
#[derive(Debug, Clone)]
pub struct FigureOptions {
    /// Pattern whose timings the relative pattern chart divides by.
    pub pattern_baseline: String,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            pattern_baseline: "all_positive".to_string(),
        }
    }
}

/// Lay out the figure for `table.dataset`.
pub fn build_figure(table: &Table, options: &FigureOptions) -> Result<Figure, AnalysisError> {
    let panels = match table.dataset {
        Dataset::OstPerformance => ost_panels(table)?,
        Dataset::JosephusComparison => josephus_panels(table)?,
        Dataset::PomPerformance => pom_panels(table)?,
        Dataset::AblationM => ablation_m_panels(table)?,
        Dataset::AblationDepth => depth_panels(table)?,
        Dataset::AblationPomPatterns => pattern_panels(table, &options.pattern_baseline)?,
    };
    Ok(Figure { panels })
}

fn ost_panels(table: &Table) -> Result<Vec<Panel>, AnalysisError> {
    let operations = [
        ("insert_time", "Insert", Marker::Circle),
        ("select_time", "Select", Marker::Square),
        ("delete_time", "Delete", Marker::Triangle),
    ];

    operations
        .iter()
        .map(|&(column, name, marker)| {
            let series = xy_series(table, "n", column)?.relabel(name);
            Ok(Panel::lines(
                &format!("OST {} Performance", name),
                SIZE_AXIS,
                TIME_AXIS,
                vec![PlotLine::solid(series, marker)],
            ))
        })
        .collect()
}

fn josephus_panels(table: &Table) -> Result<Vec<Panel>, AnalysisError> {
    let ost = build_series(table, Some("m"), "n", "ost_time")?;
    let naive = build_series(table, Some("m"), "n", "naive_time")?;
    let speedup = build_series(table, Some("m"), "n", "speedup")?;

    let mut timing_lines = Vec::new();
    for (o, n) in ost.into_iter().zip(naive) {
        let m = o.label.clone();
        timing_lines.push(PlotLine::solid(o.relabel(format!("OST (m={})", m)), Marker::Circle));
        timing_lines.push(PlotLine::dashed(
            n.relabel(format!("Naive (m={})", m)),
            Marker::Square,
        ));
    }

    let speedup_lines = speedup
        .into_iter()
        .map(|s| {
            let label = format!("m={}", s.label);
            PlotLine::solid(s.relabel(label), Marker::Circle)
        })
        .collect();

    Ok(vec![
        Panel::lines(
            "Josephus: OST vs Naive Implementation",
            SIZE_AXIS,
            TIME_AXIS,
            timing_lines,
        )
        .with_log_y(),
        Panel::lines(
            "OST Speedup over Naive Approach",
            SIZE_AXIS,
            SPEEDUP_AXIS,
            speedup_lines,
        )
        .with_reference(1.0),
    ])
}

fn pom_panels(table: &Table) -> Result<Vec<Panel>, AnalysisError> {
    let insert = xy_series(table, "intervals", "insert_time")?;
    let find = xy_series(table, "intervals", "findpom_time")?;
    let delete = xy_series(table, "intervals", "delete_time")?;
    let intervals = xy_series(table, "intervals", "intervals")?;

    // Every interval is inserted once; half of them are deleted.
    let insert_avg = per_item(&insert, &intervals, 1.0)?.relabel("Insert (avg)");
    let delete_avg = per_item(&delete, &intervals, 0.5)?.relabel("Delete (avg)");

    Ok(vec![
        Panel::lines(
            "POM Tree Operation Performance",
            "Number of Intervals",
            TIME_AXIS,
            vec![
                PlotLine::solid(insert.relabel("Insert (total)"), Marker::Circle),
                PlotLine::solid(find.relabel("FindPOM (single)"), Marker::Square),
                PlotLine::solid(delete.relabel("Delete (half)"), Marker::Triangle),
            ],
        ),
        Panel::lines(
            "POM Tree: Average Time per Operation",
            "Number of Intervals",
            "Time per Operation (μs)",
            vec![
                PlotLine::solid(insert_avg, Marker::Circle),
                PlotLine::solid(delete_avg, Marker::Triangle),
            ],
        ),
    ])
}

fn ablation_m_panels(table: &Table) -> Result<Vec<Panel>, AnalysisError> {
    let ost = xy_series(table, "m", "ost_time")?.relabel("OST");
    let naive = xy_series(table, "m", "naive_time")?.relabel("Naive");
    let speedup = xy_series(table, "m", "speedup")?.relabel("Speedup");

    Ok(vec![
        Panel::lines(
            "Impact of m on Josephus Performance",
            "Parameter m",
            TIME_AXIS,
            vec![
                PlotLine::solid(ost, Marker::Circle),
                PlotLine::solid(naive, Marker::Square),
            ],
        ),
        Panel::lines(
            "OST Speedup vs Parameter m",
            "Parameter m",
            SPEEDUP_AXIS,
            vec![PlotLine::solid(speedup, Marker::Circle).without_legend()],
        )
        .with_reference(1.0),
    ])
}

fn depth_panels(table: &Table) -> Result<Vec<Panel>, AnalysisError> {
    let by_n = xy_series(table, "n", "avg_select_time")?.relabel("Select");
    let by_log = xy_series(table, "log2n", "avg_select_time")?.relabel("Select");

    let xs = by_log.xs();
    let fit = linear_fit(&xs, &by_log.ys())?;
    let trend = Series::from_xy(
        format!("Linear fit: y={:.2}x+{:.2}", fit.slope, fit.intercept),
        &xs,
        &fit.fitted(&xs),
    )?;

    Ok(vec![
        Panel::lines(
            "OST Select Time vs Tree Size",
            SIZE_AXIS,
            "Average Select Time (μs)",
            vec![PlotLine::solid(by_n, Marker::Circle).without_legend()],
        ),
        Panel::lines(
            "OST Select Time vs log₂(n) - Verifying O(log n)",
            "log₂(n)",
            "Average Select Time (μs)",
            vec![
                PlotLine::solid(by_log, Marker::Circle).without_legend(),
                PlotLine::dashed(trend, Marker::None),
            ],
        ),
    ])
}

fn pattern_panels(table: &Table, baseline: &str) -> Result<Vec<Panel>, AnalysisError> {
    let metrics = ["insert_time", "findpom_time"];
    let metric_labels = ["Insert", "FindPOM"];

    let categories: Vec<String> = group_rows(table, Some("pattern"))?
        .into_iter()
        .map(|g| title_case(&g.key))
        .collect();

    let profiles = profile_series(table, "pattern", &metrics)?;
    let relative = normalize_to_baseline(&profiles, baseline)?;

    Ok(vec![
        Panel::bars(
            "POM Performance: Different Value Patterns",
            "Value Pattern",
            TIME_AXIS,
            categories.clone(),
            by_metric(&profiles, &metric_labels),
        ),
        Panel::bars(
            "POM: Relative Performance by Pattern",
            "Value Pattern",
            &format!("Relative Time (vs {})", title_case(baseline)),
            categories,
            by_metric(&relative, &metric_labels),
        )
        .with_reference(1.0),
    ])
}

/// Turn per-pattern profiles into one bar group per metric.
fn by_metric(profiles: &[Series], metric_labels: &[&str]) -> Vec<Series> {
    metric_labels
        .iter()
        .enumerate()
        .map(|(m, label)| {
            let points = profiles
                .iter()
                .enumerate()
                .filter_map(|(i, p)| p.points.get(m).map(|pt| Point::new(i as f64, pt.y)))
                .collect();
            Series::new(*label, points)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::PanelContent;
    use crate::loader::parse_table;

    fn figure_for(dataset: Dataset, csv: &str) -> Result<Figure, AnalysisError> {
        let table = parse_table(dataset, csv.as_bytes()).unwrap();
        build_figure(&table, &FigureOptions::default())
    }

    fn lines(panel: &Panel) -> &[PlotLine] {
        match &panel.content {
            PanelContent::Lines(lines) => lines,
            PanelContent::Bars { .. } => panic!("expected a line panel"),
        }
    }

    #[test]
    fn test_ost_figure_has_three_panels() {
        let csv = "n,insert_time,select_time,delete_time\n1000,150,20,120\n10000,1800,260,1500\n";
        let figure = figure_for(Dataset::OstPerformance, csv).unwrap();
        assert_eq!(figure.panels.len(), 3);
        assert_eq!(figure.panels[1].title, "OST Select Performance");
        assert_eq!(lines(&figure.panels[2])[0].series.ys(), vec![120.0, 1500.0]);
    }

    #[test]
    fn test_josephus_lines_per_m() {
        let csv = "n,m,ost_time,naive_time,speedup\n\
                   100,3,10,30,3.0\n\
                   100,5,12,36,3.0\n\
                   1000,3,90,900,10.0\n\
                   1000,5,95,1140,12.0\n";
        let figure = figure_for(Dataset::JosephusComparison, csv).unwrap();

        let timing = lines(&figure.panels[0]);
        let labels: Vec<&str> = timing.iter().map(|l| l.series.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["OST (m=3)", "Naive (m=3)", "OST (m=5)", "Naive (m=5)"]
        );
        assert!(timing[1].dashed);
        assert!(figure.panels[0].log_y);
        assert_eq!(figure.panels[1].reference_line, Some(1.0));
    }

    #[test]
    fn test_pom_per_operation_averages() {
        let csv = "intervals,insert_time,findpom_time,delete_time\n100,500,2,300\n200,1200,3,700\n";
        let figure = figure_for(Dataset::PomPerformance, csv).unwrap();

        let averages = lines(&figure.panels[1]);
        assert_eq!(averages[0].series.ys(), vec![5.0, 6.0]);
        assert_eq!(averages[1].series.ys(), vec![6.0, 7.0]);
    }

    #[test]
    fn test_depth_trend_line_matches_fit() {
        let csv = "n,log2n,avg_select_time\n8,3,9\n16,4,11\n32,5,13\n";
        let figure = figure_for(Dataset::AblationDepth, csv).unwrap();

        let trend = &lines(&figure.panels[1])[1];
        assert_eq!(trend.series.label, "Linear fit: y=2.00x+3.00");
        assert!(trend.dashed);
        for (fitted, expected) in trend.series.ys().iter().zip([9.0, 11.0, 13.0]) {
            assert!((fitted - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_pattern_bars_relative_to_baseline() {
        let csv = "pattern,insert_time,findpom_time\nall_positive,100,2\nall_negative,150,5\n";
        let figure = figure_for(Dataset::AblationPomPatterns, csv).unwrap();

        match &figure.panels[1].content {
            PanelContent::Bars { categories, groups } => {
                assert_eq!(categories, &vec!["All Positive", "All Negative"]);
                assert_eq!(groups[0].label, "Insert");
                assert_eq!(groups[0].ys(), vec![1.0, 1.5]);
                assert_eq!(groups[1].ys(), vec![1.0, 2.5]);
            }
            PanelContent::Lines(_) => panic!("expected bars"),
        }
    }

    #[test]
    fn test_pattern_figure_without_baseline() {
        let csv = "pattern,insert_time,findpom_time\nmixed,100,2\n";
        assert!(matches!(
            figure_for(Dataset::AblationPomPatterns, csv),
            Err(AnalysisError::Key { .. })
        ));
    }
}
