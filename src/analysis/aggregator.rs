//! Derived statistics over benchmark series.
//!
//! This module provides the pure numeric operations behind the charts and
//! the summary report: pointwise ratios, baseline normalization, extrema and
//! least-squares trend fitting.

use crate::error::AnalysisError;
use crate::models::{ExtremumKind, LinearFit, Point, Series};

/// Plain `a / b`, the default combine for [`ratio`].
pub fn divide(a: f64, b: f64) -> f64 {
    a / b
}

/// Combine two series pointwise with `combine(a.y, b.y)`.
///
/// Both series must carry identical x values in identical order. A zero
/// `b.y` is rejected rather than producing an infinity.
pub fn ratio<F>(a: &Series, b: &Series, combine: F) -> Result<Series, AnalysisError>
where
    F: Fn(f64, f64) -> f64,
{
    check_aligned(a, b)?;

    let points = a
        .points
        .iter()
        .zip(&b.points)
        .map(|(pa, pb)| {
            if pb.y == 0.0 {
                return Err(AnalysisError::ZeroDenominator {
                    series: b.label.clone(),
                    x: pb.x,
                });
            }
            Ok(Point::new(pa.x, combine(pa.y, pb.y)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Series::new(format!("{}/{}", a.label, b.label), points))
}

/// Per-operation averages: `total.y / (count.y * scale)`.
///
/// `scale` is the fraction of `count` operations the total covers, e.g. 0.5
/// when only half the elements were deleted.
pub fn per_item(total: &Series, count: &Series, scale: f64) -> Result<Series, AnalysisError> {
    let ops = Series::new(
        count.label.clone(),
        count
            .points
            .iter()
            .map(|p| Point::new(p.x, p.y * scale))
            .collect(),
    );
    Ok(ratio(total, &ops, divide)?.relabel(total.label.clone()))
}

fn check_aligned(a: &Series, b: &Series) -> Result<(), AnalysisError> {
    let misaligned = |detail: String| AnalysisError::Alignment {
        left: a.label.clone(),
        right: b.label.clone(),
        detail,
    };

    if a.len() != b.len() {
        return Err(misaligned(format!("{} points vs {} points", a.len(), b.len())));
    }

    for (i, (pa, pb)) in a.points.iter().zip(&b.points).enumerate() {
        if pa.x != pb.x {
            return Err(misaligned(format!(
                "point {} has x={} vs x={}",
                i, pa.x, pb.x
            )));
        }
    }

    Ok(())
}

/// Divide every series by the series labelled `baseline_key` at the same x.
pub fn normalize_to_baseline(
    series: &[Series],
    baseline_key: &str,
) -> Result<Vec<Series>, AnalysisError> {
    let baseline = series
        .iter()
        .find(|s| s.label == baseline_key)
        .ok_or_else(|| AnalysisError::Key {
            key: baseline_key.to_string(),
        })?;

    series
        .iter()
        .map(|s| {
            let points = s
                .points
                .iter()
                .map(|p| {
                    let base = baseline
                        .points
                        .iter()
                        .find(|b| b.x == p.x)
                        .ok_or_else(|| AnalysisError::Alignment {
                            left: s.label.clone(),
                            right: baseline.label.clone(),
                            detail: format!("baseline has no point at x={}", p.x),
                        })?;
                    if base.y == 0.0 {
                        return Err(AnalysisError::ZeroDenominator {
                            series: baseline.label.clone(),
                            x: p.x,
                        });
                    }
                    Ok(Point::new(p.x, p.y / base.y))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Series::new(s.label.clone(), points))
        })
        .collect()
}

/// The point holding the smallest or largest y.
///
/// Ties resolve to the earliest point in series order.
pub fn extremum(series: &Series, kind: ExtremumKind) -> Result<Point, AnalysisError> {
    if series.is_empty() {
        return Err(AnalysisError::InsufficientData {
            points: 0,
            required: 1,
        });
    }

    let mut best = series.points[0];
    for p in &series.points[1..] {
        let better = match kind {
            ExtremumKind::Min => p.y < best.y,
            ExtremumKind::Max => p.y > best.y,
        };
        if better {
            best = *p;
        }
    }

    Ok(best)
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Result<f64, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::InsufficientData {
            points: 0,
            required: 1,
        });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Ordinary least-squares fit of `y = slope * x + intercept`.
///
/// Needs at least two points with distinct x values. When the slices differ
/// in length only the paired prefix is used.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Result<LinearFit, AnalysisError> {
    if xs.len() != ys.len() {
        return Err(AnalysisError::length_mismatch(xs.len(), ys.len()));
    }

    let n = xs.len();
    if n < 2 {
        return Err(AnalysisError::InsufficientData {
            points: n,
            required: 2,
        });
    }

    let count = n as f64;
    let mean_x = xs.iter().sum::<f64>() / count;
    let mean_y = ys.iter().sum::<f64>() / count;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }

    // All x equal: the slope is undefined.
    if sxx == 0.0 {
        return Err(AnalysisError::DegenerateFit {
            points: n,
            x: xs[0],
        });
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let residual = y - (slope * x + intercept);
        ss_res += residual * residual;
        ss_tot += (y - mean_y) * (y - mean_y);
    }
    let r_squared = if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot };

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(label: &str, points: &[(f64, f64)]) -> Series {
        Series::new(
            label,
            points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        )
    }

    #[test]
    fn test_ratio_is_pointwise() {
        let naive = series("naive", &[(10.0, 20.0), (20.0, 90.0), (40.0, 400.0)]);
        let ost = series("ost", &[(10.0, 10.0), (20.0, 30.0), (40.0, 50.0)]);

        let result = ratio(&naive, &ost, divide).unwrap();
        assert_eq!(result.xs(), vec![10.0, 20.0, 40.0]);
        assert_eq!(result.ys(), vec![2.0, 3.0, 8.0]);
    }

    #[test]
    fn test_ratio_custom_combine() {
        let a = series("a", &[(1.0, 6.0), (2.0, 8.0)]);
        let b = series("b", &[(1.0, 2.0), (2.0, 4.0)]);
        let diff = ratio(&a, &b, |x, y| x - y).unwrap();
        assert_eq!(diff.ys(), vec![4.0, 4.0]);
    }

    #[test]
    fn test_ratio_rejects_misaligned_series() {
        let a = series("a", &[(1.0, 1.0), (2.0, 1.0)]);
        let shifted = series("b", &[(1.0, 1.0), (3.0, 1.0)]);
        let shorter = series("c", &[(1.0, 1.0)]);

        assert!(matches!(
            ratio(&a, &shifted, divide),
            Err(AnalysisError::Alignment { .. })
        ));
        assert!(matches!(
            ratio(&a, &shorter, divide),
            Err(AnalysisError::Alignment { .. })
        ));
    }

    #[test]
    fn test_ratio_rejects_zero_denominator() {
        let a = series("a", &[(1.0, 1.0), (2.0, 1.0)]);
        let b = series("b", &[(1.0, 1.0), (2.0, 0.0)]);
        match ratio(&a, &b, divide) {
            Err(AnalysisError::ZeroDenominator { x, .. }) => assert_eq!(x, 2.0),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_per_item() {
        let total = series("delete_time", &[(100.0, 500.0), (200.0, 1200.0)]);
        let count = series("intervals", &[(100.0, 100.0), (200.0, 200.0)]);

        let avg = per_item(&total, &count, 0.5).unwrap();
        assert_eq!(avg.label, "delete_time");
        assert_eq!(avg.ys(), vec![10.0, 12.0]);
    }

    #[test]
    fn test_normalize_baseline_only_is_all_ones() {
        let base = series("all_positive", &[(0.0, 120.0), (1.0, 3.5)]);
        let normalized = normalize_to_baseline(&[base], "all_positive").unwrap();
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].ys(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_normalize_to_baseline() {
        let set = vec![
            series("mixed", &[(0.0, 300.0), (1.0, 7.0)]),
            series("all_positive", &[(0.0, 100.0), (1.0, 3.5)]),
        ];
        let normalized = normalize_to_baseline(&set, "all_positive").unwrap();
        assert_eq!(normalized[0].label, "mixed");
        assert_eq!(normalized[0].ys(), vec![3.0, 2.0]);
        assert_eq!(normalized[1].ys(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_normalize_unknown_baseline() {
        let set = vec![series("mixed", &[(0.0, 1.0)])];
        match normalize_to_baseline(&set, "all_positive") {
            Err(AnalysisError::Key { key }) => assert_eq!(key, "all_positive"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_normalize_zero_baseline() {
        let set = vec![
            series("mixed", &[(0.0, 300.0), (1.0, 7.0)]),
            series("all_positive", &[(0.0, 100.0), (1.0, 0.0)]),
        ];
        match normalize_to_baseline(&set, "all_positive") {
            Err(AnalysisError::ZeroDenominator { series, x }) => {
                assert_eq!(series, "all_positive");
                assert_eq!(x, 1.0);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_normalize_x_missing_from_baseline() {
        let set = vec![
            series("mixed", &[(0.0, 300.0), (2.0, 7.0)]),
            series("all_positive", &[(0.0, 100.0), (1.0, 3.5)]),
        ];
        match normalize_to_baseline(&set, "all_positive") {
            Err(AnalysisError::Alignment { left, right, detail }) => {
                assert_eq!(left, "mixed");
                assert_eq!(right, "all_positive");
                assert!(detail.contains("x=2"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_extremum_first_occurrence_on_ties() {
        let s = series("speedup", &[(1.0, 2.0), (2.0, 9.0), (3.0, 9.0), (4.0, 2.0)]);
        assert_eq!(extremum(&s, ExtremumKind::Max).unwrap(), Point::new(2.0, 9.0));
        assert_eq!(extremum(&s, ExtremumKind::Min).unwrap(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_extremum_empty_series() {
        let s = series("empty", &[]);
        assert!(matches!(
            extremum(&s, ExtremumKind::Max),
            Err(AnalysisError::InsufficientData { points: 0, .. })
        ));
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 6.0]).unwrap(), 3.0);
        assert!(mean(&[]).is_err());
    }

    #[test]
    fn test_linear_fit_exact_line() {
        let xs = [0.0, 1.0, 2.0, 5.0, 10.0];
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 3.0).collect();

        let fit = linear_fit(&xs, &ys).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 3.0).abs() < 1e-9);
        assert!((fit.r_squared - 1.0).abs() < 1e-9);

        let fitted = fit.fitted(&xs);
        for (f, y) in fitted.iter().zip(&ys) {
            assert!((f - y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_linear_fit_noisy_r_squared() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [1.0, 3.0, 2.0, 4.0];
        let fit = linear_fit(&xs, &ys).unwrap();
        assert!((fit.slope - 0.8).abs() < 1e-9);
        assert!((fit.intercept - 0.5).abs() < 1e-9);
        assert!((fit.r_squared - 0.64).abs() < 1e-9);
    }

    #[test]
    fn test_linear_fit_single_point() {
        assert!(matches!(
            linear_fit(&[1.0], &[5.0]),
            Err(AnalysisError::InsufficientData {
                points: 1,
                required: 2
            })
        ));
    }

    #[test]
    fn test_linear_fit_constant_x() {
        let err = linear_fit(&[4.0, 4.0, 4.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::DegenerateFit { points: 3, x } if x == 4.0
        ));
        assert!(err.to_string().contains("all 3 point(s)"));
    }

    #[test]
    fn test_linear_fit_rejects_unpaired_values() {
        assert!(matches!(
            linear_fit(&[1.0, 2.0, 3.0], &[2.0, 4.0]),
            Err(AnalysisError::Alignment { .. })
        ));
        assert!(matches!(
            linear_fit(&[1.0], &[2.0, 4.0]),
            Err(AnalysisError::Alignment { .. })
        ));
    }
}
