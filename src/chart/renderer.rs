//! Bitmap rendering with plotters.

use super::{ChartRenderer, Figure, Marker, Panel, PanelContent, PlotLine};
use crate::config::StyleConfig;
use crate::error::AnalysisError;
use crate::models::Series;
use plotters::coord::ranged1d::{Ranged, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use tracing::debug;

const FONT: &str = "sans-serif";
const BAR_SPAN: f64 = 0.7;

/// Renders figures to PNG files, one panel per column.
#[derive(Debug, Clone)]
pub struct PlottersRenderer {
    style: StyleConfig,
}

impl PlottersRenderer {
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    fn draw_panel<DB: DrawingBackend>(
        &self,
        panel: &Panel,
        area: &DrawingArea<DB, Shift>,
    ) -> Result<(), AnalysisError> {
        match &panel.content {
            PanelContent::Lines(lines) => self.draw_lines(panel, lines, area),
            PanelContent::Bars { categories, groups } => {
                self.draw_bars(panel, categories, groups, area)
            }
        }
    }

    fn draw_lines<DB: DrawingBackend>(
        &self,
        panel: &Panel,
        lines: &[PlotLine],
        area: &DrawingArea<DB, Shift>,
    ) -> Result<(), AnalysisError> {
        // Non-positive values have no place on a log axis.
        let plotted: Vec<Vec<(f64, f64)>> = lines
            .iter()
            .map(|line| {
                line.series
                    .points
                    .iter()
                    .filter(|p| !panel.log_y || p.y > 0.0)
                    .map(|p| (p.x, p.y))
                    .collect()
            })
            .collect();

        let xs: Vec<f64> = plotted.iter().flatten().map(|p| p.0).collect();
        let mut ys: Vec<f64> = plotted.iter().flatten().map(|p| p.1).collect();
        ys.extend(panel.reference_line);
        let x_range = padded_range(&xs, 0.05);

        let mut builder = ChartBuilder::on(area);
        builder
            .caption(&panel.title, (FONT, f64::from(self.style.title_font_size)))
            .margin(10)
            .x_label_area_size(45)
            .y_label_area_size(65);

        if panel.log_y {
            let mut chart = builder
                .build_cartesian_2d(x_range.clone(), log_range(&ys).log_scale())
                .map_err(AnalysisError::render)?;
            self.plot_lines(&mut chart, panel, lines, plotted, x_range)
        } else {
            let mut chart = builder
                .build_cartesian_2d(x_range.clone(), padded_range(&ys, 0.1))
                .map_err(AnalysisError::render)?;
            self.plot_lines(&mut chart, panel, lines, plotted, x_range)
        }
    }

    /// Mesh, series, reference line and legend of a line panel, for either y scale.
    fn plot_lines<'a, DB, Y>(
        &self,
        chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, Y>>,
        panel: &Panel,
        lines: &[PlotLine],
        plotted: Vec<Vec<(f64, f64)>>,
        x_range: Range<f64>,
    ) -> Result<(), AnalysisError>
    where
        DB: DrawingBackend + 'a,
        Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
    {
        chart
            .configure_mesh()
            .x_desc(panel.x_label.as_str())
            .y_desc(panel.y_label.as_str())
            .label_style((FONT, f64::from(self.style.label_font_size)))
            .x_label_formatter(&|v: &f64| tick_label(*v))
            .y_label_formatter(&|v: &f64| tick_label(*v))
            .bold_line_style(BLACK.mix(self.style.grid_alpha))
            .light_line_style(WHITE)
            .draw()
            .map_err(AnalysisError::render)?;

        let marker_size = self.style.marker_size as i32;
        for (idx, (line, points)) in lines.iter().zip(plotted).enumerate() {
            let color = Palette99::pick(idx).to_rgba();
            let stroke = color.stroke_width(self.style.line_width);

            let drawn = if line.dashed {
                chart.draw_series(DashedLineSeries::new(points.clone(), 8, 5, stroke))
            } else {
                chart.draw_series(LineSeries::new(points.clone(), stroke))
            }
            .map_err(AnalysisError::render)?;

            if line.in_legend {
                drawn
                    .label(line.series.label.clone())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], stroke));
            }

            let fill = color.filled();
            match line.marker {
                Marker::None => {}
                Marker::Circle => {
                    chart
                        .draw_series(points.iter().map(|&p| Circle::new(p, marker_size, fill)))
                        .map_err(AnalysisError::render)?;
                }
                Marker::Square => {
                    chart
                        .draw_series(points.iter().map(|&p| {
                            EmptyElement::at(p)
                                + Rectangle::new(
                                    [(-marker_size, -marker_size), (marker_size, marker_size)],
                                    fill,
                                )
                        }))
                        .map_err(AnalysisError::render)?;
                }
                Marker::Triangle => {
                    chart
                        .draw_series(
                            points
                                .iter()
                                .map(|&p| TriangleMarker::new(p, marker_size + 1, fill)),
                        )
                        .map_err(AnalysisError::render)?;
                }
            }
        }

        if let Some(y) = panel.reference_line {
            chart
                .draw_series(DashedLineSeries::new(
                    vec![(x_range.start, y), (x_range.end, y)],
                    6,
                    4,
                    RED.mix(0.5).stroke_width(1),
                ))
                .map_err(AnalysisError::render)?;
        }

        if lines.iter().any(|l| l.in_legend) {
            chart
                .configure_series_labels()
                .label_font((FONT, f64::from(self.style.legend_font_size)))
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(AnalysisError::render)?;
        }

        Ok(())
    }

    fn draw_bars<DB: DrawingBackend>(
        &self,
        panel: &Panel,
        categories: &[String],
        groups: &[Series],
        area: &DrawingArea<DB, Shift>,
    ) -> Result<(), AnalysisError> {
        let mut ys: Vec<f64> = groups.iter().flat_map(|g| g.ys()).collect();
        ys.push(0.0);
        if let Some(reference) = panel.reference_line {
            ys.push(reference);
        }
        let y_max = ys.iter().copied().fold(f64::MIN, f64::max);
        let x_range = -0.5..(categories.len().max(1) as f64 - 0.5);

        let category_ticks = |v: &f64| {
            let idx = v.round();
            if (v - idx).abs() < 1e-6 && idx >= 0.0 {
                categories.get(idx as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        };

        let mut chart = ChartBuilder::on(area)
            .caption(&panel.title, (FONT, f64::from(self.style.title_font_size)))
            .margin(10)
            .x_label_area_size(45)
            .y_label_area_size(65)
            .build_cartesian_2d(x_range.clone(), 0.0..(y_max * 1.1).max(1e-9))
            .map_err(AnalysisError::render)?;

        chart
            .configure_mesh()
            .x_desc(panel.x_label.as_str())
            .y_desc(panel.y_label.as_str())
            .label_style((FONT, f64::from(self.style.label_font_size)))
            .x_labels(categories.len() + 1)
            .x_label_formatter(&category_ticks)
            .y_label_formatter(&|v: &f64| tick_label(*v))
            .disable_x_mesh()
            .bold_line_style(BLACK.mix(self.style.grid_alpha))
            .light_line_style(WHITE)
            .draw()
            .map_err(AnalysisError::render)?;

        let width = BAR_SPAN / groups.len().max(1) as f64;
        for (idx, group) in groups.iter().enumerate() {
            let fill = Palette99::pick(idx).to_rgba().mix(0.8).filled();
            let offset = -BAR_SPAN / 2.0 + width * idx as f64;

            chart
                .draw_series(group.points.iter().map(|p| {
                    let left = p.x + offset;
                    Rectangle::new([(left, 0.0), (left + width, p.y)], fill)
                }))
                .map_err(AnalysisError::render)?
                .label(group.label.clone())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], fill));
        }

        if let Some(reference) = panel.reference_line {
            chart
                .draw_series(DashedLineSeries::new(
                    vec![(x_range.start, reference), (x_range.end, reference)],
                    6,
                    4,
                    RED.mix(0.5).stroke_width(1),
                ))
                .map_err(AnalysisError::render)?;
        }

        chart
            .configure_series_labels()
            .label_font((FONT, f64::from(self.style.legend_font_size)))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(AnalysisError::render)?;

        Ok(())
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, figure: &Figure, path: &Path) -> Result<(), AnalysisError> {
        let columns = figure.panels.len().max(1);
        let size = (
            self.style.panel_width * columns as u32,
            self.style.panel_height,
        );
        debug!("Rendering {} panel(s) to {}", figure.panels.len(), path.display());

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(AnalysisError::render)?;

        let areas = root.split_evenly((1, columns));
        for (panel, area) in figure.panels.iter().zip(areas.iter()) {
            self.draw_panel(panel, area)?;
        }

        root.present().map_err(AnalysisError::render)?;
        Ok(())
    }
}

/// `[min, max]` of `values` widened by `pad` of the span on both sides.
fn padded_range(values: &[f64], pad: f64) -> Range<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return 0.0..1.0;
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if max > min { max - min } else { min.abs().max(1.0) };

    (min - span * pad)..(max + span * pad)
}

/// Positive span of `values`, halved below and doubled above, for a log axis.
fn log_range(values: &[f64]) -> Range<f64> {
    let positive: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();
    if positive.is_empty() {
        return 1.0..10.0;
    }

    let min = positive.iter().copied().fold(f64::INFINITY, f64::min);
    let max = positive.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min / 2.0)..(max * 2.0)
}

/// Axis tick text with three significant digits and no trailing zeros.
fn tick_label(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{}", value);
    }

    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (2 - magnitude).max(0) as usize;
    let text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}
