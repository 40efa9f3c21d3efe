#![deny(warnings)]

//! Eight-panel PNG dashboard of a generated table.

pub mod panels;

use oil_core::SeriesTable;
use panels::{Axis, Mark, Panel, Series};
use plotters::chart::DualCoordChartContext;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

pub use panels::dashboard_panels;

/// Output size in pixels.
pub const DASHBOARD_SIZE: (u32, u32) = (2000, 2400);

const BAR_HALF_WIDTH: f64 = 0.4;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("nothing to plot: table is empty")]
    EmptyTable,
    /// Backend failure, flattened to its message.
    #[error("drawing failed: {0}")]
    Drawing(String),
}

type DrawResult = Result<(), Box<dyn std::error::Error>>;
type Plane = Cartesian2d<RangedCoordf64, RangedCoordf64>;
type Chart<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Plane>;

/// File name of the dashboard, e.g. `Lavande_pharmacopoeia_analysis.png`.
pub fn chart_file_name(oil: &str) -> String {
    format!("{}_pharmacopoeia_analysis.png", oil_core::file_stem(oil))
}

pub fn dashboard_title(oil: &str, start_year: i32, end_year: i32) -> String {
    format!("Analyse Pharmacopée - Huile Essentielle de {oil} ({start_year}-{end_year})")
}

/// Renders the 4x2 dashboard for `table` into a PNG at `path`.
pub fn render_dashboard(oil: &str, table: &SeriesTable, path: &Path) -> Result<(), ChartError> {
    let (first, last) = match (table.first(), table.last()) {
        (Some(f), Some(l)) => (f.year, l.year),
        _ => return Err(ChartError::EmptyTable),
    };
    let title = dashboard_title(oil, first, last);
    draw_dashboard(&title, table, path).map_err(|e| ChartError::Drawing(e.to_string()))?;
    info!(path = %path.display(), "chart written");
    Ok(())
}

fn draw_dashboard(title: &str, table: &SeriesTable, path: &Path) -> DrawResult {
    let root = BitMapBackend::new(path, DASHBOARD_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, ("sans-serif", 36))?;
    let x = panels::year_span(table);
    let areas = root.split_evenly((4, 2));
    for (area, panel) in areas.iter().zip(dashboard_panels(table)) {
        debug!(panel = panel.caption, "drawing panel");
        draw_panel(area, &panel, x.clone())?;
    }
    root.present()?;
    Ok(())
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    panel: &Panel,
    x: Range<f64>,
) -> DrawResult {
    let mut builder = ChartBuilder::on(area);
    builder
        .caption(panel.caption, ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(35)
        .y_label_area_size(60);

    match &panel.secondary {
        None => {
            let mut chart = builder.build_cartesian_2d(x, panel.primary.range())?;
            configure_mesh(&mut chart, &panel.primary)?;
            for s in &panel.primary.series {
                plot(&mut chart, s)?;
            }
            draw_legend(&mut chart)?;
        }
        Some(secondary) => {
            builder.right_y_label_area_size(60);
            let mut chart = builder
                .build_cartesian_2d(x.clone(), panel.primary.range())?
                .set_secondary_coord(x, secondary.range());
            configure_mesh(&mut chart, &panel.primary)?;
            chart
                .configure_secondary_axes()
                .y_desc(secondary.desc)
                .draw()?;
            for s in &panel.primary.series {
                plot(&mut chart, s)?;
            }
            for s in &secondary.series {
                plot_secondary(&mut chart, s)?;
            }
            draw_legend(&mut chart)?;
        }
    }
    Ok(())
}

fn configure_mesh<'a, 'b: 'a>(chart: &mut Chart<'a, 'b>, axis: &Axis) -> DrawResult {
    chart
        .configure_mesh()
        .x_desc("Année")
        .y_desc(axis.desc)
        .x_label_formatter(&|year: &f64| format!("{year:.0}"))
        .draw()?;
    Ok(())
}

fn bars(s: &Series) -> impl Iterator<Item = Rectangle<(f64, f64)>> + '_ {
    s.points.iter().enumerate().map(move |(i, &(x, top))| {
        Rectangle::new(
            [(x - BAR_HALF_WIDTH, s.base(i)), (x + BAR_HALF_WIDTH, top)],
            s.color.mix(0.75).filled(),
        )
    })
}

fn plot<'a, 'b: 'a>(chart: &mut Chart<'a, 'b>, s: &Series) -> DrawResult {
    let color = s.color;
    match s.mark {
        Mark::Line => {
            chart
                .draw_series(LineSeries::new(
                    s.points.iter().copied(),
                    color.stroke_width(2),
                ))?
                .label(s.label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }
        Mark::Bars => {
            chart
                .draw_series(bars(s))?
                .label(s.label)
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled())
                });
        }
    }
    Ok(())
}

fn plot_secondary<'a, 'b: 'a>(
    chart: &mut DualCoordChartContext<'a, BitMapBackend<'b>, Plane, Plane>,
    s: &Series,
) -> DrawResult {
    let color = s.color;
    match s.mark {
        Mark::Line => {
            chart
                .draw_secondary_series(LineSeries::new(
                    s.points.iter().copied(),
                    color.stroke_width(2),
                ))?
                .label(s.label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }
        Mark::Bars => {
            chart
                .draw_secondary_series(bars(s))?
                .label(s.label)
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled())
                });
        }
    }
    Ok(())
}

fn draw_legend<'a, 'b: 'a>(chart: &mut Chart<'a, 'b>) -> DrawResult {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font(("sans-serif", 14))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_pattern() {
        assert_eq!(chart_file_name("Lavande"), "Lavande_pharmacopoeia_analysis.png");
        assert_eq!(chart_file_name("a/b"), "a_b_pharmacopoeia_analysis.png");
        assert_eq!(
            dashboard_title("Citron", 2000, 2025),
            "Analyse Pharmacopée - Huile Essentielle de Citron (2000-2025)"
        );
    }

    #[test]
    fn empty_table_is_rejected_before_drawing() {
        let path = Path::new("never_written.png");
        assert!(matches!(
            render_dashboard("Lavande", &SeriesTable::default(), path),
            Err(ChartError::EmptyTable)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn dashboard_renders_or_reports_backend_error() {
        let table = oil_sim::MetricSimulator::new(
            oil_core::resolve_profile("Eucalyptus"),
            oil_core::SimConfig {
                seed: Some(11),
                ..oil_core::SimConfig::default()
            },
        )
        .unwrap()
        .run()
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(chart_file_name("Eucalyptus"));
        match render_dashboard("Eucalyptus", &table, &path) {
            Ok(()) => {
                let bytes = std::fs::read(&path).unwrap();
                assert_eq!(&bytes[..4], b"\x89PNG");
            }
            // Hosts without system fonts fail on text layout.
            Err(e) => assert!(matches!(e, ChartError::Drawing(_)), "{e}"),
        }
    }
}
