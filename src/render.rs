//! Chart rendering: hourly volume line plot next to a weekday x hour heatmap
//! with a color scale, written as one PNG.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::path::Path;
use tracing::info;

use crate::analyzers::heatmap::HeatmapMatrix;
use crate::analyzers::types::HourlyAggregate;
use crate::error::{ReportError, Result};

pub const IMAGE_SIZE: (u32, u32) = (1600, 620);

const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);

fn tick_font(size: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal)
}

/// Viridis-like stops, low to high.
const SCALE: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// Maps `value / max` onto [`SCALE`].
pub fn heat_color(value: f64, max: f64) -> RGBColor {
    let t = if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let pos = t * (SCALE.len() - 1) as f64;
    let i = (pos.floor() as usize).min(SCALE.len() - 2);
    let frac = pos - i as f64;

    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (r0, g0, b0) = SCALE[i];
    let (r1, g1, b1) = SCALE[i + 1];
    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Label for an integer tick `v` taken from `labels`; empty between ticks.
fn tick_label<T: ToString>(v: f64, labels: &[T]) -> String {
    let idx = v.round();
    if (v - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels
        .get(idx as usize)
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Draws both charts into a PNG at `path`.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn render_report(path: &Path, hourly: &[HourlyAggregate], heatmap: &HeatmapMatrix) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(ReportError::Render(format!(
                "output directory {} does not exist",
                parent.display()
            )));
        }
    }

    let root = BitMapBackend::new(path, IMAGE_SIZE).into_drawing_area();
    draw_report(root, hourly, heatmap).map_err(|e| ReportError::Render(format!("{e:#}")))?;

    info!("Chart written");
    Ok(())
}

fn draw_report<DB>(
    root: DrawingArea<DB, Shift>,
    hourly: &[HourlyAggregate],
    heatmap: &HeatmapMatrix,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let (left, right) = root.split_horizontally(IMAGE_SIZE.0 as i32 / 2);

    draw_hourly(&left, hourly)?;
    draw_heatmap(&right, heatmap)?;

    root.present()?;
    Ok(())
}

fn draw_hourly<DB>(area: &DrawingArea<DB, Shift>, hourly: &[HourlyAggregate]) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let y_max = hourly.iter().map(|r| r.trips).max().unwrap_or(0).max(1) as f64 * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption("Trips by hour of day", ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..23f64, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_labels(24)
        .x_desc("Hour")
        .y_desc("Trips")
        .label_style(tick_font(14.0).color(&BLACK))
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    chart.draw_series(LineSeries::new(
        hourly.iter().map(|r| (r.hour as f64, r.trips as f64)),
        ShapeStyle {
            color: LINE_COLOR.to_rgba(),
            filled: false,
            stroke_width: 2,
        },
    ))?;
    chart.draw_series(
        hourly
            .iter()
            .map(|r| Circle::new((r.hour as f64, r.trips as f64), 4, LINE_COLOR.filled())),
    )?;

    Ok(())
}

fn draw_heatmap<DB>(area: &DrawingArea<DB, Shift>, heatmap: &HeatmapMatrix) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let width = area.dim_in_pixel().0 as i32;
    let (grid_area, scale_area) = area.split_horizontally(width - 110);

    let cols = heatmap.hours.len().max(1);
    let rows = heatmap.cells.len();
    let max = heatmap.max() as f64;
    let hour_labels = heatmap.column_labels();
    let day_labels = heatmap.row_labels();

    // cells are centred on integer coordinates so ticks land mid-cell
    let mut chart = ChartBuilder::on(&grid_area)
        .caption("Trips by weekday and hour", ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(100)
        .build_cartesian_2d(-0.5f64..cols as f64 - 0.5, -0.5f64..rows as f64 - 0.5)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(cols)
        .y_labels(rows)
        .x_desc("Hour")
        .label_style(tick_font(14.0).color(&BLACK))
        .x_label_formatter(&|v| tick_label(*v, &hour_labels))
        // Monday on the top row
        .y_label_formatter(&|v| tick_label(rows as f64 - 1.0 - *v, &day_labels))
        .draw()?;

    chart.draw_series(heatmap.cells.iter().enumerate().flat_map(|(r, row)| {
        let y = (rows - 1 - r) as f64;
        row.iter().enumerate().map(move |(c, count)| {
            let x = c as f64;
            Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                heat_color(*count as f64, max).filled(),
            )
        })
    }))?;

    draw_scale(&scale_area, max)?;
    Ok(())
}

fn draw_scale<DB>(area: &DrawingArea<DB, Shift>, max: f64) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    const STEPS: usize = 100;
    let top = max.max(1.0);

    let mut chart = ChartBuilder::on(area)
        .margin_top(64)
        .margin_bottom(65)
        .margin_right(10)
        .set_label_area_size(LabelAreaPosition::Right, 70)
        .build_cartesian_2d(0f64..1f64, 0f64..top)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(6)
        .y_label_style(tick_font(14.0).color(&BLACK))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    chart.draw_series((0..STEPS).map(|i| {
        let lo = top * i as f64 / STEPS as f64;
        let hi = top * (i + 1) as f64 / STEPS as f64;
        Rectangle::new([(0.0, lo), (1.0, hi)], heat_color(lo, top).filled())
    }))?;

    Ok(())
}
