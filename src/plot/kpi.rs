//! KPI report: one row per watch-listed variable, a text panel on the left
//! and its history chart on the right.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{FONT, date_bounds, draw_err, format_axis_value, format_date_tick, value_bounds};
use crate::domain::{ImageSize, KpiPanel, KpiRow};
use crate::error::AppError;

pub const REPORT_TITLE: &str = "BCRA Principales Variables";
pub const NO_HISTORY_MESSAGE: &str = "Datos históricos no disponibles";

/// Height reserved for the report title.
const TITLE_BAND: u32 = 90;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Canvas size for `rows` report rows. Fails if the height doesn't fit in `u32`.
pub fn kpi_canvas_size(rows: usize, width: u32, row_height: u32) -> Result<ImageSize, AppError> {
    let height = u32::try_from(rows.max(1))
        .ok()
        .and_then(|rows| row_height.checked_mul(rows))
        .and_then(|body| body.checked_add(TITLE_BAND))
        .ok_or_else(|| {
            AppError::config(format!("Report of {rows} rows x {row_height}px is too tall to render."))
        })?;
    Ok(ImageSize { width, height })
}

/// One text line of a KPI panel, placed at a fraction of the panel height.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiLine {
    pub text: String,
    pub bold: bool,
    pub y_frac: f64,
}

pub fn kpi_lines(row: &KpiRow) -> [KpiLine; 3] {
    [
        KpiLine {
            text: row.label.clone(),
            bold: true,
            y_frac: 0.4,
        },
        KpiLine {
            text: format!("Valor: {}", format_kpi_value(row.value)),
            bold: false,
            y_frac: 0.6,
        },
        KpiLine {
            text: format!("Fecha: {}", row.date.format("%Y-%m-%d")),
            bold: false,
            y_frac: 0.8,
        },
    ]
}

/// Up to two decimals, trailing zeros dropped.
pub fn format_kpi_value(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Render the report to `path`.
pub fn render_kpi_report(
    path: &Path,
    panels: &[KpiPanel],
    width: u32,
    row_height: u32,
) -> Result<(), AppError> {
    if panels.is_empty() {
        return Err(AppError::data("Nothing to plot: the KPI selection is empty."));
    }

    let size = kpi_canvas_size(panels.len(), width, row_height)?;
    let root = BitMapBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let body = root
        .titled(REPORT_TITLE, (FONT, 44).into_font().style(FontStyle::Bold))
        .map_err(draw_err)?;

    let cells = body.split_evenly((panels.len(), 2));
    for (panel, pair) in panels.iter().zip(cells.chunks(2)) {
        draw_kpi_panel(&pair[0], &panel.row)?;
        if panel.has_history() {
            draw_history_panel(&pair[1], panel)?;
        } else {
            draw_placeholder(&pair[1])?;
        }
    }

    root.present()
        .map_err(|e| AppError::output(format!("Failed to write report '{}': {e}", path.display())))?;

    Ok(())
}

fn draw_kpi_panel(area: &Area<'_>, row: &KpiRow) -> Result<(), AppError> {
    let inner = area.margin(12, 12, 12, 12);
    let (w, h) = inner.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);

    inner
        .draw(&Rectangle::new([(0, 0), (w - 1, h - 1)], BLACK.stroke_width(1)))
        .map_err(draw_err)?;

    let x = (w as f64 * 0.05) as i32;
    for line in kpi_lines(row) {
        let font = (FONT, 28).into_font();
        let font = if line.bold { font.style(FontStyle::Bold) } else { font };
        let style = TextStyle::from(font).pos(Pos::new(HPos::Left, VPos::Center));
        let y = (h as f64 * line.y_frac) as i32;
        inner.draw(&Text::new(line.text, (x, y), style)).map_err(draw_err)?;
    }

    Ok(())
}

fn draw_placeholder(area: &Area<'_>) -> Result<(), AppError> {
    let (w, h) = area.dim_in_pixel();
    let style = TextStyle::from((FONT, 24).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(NO_HISTORY_MESSAGE, (w as i32 / 2, h as i32 / 2), style))
        .map_err(draw_err)?;
    Ok(())
}

fn draw_history_panel(area: &Area<'_>, panel: &KpiPanel) -> Result<(), AppError> {
    let points = &panel.history.points;
    let (x0, x1) = date_bounds(points.iter().map(|p| p.date))
        .ok_or_else(|| AppError::data(format!("No history to plot for variable {}.", panel.row.id)))?;
    let y = value_bounds(points.iter().map(|p| p.value))
        .ok_or_else(|| AppError::data(format!("No finite history values for variable {}.", panel.row.id)))?;

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.row.label, (FONT, 24).into_font())
        .margin(12)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(x0..x1, y)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_desc("Mes-Año")
        .y_desc("Valor")
        .x_labels(7)
        .y_labels(6)
        .x_label_formatter(&format_date_tick)
        .y_label_formatter(&|v| format_axis_value(*v))
        .label_style((FONT, 16).into_font())
        .axis_desc_style((FONT, 18).into_font())
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(LineSeries::new(
            points.iter().map(|p| (p.date, p.value)),
            BLUE.stroke_width(2),
        ))
        .map_err(draw_err)?;

    Ok(())
}
