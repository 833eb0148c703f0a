//! Nominal vs. deflated exchange rate line chart.

use std::path::Path;

use chrono::NaiveDate;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use super::{FONT, date_bounds, draw_err, format_axis_value, format_date_tick, value_bounds};
use crate::domain::{ImageSize, MergedRow};
use crate::error::AppError;

pub const TITLE: &str = "Tipo de Cambio Nominal vs. Deflactado (CER)";
pub const NOMINAL_LABEL: &str = "Tipo de Cambio Nominal";
pub const DEFLATED_LABEL: &str = "Tipo de Cambio Deflactado (CER)";

const NOMINAL_COLOR: RGBColor = BLUE;
const DEFLATED_COLOR: RGBColor = RED;

/// A value label pinned to a data point, offset in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub date: NaiveDate,
    pub value: f64,
    pub text: String,
    pub offset: (i32, i32),
}

/// First/last value labels for one series. First labels sit above-left of the
/// point, last labels to its right.
pub fn endpoint_annotations(rows: &[MergedRow], value: impl Fn(&MergedRow) -> f64) -> Vec<Annotation> {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Vec::new();
    };

    [(first, (-20, -28)), (last, (10, -8))]
        .into_iter()
        .map(|(row, offset)| Annotation {
            date: row.date,
            value: value(row),
            text: format!("{:.2}", value(row)),
            offset,
        })
        .collect()
}

/// Render the chart to `path`.
pub fn render_deflation_chart(path: &Path, rows: &[MergedRow], size: ImageSize) -> Result<(), AppError> {
    let (x0, x1) = date_bounds(rows.iter().map(|r| r.date))
        .ok_or_else(|| AppError::data("Nothing to plot: the merged series is empty."))?;
    let y = value_bounds(rows.iter().flat_map(|r| [r.nominal, r.deflated]))
        .ok_or_else(|| AppError::data("Nothing to plot: no finite values in the merged series."))?;

    let root = BitMapBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, (FONT, 36).into_font())
        .margin(24)
        .x_label_area_size(70)
        .y_label_area_size(90)
        .build_cartesian_2d(x0..x1, y)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_desc("Fecha")
        .y_desc("Valor")
        .x_labels(13)
        .y_labels(10)
        .x_label_formatter(&format_date_tick)
        .y_label_formatter(&|v| format_axis_value(*v))
        .label_style((FONT, 18).into_font())
        .axis_desc_style((FONT, 22).into_font())
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(LineSeries::new(
            rows.iter().map(|r| (r.date, r.nominal)),
            NOMINAL_COLOR.stroke_width(2),
        ))
        .map_err(draw_err)?
        .label(NOMINAL_LABEL)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], NOMINAL_COLOR.stroke_width(2)));

    chart
        .draw_series(DashedLineSeries::new(
            rows.iter().map(|r| (r.date, r.deflated)),
            10,
            6,
            DEFLATED_COLOR.stroke_width(2),
        ))
        .map_err(draw_err)?
        .label(DEFLATED_LABEL)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], DEFLATED_COLOR.stroke_width(2)));

    for (annotations, color) in [
        (endpoint_annotations(rows, |r| r.nominal), NOMINAL_COLOR),
        (endpoint_annotations(rows, |r| r.deflated), DEFLATED_COLOR),
    ] {
        let style = (FONT, 20).into_font().style(FontStyle::Bold).color(&color);
        chart
            .draw_series(annotations.into_iter().map(|a| {
                EmptyElement::at((a.date, a.value)) + Text::new(a.text, a.offset, style.clone())
            }))
            .map_err(draw_err)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT, 18).into_font())
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .draw()
        .map_err(draw_err)?;

    root.present()
        .map_err(|e| AppError::output(format!("Failed to write chart '{}': {e}", path.display())))?;

    Ok(())
}
