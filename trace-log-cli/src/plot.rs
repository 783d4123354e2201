//! SVG rendering of decoded series
//!
//! Step channels are drawn as step lines, scatter channels as red crosses, on a
//! single time/value chart with a grid and a legend.

use anyhow::{anyhow, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use trace_log_decoder::{PlotStyle, Series, TraceCapture};

/// Line colors for step channels, cycled in channel order
const STEP_COLORS: [RGBColor; 4] = [
    RGBColor(31, 119, 180),
    RGBColor(44, 160, 44),
    RGBColor(148, 103, 189),
    RGBColor(255, 127, 14),
];

/// Rendering options
#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

/// Render a capture to an SVG file
pub fn render_to_file(capture: &TraceCapture, opts: &PlotOptions, path: &Path) -> Result<()> {
    log::info!("Rendering plot to {:?}", path);
    let root = SVGBackend::new(path, (opts.width, opts.height)).into_drawing_area();
    draw_capture(root, capture, opts).map_err(|e| anyhow!("plotting error: {}", e))
}

/// Render a capture to an SVG document in memory
pub fn render_to_string(capture: &TraceCapture, opts: &PlotOptions) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (opts.width, opts.height)).into_drawing_area();
        draw_capture(root, capture, opts).map_err(|e| anyhow!("plotting error: {}", e))?;
    }
    Ok(svg)
}

fn draw_capture<DB>(
    root: DrawingArea<DB, Shift>,
    capture: &TraceCapture,
    opts: &PlotOptions,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (x_lo, x_hi) = padded(capture.time_range().unwrap_or((0.0, 1.0)), 0.0);
    let (y_lo, y_hi) = padded(
        capture
            .value_range()
            .map(|(lo, hi)| (lo as f64, hi as f64))
            .unwrap_or((0.0, 1.0)),
        0.1,
    );

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&opts.title, ("sans-serif", 24).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc("time (s)")
        .y_desc("value")
        .draw()?;

    let mut step_index = 0;
    for entry in &capture.channels {
        let label = entry.channel.display_label();
        match entry.channel.style {
            PlotStyle::Step => {
                let color = STEP_COLORS[step_index % STEP_COLORS.len()];
                step_index += 1;
                chart
                    .draw_series(LineSeries::new(step_points(&entry.series), color.stroke_width(2)))?
                    .label(label)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }
            PlotStyle::Scatter => {
                chart
                    .draw_series(
                        entry
                            .series
                            .points()
                            .filter(|(t, _)| t.is_finite())
                            .map(|(t, v)| Cross::new((t, v as f64), 5, RED.stroke_width(2))),
                    )?
                    .label(label)
                    .legend(|(x, y)| Cross::new((x + 10, y), 5, RED));
            }
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Vertices of a step line where value i is held over (t[i-1], t[i]]
///
/// Samples with a non-finite time have no place on the axis and are skipped.
fn step_points(series: &Series) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(series.len() * 2);
    let mut prev_time: Option<f64> = None;
    for (t, v) in series.points().filter(|(t, _)| t.is_finite()) {
        let v = v as f64;
        if let Some(prev) = prev_time {
            points.push((prev, v));
        }
        points.push((t, v));
        prev_time = Some(t);
    }
    points
}

/// Widen a range by `fraction` of its span, or by 0.5 if it is degenerate
fn padded((lo, hi): (f64, f64), fraction: f64) -> (f64, f64) {
    let span = hi - lo;
    if !span.is_finite() {
        (0.0, 1.0)
    } else if span <= 0.0 {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo - span * fraction, hi + span * fraction)
    }
}
