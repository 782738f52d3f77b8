use std::f32::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, Pos2, RichText, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, GridMark, Plot, Points};

use crate::chart::{CompositionChart, MapSpec, RankedBarChart, DONUT_HOLE};
use crate::color::{generate_palette, heat_color, percentile_color};

// ---------------------------------------------------------------------------
// Tract map
// ---------------------------------------------------------------------------

/// Scatter of one marker per tract over longitude and latitude. Colour
/// encodes the CES percentile on its fixed scale, marker size encodes
/// population, and hovering shows the per-marker text.
pub fn map_plot(ui: &mut Ui, spec: &MapSpec) {
    if spec.markers.is_empty() {
        ui.label("No tracts match the current filters.");
        return;
    }

    Plot::new("tract_map")
        .height(340.0)
        .data_aspect(spec.aspect_ratio())
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_scroll(false)
        .label_formatter(|name, value| {
            if name.is_empty() {
                format!("{:.3}, {:.3}", value.x, value.y)
            } else {
                name.to_string()
            }
        })
        .show(ui, |plot_ui| {
            for marker in &spec.markers {
                let points = Points::new(vec![[marker.lon, marker.lat]])
                    .radius(marker.radius)
                    .color(percentile_color(marker.percentile))
                    .filled(true)
                    .name(&marker.hover);
                plot_ui.points(points);
            }
        });
}

// ---------------------------------------------------------------------------
// Ranked indicator bars
// ---------------------------------------------------------------------------

/// Horizontal bar chart of mean indicator percentiles. Bars arrive sorted
/// ascending, so the heaviest burden renders at the top.
pub fn ranked_bar_plot(ui: &mut Ui, chart: &RankedBarChart) {
    if chart.bars.is_empty() {
        ui.label("No indicator data for the current selection.");
        return;
    }

    let labels: Vec<&'static str> = chart.bars.iter().map(|b| b.label).collect();
    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::new(i as f64, b.mean)
                .name(b.label)
                .fill(heat_color(b.mean / 100.0))
                .width(0.6)
        })
        .collect();

    Plot::new("indicator_bars")
        .height(240.0)
        .x_axis_label("Mean percentile")
        .include_x(0.0)
        .include_x(100.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let i = mark.value.round();
            if (mark.value - i).abs() < 0.05 && i >= 0.0 && (i as usize) < labels.len() {
                labels[i as usize].to_string()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .horizontal()
                    .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
                        format!("{}: {:.1}", bar.name, bar.value)
                    })),
            );
        });
}

// ---------------------------------------------------------------------------
// Demographic composition donut
// ---------------------------------------------------------------------------

/// Donut of mean race and ethnicity shares, drawn with the painter as
/// tessellated ring segments, with a colour legend underneath.
pub fn composition_donut(ui: &mut Ui, chart: &CompositionChart) {
    if chart.slices.is_empty() {
        ui.label("No demographic data for the current selection.");
        return;
    }

    let palette = generate_palette(chart.slices.len());

    let size = Vec2::new(ui.available_width(), 200.0);
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let rect = response.rect;
    let outer = rect.height().min(rect.width()) * 0.5 - 4.0;
    let inner = outer * DONUT_HOLE;

    // Start at twelve o'clock and sweep clockwise.
    let mut start = -FRAC_PI_2;
    for (slice, color) in chart.slices.iter().zip(palette.iter()) {
        let sweep = slice.fraction as f32 * TAU;
        ring_segment(&painter, rect.center(), inner, outer, start, start + sweep, *color);
        start += sweep;
    }

    for (slice, color) in chart.slices.iter().zip(palette.iter()) {
        ui.horizontal(|ui: &mut Ui| {
            ui.label(RichText::new("■").color(*color));
            ui.label(format!("{}  {:.1}%", slice.label, slice.pct));
        });
    }
}

/// Fill an annular segment with small convex quads. Steps of roughly three
/// degrees keep the arc smooth without a custom tessellator.
fn ring_segment(
    painter: &egui::Painter,
    center: Pos2,
    inner: f32,
    outer: f32,
    from: f32,
    to: f32,
    color: Color32,
) {
    let steps = (((to - from) / 0.05).ceil() as usize).max(1);
    let step = (to - from) / steps as f32;
    for i in 0..steps {
        let a0 = from + step * i as f32;
        let a1 = a0 + step;
        let quad = vec![
            center + Vec2::angled(a0) * inner,
            center + Vec2::angled(a0) * outer,
            center + Vec2::angled(a1) * outer,
            center + Vec2::angled(a1) * inner,
        ];
        painter.add(Shape::convex_polygon(quad, color, Stroke::NONE));
    }
}
