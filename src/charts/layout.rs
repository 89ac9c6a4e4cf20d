//! Turns a chart declaration into a `RenderFrame`.
//!
//! Cartesian charts get a band x scale when any x value is non-numeric and a
//! linear one otherwise, and a linear y scale (anchored at zero when bars or
//! areas are present). A `theta` coordinate turns interval marks into pie
//! wedges.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use indexmap::IndexSet;
use serde_json::Value;

use crate::core::{BandScale, LinearScale, Record, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CirclePrimitive, Color, LinePrimitive, PolygonPrimitive, RectPrimitive, RenderFrame,
    TextHAlign, TextPrimitive,
};

use super::palette::{AXIS_COLOR, GRID_COLOR, LABEL_COLOR, TITLE_COLOR, category_color};
use super::{MarkKind, MarkSpec};

const MARGIN_LEFT: f64 = 48.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 16.0;
const MARGIN_BOTTOM: f64 = 32.0;
const TITLE_BAND: f64 = 28.0;
const TITLE_FONT_PX: f64 = 16.0;
const LABEL_FONT_PX: f64 = 11.0;
const Y_TICKS: usize = 5;
const BAR_FILL_RATIO: f64 = 0.7;
const DEFAULT_POINT_RADIUS: f64 = 4.0;
const POINT_RADIUS_RANGE: (f64, f64) = (3.0, 12.0);
const DEFAULT_LINE_WIDTH: f64 = 2.0;
const DEFAULT_AREA_OPACITY: f64 = 0.65;
const DEFAULT_PIE_RADIUS: f64 = 0.85;

/// Plain-data view of a chart, detached from its script handles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSnapshot {
    pub title: Option<String>,
    pub data: Option<Value>,
    pub coordinate: Option<Value>,
    pub marks: Vec<MarkSpec>,
}

#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl PlotArea {
    fn width(self) -> f64 {
        self.right - self.left
    }

    fn height(self) -> f64 {
        self.bottom - self.top
    }
}

struct Layer<'a> {
    index: usize,
    spec: &'a MarkSpec,
    records: Vec<&'a Record>,
}

enum XScale {
    Band(BandScale),
    Linear(LinearScale),
}

impl XScale {
    fn position(&self, value: Option<&Value>) -> Option<f64> {
        match self {
            Self::Band(scale) => scale.band_center(&category(value)?),
            Self::Linear(scale) => scale.domain_to_pixel(number(value)?).ok(),
        }
    }

    /// Horizontal room one record gets.
    fn slot_width(&self, plot: PlotArea, records: usize) -> f64 {
        match self {
            Self::Band(scale) => scale.bandwidth(),
            Self::Linear(_) => plot.width() / records.max(1) as f64,
        }
    }
}

/// Assigns palette colors to series keys in first-seen order.
#[derive(Default)]
struct SeriesColors {
    keys: IndexSet<String>,
}

impl SeriesColors {
    fn color(&mut self, key: &str) -> Color {
        let (index, _) = self.keys.insert_full(key.to_owned());
        category_color(index)
    }
}

pub fn build_frame(snapshot: &ChartSnapshot, viewport: Viewport) -> ChartResult<RenderFrame> {
    if !viewport.is_valid() {
        return Err(ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    let width = f64::from(viewport.width);
    let height = f64::from(viewport.height);
    let mut frame = RenderFrame::new(viewport);

    let mut top = MARGIN_TOP;
    if let Some(title) = snapshot.title.as_deref().filter(|title| !title.trim().is_empty()) {
        frame.texts.push(TextPrimitive::new(
            title,
            width / 2.0,
            8.0,
            TITLE_FONT_PX,
            TITLE_COLOR,
            TextHAlign::Center,
        ));
        top += TITLE_BAND;
    }

    let plot = PlotArea {
        left: MARGIN_LEFT,
        top,
        right: width - MARGIN_RIGHT,
        bottom: height - MARGIN_BOTTOM,
    };
    if plot.width() < 1.0 || plot.height() < 1.0 {
        return Ok(frame);
    }

    let layers: Vec<Layer<'_>> = snapshot
        .marks
        .iter()
        .enumerate()
        .map(|(index, spec)| Layer {
            index,
            spec,
            records: records_for(spec, snapshot.data.as_ref()),
        })
        .collect();

    if is_theta(snapshot.coordinate.as_ref()) {
        let radius_ratio = snapshot
            .coordinate
            .as_ref()
            .and_then(|coordinate| coordinate.get("outerRadius"))
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_PIE_RADIUS);
        let inner_ratio = snapshot
            .coordinate
            .as_ref()
            .and_then(|coordinate| coordinate.get("innerRadius"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        draw_pie(&mut frame, plot, &layers, radius_ratio, inner_ratio);
    } else {
        draw_cartesian(&mut frame, plot, &layers)?;
    }
    Ok(frame)
}

fn is_theta(coordinate: Option<&Value>) -> bool {
    coordinate
        .and_then(|coordinate| coordinate.get("type"))
        .and_then(Value::as_str)
        == Some("theta")
}

fn records_for<'a>(spec: &'a MarkSpec, chart_data: Option<&'a Value>) -> Vec<&'a Record> {
    spec.data
        .as_ref()
        .or(chart_data)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default()
}

fn number(value: Option<&Value>) -> Option<f64> {
    let parsed: Option<f64> = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    parsed.filter(|number| number.is_finite())
}

fn category(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn format_tick(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_owned()
    }
}

/// Fill for a record: explicit style, then a field-encoded series color,
/// then a constant color channel, then the mark's palette slot.
fn record_color(layer: &Layer<'_>, record: &Record, series: &mut SeriesColors) -> Color {
    let spec = layer.spec;
    if let Some(color) = spec
        .style_str("fill")
        .or_else(|| spec.style_str("stroke"))
        .and_then(Color::from_hex)
    {
        return color;
    }
    match spec.encode.get("color").and_then(Value::as_str) {
        Some(field) if record.contains_key(field) => {
            let key = category(record.get(field)).unwrap_or_default();
            series.color(&key)
        }
        Some(constant) => Color::from_hex(constant).unwrap_or_else(|| category_color(layer.index)),
        None => category_color(layer.index),
    }
}

fn series_key(layer: &Layer<'_>, record: &Record) -> String {
    layer
        .spec
        .field("color")
        .and_then(|field| category(record.get(field)))
        .unwrap_or_default()
}

fn opacity(layer: &Layer<'_>, default: f64) -> f64 {
    layer
        .spec
        .style_f64("fillOpacity")
        .or_else(|| layer.spec.style_f64("opacity"))
        .unwrap_or(default)
        .clamp(0.0, 1.0)
}

fn build_x_scale(plot: PlotArea, layers: &[Layer<'_>]) -> ChartResult<Option<XScale>> {
    let values: Vec<&Value> = layers
        .iter()
        .filter_map(|layer| layer.spec.field("x").map(|field| (layer, field)))
        .flat_map(|(layer, field)| layer.records.iter().filter_map(move |record| record.get(field)))
        .collect();
    if values.is_empty() {
        return Ok(None);
    }

    if values.iter().all(|value| number(Some(*value)).is_some()) {
        let numbers = values.iter().filter_map(|value| number(Some(*value)));
        let scale = LinearScale::covering(numbers, false)?.with_range(plot.left, plot.right)?;
        return Ok(Some(XScale::Linear(scale)));
    }
    let categories = values.iter().filter_map(|value| category(Some(*value)));
    Ok(Some(XScale::Band(BandScale::new(categories, plot.left, plot.right)?)))
}

fn build_y_scale(plot: PlotArea, layers: &[Layer<'_>]) -> ChartResult<LinearScale> {
    let include_zero = layers
        .iter()
        .any(|layer| matches!(layer.spec.kind, MarkKind::Interval | MarkKind::Area));
    let values = layers
        .iter()
        .filter_map(|layer| layer.spec.field("y").map(|field| (layer, field)))
        .flat_map(|(layer, field)| {
            layer
                .records
                .iter()
                .filter_map(move |record| number(record.get(field)))
        });
    LinearScale::covering(values, include_zero)?.with_range(plot.bottom, plot.top)
}

fn draw_cartesian(
    frame: &mut RenderFrame,
    plot: PlotArea,
    layers: &[Layer<'_>],
) -> ChartResult<()> {
    let x_scale = build_x_scale(plot, layers)?;
    let y_scale = build_y_scale(plot, layers)?;

    for tick in y_scale.ticks(Y_TICKS) {
        let y = y_scale.domain_to_pixel(tick)?;
        frame.lines.push(LinePrimitive::new(plot.left, y, plot.right, y, 1.0, GRID_COLOR));
        frame.texts.push(TextPrimitive::new(
            format_tick(tick),
            plot.left - 6.0,
            y - LABEL_FONT_PX / 2.0,
            LABEL_FONT_PX,
            LABEL_COLOR,
            TextHAlign::Right,
        ));
    }
    let (left, bottom) = (plot.left, plot.bottom);
    frame.lines.extend([
        LinePrimitive::new(left, bottom, plot.right, bottom, 1.0, AXIS_COLOR),
        LinePrimitive::new(left, plot.top, left, bottom, 1.0, AXIS_COLOR),
    ]);

    let Some(x_scale) = x_scale else {
        return Ok(());
    };
    draw_x_labels(frame, plot, &x_scale)?;

    let baseline = y_scale
        .domain_to_pixel(0.0)?
        .clamp(plot.top, plot.bottom);
    let mut series = SeriesColors::default();
    for layer in layers {
        let (Some(x_field), Some(y_field)) = (layer.spec.field("x"), layer.spec.field("y")) else {
            continue;
        };
        let points: Vec<(f64, f64, &Record)> = layer
            .records
            .iter()
            .filter_map(|record| {
                let x = x_scale.position(record.get(x_field))?;
                let y = y_scale.domain_to_pixel(number(record.get(y_field))?).ok()?;
                Some((x, y, *record))
            })
            .collect();

        match layer.spec.kind {
            MarkKind::Interval => {
                draw_bars(frame, plot, &x_scale, layer, &points, baseline, &mut series)
            }
            MarkKind::Line => draw_lines(frame, layer, &points, &mut series),
            MarkKind::Area => draw_areas(frame, layer, &points, baseline, &mut series),
            MarkKind::Point => draw_points(frame, layer, &points, &mut series),
        }
    }
    Ok(())
}

fn draw_x_labels(frame: &mut RenderFrame, plot: PlotArea, x_scale: &XScale) -> ChartResult<()> {
    let label_y = plot.bottom + 6.0;
    match x_scale {
        XScale::Band(scale) => {
            let labels: Vec<(String, f64)> = scale
                .categories()
                .filter(|category| !category.is_empty())
                .filter_map(|category| Some((category.to_owned(), scale.band_center(category)?)))
                .collect();
            for (text, x) in labels {
                frame.texts.push(TextPrimitive::new(
                    text,
                    x,
                    label_y,
                    LABEL_FONT_PX,
                    LABEL_COLOR,
                    TextHAlign::Center,
                ));
            }
        }
        XScale::Linear(scale) => {
            for tick in scale.ticks(Y_TICKS) {
                let x = scale.domain_to_pixel(tick)?;
                frame.texts.push(TextPrimitive::new(
                    format_tick(tick),
                    x,
                    label_y,
                    LABEL_FONT_PX,
                    LABEL_COLOR,
                    TextHAlign::Center,
                ));
            }
        }
    }
    Ok(())
}

/// Bars sharing an x position are dodged by series.
fn draw_bars(
    frame: &mut RenderFrame,
    plot: PlotArea,
    x_scale: &XScale,
    layer: &Layer<'_>,
    points: &[(f64, f64, &Record)],
    baseline: f64,
    series: &mut SeriesColors,
) {
    let keys: IndexSet<String> = points
        .iter()
        .map(|(_, _, record)| series_key(layer, record))
        .collect();
    let slot = x_scale.slot_width(plot, points.len()) * BAR_FILL_RATIO;
    let bar_width = slot / keys.len().max(1) as f64;
    for (x, y, record) in points {
        let offset = keys.get_index_of(&series_key(layer, record)).unwrap_or(0);
        let left = x - slot / 2.0 + bar_width * offset as f64;
        let color = record_color(layer, record, series);
        let height = (baseline - y).abs();
        frame
            .rects
            .push(RectPrimitive::new(left, y.min(baseline), bar_width, height, color));
    }
}

fn group_by_series<'a>(
    layer: &Layer<'_>,
    points: &[(f64, f64, &'a Record)],
) -> Vec<Vec<(f64, f64, &'a Record)>> {
    let mut keys: IndexSet<String> = IndexSet::new();
    let mut groups: Vec<Vec<(f64, f64, &'a Record)>> = Vec::new();
    for point in points {
        let (index, inserted) = keys.insert_full(series_key(layer, point.2));
        if inserted {
            groups.push(Vec::new());
        }
        groups[index].push(*point);
    }
    for group in &mut groups {
        group.sort_by(|a, b| a.0.total_cmp(&b.0));
    }
    groups
}

fn draw_lines(
    frame: &mut RenderFrame,
    layer: &Layer<'_>,
    points: &[(f64, f64, &Record)],
    series: &mut SeriesColors,
) {
    let stroke_width = layer.spec.style_f64("lineWidth").unwrap_or(DEFAULT_LINE_WIDTH);
    for group in group_by_series(layer, points) {
        let Some((_, _, first)) = group.first() else {
            continue;
        };
        let color = record_color(layer, first, series);
        for pair in group.windows(2) {
            let (x1, y1, _) = pair[0];
            let (x2, y2, _) = pair[1];
            frame.lines.push(LinePrimitive::new(x1, y1, x2, y2, stroke_width, color));
        }
    }
}

fn draw_areas(
    frame: &mut RenderFrame,
    layer: &Layer<'_>,
    points: &[(f64, f64, &Record)],
    baseline: f64,
    series: &mut SeriesColors,
) {
    let alpha = opacity(layer, DEFAULT_AREA_OPACITY);
    for group in group_by_series(layer, points) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        if group.len() < 2 {
            continue;
        }
        let color = record_color(layer, first.2, series).with_alpha(alpha);
        let mut outline: Vec<(f64, f64)> = group.iter().map(|(x, y, _)| (*x, *y)).collect();
        outline.push((last.0, baseline));
        outline.push((first.0, baseline));
        frame.polygons.push(PolygonPrimitive::new(outline, color));
    }
}

fn draw_points(
    frame: &mut RenderFrame,
    layer: &Layer<'_>,
    points: &[(f64, f64, &Record)],
    series: &mut SeriesColors,
) {
    let size_field = layer.spec.field("size");
    let fixed_radius = layer
        .spec
        .encode
        .get("size")
        .and_then(Value::as_f64)
        .or_else(|| layer.spec.style_f64("size"))
        .unwrap_or(DEFAULT_POINT_RADIUS);
    let size_scale = size_field.and_then(|field| {
        let sizes = points.iter().filter_map(|(_, _, record)| number(record.get(field)));
        LinearScale::covering(sizes, false)
            .and_then(|scale| scale.with_range(POINT_RADIUS_RANGE.0, POINT_RADIUS_RANGE.1))
            .ok()
    });
    let alpha = opacity(layer, 1.0);

    for (x, y, record) in points {
        let radius = match (size_field, size_scale) {
            (Some(field), Some(scale)) => number(record.get(field))
                .and_then(|size| scale.domain_to_pixel(size).ok())
                .unwrap_or(DEFAULT_POINT_RADIUS),
            _ => fixed_radius,
        };
        if radius <= 0.0 {
            continue;
        }
        let color = record_color(layer, record, series).with_alpha(alpha);
        frame.circles.push(CirclePrimitive::new(*x, *y, radius, color));
    }
}

fn draw_pie(
    frame: &mut RenderFrame,
    plot: PlotArea,
    layers: &[Layer<'_>],
    radius_ratio: f64,
    inner_ratio: f64,
) {
    let center = ((plot.left + plot.right) / 2.0, (plot.top + plot.bottom) / 2.0);
    let outer = plot.width().min(plot.height()) / 2.0 * radius_ratio.clamp(0.05, 1.0);
    let inner = outer * inner_ratio.clamp(0.0, 0.95);
    let mut series = SeriesColors::default();

    for layer in layers.iter().filter(|layer| layer.spec.kind == MarkKind::Interval) {
        let Some(value_field) = layer.spec.field("y") else {
            continue;
        };
        let slices: Vec<(f64, &Record)> = layer
            .records
            .iter()
            .filter_map(|record| Some((number(record.get(value_field))?, *record)))
            .filter(|(value, _)| *value > 0.0)
            .collect();
        let total: f64 = slices.iter().map(|(value, _)| value).sum();
        if total <= 0.0 {
            continue;
        }

        let mut start = -FRAC_PI_2;
        for (value, record) in slices {
            let sweep = value / total * TAU;
            let color = record_color(layer, record, &mut series);
            frame
                .polygons
                .push(PolygonPrimitive::new(wedge(center, inner, outer, start, sweep), color));

            let label = layer
                .spec
                .field("color")
                .and_then(|field| category(record.get(field)));
            if let Some(label) = label.filter(|label| !label.is_empty()) {
                let middle = start + sweep / 2.0;
                let reach = outer + 10.0;
                let (x, y) = (center.0 + reach * middle.cos(), center.1 + reach * middle.sin());
                let align = if middle.cos() >= 0.0 {
                    TextHAlign::Left
                } else {
                    TextHAlign::Right
                };
                frame.texts.push(TextPrimitive::new(
                    label,
                    x,
                    y - LABEL_FONT_PX / 2.0,
                    LABEL_FONT_PX,
                    LABEL_COLOR,
                    align,
                ));
            }
            start += sweep;
        }
    }
}

/// Outline of an annular sector, clockwise from `start` (radians).
fn wedge(center: (f64, f64), inner: f64, outer: f64, start: f64, sweep: f64) -> Vec<(f64, f64)> {
    let steps = ((sweep / (PI / 90.0)).ceil() as usize).max(2);
    let arc = |radius: f64, step: usize| {
        let angle = start + sweep * step as f64 / steps as f64;
        (center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
    };
    let mut points: Vec<(f64, f64)> = (0..=steps).map(|step| arc(outer, step)).collect();
    if inner > 0.0 {
        points.extend((0..=steps).rev().map(|step| arc(inner, step)));
    } else {
        points.push(center);
    }
    points
}
