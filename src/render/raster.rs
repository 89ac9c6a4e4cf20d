use tiny_skia::{
    FillRule, LineCap, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

use crate::error::{ChartError, ChartResult};
use crate::render::{Color, RenderFrame, Renderer, SurfaceRenderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RasterRenderStats {
    pub polygons_drawn: usize,
    pub rects_drawn: usize,
    pub lines_drawn: usize,
    pub circles_drawn: usize,
    /// Text primitives are skipped by this backend (no font rasterizer).
    pub texts_skipped: usize,
}

/// Pure-Rust backend painting frames onto a transparent `tiny_skia::Pixmap`.
#[derive(Debug, Default)]
pub struct RasterRenderer {
    surface: Option<Pixmap>,
    last_stats: RasterRenderStats,
}

impl RasterRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn last_stats(&self) -> RasterRenderStats {
        self.last_stats
    }

    #[must_use]
    pub fn surface(&self) -> Option<&Pixmap> {
        self.surface.as_ref()
    }
}

impl Renderer for RasterRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        let mut pixmap = allocate(frame.viewport.width, frame.viewport.height)?;
        let mut stats = RasterRenderStats::default();

        for polygon in &frame.polygons {
            let mut builder = PathBuilder::new();
            let mut points = polygon.points.iter();
            if let Some((x, y)) = points.next() {
                builder.move_to(*x as f32, *y as f32);
            }
            for (x, y) in points {
                builder.line_to(*x as f32, *y as f32);
            }
            builder.close();
            if let Some(path) = builder.finish() {
                let paint = paint_for(polygon.fill_color)?;
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
                stats.polygons_drawn += 1;
            }
        }

        for rect in &frame.rects {
            // tiny-skia rejects rects it cannot represent; nothing to paint then.
            let Some(shape) =
                Rect::from_xywh(rect.x as f32, rect.y as f32, rect.width as f32, rect.height as f32)
            else {
                continue;
            };
            let paint = paint_for(rect.fill_color)?;
            pixmap.fill_rect(shape, &paint, Transform::identity(), None);
            stats.rects_drawn += 1;
        }

        for line in &frame.lines {
            let mut builder = PathBuilder::new();
            builder.move_to(line.x1 as f32, line.y1 as f32);
            builder.line_to(line.x2 as f32, line.y2 as f32);
            let Some(path) = builder.finish() else {
                continue;
            };
            let stroke = Stroke {
                width: line.stroke_width as f32,
                line_cap: LineCap::Round,
                ..Stroke::default()
            };
            let paint = paint_for(line.color)?;
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            stats.lines_drawn += 1;
        }

        for circle in &frame.circles {
            let Some(path) =
                PathBuilder::from_circle(circle.cx as f32, circle.cy as f32, circle.radius as f32)
            else {
                continue;
            };
            let paint = paint_for(circle.fill_color)?;
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            stats.circles_drawn += 1;
        }

        stats.texts_skipped = frame.texts.len();
        self.surface = Some(pixmap);
        self.last_stats = stats;
        Ok(())
    }
}

impl SurfaceRenderer for RasterRenderer {
    fn take_surface(&mut self) -> Option<Pixmap> {
        self.surface.take()
    }
}

fn allocate(width: u32, height: u32) -> ChartResult<Pixmap> {
    Pixmap::new(width, height).ok_or(ChartError::InvalidViewport { width, height })
}

fn paint_for(color: Color) -> ChartResult<Paint<'static>> {
    let skia_color = tiny_skia::Color::from_rgba(
        color.red as f32,
        color.green as f32,
        color.blue as f32,
        color.alpha as f32,
    )
    .ok_or_else(|| ChartError::InvalidData("color channels out of range".to_owned()))?;
    let mut paint = Paint::default();
    paint.set_color(skia_color);
    paint.anti_alias = true;
    Ok(paint)
}

/// Composites `surface` over an opaque white background of the same size.
pub fn flatten_on_white(surface: &Pixmap) -> ChartResult<Pixmap> {
    let mut flattened = allocate(surface.width(), surface.height())?;
    flattened.fill(tiny_skia::Color::WHITE);
    flattened.draw_pixmap(
        0,
        0,
        surface.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
    Ok(flattened)
}
