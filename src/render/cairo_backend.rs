use cairo::{Context, Format, ImageSurface, Operator};
use pango::FontDescription;
use std::f64::consts::TAU;
use tiny_skia::{Pixmap, PremultipliedColorU8};

use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, LinePrimitive, PolygonPrimitive, RenderFrame, Renderer, SurfaceRenderer, TextPrimitive,
};

/// Primitives painted by the last `CairoRenderer::render` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub polygons_drawn: usize,
    pub rects_drawn: usize,
    pub lines_drawn: usize,
    pub circles_drawn: usize,
    pub texts_drawn: usize,
}

/// Cairo + Pango + PangoCairo backend.
///
/// Unlike the tiny-skia backend it draws text labels. Each render allocates an
/// ARGB32 image surface sized to the frame viewport; `take_surface` converts
/// it into a `Pixmap` so mount points stay backend-agnostic.
#[derive(Debug, Default)]
pub struct CairoRenderer {
    surface: Option<ImageSurface>,
    background: Option<Color>,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Paints `color` under every frame. `None` keeps surfaces transparent.
    pub fn set_background(&mut self, color: Option<Color>) -> ChartResult<()> {
        if let Some(color) = color {
            color.validate()?;
        }
        self.background = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> ChartResult<()> {
        context.set_operator(Operator::Clear);
        context
            .paint()
            .map_err(|err| map_backend_error("cannot clear surface", err))?;
        context.set_operator(Operator::Over);
        if let Some(background) = self.background {
            apply_color(context, background);
            context
                .paint()
                .map_err(|err| map_backend_error("cannot paint background", err))?;
        }

        let mut stats = CairoRenderStats::default();
        for polygon in &frame.polygons {
            trace_polygon(context, polygon);
            fill_with(context, polygon.fill_color, "polygon")?;
            stats.polygons_drawn += 1;
        }
        for rect in &frame.rects {
            context.rectangle(rect.x, rect.y, rect.width, rect.height);
            fill_with(context, rect.fill_color, "rect")?;
            stats.rects_drawn += 1;
        }
        for line in &frame.lines {
            stroke_line(context, line)?;
            stats.lines_drawn += 1;
        }
        for circle in &frame.circles {
            context.new_sub_path();
            context.arc(circle.cx, circle.cy, circle.radius, 0.0, TAU);
            fill_with(context, circle.fill_color, "circle")?;
            stats.circles_drawn += 1;
        }
        for text in &frame.texts {
            show_label(context, text);
            stats.texts_drawn += 1;
        }

        self.last_stats = stats;
        Ok(())
    }
}

fn trace_polygon(context: &Context, polygon: &PolygonPrimitive) {
    for (index, &(x, y)) in polygon.points.iter().enumerate() {
        if index == 0 {
            context.move_to(x, y);
        } else {
            context.line_to(x, y);
        }
    }
    context.close_path();
}

fn fill_with(context: &Context, color: Color, what: &str) -> ChartResult<()> {
    apply_color(context, color);
    context
        .fill()
        .map_err(|err| map_backend_error(&format!("cannot fill {what}"), err))
}

fn stroke_line(context: &Context, line: &LinePrimitive) -> ChartResult<()> {
    context.set_line_width(line.stroke_width);
    context.move_to(line.x1, line.y1);
    context.line_to(line.x2, line.y2);
    apply_color(context, line.color);
    context
        .stroke()
        .map_err(|err| map_backend_error("cannot stroke line", err))
}

fn show_label(context: &Context, text: &TextPrimitive) {
    let layout = pangocairo::functions::create_layout(context);
    let font = FontDescription::from_string(&format!("Sans {}px", text.font_size_px.round()));
    layout.set_font_description(Some(&font));
    layout.set_text(&text.text);
    let (label_width, _) = layout.pixel_size();

    apply_color(context, text.color);
    context.move_to(text.h_align.left_edge(text.x, f64::from(label_width)), text.y);
    pangocairo::functions::show_layout(context, &layout);
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        let width = i32::try_from(frame.viewport.width)
            .map_err(|_| ChartError::Backend("surface width exceeds i32".to_owned()))?;
        let height = i32::try_from(frame.viewport.height)
            .map_err(|_| ChartError::Backend("surface height exceeds i32".to_owned()))?;
        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("cannot allocate image surface", err))?;
        {
            let context = Context::new(&surface)
                .map_err(|err| map_backend_error("cannot open drawing context", err))?;
            self.render_with_context(&context, frame)?;
        }
        self.surface = Some(surface);
        Ok(())
    }
}

impl SurfaceRenderer for CairoRenderer {
    fn take_surface(&mut self) -> Option<Pixmap> {
        let mut surface = self.surface.take()?;
        match image_surface_to_pixmap(&mut surface) {
            Ok(pixmap) => Some(pixmap),
            Err(err) => {
                tracing::warn!(error = %err, "dropping cairo surface that failed conversion");
                None
            }
        }
    }
}

/// Converts premultiplied native-endian ARGB32 into tiny-skia's premultiplied RGBA.
fn image_surface_to_pixmap(surface: &mut ImageSurface) -> ChartResult<Pixmap> {
    surface.flush();
    let width = usize::try_from(surface.width()).unwrap_or_default();
    let height = usize::try_from(surface.height()).unwrap_or_default();
    let stride = usize::try_from(surface.stride()).unwrap_or_default();
    let mut pixmap = Pixmap::new(width as u32, height as u32).ok_or(
        ChartError::InvalidViewport {
            width: width as u32,
            height: height as u32,
        },
    )?;
    let data = surface
        .data()
        .map_err(|err| ChartError::Backend(format!("cairo surface data unavailable: {err}")))?;

    let pixels = pixmap.pixels_mut();
    for (row_index, row) in data.chunks(stride).take(height).enumerate() {
        for (column, bytes) in row.chunks_exact(4).take(width).enumerate() {
            let argb = u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            let [alpha, red, green, blue] = argb.to_be_bytes();
            pixels[row_index * width + column] =
                PremultipliedColorU8::from_rgba(red, green, blue, alpha).ok_or_else(|| {
                    ChartError::Backend("cairo produced a non-premultiplied pixel".to_owned())
                })?;
        }
    }
    Ok(pixmap)
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Backend(format!("{prefix}: {err}"))
}
