mod frame;
mod null_renderer;
mod primitives;
mod raster;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, PolygonPrimitive, RectPrimitive, TextHAlign,
    TextPrimitive,
};
pub use raster::{RasterRenderStats, RasterRenderer, flatten_on_white};

use tiny_skia::Pixmap;

use crate::error::ChartResult;

/// Paints a laid-out `RenderFrame`. Backends never see chart options or
/// script values.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

/// Backends whose output is a bitmap that can be mounted and exported.
pub trait SurfaceRenderer: Renderer {
    /// Hands over the surface painted by the last `render` call.
    fn take_surface(&mut self) -> Option<Pixmap>;
}

/// Backend used by built-in charts: cairo when compiled in, tiny-skia otherwise.
#[must_use]
pub fn default_surface_renderer() -> Box<dyn SurfaceRenderer> {
    #[cfg(feature = "cairo-backend")]
    {
        Box::new(CairoRenderer::new())
    }

    #[cfg(not(feature = "cairo-backend"))]
    {
        Box::new(RasterRenderer::new())
    }
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoRenderStats, CairoRenderer};
