use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{CirclePrimitive, LinePrimitive, PolygonPrimitive, RectPrimitive, TextPrimitive};

/// Everything one chart paint draws, in paint order: polygons (pie wedges,
/// area fills), rects (bars), lines (axes, grid, series), circles (points),
/// then texts on top.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub polygons: Vec<PolygonPrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            polygons: Vec::new(),
            rects: Vec::new(),
            lines: Vec::new(),
            circles: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    #[must_use]
    pub fn with_circle(mut self, circle: CirclePrimitive) -> Self {
        self.circles.push(circle);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    /// Non-text primitives.
    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.polygons.len() + self.rects.len() + self.lines.len() + self.circles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shape_count() == 0 && self.texts.is_empty()
    }

    /// Rejects a zero-sized viewport and any primitive with non-finite
    /// geometry or out-of-range colors.
    pub fn validate(&self) -> ChartResult<()> {
        let Viewport { width, height } = self.viewport;
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport { width, height });
        }
        self.polygons.iter().try_for_each(PolygonPrimitive::validate)?;
        self.rects.iter().try_for_each(|rect| rect.validate())?;
        self.lines.iter().try_for_each(|line| line.validate())?;
        self.circles.iter().try_for_each(|circle| circle.validate())?;
        self.texts.iter().try_for_each(TextPrimitive::validate)
    }
}
