use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// Validates frames and counts what they hold without painting.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_shape_count: usize,
    pub last_text_count: usize,
    pub frames_rendered: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.last_shape_count = frame.shape_count();
        self.last_text_count = frame.texts.len();
        self.frames_rendered += 1;
        Ok(())
    }
}
