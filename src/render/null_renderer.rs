use crate::dom::{Document, NodeId};
use crate::error::WidgetResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless layout checks.
///
/// It still validates frame content so tests can catch invalid geometry
/// without inspecting SVG output. The document is left untouched.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_line_count: usize,
    pub last_rect_count: usize,
    pub last_text_count: usize,
    pub render_calls: usize,
}

impl Renderer for NullRenderer {
    fn render(
        &mut self,
        _document: &mut Document,
        _container: NodeId,
        frame: &RenderFrame,
    ) -> WidgetResult<()> {
        frame.validate()?;
        self.last_line_count = frame.lines.len();
        self.last_rect_count = frame.rects.len();
        self.last_text_count = frame.texts.len();
        self.render_calls += 1;
        Ok(())
    }
}
