mod frame;
mod null_renderer;
mod primitives;
mod svg_backend;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, LinePrimitive, RectPrimitive, RectRole, TextHAlign, TextPrimitive, TextRole,
    format_number,
};
pub use svg_backend::{SvgRenderStats, SvgRenderer};

use crate::dom::{Document, NodeId};
use crate::error::WidgetResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` and
/// the container element to draw into, so drawing code stays isolated from
/// chart option handling and layout.
pub trait Renderer {
    fn render(
        &mut self,
        document: &mut Document,
        container: NodeId,
        frame: &RenderFrame,
    ) -> WidgetResult<()>;
}
