use tracing::trace;

use crate::dom::{Document, NodeId};
use crate::error::WidgetResult;
use crate::render::{
    LinePrimitive, RectPrimitive, RectRole, RenderFrame, Renderer, TextPrimitive,
    format_number,
};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SvgRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
}

/// Renderer that materializes a frame as an `<svg>` subtree of the container.
///
/// Each pass replaces the `<svg>` element drawn by the previous pass, so
/// rendering the same frame twice yields the same markup.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    root: Option<NodeId>,
    last_stats: SvgRenderStats,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "svg"
    }

    /// The `<svg>` element of the latest pass.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[must_use]
    pub fn last_stats(&self) -> SvgRenderStats {
        self.last_stats
    }

    fn draw_line(document: &mut Document, svg: NodeId, line: LinePrimitive) {
        let node = document.append_element(svg, "line");
        document.set_attribute(node, "x1", format_number(line.x1));
        document.set_attribute(node, "y1", format_number(line.y1));
        document.set_attribute(node, "x2", format_number(line.x2));
        document.set_attribute(node, "y2", format_number(line.y2));
        document.set_attribute(node, "stroke", line.color.to_css());
        document.set_attribute(node, "stroke-width", format_number(line.stroke_width));
    }

    fn draw_rect(document: &mut Document, svg: NodeId, rect: &RectPrimitive) {
        let node = document.append_element(svg, "rect");
        match rect.role {
            RectRole::Background => document.add_class(node, "background"),
            RectRole::Bar { series, category } => {
                document.add_class(node, "bar");
                document.set_attribute(node, "data-series", series.to_string());
                document.set_attribute(node, "data-category", category.to_string());
            }
        }
        document.set_attribute(node, "x", format_number(rect.x));
        document.set_attribute(node, "y", format_number(rect.y));
        document.set_attribute(node, "width", format_number(rect.width));
        document.set_attribute(node, "height", format_number(rect.height));
        document.set_attribute(node, "fill", rect.fill_color.to_css());
        if let Some(tooltip) = &rect.tooltip {
            let title = document.append_element(node, "title");
            document.set_text(title, tooltip.clone());
        }
    }

    fn draw_text(document: &mut Document, svg: NodeId, text: &TextPrimitive) {
        let node = document.append_element(svg, "text");
        document.add_class(node, text.role.css_class());
        document.set_attribute(node, "x", format_number(text.x));
        document.set_attribute(node, "y", format_number(text.y));
        document.set_attribute(node, "font-size", format_number(text.font_size_px));
        document.set_attribute(node, "text-anchor", text.h_align.svg_anchor());
        document.set_attribute(node, "fill", text.color.to_css());
        document.set_text(node, text.text.clone());
    }
}

impl Renderer for SvgRenderer {
    fn render(
        &mut self,
        document: &mut Document,
        container: NodeId,
        frame: &RenderFrame,
    ) -> WidgetResult<()> {
        frame.validate()?;

        if let Some(previous) = self.root.take() {
            document.remove(previous);
        }

        let svg = document.append_element(container, "svg");
        let (width, height) = (frame.viewport.width, frame.viewport.height);
        document.set_attribute(svg, "xmlns", SVG_NAMESPACE);
        document.set_attribute(svg, "width", width.to_string());
        document.set_attribute(svg, "height", height.to_string());
        document.set_attribute(svg, "viewBox", format!("0 0 {width} {height}"));
        document.set_size(svg, width, height);

        let mut stats = SvgRenderStats::default();
        let (backgrounds, shapes): (Vec<&RectPrimitive>, Vec<&RectPrimitive>) = frame
            .rects
            .iter()
            .partition(|rect| rect.role == RectRole::Background);

        for rect in backgrounds {
            Self::draw_rect(document, svg, rect);
            stats.rects_drawn += 1;
        }
        for line in &frame.lines {
            Self::draw_line(document, svg, *line);
            stats.lines_drawn += 1;
        }
        for rect in shapes {
            Self::draw_rect(document, svg, rect);
            stats.rects_drawn += 1;
        }
        for text in &frame.texts {
            Self::draw_text(document, svg, text);
            stats.texts_drawn += 1;
        }

        trace!(
            lines = stats.lines_drawn,
            rects = stats.rects_drawn,
            texts = stats.texts_drawn,
            "svg pass complete"
        );
        self.root = Some(svg);
        self.last_stats = stats;
        Ok(())
    }
}
