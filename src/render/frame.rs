use std::collections::HashSet;

use crate::core::Viewport;
use crate::error::{WidgetError, WidgetResult};
use crate::render::{Color, LinePrimitive, RectPrimitive, RectRole, TextPrimitive, TextRole};

/// Scene for one bar-chart draw pass: a full-size background, grid and axis
/// lines, bars keyed by `(series, category)`, and labels.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            lines: Vec::new(),
            rects: Vec::new(),
            texts: Vec::new(),
        }
    }

    /// Frame whose first rect fills the whole viewport with `color`.
    #[must_use]
    pub fn with_background(viewport: Viewport, color: Color) -> Self {
        let background = RectPrimitive::new(
            0.0,
            0.0,
            f64::from(viewport.width),
            f64::from(viewport.height),
            color,
            RectRole::Background,
        );
        Self::new(viewport).with_rect(background)
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    /// Checks every primitive and that each `(series, category)` pair has at
    /// most one bar.
    pub fn validate(&self) -> WidgetResult<()> {
        if !self.viewport.is_valid() {
            return Err(WidgetError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for line in &self.lines {
            line.validate()?;
        }
        let mut seen = HashSet::new();
        for rect in &self.rects {
            rect.validate()?;
            if let RectRole::Bar { series, category } = rect.role {
                if !seen.insert((series, category)) {
                    return Err(WidgetError::InvalidData(format!(
                        "duplicate bar for series {series}, category {category}"
                    )));
                }
            }
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    /// Bar rectangles in draw order.
    pub fn bars(&self) -> impl Iterator<Item = &RectPrimitive> {
        self.rects
            .iter()
            .filter(|rect| matches!(rect.role, RectRole::Bar { .. }))
    }

    #[must_use]
    pub fn bar(&self, series: usize, category: usize) -> Option<&RectPrimitive> {
        self.rects
            .iter()
            .find(|rect| rect.role == RectRole::Bar { series, category })
    }

    pub fn texts_with_role(&self, role: TextRole) -> impl Iterator<Item = &TextPrimitive> {
        self.texts.iter().filter(move |text| text.role == role)
    }
}

#[cfg(test)]
mod tests {
    use super::RenderFrame;
    use crate::core::Viewport;
    use crate::render::{Color, RectPrimitive, RectRole};

    #[test]
    fn duplicate_bars_fail_validation() {
        let bar = RectPrimitive::new(
            10.0,
            10.0,
            5.0,
            20.0,
            Color::rgb(0.2, 0.4, 0.8),
            RectRole::Bar {
                series: 0,
                category: 1,
            },
        );
        let frame = RenderFrame::with_background(Viewport::new(100, 50), Color::rgb(1.0, 1.0, 1.0))
            .with_rect(bar.clone());
        assert!(frame.validate().is_ok());
        assert_eq!(frame.bar(0, 1), Some(&bar));
        assert_eq!(frame.rects[0].width, 100.0);

        assert!(frame.with_rect(bar).validate().is_err());
    }
}
