use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::chart::{ChartOption, layout_bar_chart};
use crate::core::Viewport;
use crate::dom::{Document, NodeId, Page};
use crate::error::{WidgetError, WidgetResult};
use crate::interaction::{EventKind, EventTarget, ListenerId};
use crate::render::{RenderFrame, Renderer, SvgRenderer};

#[derive(Debug)]
struct ChartInstance<R: Renderer> {
    container_id: String,
    container: NodeId,
    option: ChartOption,
    renderer: R,
    viewport: Viewport,
    render_count: usize,
    last_frame: Option<RenderFrame>,
}

impl<R: Renderer> ChartInstance<R> {
    /// Lays the current option out at the container's current size and draws it.
    ///
    /// Nothing is touched when layout fails, so the previous drawing stays.
    fn apply(&mut self, document: &mut Document) -> WidgetResult<()> {
        let viewport = document.size(self.container);
        if !viewport.is_valid() {
            return Err(WidgetError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let frame = layout_bar_chart(&self.option, viewport)?;
        self.renderer.render(document, self.container, &frame)?;
        self.viewport = viewport;
        self.render_count += 1;
        self.last_frame = Some(frame);
        debug!(
            container = %self.container_id,
            width = viewport.width,
            height = viewport.height,
            renders = self.render_count,
            "chart rendered"
        );
        Ok(())
    }
}

/// Live chart bound to one container element.
///
/// Cloning the handle shares the same chart.
#[derive(Debug)]
pub struct ChartHandle<R: Renderer = SvgRenderer> {
    inner: Rc<RefCell<ChartInstance<R>>>,
}

impl<R: Renderer> Clone for ChartHandle<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<R: Renderer> ChartHandle<R> {
    /// Replaces the chart option and redraws.
    ///
    /// Options replace rather than merge, so applying the same option twice
    /// produces the same drawing. On failure the previous option is kept.
    pub fn set_option(&self, page: &mut Page, option: ChartOption) -> WidgetResult<()> {
        let mut chart = self.inner.borrow_mut();
        let previous = std::mem::replace(&mut chart.option, option);
        if let Err(err) = chart.apply(page.document_mut()) {
            chart.option = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Re-lays the chart out to the container's current size.
    pub fn resize(&self, page: &mut Page) -> WidgetResult<()> {
        self.inner.borrow_mut().apply(page.document_mut())
    }

    #[must_use]
    pub fn option(&self) -> ChartOption {
        self.inner.borrow().option.clone()
    }

    #[must_use]
    pub fn container(&self) -> NodeId {
        self.inner.borrow().container
    }

    /// Size used by the latest successful render.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.inner.borrow().viewport
    }

    #[must_use]
    pub fn render_count(&self) -> usize {
        self.inner.borrow().render_count
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<RenderFrame> {
        self.inner.borrow().last_frame.clone()
    }

    pub fn with_renderer<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        f(&self.inner.borrow().renderer)
    }
}

impl ChartHandle<SvgRenderer> {
    /// Markup of the `<svg>` element drawn by the latest render.
    #[must_use]
    pub fn svg_markup(&self, page: &Page) -> Option<String> {
        self.with_renderer(SvgRenderer::root)
            .map(|svg| page.document().outer_html(svg))
    }
}

/// Removes the window resize listener registered by `create_chart`.
#[derive(Debug)]
pub struct ResizeDisposer {
    listener: Option<ListenerId>,
}

impl ResizeDisposer {
    /// Returns `true` when a listener was removed; later calls are no-ops.
    pub fn dispose(&mut self, page: &mut Page) -> bool {
        self.listener
            .take()
            .is_some_and(|listener| page.remove_listener(listener))
    }

    #[must_use]
    pub fn listener(&self) -> Option<ListenerId> {
        self.listener
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.listener.is_none()
    }
}

/// Creates an SVG bar chart inside the element with id `container_id`.
///
/// One window resize listener is registered per call; it stays until the
/// returned disposer is invoked.
pub fn create_chart(
    page: &mut Page,
    container_id: &str,
    option: ChartOption,
) -> WidgetResult<(ChartHandle, ResizeDisposer)> {
    create_chart_with_renderer(page, container_id, option, SvgRenderer::new())
}

pub fn create_chart_with_renderer<R: Renderer + 'static>(
    page: &mut Page,
    container_id: &str,
    option: ChartOption,
    renderer: R,
) -> WidgetResult<(ChartHandle<R>, ResizeDisposer)> {
    let container = page
        .document()
        .get_element_by_id(container_id)
        .ok_or_else(|| WidgetError::missing(format!("#{container_id}")))?;

    let mut instance = ChartInstance {
        container_id: container_id.to_owned(),
        container,
        option,
        renderer,
        viewport: Viewport::new(0, 0),
        render_count: 0,
        last_frame: None,
    };
    instance.apply(page.document_mut())?;

    let inner = Rc::new(RefCell::new(instance));
    let resize_target = Rc::clone(&inner);
    let listener = page.add_listener(EventTarget::Window, EventKind::Resize, move |document, _| {
        let mut chart = resize_target.borrow_mut();
        if let Err(err) = chart.apply(document) {
            warn!(container = %chart.container_id, error = %err, "chart resize failed");
        }
    });

    Ok((ChartHandle { inner }, ResizeDisposer {
        listener: Some(listener),
    }))
}
