use tracing::trace;

use crate::core::Viewport;
use crate::dom::{Document, NodeId};
use crate::interaction::{
    DispatchOutcome, Event, EventKind, EventTarget, ListenerId, ListenerRegistry,
};

const DEFAULT_WINDOW: Viewport = Viewport::new(1280, 800);

/// Single-threaded page runtime: one document, the window size and every
/// registered listener.
///
/// Events are dispatched synchronously; a handler never overlaps another
/// handler or the initializer that registered it.
#[derive(Debug)]
pub struct Page {
    document: Document,
    window: Viewport,
    listeners: ListenerRegistry,
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Document::new())
    }
}

impl Page {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self {
            document,
            window: DEFAULT_WINDOW,
            listeners: ListenerRegistry::default(),
        }
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    #[must_use]
    pub fn window_size(&self) -> Viewport {
        self.window
    }

    pub fn add_listener<F>(
        &mut self,
        target: EventTarget,
        kind: EventKind,
        handler: F,
    ) -> ListenerId
    where
        F: FnMut(&mut Document, &mut Event) + 'static,
    {
        self.listeners.add(target, kind, Box::new(handler))
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    #[must_use]
    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.contains(id)
    }

    #[must_use]
    pub fn listener_count(&self, target: EventTarget, kind: EventKind) -> usize {
        self.listeners.count(target, kind)
    }

    #[must_use]
    pub fn total_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Runs the listeners registered on the event's own target only.
    pub fn dispatch(&mut self, mut event: Event) -> DispatchOutcome {
        let handlers_run = self.run_listeners(event.target, &mut event);
        DispatchOutcome {
            handlers_run,
            default_prevented: event.default_prevented(),
        }
    }

    /// Dispatches a click on `node` that bubbles through its ancestors.
    pub fn click(&mut self, node: NodeId) -> DispatchOutcome {
        let mut event = Event::new(EventKind::Click, EventTarget::Element(node));
        let mut handlers_run = 0;
        for current in self.document.ancestry(node) {
            handlers_run += self.run_listeners(EventTarget::Element(current), &mut event);
        }
        trace!(node = node.index(), handlers_run, "click dispatched");
        DispatchOutcome {
            handlers_run,
            default_prevented: event.default_prevented(),
        }
    }

    /// Sets the control's `value` and fires `Change` on it.
    pub fn change(&mut self, node: NodeId, value: &str) -> DispatchOutcome {
        self.document.set_attribute(node, "value", value);
        self.dispatch(Event::new(EventKind::Change, EventTarget::Element(node)).with_value(value))
    }

    /// Sets the control's `value` and fires `Input` on it.
    pub fn input(&mut self, node: NodeId, value: &str) -> DispatchOutcome {
        self.document.set_attribute(node, "value", value);
        self.dispatch(Event::new(EventKind::Input, EventTarget::Element(node)).with_value(value))
    }

    /// Updates the window size and fires every window `Resize` listener.
    pub fn resize_window(&mut self, width: u32, height: u32) -> DispatchOutcome {
        self.window = Viewport::new(width, height);
        self.dispatch(Event::new(EventKind::Resize, EventTarget::Window))
    }

    fn run_listeners(&mut self, current: EventTarget, event: &mut Event) -> usize {
        let Self {
            document,
            listeners,
            ..
        } = self;
        event.current_target = current;
        let mut ran = 0;
        for listener in listeners.matching_mut(current, event.kind) {
            (listener.handler)(&mut *document, &mut *event);
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::Page;
    use crate::interaction::{EventKind, EventTarget};

    #[test]
    fn click_bubbles_from_target_to_ancestors() {
        let mut page = Page::default();
        let body = page.document().body();
        let outer = page.document_mut().append_element(body, "a");
        let inner = page.document_mut().append_element(outer, "ion-icon");

        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        page.add_listener(EventTarget::Element(outer), EventKind::Click, move |_, event| {
            log.borrow_mut().push((event.target, event.current_target));
            event.prevent_default();
        });

        let outcome = page.click(inner);
        assert_eq!(outcome.handlers_run, 1);
        assert!(outcome.default_prevented);
        assert_eq!(
            seen.borrow().as_slice(),
            &[(EventTarget::Element(inner), EventTarget::Element(outer))]
        );
    }

    #[test]
    fn change_sets_value_before_handlers_run() {
        let mut page = Page::default();
        let body = page.document().body();
        let select = page.document_mut().append_element(body, "select");
        page.add_listener(EventTarget::Element(select), EventKind::Change, |doc, event| {
            let target = match event.target {
                EventTarget::Element(node) => node,
                EventTarget::Window => unreachable!("change targets an element"),
            };
            assert_eq!(doc.attribute(target, "value"), event.value.as_deref());
        });

        assert_eq!(page.change(select, "25").handlers_run, 1);
    }
}
