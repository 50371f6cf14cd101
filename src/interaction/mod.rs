//! Event model for the single-threaded page runtime.
//!
//! Handlers are registered per target and kind and run one at a time, in
//! registration order, strictly in response to a dispatched event.

mod listeners;

pub use listeners::{Listener, ListenerId, ListenerRegistry};

use serde::{Deserialize, Serialize};

use crate::dom::{Document, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Click,
    Change,
    Input,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTarget {
    Window,
    Element(NodeId),
}

/// Event passed to handlers.
///
/// `target` is where the event originated; `current_target` is the element
/// whose listener is running (they differ while a click bubbles).
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub target: EventTarget,
    pub current_target: EventTarget,
    pub value: Option<String>,
    default_prevented: bool,
}

impl Event {
    #[must_use]
    pub fn new(kind: EventKind, target: EventTarget) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            value: None,
            default_prevented: false,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// What happened while one event was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    pub handlers_run: usize,
    pub default_prevented: bool,
}

pub type Handler = Box<dyn FnMut(&mut Document, &mut Event)>;
