use std::fmt;

use tracing::trace;

use super::{EventKind, EventTarget, Handler};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

pub struct Listener {
    pub id: ListenerId,
    pub target: EventTarget,
    pub kind: EventKind,
    pub(crate) handler: Handler,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Listeners in registration order.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    listeners: Vec<Listener>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn add(&mut self, target: EventTarget, kind: EventKind, handler: Handler) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        trace!(?target, ?kind, listener = id.0, "add listener");
        self.listeners.push(Listener {
            id,
            target,
            kind,
            handler,
        });
        id
    }

    /// Returns `false` when the listener was already removed.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.id != id);
        let removed = self.listeners.len() != before;
        trace!(listener = id.0, removed, "remove listener");
        removed
    }

    #[must_use]
    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|listener| listener.id == id)
    }

    #[must_use]
    pub fn count(&self, target: EventTarget, kind: EventKind) -> usize {
        self.listeners
            .iter()
            .filter(|listener| listener.target == target && listener.kind == kind)
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub(crate) fn matching_mut(
        &mut self,
        target: EventTarget,
        kind: EventKind,
    ) -> impl Iterator<Item = &mut Listener> {
        self.listeners
            .iter_mut()
            .filter(move |listener| listener.target == target && listener.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::ListenerRegistry;
    use crate::interaction::{EventKind, EventTarget};

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut registry = ListenerRegistry::default();
        let first = registry.add(EventTarget::Window, EventKind::Resize, Box::new(|_, _| {}));
        assert!(registry.remove(first));
        let second = registry.add(EventTarget::Window, EventKind::Resize, Box::new(|_, _| {}));

        assert_ne!(first, second);
        assert!(!registry.remove(first));
        assert_eq!(registry.count(EventTarget::Window, EventKind::Resize), 1);
    }
}
