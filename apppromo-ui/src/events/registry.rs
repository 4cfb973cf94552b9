use super::{EventHub, EventKind, ListenerFn, ListenerId, ListenerTarget};
use crate::error::Result;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

struct Listener<E> {
    target: ListenerTarget<E>,
    kind: EventKind,
    /// `None` while the handler is running
    handler: Option<ListenerFn>,
}

/// In-process listener table with synchronous dispatch.
///
/// Handlers run in registration order. A handler may add or remove
/// listeners while it runs.
pub struct MemoryEventHub<E> {
    listeners: RefCell<BTreeMap<ListenerId, Listener<E>>>,
    next_id: Cell<u64>,
}

impl<E: Clone + PartialEq> MemoryEventHub<E> {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
        }
    }

    /// Fire `kind` on `target`, returning how many handlers ran.
    ///
    /// Stops at the first handler error and returns it.
    pub fn dispatch(&self, target: &ListenerTarget<E>, kind: EventKind) -> Result<usize> {
        let ids: Vec<ListenerId> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, l)| l.kind == kind && &l.target == target)
            .map(|(id, _)| *id)
            .collect();

        let mut fired = 0;
        for id in ids {
            let handler = self
                .listeners
                .borrow_mut()
                .get_mut(&id)
                .and_then(|l| l.handler.take());
            let Some(mut handler) = handler else {
                continue;
            };

            let result = handler();
            fired += 1;

            // Put the handler back unless it was removed while running
            if let Some(listener) = self.listeners.borrow_mut().get_mut(&id) {
                listener.handler = Some(handler);
            }
            result?;
        }

        tracing::trace!("dispatched {} to {} listener(s)", kind.as_str(), fired);
        Ok(fired)
    }

    pub fn click(&self, element: &E) -> Result<usize> {
        self.dispatch(&ListenerTarget::Element(element.clone()), EventKind::Click)
    }

    pub fn unload(&self) -> Result<usize> {
        self.dispatch(&ListenerTarget::Window, EventKind::Unload)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    pub fn count_for(&self, target: &ListenerTarget<E>, kind: EventKind) -> usize {
        self.listeners
            .borrow()
            .values()
            .filter(|l| l.kind == kind && &l.target == target)
            .count()
    }
}

impl<E: Clone + PartialEq> Default for MemoryEventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone + PartialEq> EventHub<E> for MemoryEventHub<E> {
    fn add_listener(
        &self,
        target: ListenerTarget<E>,
        kind: EventKind,
        handler: ListenerFn,
    ) -> Result<ListenerId> {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        self.listeners.borrow_mut().insert(
            id,
            Listener {
                target,
                kind,
                handler: Some(handler),
            },
        );
        Ok(id)
    }

    fn remove_listeners(&self, ids: &[ListenerId]) {
        let mut listeners = self.listeners.borrow_mut();
        for id in ids {
            listeners.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BannerError;
    use std::rc::Rc;

    #[test]
    fn test_dispatch_matches_target_and_kind() {
        let hub: MemoryEventHub<u32> = MemoryEventHub::new();
        let hits = Rc::new(Cell::new(0));

        let h = hits.clone();
        hub.add_listener(
            ListenerTarget::Element(1),
            EventKind::Click,
            Box::new(move || {
                h.set(h.get() + 1);
                Ok(())
            }),
        )
        .unwrap();

        assert_eq!(hub.click(&2).unwrap(), 0);
        assert_eq!(hub.unload().unwrap(), 0);
        assert_eq!(hub.click(&1).unwrap(), 1);
        assert_eq!(hub.click(&1).unwrap(), 1);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_remove_listeners() {
        let hub: MemoryEventHub<u32> = MemoryEventHub::new();
        let a = hub
            .add_listener(ListenerTarget::Window, EventKind::Unload, Box::new(|| Ok(())))
            .unwrap();
        let b = hub
            .add_listener(ListenerTarget::Element(7), EventKind::Click, Box::new(|| Ok(())))
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(hub.listener_count(), 2);

        hub.remove_listeners(&[a, b]);
        assert!(hub.is_empty());

        // Removing again is a no-op
        hub.remove_listeners(&[a, b]);
        assert_eq!(hub.unload().unwrap(), 0);
    }

    #[test]
    fn test_handler_can_remove_itself() {
        let hub: Rc<MemoryEventHub<u32>> = Rc::new(MemoryEventHub::new());
        let own_id = Rc::new(Cell::new(ListenerId(0)));

        let (h, id) = (hub.clone(), own_id.clone());
        let registered = hub
            .add_listener(
                ListenerTarget::Element(1),
                EventKind::Click,
                Box::new(move || {
                    h.remove_listeners(&[id.get()]);
                    Ok(())
                }),
            )
            .unwrap();
        own_id.set(registered);

        assert_eq!(hub.click(&1).unwrap(), 1);
        assert_eq!(hub.listener_count(), 0);
        assert_eq!(hub.click(&1).unwrap(), 0);
    }

    #[test]
    fn test_handler_error_is_returned() {
        let hub: MemoryEventHub<u32> = MemoryEventHub::new();
        hub.add_listener(
            ListenerTarget::Element(1),
            EventKind::Click,
            Box::new(|| Err(BannerError::Storage("blocked".into()))),
        )
        .unwrap();

        let err = hub.click(&1).unwrap_err();
        assert!(matches!(err, BannerError::Storage(_)));
        // Listener survives the failure
        assert_eq!(hub.count_for(&ListenerTarget::Element(1), EventKind::Click), 1);
    }
}
