mod registry;

pub use registry::MemoryEventHub;

use crate::error::Result;

/// DOM events the banner listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Unload,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Unload => "unload",
        }
    }
}

/// Where a listener is attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerTarget<E> {
    Element(E),
    Window,
}

/// Handle returned by [`EventHub::add_listener`], used for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Listener callback. Errors surface wherever the hub dispatches events.
pub type ListenerFn = Box<dyn FnMut() -> Result<()>>;

pub trait EventHub<E> {
    fn add_listener(
        &self,
        target: ListenerTarget<E>,
        kind: EventKind,
        handler: ListenerFn,
    ) -> Result<ListenerId>;

    /// Detach every listener in `ids`. Unknown ids are ignored.
    fn remove_listeners(&self, ids: &[ListenerId]);
}
