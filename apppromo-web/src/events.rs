use apppromo_ui::events::{EventHub, EventKind, ListenerFn, ListenerId, ListenerTarget};
use apppromo_ui::{BannerError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget, Window};

struct Registration {
    target: EventTarget,
    kind: EventKind,
    closure: Closure<dyn FnMut()>,
}

/// [`EventHub`] registering real DOM listeners.
///
/// Closures stay owned here until removed; dropping one while it is still
/// attached would leave a dangling callback in the browser.
pub struct WindowEventHub {
    window: Window,
    listeners: RefCell<HashMap<ListenerId, Registration>>,
    next_id: Cell<u64>,
}

impl WindowEventHub {
    pub fn new() -> std::result::Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        Ok(Self {
            window,
            listeners: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        })
    }
}

impl EventHub<Element> for WindowEventHub {
    fn add_listener(
        &self,
        target: ListenerTarget<Element>,
        kind: EventKind,
        mut handler: ListenerFn,
    ) -> Result<ListenerId> {
        let target: EventTarget = match target {
            ListenerTarget::Element(element) => element.into(),
            ListenerTarget::Window => self.window.clone().into(),
        };

        // Errors cannot travel back through the browser's event loop; report them
        let closure = Closure::wrap(Box::new(move || {
            if let Err(e) = handler() {
                tracing::error!("{} listener failed: {}", kind.as_str(), e);
                web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
            }
        }) as Box<dyn FnMut()>);

        target
            .add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
            .map_err(|e| BannerError::Events(format!("{:?}", e)))?;

        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().insert(
            id,
            Registration {
                target,
                kind,
                closure,
            },
        );
        Ok(id)
    }

    fn remove_listeners(&self, ids: &[ListenerId]) {
        let removed: Vec<Registration> = {
            let mut listeners = self.listeners.borrow_mut();
            ids.iter().filter_map(|id| listeners.remove(id)).collect()
        };

        for registration in removed {
            if let Err(e) = registration.target.remove_event_listener_with_callback(
                registration.kind.as_str(),
                registration.closure.as_ref().unchecked_ref(),
            ) {
                tracing::warn!("Failed to detach {} listener: {:?}", registration.kind.as_str(), e);
            }
        }
    }
}
