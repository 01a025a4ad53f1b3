use super::{EventHandler, Host, HostValue, ListenerId, TimerHandler, TimerId};
use crate::error::HostError;
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
    time::Duration,
};
use wasm_bindgen::{JsCast as _, JsValue, closure::Closure};

/// The `window` of the web page.
///
/// Every instance keeps track of the closures it handed over to the browser
/// so they can be released when the listener or timer is removed. Instances
/// do not share anything, two waits using two hosts are independent.
#[derive(Clone)]
pub struct BrowserHost {
    inner: Rc<Inner>,
}

struct Inner {
    window: Option<web_sys::Window>,
    next_id: Cell<u64>,
    listeners: RefCell<HashMap<ListenerId, Listener>>,
    timers: RefCell<HashMap<TimerId, Timer>>,
}

struct Listener {
    event: String,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

struct Timer {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

/// the global window, if any
///
/// Outside of a wasm target there is no JS engine to talk to at all, so we
/// don't even try (calling into `js-sys` would abort).
fn window() -> Option<web_sys::Window> {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

impl BrowserHost {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                window: window(),
                next_id: Cell::new(0),
                listeners: RefCell::new(HashMap::new()),
                timers: RefCell::new(HashMap::new()),
            }),
        }
    }

    fn next_id(&self) -> u64 {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id.wrapping_add(1));
        id
    }
}

impl Default for BrowserHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for BrowserHost {
    type Value = JsValue;

    fn is_available(&self) -> bool {
        self.inner.window.is_some()
    }

    fn global(&self, slot: &str) -> Option<JsValue> {
        let window = self.inner.window.as_ref()?;
        let value = js_sys::Reflect::get(window, &JsValue::from_str(slot)).ok()?;
        if value.is_undefined() || value.is_null() {
            None
        } else {
            Some(value)
        }
    }

    fn add_listener(&self, event: &str, handler: EventHandler<JsValue>) -> ListenerId {
        let id = ListenerId(self.next_id());
        let Some(window) = self.inner.window.as_ref() else {
            return id;
        };

        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            let detail = event
                .dyn_ref::<web_sys::CustomEvent>()
                .map(|event| event.detail())
                .filter(|detail| !detail.is_undefined() && !detail.is_null());
            handler(detail);
        });

        if let Err(error) =
            window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            tracing::warn!(event, ?error, "couldn't register event listener");
            return id;
        }

        self.inner.listeners.borrow_mut().insert(
            id,
            Listener {
                event: event.to_owned(),
                closure,
            },
        );
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        let Some(listener) = self.inner.listeners.borrow_mut().remove(&id) else {
            return;
        };
        if let Some(window) = self.inner.window.as_ref() {
            if let Err(error) = window.remove_event_listener_with_callback(
                &listener.event,
                listener.closure.as_ref().unchecked_ref(),
            ) {
                tracing::warn!(event = %listener.event, ?error, "couldn't remove event listener");
            }
        }
        // the closure may be the one currently running, the JS glue defers
        // its destruction until it returns
        drop(listener);
    }

    fn dispatch(&self, event: &str) -> Result<(), HostError> {
        let window = self.inner.window.as_ref().ok_or(HostError::NoWindow)?;
        let dispatch_error = |error: JsValue| HostError::Dispatch {
            event: event.to_owned(),
            reason: format!("{error:?}"),
        };

        let event_object = web_sys::Event::new(event).map_err(dispatch_error)?;
        window
            .dispatch_event(&event_object)
            .map_err(dispatch_error)?;
        Ok(())
    }

    fn set_timeout(&self, delay: Duration, handler: TimerHandler) -> Result<TimerId, HostError> {
        let window = self.inner.window.as_ref().ok_or(HostError::NoWindow)?;
        let id = TimerId(self.next_id());

        let inner = Rc::downgrade(&self.inner);
        let closure = Closure::once(move || {
            if let Some(inner) = inner.upgrade() {
                let timer = inner.timers.borrow_mut().remove(&id);
                drop(timer);
            }
            handler();
        });

        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis,
            )
            .map_err(|error| HostError::Timer {
                reason: format!("{error:?}"),
            })?;
        self.inner.timers.borrow_mut().insert(
            id,
            Timer {
                handle,
                _closure: closure,
            },
        );
        Ok(id)
    }

    fn clear_timeout(&self, id: TimerId) {
        let Some(timer) = self.inner.timers.borrow_mut().remove(&id) else {
            return;
        };
        if let Some(window) = self.inner.window.as_ref() {
            window.clear_timeout_with_handle(timer.handle);
        }
        drop(timer);
    }
}

impl HostValue for JsValue {
    fn is_object(&self) -> bool {
        JsValue::is_object(self)
    }

    fn is_function(&self) -> bool {
        JsValue::is_function(self)
    }

    fn property(&self, name: &str) -> Option<Self> {
        // Reflect.get throws on primitives, which is as good as missing
        let value = js_sys::Reflect::get(self, &JsValue::from_str(name)).ok()?;
        if value.is_undefined() || value.is_null() {
            None
        } else {
            Some(value)
        }
    }

    fn as_bool(&self) -> Option<bool> {
        JsValue::as_bool(self)
    }

    fn as_string(&self) -> Option<String> {
        JsValue::as_string(self)
    }

    fn describe(&self) -> String {
        format!("{self:?}")
    }
}
