//! In memory [`Host`] with a manual clock, for the tests.

use super::{EventHandler, Host, HostValue, ListenerId, TimerHandler, TimerId};
use crate::error::HostError;
use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
    time::Duration,
};

#[derive(Debug, Clone)]
pub enum MockValue {
    Bool(bool),
    Str(String),
    Function,
    Object(Rc<BTreeMap<String, MockValue>>),
}

impl MockValue {
    pub fn object<'a>(fields: impl IntoIterator<Item = (&'a str, MockValue)>) -> Self {
        Self::Object(Rc::new(
            fields
                .into_iter()
                .map(|(key, value)| (key.to_owned(), value))
                .collect(),
        ))
    }

    /// identity comparison, like `===` on JS objects
    pub fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl HostValue for MockValue {
    fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    fn is_function(&self) -> bool {
        matches!(self, Self::Function)
    }

    fn property(&self, name: &str) -> Option<Self> {
        match self {
            Self::Object(fields) => fields.get(name).cloned(),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn as_string(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Str(s) => format!("{s:?}"),
            Self::Function => "function".to_owned(),
            Self::Object(fields) => {
                let keys = fields.keys().map(String::as_str).collect::<Vec<_>>();
                format!("object {{ {} }}", keys.join(", "))
            }
        }
    }
}

/// a well formed L1 provider
pub fn kaspa_provider() -> MockValue {
    MockValue::object([
        ("requestAccounts", MockValue::Function),
        ("getAccounts", MockValue::Function),
        ("getBalance", MockValue::Function),
        ("on", MockValue::Function),
        ("removeListener", MockValue::Function),
    ])
}

/// a well formed EIP-1193 provider, flagged or not
pub fn eip1193_provider(is_kaspa_wallet: bool) -> MockValue {
    MockValue::object([
        ("request", MockValue::Function),
        ("on", MockValue::Function),
        ("removeListener", MockValue::Function),
        ("isKaspaWallet", MockValue::Bool(is_kaspa_wallet)),
    ])
}

/// the `detail` of an `eip6963:announceProvider` event
pub fn announcement(rdns: &str, provider: MockValue) -> MockValue {
    MockValue::object([
        (
            "info",
            MockValue::object([
                ("rdns", MockValue::Str(rdns.to_owned())),
                ("name", MockValue::Str("Test Wallet".to_owned())),
            ]),
        ),
        ("provider", provider),
    ])
}

struct MockTimer {
    id: TimerId,
    deadline: Duration,
    handler: TimerHandler,
}

type Hook = Box<dyn Fn(&MockHost, &str)>;

#[derive(Clone)]
pub struct MockHost {
    inner: Rc<Inner>,
}

#[derive(Default)]
struct Inner {
    available: Cell<bool>,
    next_id: Cell<u64>,
    now: Cell<Duration>,
    slots: RefCell<BTreeMap<String, MockValue>>,
    listeners: RefCell<Vec<(ListenerId, String, EventHandler<MockValue>)>>,
    timers: RefCell<Vec<MockTimer>>,
    dispatched: RefCell<Vec<String>>,
    fail_dispatch: Cell<bool>,
    fail_timers: Cell<bool>,
    on_add_listener: RefCell<Option<Hook>>,
    on_dispatch: RefCell<Option<Hook>>,
}

impl MockHost {
    pub fn new() -> Self {
        let inner = Inner::default();
        inner.available.set(true);
        Self {
            inner: Rc::new(inner),
        }
    }

    /// a host without any global environment
    pub fn unavailable() -> Self {
        Self {
            inner: Rc::new(Inner::default()),
        }
    }

    fn next_id(&self) -> u64 {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        id
    }

    pub fn set_global(&self, slot: &str, value: MockValue) {
        self.inner
            .slots
            .borrow_mut()
            .insert(slot.to_owned(), value);
    }

    pub fn fail_dispatch(&self) {
        self.inner.fail_dispatch.set(true);
    }

    /// make every following [`Host::set_timeout`] fail
    pub fn fail_timers(&self) {
        self.inner.fail_timers.set(true);
    }

    /// run `hook` every time a listener is registered, after registration
    pub fn on_add_listener(&self, hook: impl Fn(&MockHost, &str) + 'static) {
        *self.inner.on_add_listener.borrow_mut() = Some(Box::new(hook));
    }

    /// run `hook` every time an event is dispatched by the code under test
    pub fn on_dispatch(&self, hook: impl Fn(&MockHost, &str) + 'static) {
        *self.inner.on_dispatch.borrow_mut() = Some(Box::new(hook));
    }

    /// deliver `event` to the listeners registered for it
    pub fn fire(&self, event: &str, detail: Option<MockValue>) {
        let handlers = self
            .inner
            .listeners
            .borrow()
            .iter()
            .filter(|(_, name, _)| name == event)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect::<Vec<_>>();
        for handler in handlers {
            handler(detail.clone());
        }
    }

    /// move the clock forward, running the timers that are due
    pub fn advance(&self, by: Duration) {
        let now = self.inner.now.get() + by;
        self.inner.now.set(now);
        loop {
            let due = {
                let mut timers = self.inner.timers.borrow_mut();
                let position = timers.iter().position(|timer| timer.deadline <= now);
                position.map(|position| timers.remove(position))
            };
            match due {
                Some(timer) => (timer.handler)(),
                None => break,
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    pub fn listener_count_for(&self, event: &str) -> usize {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|(_, name, _)| name == event)
            .count()
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.timers.borrow().len()
    }

    pub fn dispatched(&self) -> Vec<String> {
        self.inner.dispatched.borrow().clone()
    }
}

impl Host for MockHost {
    type Value = MockValue;

    fn is_available(&self) -> bool {
        self.inner.available.get()
    }

    fn global(&self, slot: &str) -> Option<MockValue> {
        self.inner.slots.borrow().get(slot).cloned()
    }

    fn add_listener(&self, event: &str, handler: EventHandler<MockValue>) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.inner
            .listeners
            .borrow_mut()
            .push((id, event.to_owned(), handler));
        if let Some(hook) = self.inner.on_add_listener.borrow().as_ref() {
            hook(self, event);
        }
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(listener, _, _)| *listener != id);
    }

    fn dispatch(&self, event: &str) -> Result<(), HostError> {
        if self.inner.fail_dispatch.get() {
            return Err(HostError::Dispatch {
                event: event.to_owned(),
                reason: "SecurityError: the operation is insecure".to_owned(),
            });
        }
        self.inner.dispatched.borrow_mut().push(event.to_owned());
        if let Some(hook) = self.inner.on_dispatch.borrow().as_ref() {
            hook(self, event);
        }
        Ok(())
    }

    fn set_timeout(&self, delay: Duration, handler: TimerHandler) -> Result<TimerId, HostError> {
        if self.inner.fail_timers.get() {
            return Err(HostError::Timer {
                reason: "timers are disabled".to_owned(),
            });
        }
        let id = TimerId(self.next_id());
        let deadline = self.inner.now.get() + delay;
        self.inner.timers.borrow_mut().push(MockTimer {
            id,
            deadline,
            handler,
        });
        Ok(id)
    }

    fn clear_timeout(&self, id: TimerId) {
        self.inner.timers.borrow_mut().retain(|timer| timer.id != id);
    }
}
