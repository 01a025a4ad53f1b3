/*!
The global environment the wallets are injected into.

Everything the detection helpers observe goes through the [`Host`] trait:
reading a global slot, listening to and dispatching named events, and
arming timers. In a web page this is the `window` object (see
[`BrowserHost`]); the crate never writes to the global slots.
*/

mod browser;
#[cfg(test)]
pub(crate) mod mock;

use crate::error::HostError;
use std::{rc::Rc, time::Duration};

pub use self::browser::BrowserHost;

/// handle to an event listener registered with [`Host::add_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub(crate) u64);

/// handle to a timer armed with [`Host::set_timeout`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub(crate) u64);

/// Callback invoked with the `detail` of the event, if any.
pub type EventHandler<V> = Rc<dyn Fn(Option<V>)>;

/// Callback invoked once when the timer elapses.
pub type TimerHandler = Box<dyn FnOnce()>;

/// A value living in the host environment.
///
/// Only the handful of reflective operations needed for duck typing are
/// required. None of them may fail: a value that cannot be inspected simply
/// does not have the property.
pub trait HostValue: Clone + 'static {
    fn is_object(&self) -> bool;

    fn is_function(&self) -> bool;

    /// read a property, `None` if it is `undefined` or `null`
    fn property(&self, name: &str) -> Option<Self>;

    fn as_bool(&self) -> Option<bool>;

    fn as_string(&self) -> Option<String>;

    /// short human readable description, used in error messages
    fn describe(&self) -> String;
}

pub trait Host: Clone + 'static {
    type Value: HostValue;

    /// `false` when there is no global environment at all (e.g. server
    /// side rendering), nothing will ever be injected then.
    fn is_available(&self) -> bool {
        true
    }

    /// read `window[slot]`, `None` if it is `undefined` or `null`
    fn global(&self, slot: &str) -> Option<Self::Value>;

    fn add_listener(&self, event: &str, handler: EventHandler<Self::Value>) -> ListenerId;

    fn remove_listener(&self, id: ListenerId);

    /// dispatch a bare event with the given name on the global object
    fn dispatch(&self, event: &str) -> Result<(), HostError>;

    /// arm a one shot timer, `handler` is dropped without running if this
    /// fails
    fn set_timeout(&self, delay: Duration, handler: TimerHandler) -> Result<TimerId, HostError>;

    fn clear_timeout(&self, id: TimerId);
}
