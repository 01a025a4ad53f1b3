use wasm_bindgen::JsValue;

/// A listener registered on one of the providers.
///
/// The listener stays registered for as long as the subscription is alive:
/// dropping it calls `removeListener` on the provider and releases the
/// callback.
#[must_use = "dropping the subscription removes the listener straight away"]
pub struct Subscription {
    event: &'static str,
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(event: &'static str, unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            event,
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// name of the event this subscription listens to
    pub fn event(&self) -> &'static str {
        self.event
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .finish()
    }
}

/// decode the payload of an event, logging what we couldn't make sense of
pub(crate) fn decode_payload<T: serde::de::DeserializeOwned>(
    event: &str,
    payload: JsValue,
) -> Option<T> {
    match serde_wasm_bindgen::from_value(payload) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(event, %error, "couldn't decode event payload");
            None
        }
    }
}
