/*!
Detection of the injected providers.

The wallet injects its providers whenever it sees fit, possibly after the
page started running our code. The synchronous checks only tell what is
there right now; the `wait_for_*` functions will suspend until the provider
shows up, or fail after a bounded amount of time.

Nothing is cached: every call re-reads the live global slot since the
wallet is free to replace or remove its objects at any time.
*/

use crate::{
    config::DetectorConfig,
    error::DetectError,
    host::{BrowserHost, EventHandler, Host, HostValue, ListenerId, TimerId},
    shape,
};
use futures::channel::oneshot;
use std::{cell::RefCell, rc::Rc, time::Duration};

/// Looks for the wallet's providers in a [`Host`], the browser by default.
#[derive(Clone)]
pub struct Detector<H: Host = BrowserHost> {
    host: H,
    config: Rc<DetectorConfig>,
}

impl Detector<BrowserHost> {
    /// detector looking at the `window` of the current page
    pub fn browser() -> Self {
        Self::new(BrowserHost::new())
    }
}

impl Default for Detector<BrowserHost> {
    fn default() -> Self {
        Self::browser()
    }
}

impl<H: Host> Detector<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, DetectorConfig::default())
    }

    pub fn with_config(host: H, config: DetectorConfig) -> Self {
        Self {
            host,
            config: Rc::new(config),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// `true` if the L1 provider is currently injected
    pub fn is_kaspa_available(&self) -> bool {
        self.kaspa_provider().is_some()
    }

    /// `true` if any EIP-1193 provider is injected, whichever wallet it
    /// belongs to
    pub fn is_ethereum_available(&self) -> bool {
        self.host.global(&self.config.ethereum_slot).is_some()
    }

    /// `true` if the EIP-1193 provider is injected *and* identifies itself
    /// as the Kaspa wallet
    pub fn is_kaspa_evm_available(&self) -> bool {
        self.kaspa_evm_provider().is_some()
    }

    pub fn kaspa_provider(&self) -> Option<H::Value> {
        self.host.global(&self.config.kaspa_slot)
    }

    pub fn kaspa_evm_provider(&self) -> Option<H::Value> {
        kaspa_evm_slot(&self.host, &self.config)
    }

    /// the namespace object, no validation besides existence
    pub fn namespace(&self) -> Option<H::Value> {
        self.host.global(&self.config.namespace_slot)
    }

    /// Wait for the L1 provider to be injected.
    ///
    /// Resolves right away if the provider is already there. Otherwise
    /// resolves on the wallet's initialization (or ready) event, provided the
    /// slot then holds a valid provider. Fails with
    /// [`DetectError::InvalidAnnouncement`] if the event fired but the
    /// provider is missing or malformed, and with [`DetectError::Timeout`]
    /// if nothing happened within `timeout`.
    pub async fn wait_for_kaspa(&self, timeout: Duration) -> Result<H::Value, DetectError> {
        if let Some(provider) = self.kaspa_provider() {
            return Ok(provider);
        }
        if !self.host.is_available() {
            return Err(DetectError::Unavailable);
        }

        let (waiter, outcome) = Waiter::new(self.host.clone());
        waiter.arm(timeout, &self.config.kaspa_slot)?;

        for event in [
            &self.config.kaspa_initialized_event,
            &self.config.ready_event,
        ] {
            let handler: EventHandler<H::Value> = {
                let waiter = Rc::clone(&waiter);
                let event = event.clone();
                let slot = self.config.kaspa_slot.clone();
                Rc::new(move |_detail: Option<H::Value>| {
                    match waiter.host.global(&slot) {
                        Some(provider) if shape::is_kaspa_provider(&provider) => {
                            tracing::debug!(%event, %slot, "provider initialized");
                            waiter.settle(Ok(provider))
                        }
                        observed => waiter.settle(Err(DetectError::InvalidAnnouncement {
                            event: event.clone(),
                            slot: slot.clone(),
                            observed: describe(observed.as_ref()),
                        })),
                    }
                })
            };
            waiter.listen(event, handler);
        }

        // it may have been injected while we were registering
        if let Some(provider) = self.kaspa_provider() {
            waiter.settle(Ok(provider));
        }

        wait(outcome).await
    }

    /// Wait for the wallet's EIP-1193 provider.
    ///
    /// Same as [`Detector::wait_for_kaspa`], listening to the EIP-1193
    /// initialization event as well as to EIP-6963 announcements. After the
    /// listeners are registered an announcement request is dispatched so
    /// wallets that are already loaded announce themselves again.
    ///
    /// Announcements are sent by every wallet of the page: those that are
    /// not ours, or that are malformed, are ignored and we keep waiting.
    pub async fn wait_for_kaspa_evm(&self, timeout: Duration) -> Result<H::Value, DetectError> {
        if let Some(provider) = self.kaspa_evm_provider() {
            return Ok(provider);
        }
        if !self.host.is_available() {
            return Err(DetectError::Unavailable);
        }

        let (waiter, outcome) = Waiter::new(self.host.clone());
        waiter.arm(timeout, &self.config.ethereum_slot)?;

        let on_initialized: EventHandler<H::Value> = {
            let waiter = Rc::clone(&waiter);
            let config = Rc::clone(&self.config);
            Rc::new(move |_detail: Option<H::Value>| {
                let event = &config.ethereum_initialized_event;
                let slot = &config.ethereum_slot;
                match kaspa_evm_slot(&waiter.host, &config) {
                    Some(provider) if shape::is_eip1193_provider(&provider) => {
                        tracing::debug!(%event, %slot, "provider initialized");
                        waiter.settle(Ok(provider))
                    }
                    _ => waiter.settle(Err(DetectError::InvalidAnnouncement {
                        event: event.clone(),
                        slot: slot.clone(),
                        observed: describe(waiter.host.global(slot).as_ref()),
                    })),
                }
            })
        };
        waiter.listen(&self.config.ethereum_initialized_event, on_initialized);

        let on_announce: EventHandler<H::Value> = {
            let waiter = Rc::clone(&waiter);
            let config = Rc::clone(&self.config);
            Rc::new(move |detail: Option<H::Value>| match announced_provider(detail.as_ref(), &config) {
                Some(provider) => waiter.settle(Ok(provider)),
                None => tracing::debug!(
                    observed = %describe(detail.as_ref()),
                    "ignoring provider announcement"
                ),
            })
        };
        waiter.listen(&self.config.announce_event, on_announce);

        if let Err(error) = self.host.dispatch(&self.config.request_event) {
            tracing::warn!(%error, "couldn't request provider announcements");
        }

        if let Some(provider) = self.kaspa_evm_provider() {
            waiter.settle(Ok(provider));
        }

        wait(outcome).await
    }
}

fn kaspa_evm_slot<H: Host>(host: &H, config: &DetectorConfig) -> Option<H::Value> {
    host.global(&config.ethereum_slot)
        .filter(|provider| shape::has_flag(provider, &config.wallet_flag))
}

/// extract our provider from an EIP-6963 `{ info: { rdns }, provider }`
/// payload
fn announced_provider<V: HostValue>(detail: Option<&V>, config: &DetectorConfig) -> Option<V> {
    let detail = detail?;
    let provider = detail.property("provider")?;
    if !shape::is_eip1193_provider(&provider) {
        return None;
    }

    let rdns = detail
        .property("info")
        .and_then(|info| info.property("rdns"))
        .and_then(|rdns| rdns.as_string());
    let ours = rdns.as_deref() == Some(config.rdns.as_str())
        || shape::has_flag(&provider, &config.wallet_flag);
    if !ours {
        return None;
    }

    tracing::debug!(?rdns, "provider announced");
    Some(provider)
}

fn describe<V: HostValue>(value: Option<&V>) -> String {
    value
        .map(HostValue::describe)
        .unwrap_or_else(|| "undefined".to_owned())
}

async fn wait<V>(outcome: oneshot::Receiver<Result<V, DetectError>>) -> Result<V, DetectError> {
    outcome.await.unwrap_or(Err(DetectError::Interrupted))
}

type Outcome<V> = Result<V, DetectError>;

/// Single-shot settlement of one wait.
///
/// The timer and every listener hold a reference to the waiter. The first
/// call to [`Waiter::settle`] wins, releases all of them and forwards the
/// outcome; later calls are no-ops.
struct Waiter<H: Host> {
    host: H,
    state: RefCell<State<H::Value>>,
}

struct State<V> {
    settled: bool,
    sender: Option<oneshot::Sender<Outcome<V>>>,
    listeners: Vec<ListenerId>,
    timer: Option<TimerId>,
}

impl<H: Host> Waiter<H> {
    fn new(host: H) -> (Rc<Self>, oneshot::Receiver<Outcome<H::Value>>) {
        let (sender, receiver) = oneshot::channel();
        let waiter = Rc::new(Self {
            host,
            state: RefCell::new(State {
                settled: false,
                sender: Some(sender),
                listeners: Vec::new(),
                timer: None,
            }),
        });
        (waiter, receiver)
    }

    /// arm the timeout, must be done before any listener is registered
    fn arm(self: &Rc<Self>, timeout: Duration, slot: &str) -> Result<(), DetectError> {
        let waiter = Rc::clone(self);
        let slot = slot.to_owned();
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        let id = self.host.set_timeout(
            timeout,
            Box::new(move || {
                let observed = describe(waiter.host.global(&slot).as_ref());
                tracing::debug!(%slot, timeout_ms, "provider detection timed out");
                waiter.settle(Err(DetectError::Timeout {
                    timeout_ms,
                    slot,
                    observed,
                }))
            }),
        );
        let id = id.map_err(|error| {
            tracing::warn!(%error, "couldn't arm the detection timeout");
            DetectError::Timer(error)
        })?;

        let settled = {
            let mut state = self.state.borrow_mut();
            if !state.settled {
                state.timer = Some(id);
            }
            state.settled
        };
        if settled {
            self.host.clear_timeout(id);
        }
        Ok(())
    }

    fn listen(&self, event: &str, handler: EventHandler<H::Value>) {
        let id = self.host.add_listener(event, handler);

        let settled = {
            let mut state = self.state.borrow_mut();
            if !state.settled {
                state.listeners.push(id);
            }
            state.settled
        };
        if settled {
            self.host.remove_listener(id);
        }
    }

    fn settle(&self, outcome: Outcome<H::Value>) {
        let (listeners, timer, sender) = {
            let mut state = self.state.borrow_mut();
            if state.settled {
                return;
            }
            state.settled = true;
            (
                std::mem::take(&mut state.listeners),
                state.timer.take(),
                state.sender.take(),
            )
        };

        for id in listeners {
            self.host.remove_listener(id);
        }
        if let Some(id) = timer {
            self.host.clear_timeout(id);
        }
        if let Some(sender) = sender {
            // the caller may have given up on the wait, nothing to do then
            let _ = sender.send(outcome);
        }
    }
}
