use crate::{
    Detector,
    error::{DetectError, ProviderError, ProviderErrorCode},
    ffi,
    kaspa::{Balance, KaspaEvent, MAX_SAFE_SOMPI, NetworkId, SendOptions, Sompi},
    subscription::{Subscription, decode_payload},
};
use std::time::Duration;
use wasm_bindgen::{JsCast as _, JsValue, closure::Closure};

/// The L1 provider of the Kaspa wallet.
///
/// This is a thin layer over [`ffi::KaspaProvider`]: the object remains owned
/// by the wallet, we only decode what goes in and out of it.
#[derive(Clone, PartialEq)]
pub struct KaspaWallet {
    provider: ffi::KaspaProvider,
}

/// check if the wallet's L1 provider (`window.kaspa`) is injected
///
/// Returns `false` when not running in a browser.
pub fn is_kaspa_available() -> bool {
    Detector::browser().is_kaspa_available()
}

/// get the wallet's L1 provider if it is already injected
pub fn kaspa_provider() -> Option<KaspaWallet> {
    Detector::browser()
        .kaspa_provider()
        .map(|provider| KaspaWallet::new(provider.unchecked_into()))
}

/// get the `window.kaspaWallet` namespace, if any
///
/// Its absence does not mean the providers are missing, they may be injected
/// on their own.
pub fn namespace() -> Option<ffi::KaspaNamespace> {
    Detector::browser()
        .namespace()
        .map(|namespace| namespace.unchecked_into())
}

/// wait for the wallet's L1 provider to be injected
///
/// See [`Detector::wait_for_kaspa`] for the details. Use
/// [`DEFAULT_TIMEOUT`](crate::DEFAULT_TIMEOUT) if you don't have a better
/// value.
///
/// ```no_run
/// # async fn test() -> anyhow::Result<()> {
/// use kaspa_connector::{DEFAULT_TIMEOUT, wait_for_kaspa};
///
/// let wallet = wait_for_kaspa(DEFAULT_TIMEOUT).await?;
/// let accounts = wallet.request_accounts().await?;
/// # Ok(()) }
/// ```
pub async fn wait_for_kaspa(timeout: Duration) -> Result<KaspaWallet, DetectError> {
    let provider = Detector::browser().wait_for_kaspa(timeout).await?;
    Ok(KaspaWallet::new(provider.unchecked_into()))
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    value: JsValue,
    what: &str,
) -> Result<T, ProviderError> {
    serde_wasm_bindgen::from_value(value).map_err(|decode_error| {
        ProviderError::internal(format!("Couldn't decode the {what}: {decode_error}"))
    })
}

impl KaspaWallet {
    pub fn new(provider: ffi::KaspaProvider) -> Self {
        Self { provider }
    }

    /// access the underlying provider, for what is not wrapped here
    pub fn provider(&self) -> &ffi::KaspaProvider {
        &self.provider
    }

    /// Prompt the user to connect the wallet to the page (unless already
    /// approved) and returns the addresses the page may use.
    ///
    /// Fails with [`ProviderErrorCode::UserRejected`] if the user declined.
    pub async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        let accounts = self
            .provider
            .request_accounts()
            .await
            .map_err(ProviderError::from_js)?;
        decode(accounts, "account list")
    }

    /// list the addresses the page is already allowed to use, without
    /// prompting the user
    pub async fn accounts(&self) -> Result<Vec<String>, ProviderError> {
        let accounts = self
            .provider
            .get_accounts()
            .await
            .map_err(ProviderError::from_js)?;
        decode(accounts, "account list")
    }

    pub async fn balance(&self) -> Result<Balance, ProviderError> {
        let balance = self
            .provider
            .get_balance()
            .await
            .map_err(ProviderError::from_js)?;
        decode(balance, "balance")
    }

    pub async fn network(&self) -> Result<NetworkId, ProviderError> {
        let network = self
            .provider
            .get_network()
            .await
            .map_err(ProviderError::from_js)?;
        let Some(network) = network.as_string() else {
            return Err(ProviderError::internal(format!(
                "Unknown network: {network:?}"
            )));
        };
        Ok(network.parse().unwrap_or(NetworkId::Unknown(network)))
    }

    /// ask the wallet to switch to the given network, the user may refuse
    pub async fn switch_network(&self, network: &NetworkId) -> Result<(), ProviderError> {
        self.provider
            .switch_network(network.as_str())
            .await
            .map_err(ProviderError::from_js)?;
        Ok(())
    }

    /// Send `amount` sompi to the address `to`. Returns the transaction id.
    ///
    /// The amount travels as a JS number, anything above
    /// [`MAX_SAFE_SOMPI`] is refused before reaching the wallet.
    pub async fn send_kaspa(
        &self,
        to: &str,
        amount: Sompi,
        options: SendOptions,
    ) -> Result<String, ProviderError> {
        if amount > MAX_SAFE_SOMPI {
            return Err(ProviderError {
                code: ProviderErrorCode::InvalidParams,
                message: format!("Amount `{amount}' cannot be represented as a JS number"),
            });
        }
        if let Some(fee) = options.priority_fee.filter(|fee| *fee > MAX_SAFE_SOMPI) {
            return Err(ProviderError {
                code: ProviderErrorCode::InvalidParams,
                message: format!("Priority fee `{fee}' cannot be represented as a JS number"),
            });
        }

        let options = if options.is_empty() {
            JsValue::undefined()
        } else {
            serde::Serialize::serialize(
                &options,
                &serde_wasm_bindgen::Serializer::json_compatible(),
            )
            .map_err(|error| {
                ProviderError::internal(format!("Couldn't encode the options: {error}"))
            })?
        };

        let txid = self
            .provider
            .send_kaspa(to, amount as f64, options)
            .await
            .map_err(ProviderError::from_js)?;
        decode(txid, "transaction id")
    }

    /// sign an arbitrary text message with the connected account
    pub async fn sign_message(&self, message: &str) -> Result<String, ProviderError> {
        let signature = self
            .provider
            .sign_message(message)
            .await
            .map_err(ProviderError::from_js)?;
        decode(signature, "signature")
    }

    /// Sign a partially signed transaction.
    ///
    /// Current versions of the wallet do not implement it and reject the
    /// request, the error is returned as is.
    pub async fn sign_pskt(&self, pskt: &str) -> Result<String, ProviderError> {
        let signed = self
            .provider
            .sign_pskt(pskt)
            .await
            .map_err(ProviderError::from_js)?;
        decode(signed, "signed transaction")
    }

    /// ask the wallet to broadcast the given signed transaction
    pub async fn push_tx(&self, raw_tx: impl AsRef<[u8]>) -> Result<String, ProviderError> {
        let raw_tx = hex::encode(raw_tx);
        let txid = self
            .provider
            .push_tx(&raw_tx)
            .await
            .map_err(ProviderError::from_js)?;
        decode(txid, "transaction id")
    }

    /// Listen to the given event. The callback receives the raw payload.
    ///
    /// The listener is removed when the returned [`Subscription`] is
    /// dropped.
    pub fn subscribe<F>(&self, event: KaspaEvent, callback: F) -> Result<Subscription, ProviderError>
    where
        F: FnMut(JsValue) + 'static,
    {
        let closure = Closure::<dyn FnMut(JsValue)>::new(callback);
        self.provider
            .on(event.as_str(), closure.as_ref().unchecked_ref())
            .map_err(ProviderError::from_js)?;

        let provider = self.provider.clone();
        Ok(Subscription::new(event.as_str(), move || {
            if let Err(error) =
                provider.remove_listener(event.as_str(), closure.as_ref().unchecked_ref())
            {
                tracing::warn!(%event, ?error, "couldn't remove listener");
            }
            drop(closure);
        }))
    }

    pub fn on_accounts_changed<F>(&self, mut callback: F) -> Result<Subscription, ProviderError>
    where
        F: FnMut(Vec<String>) + 'static,
    {
        let event = KaspaEvent::AccountsChanged;
        self.subscribe(event, move |payload| {
            if let Some(accounts) = decode_payload(event.as_str(), payload) {
                callback(accounts)
            }
        })
    }

    pub fn on_network_changed<F>(&self, mut callback: F) -> Result<Subscription, ProviderError>
    where
        F: FnMut(NetworkId) + 'static,
    {
        let event = KaspaEvent::NetworkChanged;
        self.subscribe(event, move |payload| {
            if let Some(network) = decode_payload::<String>(event.as_str(), payload) {
                callback(network.parse().unwrap_or(NetworkId::Unknown(network)))
            }
        })
    }

    pub fn on_balance_changed<F>(&self, mut callback: F) -> Result<Subscription, ProviderError>
    where
        F: FnMut(Balance) + 'static,
    {
        let event = KaspaEvent::BalanceChanged;
        self.subscribe(event, move |payload| {
            if let Some(balance) = decode_payload(event.as_str(), payload) {
                callback(balance)
            }
        })
    }
}

impl ffi::KaspaNamespace {
    /// the L1 provider referenced by the namespace
    pub fn wallet(&self) -> Option<KaspaWallet> {
        self.provider().map(KaspaWallet::new)
    }
}
