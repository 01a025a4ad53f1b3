/*!
The wallet's EIP-1193 provider.

Any wallet of the page may inject `window.ethereum`; [`is_ethereum_available`]
only tells there is one, [`is_kaspa_evm_available`] tells it is ours.
*/

use crate::{
    Detector,
    error::{DetectError, ProviderError},
    ffi,
    subscription::{Subscription, decode_payload},
    wallet::decode,
};
use core::fmt;
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use wasm_bindgen::{JsCast as _, JsValue, closure::Closure};

/// Events emitted by an EIP-1193 provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EvmEvent {
    Connect,
    Disconnect,
    ChainChanged,
    AccountsChanged,
    Message,
}

impl EvmEvent {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::ChainChanged => "chainChanged",
            Self::AccountsChanged => "accountsChanged",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for EvmEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, PartialEq)]
pub struct EvmWallet {
    provider: ffi::Eip1193Provider,
}

/// check if any EIP-1193 provider is injected, whichever wallet it is from
pub fn is_ethereum_available() -> bool {
    Detector::browser().is_ethereum_available()
}

/// check if the injected EIP-1193 provider is the Kaspa wallet's
pub fn is_kaspa_evm_available() -> bool {
    Detector::browser().is_kaspa_evm_available()
}

pub fn kaspa_evm_provider() -> Option<EvmWallet> {
    Detector::browser()
        .kaspa_evm_provider()
        .map(|provider| EvmWallet::new(provider.unchecked_into()))
}

/// wait for the wallet's EIP-1193 provider
///
/// See [`Detector::wait_for_kaspa_evm`] for the details.
pub async fn wait_for_kaspa_evm(timeout: Duration) -> Result<EvmWallet, DetectError> {
    let provider = Detector::browser().wait_for_kaspa_evm(timeout).await?;
    Ok(EvmWallet::new(provider.unchecked_into()))
}

/// parse a `0x` prefixed hexadecimal quantity
pub fn parse_quantity(quantity: &str) -> Option<u64> {
    let digits = quantity
        .strip_prefix("0x")
        .or_else(|| quantity.strip_prefix("0X"))?;
    u64::from_str_radix(digits, 16).ok()
}

fn serializer() -> serde_wasm_bindgen::Serializer {
    serde_wasm_bindgen::Serializer::json_compatible()
}

impl EvmWallet {
    pub fn new(provider: ffi::Eip1193Provider) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &ffi::Eip1193Provider {
        &self.provider
    }

    /// `true` if the provider identifies itself as the Kaspa wallet
    pub fn is_kaspa_wallet(&self) -> bool {
        self.provider.is_kaspa_wallet().unwrap_or(false)
    }

    /// `true` if the provider can service requests
    pub fn is_connected(&self) -> bool {
        self.provider.is_connected()
    }

    /// the chain id the provider last reported, may be stale
    pub fn connected_chain_id(&self) -> Option<String> {
        self.provider.chain_id()
    }

    pub fn selected_address(&self) -> Option<String> {
        self.provider.selected_address()
    }

    /// Send `{ method, params }` and returns the raw result.
    ///
    /// `params` is omitted if `undefined` or `null`.
    pub async fn request_raw(&self, method: &str, params: JsValue) -> Result<JsValue, ProviderError> {
        let args = js_sys::Object::new();
        let set = |key: &str, value: &JsValue| {
            js_sys::Reflect::set(&args, &JsValue::from_str(key), value).map_err(|error| {
                ProviderError::internal(format!("Couldn't build the request: {error:?}"))
            })
        };
        set("method", &JsValue::from_str(method))?;
        if !params.is_undefined() && !params.is_null() {
            set("params", &params)?;
        }

        self.provider
            .request(args.into())
            .await
            .map_err(ProviderError::from_js)
    }

    /// Send a request, encoding `params` and decoding the result with serde.
    ///
    /// ```no_run
    /// # async fn test(wallet: kaspa_connector::EvmWallet) -> anyhow::Result<()> {
    /// let block_number: String = wallet.request("eth_blockNumber", ()).await?;
    /// # Ok(()) }
    /// ```
    pub async fn request<R>(&self, method: &str, params: impl Serialize) -> Result<R, ProviderError>
    where
        R: DeserializeOwned,
    {
        let params = params.serialize(&serializer()).map_err(|error| {
            ProviderError::internal(format!("Couldn't encode the parameters of `{method}': {error}"))
        })?;
        let result = self.request_raw(method, params).await?;
        decode(result, "result")
    }

    /// prompt the user to expose their accounts to the page
    pub async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.request("eth_requestAccounts", ()).await
    }

    /// accounts already exposed to the page, no prompt
    pub async fn accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.request("eth_accounts", ()).await
    }

    pub async fn chain_id(&self) -> Result<u64, ProviderError> {
        let chain_id: String = self.request("eth_chainId", ()).await?;
        parse_quantity(&chain_id)
            .ok_or_else(|| ProviderError::internal(format!("Invalid chain id `{chain_id}'")))
    }

    /// legacy `enable()`, prefer [`EvmWallet::request_accounts`]
    pub async fn enable(&self) -> Result<Vec<String>, ProviderError> {
        let accounts = self.provider.enable().await.map_err(ProviderError::from_js)?;
        decode(accounts, "account list")
    }

    pub fn subscribe<F>(&self, event: EvmEvent, callback: F) -> Result<Subscription, ProviderError>
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
        let event = EvmEvent::AccountsChanged;
        self.subscribe(event, move |payload| {
            if let Some(accounts) = decode_payload(event.as_str(), payload) {
                callback(accounts)
            }
        })
    }

    /// the callback receives the new chain id, as an hexadecimal string
    pub fn on_chain_changed<F>(&self, mut callback: F) -> Result<Subscription, ProviderError>
    where
        F: FnMut(String) + 'static,
    {
        let event = EvmEvent::ChainChanged;
        self.subscribe(event, move |payload| {
            if let Some(chain_id) = decode_payload(event.as_str(), payload) {
                callback(chain_id)
            }
        })
    }
}
