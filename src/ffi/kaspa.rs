use js_sys::Function;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// The L1 provider injected by the wallet as `window.kaspa`.
    ///
    /// Every promise rejects with `{ code, message }` when the wallet (or its
    /// user) refuses the request.
    #[derive(Clone, PartialEq)]
    pub type KaspaProvider;

    /// Ask the user to connect the wallet to the page. Resolves with the
    /// list of addresses the page is allowed to see.
    #[wasm_bindgen(method, catch, js_name = "requestAccounts")]
    pub async fn request_accounts(this: &KaspaProvider) -> Result<JsValue, JsValue>;

    /// Same as `requestAccounts` without prompting: resolves with an empty
    /// list if the page is not connected yet.
    #[wasm_bindgen(method, catch, js_name = "getAccounts")]
    pub async fn get_accounts(this: &KaspaProvider) -> Result<JsValue, JsValue>;

    /// `{ confirmed, unconfirmed, total }` in sompi
    #[wasm_bindgen(method, catch, js_name = "getBalance")]
    pub async fn get_balance(this: &KaspaProvider) -> Result<JsValue, JsValue>;

    /// network name, e.g. `"mainnet"` or `"testnet-10"`
    #[wasm_bindgen(method, catch, js_name = "getNetwork")]
    pub async fn get_network(this: &KaspaProvider) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = "switchNetwork")]
    pub async fn switch_network(this: &KaspaProvider, network: &str) -> Result<JsValue, JsValue>;

    /// Build, sign and broadcast a transfer of `sompi` to `to`. Resolves
    /// with the transaction id.
    ///
    /// `options` is `undefined` or `{ priorityFee }`.
    #[wasm_bindgen(method, catch, js_name = "sendKaspa")]
    pub async fn send_kaspa(
        this: &KaspaProvider,
        to: &str,
        sompi: f64,
        options: JsValue,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = "signMessage")]
    pub async fn sign_message(this: &KaspaProvider, message: &str) -> Result<JsValue, JsValue>;

    /// Not implemented by the current versions of the wallet, expect the
    /// promise to reject.
    #[wasm_bindgen(method, catch, js_name = "signPskt")]
    pub async fn sign_pskt(this: &KaspaProvider, pskt: &str) -> Result<JsValue, JsValue>;

    /// broadcast an already signed transaction, resolves with its id
    #[wasm_bindgen(method, catch, js_name = "pushTx")]
    pub async fn push_tx(this: &KaspaProvider, raw_tx: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = "on")]
    pub fn on(this: &KaspaProvider, event: &str, listener: &Function) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = "removeListener")]
    pub fn remove_listener(
        this: &KaspaProvider,
        event: &str,
        listener: &Function,
    ) -> Result<(), JsValue>;
}

#[wasm_bindgen]
extern "C" {
    /// The `window.kaspaWallet` namespace. Its presence means the page runs
    /// inside the wallet's host application.
    #[derive(Clone, PartialEq)]
    pub type KaspaNamespace;

    #[wasm_bindgen(method, getter)]
    pub fn version(this: &KaspaNamespace) -> Option<String>;

    /// same object as `window.kaspa`, when injected
    #[wasm_bindgen(method, getter)]
    pub fn provider(this: &KaspaNamespace) -> Option<KaspaProvider>;
}
