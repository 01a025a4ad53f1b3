use js_sys::Function;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// An [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193) provider, as
    /// found in `window.ethereum` or delivered by an EIP-6963 announcement.
    ///
    /// Any wallet may inject one; the Kaspa wallet's sets `isKaspaWallet`.
    #[derive(Clone, PartialEq)]
    pub type Eip1193Provider;

    /// `request({ method, params })`
    #[wasm_bindgen(method, catch)]
    pub async fn request(this: &Eip1193Provider, args: JsValue) -> Result<JsValue, JsValue>;

    /// legacy alias of `request({ method: "eth_requestAccounts" })`
    #[wasm_bindgen(method, catch)]
    pub async fn enable(this: &Eip1193Provider) -> Result<JsValue, JsValue>;

    /// legacy `send(method, params)`
    #[wasm_bindgen(method, catch)]
    pub async fn send(
        this: &Eip1193Provider,
        method: &str,
        params: JsValue,
    ) -> Result<JsValue, JsValue>;

    /// legacy callback based `sendAsync(payload, callback)`
    #[wasm_bindgen(method, catch, js_name = "sendAsync")]
    pub fn send_async(
        this: &Eip1193Provider,
        payload: JsValue,
        callback: &Function,
    ) -> Result<(), JsValue>;

    /// hexadecimal chain id, e.g. `"0x1"`, may change at any time
    #[wasm_bindgen(method, getter, js_name = "chainId")]
    pub fn chain_id(this: &Eip1193Provider) -> Option<String>;

    #[wasm_bindgen(method, getter, js_name = "selectedAddress")]
    pub fn selected_address(this: &Eip1193Provider) -> Option<String>;

    #[wasm_bindgen(method, js_name = "isConnected")]
    pub fn is_connected(this: &Eip1193Provider) -> bool;

    #[wasm_bindgen(method, getter, js_name = "isKaspaWallet")]
    pub fn is_kaspa_wallet(this: &Eip1193Provider) -> Option<bool>;

    #[wasm_bindgen(method, catch, js_name = "on")]
    pub fn on(this: &Eip1193Provider, event: &str, listener: &Function) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = "removeListener")]
    pub fn remove_listener(
        this: &Eip1193Provider,
        event: &str,
        listener: &Function,
    ) -> Result<(), JsValue>;
}
