use std::time::Duration;

/// default bound of [`Detector::wait_for_kaspa`] and
/// [`Detector::wait_for_kaspa_evm`]
///
/// [`Detector::wait_for_kaspa`]: crate::Detector::wait_for_kaspa
/// [`Detector::wait_for_kaspa_evm`]: crate::Detector::wait_for_kaspa_evm
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Names of the global slots and events the wallet uses.
///
/// The defaults match what the Kaspa wallet injects. Every field may be
/// overridden, which is mostly useful for test pages and forks of the
/// wallet. The configuration can be deserialized from a (partial) JS object
/// with `serde-wasm-bindgen`:
///
/// ```no_run
/// # fn test(js_config: wasm_bindgen::JsValue) -> anyhow::Result<()> {
/// use kaspa_connector::DetectorConfig;
///
/// let config: DetectorConfig = serde_wasm_bindgen::from_value(js_config)
///     .map_err(|error| anyhow::anyhow!("{error}"))?;
/// # Ok(()) }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectorConfig {
    /// `window.kaspaWallet`
    pub namespace_slot: String,
    /// `window.kaspa`
    pub kaspa_slot: String,
    /// `window.ethereum`
    pub ethereum_slot: String,
    /// flag set to `true` on the EIP-1193 provider injected by the wallet
    pub wallet_flag: String,
    /// reverse DNS the wallet announces itself with (EIP-6963)
    pub rdns: String,
    pub kaspa_initialized_event: String,
    pub ready_event: String,
    pub ethereum_initialized_event: String,
    pub announce_event: String,
    pub request_event: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            namespace_slot: "kaspaWallet".to_owned(),
            kaspa_slot: "kaspa".to_owned(),
            ethereum_slot: "ethereum".to_owned(),
            wallet_flag: "isKaspaWallet".to_owned(),
            rdns: "org.kaspa.wallet".to_owned(),
            kaspa_initialized_event: "kaspa#initialized".to_owned(),
            ready_event: "kaspaWallet#ready".to_owned(),
            ethereum_initialized_event: "ethereum#initialized".to_owned(),
            announce_event: "eip6963:announceProvider".to_owned(),
            request_event: "eip6963:requestProvider".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_config_json() {
        let config = serde_json::from_value::<DetectorConfig>(json! { {
            "kaspaSlot": "kaspaDev",
            "rdns": "org.kaspa.wallet.dev",
        }})
        .unwrap();

        assert_eq!(config.kaspa_slot, "kaspaDev");
        assert_eq!(config.rdns, "org.kaspa.wallet.dev");
        assert_eq!(config.ethereum_slot, "ethereum");
        assert_eq!(config.announce_event, "eip6963:announceProvider");
    }

    #[test]
    fn empty_config_json() {
        assert_eq!(
            serde_json::from_value::<DetectorConfig>(json! { {} }).unwrap(),
            DetectorConfig::default()
        );
    }
}
