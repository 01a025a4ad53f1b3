/*!

# Kaspa Connector for injected wallet providers

This library is meant to be used by web applications (compiled to wasm) that
need to interact with the Kaspa wallet. The wallet injects two providers in
the page:

- `window.kaspa`: the L1 provider, see [`KaspaWallet`];
- `window.ethereum`: an EIP-1193 provider, see [`EvmWallet`].

The wallet may also inject the `window.kaspaWallet` [namespace].

## Usage

The providers may be injected after your code started. Check if they are
already there:

```no_run
use kaspa_connector::{is_kaspa_available, kaspa_provider};

if let Some(wallet) = kaspa_provider() {
    // ...
}
```

Or wait for them, for a bounded amount of time:

```no_run
# async fn test() -> anyhow::Result<()> {
use kaspa_connector::{DEFAULT_TIMEOUT, wait_for_kaspa_evm};

let wallet = wait_for_kaspa_evm(DEFAULT_TIMEOUT).await?;
let accounts = wallet.request_accounts().await?;
# Ok(()) }
```

The waits fail with [`DetectError::Timeout`] if nothing showed up and with
[`DetectError::InvalidAnnouncement`] if the wallet announced itself but the
provider is not usable. There is no retry: call them again if you want to.

The detection logic itself works on any [`host::Host`], the functions above
use the [`host::BrowserHost`] through a [`Detector`].

*/

mod config;
mod detect;
pub mod error;
mod evm;
pub mod ffi;
pub mod host;
pub mod kaspa;
pub mod shape;
mod subscription;
mod wallet;

pub use self::{
    config::{DEFAULT_TIMEOUT, DetectorConfig},
    detect::Detector,
    error::{DetectError, ProviderError, ProviderErrorCode},
    evm::{
        EvmEvent, EvmWallet, is_ethereum_available, is_kaspa_evm_available, kaspa_evm_provider,
        parse_quantity, wait_for_kaspa_evm,
    },
    kaspa::{Balance, KaspaEvent, NetworkId, SendOptions, Sompi},
    subscription::Subscription,
    wallet::{KaspaWallet, is_kaspa_available, kaspa_provider, namespace, wait_for_kaspa},
};
