use core::{fmt, str::FromStr};

/// Smallest unit of Kaspa, 1 KAS is 100_000_000 sompi.
pub type Sompi = u64;

pub const SOMPI_PER_KASPA: Sompi = 100_000_000;

/// Largest amount that survives the trip through a JS number untouched.
pub const MAX_SAFE_SOMPI: Sompi = (1 << 53) - 1;

/// Balance of the connected account, as returned by `getBalance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Deserialize)]
pub struct Balance {
    pub confirmed: Sompi,
    pub unconfirmed: Sompi,
    pub total: Sompi,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum NetworkId {
    Mainnet,
    Testnet10,
    Testnet11,
    Devnet,
    Unknown(String),
}

impl NetworkId {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet10 => "testnet-10",
            Self::Testnet11 => "testnet-11",
            Self::Devnet => "devnet",
            Self::Unknown(name) => name,
        }
    }

    pub fn is_mainnet(&self) -> bool {
        matches!(self, Self::Mainnet)
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // wallets are not consistent with the `kaspa-` prefix nor the case
        let normalized = s.trim().to_ascii_lowercase();
        let normalized = normalized
            .strip_prefix("kaspa-")
            .unwrap_or(normalized.as_str());
        Ok(match normalized {
            "mainnet" => Self::Mainnet,
            "testnet-10" => Self::Testnet10,
            "testnet-11" => Self::Testnet11,
            "devnet" => Self::Devnet,
            _ => Self::Unknown(s.to_owned()),
        })
    }
}

/// Optional parameters of [`KaspaWallet::send_kaspa`].
///
/// [`KaspaWallet::send_kaspa`]: crate::KaspaWallet::send_kaspa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_fee: Option<Sompi>,
}

impl SendOptions {
    pub fn is_empty(&self) -> bool {
        self.priority_fee.is_none()
    }
}

/// Events emitted by the L1 provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KaspaEvent {
    /// the list of accounts exposed to the page changed
    AccountsChanged,
    NetworkChanged,
    BalanceChanged,
    Disconnect,
}

impl KaspaEvent {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccountsChanged => "accountsChanged",
            Self::NetworkChanged => "networkChanged",
            Self::BalanceChanged => "balanceChanged",
            Self::Disconnect => "disconnect",
        }
    }
}

impl fmt::Display for KaspaEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
