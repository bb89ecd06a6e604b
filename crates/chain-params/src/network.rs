//! Network identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Network profile identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// Production network
    Mainnet,
    /// Public test network
    Testnet,
    /// Regression test (local development)
    Regtest,
}

impl NetworkId {
    /// All built-in networks
    pub const ALL: [NetworkId; 3] = [NetworkId::Mainnet, NetworkId::Testnet, NetworkId::Regtest];

    /// Canonical name
    pub const fn as_str(&self) -> &'static str {
        match self {
            NetworkId::Mainnet => "mainnet",
            NetworkId::Testnet => "testnet",
            NetworkId::Regtest => "regtest",
        }
    }

    /// Check if this is the production network
    pub const fn is_mainnet(&self) -> bool {
        matches!(self, NetworkId::Mainnet)
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown network name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid network: {0}")]
pub struct UnknownNetwork(pub String);

impl FromStr for NetworkId {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(NetworkId::Mainnet),
            "testnet" | "test" => Ok(NetworkId::Testnet),
            "regtest" => Ok(NetworkId::Regtest),
            _ => Err(UnknownNetwork(s.to_string())),
        }
    }
}
