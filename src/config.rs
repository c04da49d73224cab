//! Immutable X network configuration
//!
//! Environments served by the Immutable X REST API:
//! - Mainnet: Ethereum mainnet (chain ID 1)
//! - Ropsten: legacy Ropsten testnet (chain ID 3)
//! - Sandbox: Goerli-backed sandbox (chain ID 5)

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable naming the default network
pub const NETWORK_ENV_VAR: &str = "ETH_NETWORK";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Network name not recognised
    #[error("Unknown network: {0} (expected mainnet, ropsten or sandbox)")]
    UnknownNetwork(String),
}

/// Immutable X mainnet configuration
pub struct ImxMainnet;

impl ImxMainnet {
    /// Ethereum chain ID backing this environment
    pub const CHAIN_ID: u64 = 1;

    /// REST API base URL
    pub const API_URL: &'static str = "https://api.x.immutable.com";

    /// Network name
    pub const NETWORK_NAME: &'static str = "mainnet";
}

/// Immutable X Ropsten configuration
pub struct ImxRopsten;

impl ImxRopsten {
    /// Ethereum chain ID backing this environment
    pub const CHAIN_ID: u64 = 3;

    /// REST API base URL
    pub const API_URL: &'static str = "https://api.ropsten.x.immutable.com";

    /// Network name
    pub const NETWORK_NAME: &'static str = "ropsten";
}

/// Immutable X sandbox configuration
pub struct ImxSandbox;

impl ImxSandbox {
    /// Ethereum chain ID backing this environment
    pub const CHAIN_ID: u64 = 5;

    /// REST API base URL
    pub const API_URL: &'static str = "https://api.sandbox.x.immutable.com";

    /// Network name
    pub const NETWORK_NAME: &'static str = "sandbox";
}

/// Network environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    /// Mainnet (chain ID 1)
    Mainnet,
    /// Ropsten (chain ID 3)
    Ropsten,
    /// Sandbox (chain ID 5)
    #[default]
    Sandbox,
}

impl Network {
    /// Get chain ID for this environment
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => ImxMainnet::CHAIN_ID,
            Network::Ropsten => ImxRopsten::CHAIN_ID,
            Network::Sandbox => ImxSandbox::CHAIN_ID,
        }
    }

    /// Get REST API base URL for this environment
    pub fn api_url(&self) -> &'static str {
        match self {
            Network::Mainnet => ImxMainnet::API_URL,
            Network::Ropsten => ImxRopsten::API_URL,
            Network::Sandbox => ImxSandbox::API_URL,
        }
    }

    /// Get network name for this environment
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => ImxMainnet::NETWORK_NAME,
            Network::Ropsten => ImxRopsten::NETWORK_NAME,
            Network::Sandbox => ImxSandbox::NETWORK_NAME,
        }
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "ropsten" => Ok(Network::Ropsten),
            // goerli is the L1 behind the sandbox
            "sandbox" | "goerli" => Ok(Network::Sandbox),
            _ => Err(ConfigError::UnknownNetwork(s.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_config() {
        assert_eq!(ImxMainnet::CHAIN_ID, 1);
        assert_eq!(Network::Mainnet.api_url(), "https://api.x.immutable.com");
    }

    #[test]
    fn test_network_chain_ids() {
        assert_eq!(Network::Mainnet.chain_id(), 1);
        assert_eq!(Network::Ropsten.chain_id(), 3);
        assert_eq!(Network::Sandbox.chain_id(), 5);
    }

    #[test]
    fn test_parse_network() {
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("Ropsten".parse::<Network>().unwrap(), Network::Ropsten);
        assert_eq!("goerli".parse::<Network>().unwrap(), Network::Sandbox);
        assert!(matches!(
            "rinkeby".parse::<Network>(),
            Err(ConfigError::UnknownNetwork(name)) if name == "rinkeby"
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for network in [Network::Mainnet, Network::Ropsten, Network::Sandbox] {
            assert_eq!(network.to_string().parse::<Network>().unwrap(), network);
        }
    }

    #[test]
    fn test_default_is_sandbox() {
        assert_eq!(Network::default(), Network::Sandbox);
    }
}
