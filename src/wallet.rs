//! Ethereum (L1) wallet
//!
//! Imports a secp256k1 private key and derives the Ethereum address used as
//! the Immutable X `ether_key`. Key generation and STARK (L2) keys are not
//! handled here.

use k256::ecdsa::SigningKey;
use sha3::{Digest, Keccak256};
use std::fmt;
use thiserror::Error;

/// Wallet errors
#[derive(Error, Debug)]
pub enum WalletError {
    /// Invalid address format or checksum
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid private key format or length
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),
}

/// Result type for wallet operations
pub type Result<T> = std::result::Result<T, WalletError>;

/// Wallet backed by a single private key
pub struct Wallet {
    signing_key: SigningKey,
    address: String,
}

impl Wallet {
    /// Import wallet from a hex private key, with or without `0x`
    pub fn from_private_key(private_key_hex: &str) -> Result<Self> {
        let private_key_hex = strip_hex_prefix(private_key_hex.trim());

        let private_key = hex::decode(private_key_hex)
            .map_err(|e| WalletError::InvalidPrivateKey(e.to_string()))?;

        if private_key.len() != 32 {
            return Err(WalletError::InvalidPrivateKey(
                "Private key must be 32 bytes".to_string(),
            ));
        }

        let signing_key = SigningKey::from_slice(&private_key)
            .map_err(|e| WalletError::InvalidPrivateKey(e.to_string()))?;
        let address = Self::address_from_key(&signing_key);

        Ok(Self {
            signing_key,
            address,
        })
    }

    /// Lowercase `0x`-prefixed Ethereum address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Uncompressed public key, hex-encoded with `0x`
    pub fn public_key_hex(&self) -> String {
        let point = self.signing_key.verifying_key().to_encoded_point(false);
        format!("0x{}", hex::encode(point.as_bytes()))
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// keccak256 of the uncompressed public key without its tag byte; the
    /// address is the last 20 bytes
    fn address_from_key(signing_key: &SigningKey) -> String {
        let point = signing_key.verifying_key().to_encoded_point(false);

        let mut hasher = Keccak256::new();
        hasher.update(&point.as_bytes()[1..]);
        let hash = hasher.finalize();

        format!("0x{}", hex::encode(&hash[hash.len() - 20..]))
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Validate an Ethereum address and return it lowercased
pub fn parse_address(address: &str) -> Result<String> {
    let trimmed = address.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| WalletError::InvalidAddress(format!("{address}: missing 0x prefix")))?;

    if body.len() != 40 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WalletError::InvalidAddress(format!(
            "{address}: expected 20 hex-encoded bytes"
        )));
    }

    Ok(format!("0x{}", body.to_ascii_lowercase()))
}

pub(crate) fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}
