//! L1 request signing
//!
//! Immutable X authenticates privileged requests with Ethereum
//! personal-sign signatures:
//! - `IMX-Signature`/`IMX-Timestamp` headers sign the unix timestamp
//! - mint requests sign the keccak256 digest of their JSON body
//! - registration signs the server-provided signable message
//!
//! Signatures are serialized as `0x` + r + s + recovery id (0 or 1).

use crate::wallet::{strip_hex_prefix, Wallet};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Header carrying the L1 signature
pub const IMX_SIGNATURE_HEADER: &str = "IMX-Signature";

/// Header carrying the signed timestamp
pub const IMX_TIMESTAMP_HEADER: &str = "IMX-Timestamp";

/// Cryptographic signing operation errors
#[derive(Error, Debug)]
pub enum SigningError {
    /// Signing operation failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Invalid signature format
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// System clock is before the unix epoch
    #[error("Invalid system time: {0}")]
    InvalidTime(String),
}

/// Result type for signing operations
pub type Result<T> = std::result::Result<T, SigningError>;

/// ECDSA signature with recovery information for public key recovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureWithRecovery {
    /// Signature bytes in (r, s) format (64 bytes for secp256k1)
    pub signature: Vec<u8>,
    /// Recovery ID (0-3) for public key recovery
    pub recovery_id: u8,
}

impl SignatureWithRecovery {
    /// Create a new signature with recovery
    pub fn new(signature: Vec<u8>, recovery_id: u8) -> Self {
        Self {
            signature,
            recovery_id,
        }
    }

    /// Get signature as `0x`-prefixed hex, recovery id as the last byte
    pub fn to_hex(&self) -> String {
        format!("0x{}{:02x}", hex::encode(&self.signature), self.recovery_id)
    }

    /// Parse from hex string
    ///
    /// Accepts a recovery byte of 0/1 or the legacy 27/28 form.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(strip_hex_prefix(hex_str))
            .map_err(|e| SigningError::InvalidSignature(e.to_string()))?;

        if bytes.len() != 65 {
            return Err(SigningError::InvalidSignature(format!(
                "expected 65 bytes, got {}",
                bytes.len()
            )));
        }

        let recovery_id = match bytes[64] {
            v @ 0..=3 => v,
            v @ 27..=30 => v - 27,
            v => {
                return Err(SigningError::InvalidSignature(format!(
                    "invalid recovery byte {v}"
                )))
            }
        };

        Ok(Self::new(bytes[..64].to_vec(), recovery_id))
    }
}

/// Keccak-256 hasher
pub struct Keccak256Hasher;

impl Keccak256Hasher {
    /// Hash data with keccak256
    pub fn hash(data: &[u8]) -> [u8; 32] {
        let mut hasher = Keccak256::new();
        hasher.update(data);
        digest_bytes(hasher)
    }

    /// Hash data and return `0x`-prefixed hex
    pub fn hash_hex(data: &[u8]) -> String {
        format!("0x{}", hex::encode(Self::hash(data)))
    }
}

/// Ethereum personal-sign message hashing
pub struct MessageSigner;

impl MessageSigner {
    /// Digest of `message` under the EIP-191 personal-sign prefix
    pub fn personal_message_hash(message: &[u8]) -> [u8; 32] {
        let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());

        let mut hasher = Keccak256::new();
        hasher.update(prefix.as_bytes());
        hasher.update(message);
        digest_bytes(hasher)
    }
}

fn digest_bytes(hasher: Keccak256) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Anything that can produce L1 personal-sign signatures
///
/// [`Wallet`] is the local implementation; remote signers can implement
/// this to keep private keys out of the process.
pub trait L1Signer: Send + Sync {
    /// Address whose key produces the signatures
    fn address(&self) -> &str;

    /// Personal-sign `message`
    fn sign_message(&self, message: &[u8]) -> Result<SignatureWithRecovery>;
}

impl L1Signer for Wallet {
    fn address(&self) -> &str {
        Wallet::address(self)
    }

    fn sign_message(&self, message: &[u8]) -> Result<SignatureWithRecovery> {
        let digest = MessageSigner::personal_message_hash(message);

        let (signature, recovery_id) = self
            .signing_key()
            .sign_prehash_recoverable(&digest)
            .map_err(|e| SigningError::SigningFailed(e.to_string()))?;

        Ok(SignatureWithRecovery::new(
            signature.to_bytes().to_vec(),
            recovery_id.to_byte(),
        ))
    }
}

/// Signed timestamp for the `IMX-Signature`/`IMX-Timestamp` headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImxAuth {
    /// Unix seconds as a decimal string
    pub timestamp: String,
    /// L1 signature over the timestamp string
    pub signature: String,
}

impl ImxAuth {
    /// Sign the current time
    pub fn sign_now<S: L1Signer + ?Sized>(signer: &S) -> Result<Self> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| SigningError::InvalidTime(e.to_string()))?;
        Self::sign_at(signer, now.as_secs())
    }

    /// Sign a specific unix timestamp
    pub fn sign_at<S: L1Signer + ?Sized>(signer: &S, unix_secs: u64) -> Result<Self> {
        let timestamp = unix_secs.to_string();
        let signature = signer.sign_message(timestamp.as_bytes())?.to_hex();
        Ok(Self {
            timestamp,
            signature,
        })
    }
}
