//! Request bodies and the list envelope
//!
//! Response records other than the list envelope are kept as opaque
//! `serde_json::Value`s.

use crate::paginate::Page;
use crate::signing::Keccak256Hasher;
use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /v1/projects`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    /// Project name
    pub name: String,
    /// Company name
    pub company_name: String,
    /// Email of the company contact
    pub contact_email: String,
}

/// Body of `POST /v1/collections`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCollectionRequest {
    /// Address of the ERC721 contract
    pub contract_address: String,
    /// Collection name
    pub name: String,
    /// Public key of the contract owner
    pub owner_public_key: String,
    /// Numeric project ID
    pub project_id: u64,
    /// Base URL for token metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_api_url: Option<String>,
}

/// Metadata property type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MetadataType {
    /// Enumerated values
    Enum,
    /// Free text
    Text,
    /// True/false
    #[default]
    Boolean,
    /// Discrete numeric values
    Discrete,
    /// Continuous numeric values
    Continuous,
}

/// One property of a collection's metadata schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataField {
    /// Property name
    pub name: String,
    /// Property type
    #[serde(rename = "type")]
    pub field_type: MetadataType,
    /// Whether marketplaces may filter on this property
    pub filterable: bool,
}

/// Body of `POST /v1/collections/{address}/metadata-schema`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddMetadataSchemaRequest {
    /// Properties to add
    pub metadata: Vec<MetadataField>,
}

/// Body of `PATCH /v1/collections/{address}/metadata-schema/{name}`
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSchemaUpdate {
    /// New property name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New property type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<MetadataType>,
    /// New filterable flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filterable: Option<bool>,
}

impl MetadataSchemaUpdate {
    /// Whether the update changes nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.field_type.is_none() && self.filterable.is_none()
    }
}

/// A token to mint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintToken {
    /// Token ID, unique within the contract
    pub id: String,
    /// On-chain blueprint passed to the contract on withdrawal
    pub blueprint: String,
}

/// Tokens to mint for one recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintUser {
    /// Recipient address
    pub user: String,
    /// Tokens minted to the recipient
    pub tokens: Vec<MintToken>,
}

/// Body element of `POST /v2/mints`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRequest {
    /// Address of the ERC721 contract
    pub contract_address: String,
    /// Recipients and their tokens
    pub users: Vec<MintUser>,
    /// L1 signature over [`MintRequest::auth_payload`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_signature: Option<String>,
}

impl MintRequest {
    /// Single token for a single recipient
    pub fn single(contract_address: &str, user: &str, token: MintToken) -> Self {
        Self {
            contract_address: contract_address.to_string(),
            users: vec![MintUser {
                user: user.to_string(),
                tokens: vec![token],
            }],
            auth_signature: None,
        }
    }

    /// String the minter signs: `0x`-hex keccak256 of the compact JSON body
    /// without `auth_signature`
    pub fn auth_payload(&self) -> Result<String, serde_json::Error> {
        let unsigned = Self {
            auth_signature: None,
            ..self.clone()
        };
        let body = serde_json::to_string(&unsigned)?;
        Ok(Keccak256Hasher::hash_hex(body.as_bytes()))
    }
}

/// Body of `POST /v1/signable-registration-offchain`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignableRegistrationRequest {
    /// L1 address being registered
    pub ether_key: String,
    /// L2 public key being registered
    pub stark_key: String,
}

/// Response of `POST /v1/signable-registration-offchain`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignableRegistration {
    /// Message to sign with the L1 key
    pub signable_message: String,
    /// Hash to sign with the L2 key
    pub payload_hash: String,
}

/// Body of `POST /v1/users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    /// L1 signature over the signable message
    pub eth_signature: String,
    /// L1 address being registered
    pub ether_key: String,
    /// L2 signature over the payload hash
    pub stark_signature: String,
    /// L2 public key being registered
    pub stark_key: String,
}

/// Envelope returned by the list endpoints
///
/// Decoding is permissive: a missing `result` is an empty page, a missing
/// `remaining` means nothing remains, and `remaining` may be a boolean or
/// an integer.
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope<T> {
    /// Items of this page
    pub result: Option<Vec<T>>,
    /// Continuation token
    pub cursor: Option<String>,
    /// More items remain after this page
    #[serde(default, deserialize_with = "remaining_flag")]
    pub remaining: bool,
}

impl<T> From<ListEnvelope<T>> for Page<T> {
    fn from(envelope: ListEnvelope<T>) -> Self {
        let cursor = envelope.cursor.filter(|cursor| !cursor.is_empty());
        Page::new(envelope.result.unwrap_or_default(), cursor, envelope.remaining)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RemainingFlag {
    Bool(bool),
    Int(i64),
    Other(serde_json::Value),
}

fn remaining_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RemainingFlag>::deserialize(deserializer)? {
        Some(RemainingFlag::Bool(flag)) => flag,
        Some(RemainingFlag::Int(count)) => count != 0,
        Some(RemainingFlag::Other(_)) | None => false,
    })
}
