//! # Immutable X toolkit
//!
//! Rust client and command-line toolkit for the Immutable X REST API.
//!
//! This crate provides:
//! - Exhaustive cursor pagination over list endpoints
//! - Async REST client with retry for queries and signed requests
//! - L1 (Ethereum personal-sign) request signing
//! - The `imx` command-line interface

#![warn(missing_docs, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod paginate;
pub mod signing;
pub mod types;
pub mod wallet;

pub use client::{ClientConfig, ClientError, ImxClient, ListEndpoint, Result as ClientResult};
pub use config::{ConfigError, ImxMainnet, ImxRopsten, ImxSandbox, Network};
pub use paginate::{
    fetch_all, FetchOptions, Page, PageRequest, PageSource, PaginateError, Paginator,
};
pub use signing::{
    ImxAuth, Keccak256Hasher, L1Signer, MessageSigner, SignatureWithRecovery, SigningError,
    Result as SigningResult,
};
pub use types::{
    AddMetadataSchemaRequest, CreateCollectionRequest, CreateProjectRequest, ListEnvelope,
    MetadataField, MetadataSchemaUpdate, MetadataType, MintRequest, MintToken, MintUser,
    RegisterUserRequest, SignableRegistration, SignableRegistrationRequest,
};
pub use wallet::{Wallet, WalletError, Result as WalletResult};
