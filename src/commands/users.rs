//! User registration and lookup
//!
//! Registration needs an L2 (STARK) signature over the payload hash the API
//! returns. That signature is produced outside this tool: run `register`
//! once without `--stark-signature` to obtain the hash, sign it, then run
//! it again with the signature.

use super::{print_record, wallet_from};
use crate::cli::UsersCommand;
use crate::client::{ClientError, ImxClient};
use crate::signing::L1Signer;
use crate::types::{RegisterUserRequest, SignableRegistration, SignableRegistrationRequest};
use crate::wallet::parse_address;
use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::info;

/// Look up a user, mapping "not registered" to `None`
pub async fn find_user(client: &ImxClient, address: &str) -> Result<Option<Value>> {
    match client.get_user(address).await {
        Ok(user) => Ok(Some(user)),
        Err(ClientError::NotFound(_)) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to look up user {address}")),
    }
}

/// Build the registration body from a signable registration
pub fn registration_request<S: L1Signer + ?Sized>(
    signer: &S,
    signable: &SignableRegistration,
    stark_key: &str,
    stark_signature: &str,
) -> Result<RegisterUserRequest> {
    let eth_signature = signer
        .sign_message(signable.signable_message.as_bytes())?
        .to_hex();

    Ok(RegisterUserRequest {
        eth_signature,
        ether_key: signer.address().to_string(),
        stark_signature: stark_signature.to_string(),
        stark_key: stark_key.to_string(),
    })
}

/// Run an `imx users` action
pub async fn run(client: &ImxClient, command: UsersCommand) -> Result<()> {
    match command {
        UsersCommand::Register {
            signer,
            stark_key,
            stark_signature,
        } => {
            let wallet = wallet_from(&signer)?;

            if let Some(existing) = find_user(client, wallet.address()).await? {
                println!("User already exists {}", wallet.address());
                return print_record("existing user", &existing);
            }

            let signable = client
                .get_signable_registration(&SignableRegistrationRequest {
                    ether_key: wallet.address().to_string(),
                    stark_key: stark_key.clone(),
                })
                .await
                .context("failed to get signable registration")?;

            let Some(stark_signature) = stark_signature else {
                println!("payload hash: {}", signable.payload_hash);
                bail!(
                    "--stark-signature is required: sign payload hash {} with the STARK key",
                    signable.payload_hash
                );
            };

            let request = registration_request(&wallet, &signable, &stark_key, &stark_signature)?;
            info!(address = wallet.address(), "registering user");

            let registered = client
                .register_user(&request)
                .await
                .context("failed to register user")?;
            println!("User has been created {}", wallet.address());
            print_record("new user", &registered)
        }
        UsersCommand::Get { address } => {
            let address = parse_address(&address)?;
            match find_user(client, &address).await? {
                Some(user) => print_record("user details", &user),
                None => bail!("user {address} is not registered"),
            }
        }
    }
}
