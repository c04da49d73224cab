//! Minting

use super::{print_record, wallet_from};
use crate::cli::MintsCommand;
use crate::client::ImxClient;
use crate::signing::L1Signer;
use crate::types::{MintRequest, MintToken};
use anyhow::{Context, Result};
use rand::Rng;
use tracing::info;

/// Upper bound of generated token IDs
pub const MAX_RANDOM_TOKEN_ID: u64 = 1_000_000_000;

/// Random token ID in `1..=MAX_RANDOM_TOKEN_ID`
pub fn random_token_id() -> String {
    rand::thread_rng()
        .gen_range(1..=MAX_RANDOM_TOKEN_ID)
        .to_string()
}

/// Build a mint request and sign it with `signer`
pub fn signed_mint_request<S: L1Signer + ?Sized>(
    signer: &S,
    contract_address: &str,
    token: MintToken,
) -> Result<MintRequest> {
    let mut request = MintRequest::single(contract_address, signer.address(), token);
    let payload = request.auth_payload()?;
    request.auth_signature = Some(signer.sign_message(payload.as_bytes())?.to_hex());
    Ok(request)
}

/// Run an `imx mints` action
pub async fn run(client: &ImxClient, command: MintsCommand) -> Result<()> {
    match command {
        MintsCommand::Create {
            signer,
            contract_address,
            blueprint,
            token_id,
        } => {
            let wallet = wallet_from(&signer)?;
            let token = MintToken {
                id: token_id.unwrap_or_else(random_token_id),
                blueprint,
            };
            info!(contract = %contract_address, token_id = %token.id, "minting");

            let request = signed_mint_request(&wallet, &contract_address, token)?;
            let minted = client
                .mint(&request)
                .await
                .context("mint request failed")?;

            println!("Mint completed:");
            print_record("mint", &minted)
        }
        MintsCommand::Get { id } => {
            let mint = client
                .get_mint(&id)
                .await
                .with_context(|| format!("failed to fetch mint {id}"))?;
            print_record("mint details", &mint)
        }
    }
}
