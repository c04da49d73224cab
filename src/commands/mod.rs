//! Command handlers
//!
//! Each handler wires CLI options into [`ImxClient`] calls and prints the
//! outcome. Records go to stdout as pretty JSON; progress goes through
//! `tracing` to stderr.

pub mod listings;
pub mod mints;
pub mod projects;
pub mod users;

use crate::cli::{Cli, Command, ListArgs, SignerArgs};
use crate::client::{ClientConfig, ImxClient};
use crate::config::Network;
use crate::paginate::{FetchOptions, Paginator};
use crate::wallet::Wallet;
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

/// Run a parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    let network = cli.network;
    let client = client_for(network, cli.api_url.as_deref())?;
    info!(
        network = %network,
        chain_id = network.chain_id(),
        api = %client.config().base_url,
        "using network"
    );

    match cli.command {
        Command::Users { command } => users::run(&client, command).await,
        Command::Projects { command } => projects::run_projects(&client, command).await,
        Command::Collections { command } => projects::run_collections(&client, command).await,
        Command::Metadata { command } => projects::run_metadata(&client, command).await,
        Command::Mints { command } => mints::run(&client, command).await,
        Command::Orders { command } => listings::run_orders(&client, command).await,
        Command::Trades { command } => listings::run_trades(&client, command).await,
        Command::Assets { command } => listings::run_assets(&client, command).await,
        Command::Balances { command } => listings::run_balances(&client, command).await,
    }
}

/// Client for `network`, or for `api_url` when given
pub fn client_for(network: Network, api_url: Option<&str>) -> Result<ImxClient> {
    let mut config = ClientConfig::for_network(network);
    if let Some(api_url) = api_url {
        config.base_url = api_url.to_string();
    }
    ImxClient::with_config(config).with_context(|| format!("failed to create client for {network}"))
}

fn wallet_from(signer: &SignerArgs) -> Result<Wallet> {
    let wallet = Wallet::from_private_key(&signer.private_key).context("invalid --private-key")?;
    info!(address = wallet.address(), "loaded wallet");
    Ok(wallet)
}

fn paginator_for(list: &ListArgs) -> Paginator {
    Paginator::with_options(FetchOptions {
        max_pages: list.max_pages,
    })
}

/// Render a single record as `label` followed by pretty JSON
pub fn render_record(label: &str, record: &Value) -> Result<String> {
    Ok(format!("{label}:\n{}", serde_json::to_string_pretty(record)?))
}

/// Render a materialized list; `summary` keeps only the count line
pub fn render_list(label: &str, records: &[Value], summary: bool) -> Result<String> {
    let count = format!("{label}: {} record(s)", records.len());
    if summary {
        return Ok(count);
    }
    Ok(format!("{count}\n{}", serde_json::to_string_pretty(records)?))
}

fn print_record(label: &str, record: &Value) -> Result<()> {
    println!("{}", render_record(label, record)?);
    Ok(())
}

fn print_list(label: &str, records: &[Value], summary: bool) -> Result<()> {
    println!("{}", render_list(label, records, summary)?);
    Ok(())
}
