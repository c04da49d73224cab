//! Order, trade, asset and balance queries

use super::{paginator_for, print_list, print_record};
use crate::cli::{AssetsCommand, BalancesCommand, ListArgs, OrdersCommand, TradesCommand};
use crate::client::{ImxClient, ListEndpoint};
use crate::wallet::parse_address;
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

/// Orders and trades are listed oldest first
pub const CREATED_AT: &str = "created_at";

/// Assets are listed by last update
pub const UPDATED_AT: &str = "updated_at";

async fn fetch_every(endpoint: &ListEndpoint<'_>, order_by: &str, list: &ListArgs) -> Result<Vec<Value>> {
    let records = paginator_for(list)
        .fetch_all(endpoint, order_by)
        .await
        .with_context(|| format!("failed to list {}", endpoint.path()))?;
    info!(path = endpoint.path(), count = records.len(), "listing complete");
    Ok(records)
}

/// Run an `imx orders` action
pub async fn run_orders(client: &ImxClient, command: OrdersCommand) -> Result<()> {
    match command {
        OrdersCommand::Get { id: Some(id), .. } => {
            let order = client
                .get_order(&id)
                .await
                .with_context(|| format!("failed to fetch order {id}"))?;
            print_record("order details", &order)
        }
        OrdersCommand::Get { id: None, list } => {
            let orders = fetch_every(&client.orders(), CREATED_AT, &list).await?;
            print_list("orders list", &orders, list.summary)
        }
    }
}

/// Run an `imx trades` action
pub async fn run_trades(client: &ImxClient, command: TradesCommand) -> Result<()> {
    match command {
        TradesCommand::Get { id: Some(id), .. } => {
            let trade = client
                .get_trade(&id)
                .await
                .with_context(|| format!("failed to fetch trade {id}"))?;
            print_record("trade details", &trade)
        }
        TradesCommand::Get { id: None, list } => {
            let trades = fetch_every(&client.trades(), CREATED_AT, &list).await?;
            print_list("trades list", &trades, list.summary)
        }
    }
}

/// Run an `imx assets` action
pub async fn run_assets(client: &ImxClient, command: AssetsCommand) -> Result<()> {
    match command {
        AssetsCommand::List { address, list } => {
            let address = parse_address(&address)?;
            let assets = fetch_every(&client.assets(&address), UPDATED_AT, &list).await?;
            if assets.is_empty() {
                println!("User has no assets.");
                return Ok(());
            }
            print_list("assets", &assets, list.summary)
        }
    }
}

/// Run an `imx balances` action
pub async fn run_balances(client: &ImxClient, command: BalancesCommand) -> Result<()> {
    match command {
        BalancesCommand::Get {
            address,
            token: Some(token),
            ..
        } => {
            let address = parse_address(&address)?;
            let balance = client
                .get_balance(&address, &token)
                .await
                .with_context(|| format!("failed to fetch {token} balance of {address}"))?;
            print_record("balance", &balance)
        }
        BalancesCommand::Get {
            address,
            token: None,
            list,
        } => {
            let address = parse_address(&address)?;
            // balances have no meaningful ordering key; let the server decide
            let balances = fetch_every(&client.balances(&address), "", &list).await?;
            print_list("balances", &balances, list.summary)
        }
    }
}
