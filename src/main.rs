use anyhow::Result;
use clap::Parser;
use imx_toolkit::cli::Cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before parsing so env-backed flags see it
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    imx_toolkit::commands::run(cli).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
