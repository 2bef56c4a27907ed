use anyhow::Result;
use clap::Parser;
use duit::cli::Cli;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("duit=warn".parse()?);
    fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    cli.run().await
}
