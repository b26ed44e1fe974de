use anyhow::Context;
use clap::Parser;

use aqualog::cli::Cli;
use aqualog::{logging, storage};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .clone()
        .or_else(storage::default_data_dir)
        .context("unable to determine a data directory for this platform")?;

    let _guard = logging::init(&data_dir.join("logs"));

    aqualog::cli::run(&data_dir, cli.command).await
}
