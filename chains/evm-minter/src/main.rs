use anyhow::Result;
use clap::Parser;
use core_logic::{setup_logger, KeyStore, MintConfig, TracingLog, WorkerRunner};
use evm_minter::{EthersChainClient, Minter};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.json")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = setup_logger();

    let args = Args::parse();
    info!("Loading config from: {}", args.config);

    let config = match MintConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return Err(e.into());
        }
    };

    let keys = KeyStore::load(&config.private_key_file_path).map_err(|e| {
        error!("Failed to load private keys: {}", e);
        e
    })?;
    let wallets = keys.reorder(&config.order).map_err(|e| {
        error!("Invalid wallet order: {}", e);
        e
    })?;

    if wallets.is_empty() {
        warn!("Wallet order is empty, nothing to do.");
        return Ok(());
    }
    info!(
        "Loaded {} keys, {} wallets queued.",
        keys.len(),
        wallets.len()
    );

    let client = EthersChainClient::connect(&config).await.map_err(|e| {
        error!("Failed to connect: {}", e);
        e
    })?;

    WorkerRunner::run(move |token| async move {
        let mut minter = Minter::new(client, &config, Arc::new(TracingLog), token);
        minter.run(&wallets).await
    })
    .await;

    Ok(())
}
