mod app;
mod client;
mod config;
mod error;
mod memory;
mod ui;

use std::{fs::OpenOptions, sync::Mutex};

use crate::{
    app::App,
    client::Client,
    config::AppConfig,
    error::Result,
    memory::MemoryLedger,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(&config)?;

    if config.uses_remote_ledger() {
        let client = Client::new(&config.base_url)?;
        let source = config.base_url.clone();
        tracing::info!("using ledger service at {source}");
        App::new(config, client, source)?.run().await?;
    } else {
        let ledger = MemoryLedger::load(&config.data_file)?;
        let source = format!("memory ({})", config.data_file);
        App::new(config, ledger, source)?.run().await?;
    }
    Ok(())
}

/// Logs go to a file; stdout belongs to the terminal UI.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "trackspend_tui={level},ledger_view={level}",
            level = config.log_level
        ))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
