use clap::Parser;
use rota_core::RotaConfig;
use rota_store::SqliteStore;
use tracing::{info, warn};

mod cli;
mod commands;

use cli::Cli;
use commands::App;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // logs go to stderr so command output on stdout stays pipeable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rota_cli=info,rota_records=info,rota_store=info".into()),
        )
        .init();

    let cli = Cli::parse();

    // config: --config / ROTA_CONFIG > ~/.rota/rota.toml, then ROTA_* overrides
    let config = RotaConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!(code = e.code(), "Config load failed ({}), using defaults", e);
        RotaConfig::default()
    });

    let store = SqliteStore::open(&config.storage.path, config.storage.key.clone())?;
    info!(key = store.key(), "record store ready");

    let mut app = App::new(config, store);
    app.run(cli.command).await
}
