use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use item_service::prelude::*;

/// In-memory item catalogue HTTP API
#[derive(Debug, Parser)]
#[command(name = "item-service")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the search path
    #[arg(short, long, env = "ITEMS_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Start with an empty store
    #[arg(long)]
    no_seed: bool,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        if let Some(port) = self.port {
            config.service.port = port;
        }
        if self.no_seed {
            config.items.seed_sample_data = false;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config().context("failed to load configuration")?;

    init_tracing(&config).context("failed to initialize tracing")?;

    let items = ItemService::new(ItemStore::new());
    if config.items.seed_sample_data {
        items
            .seed_sample_data()
            .context("failed to seed sample data")?;
    }

    let app = router(AppState::new(config.clone(), items));
    Server::new(config).serve(app).await?;

    shutdown_tracing();
    Ok(())
}
