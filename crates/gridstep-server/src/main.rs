//! gridstep - stepwise grid search server
//!
//! Usage:
//!   gridstep [--config <path>] [--bind <addr>] [--max-grid-size <n>]

use std::path::PathBuf;

use clap::Parser;
use gridstep_server::{Result, Server, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "gridstep", version, about = "Stepwise grid search server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overriding the configuration file
    #[arg(short, long)]
    bind: Option<String>,

    /// Largest grid side accepted, overriding the configuration file
    #[arg(long)]
    max_grid_size: Option<i32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            log::info!("Using config: {}", path.display());
            ServerConfig::load(path)?
        }
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.network.bind_address = bind;
    }
    if let Some(max) = args.max_grid_size {
        config.limits.max_grid_size = max;
    }
    config.validate()?;

    log::info!(
        "gridstep v{} starting (max grid {}x{})",
        env!("CARGO_PKG_VERSION"),
        config.limits.max_grid_size,
        config.limits.max_grid_size
    );

    let server = Server::bind(&config)?;
    let addr = server.local_addr()?;
    server.run().map_err(|e| {
        log::error!("server on {} failed: {}", addr, e);
        e
    })?;

    log::info!("gridstep stopped");
    Ok(())
}
