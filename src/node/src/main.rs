//! Node daemon hosting the token ledger.

use anyhow::{Context, Result};
use coin_node::{
    config::NodeConfig,
    metrics::start_metrics_server,
    open_ledger,
    rpc::start_rpc_server,
    storage::SnapshotStore,
    NodeState,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Command line arguments for the node daemon.
#[derive(Debug, StructOpt)]
#[structopt(name = "coin-node", about = "SimpleCoin ledger node")]
struct Opt {
    /// Path to the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Path to the data directory
    #[structopt(short, long, parse(from_os_str))]
    data_dir: Option<PathBuf>,

    /// JSON-RPC server address
    #[structopt(long)]
    rpc_addr: Option<String>,

    /// Enable metrics server
    #[structopt(long)]
    metrics: bool,

    /// Metrics server address
    #[structopt(long)]
    metrics_addr: Option<String>,

    /// Owner address used when creating a new ledger
    #[structopt(long)]
    owner: Option<String>,

    /// Initial supply used when creating a new ledger
    #[structopt(long)]
    initial_supply: Option<String>,
}

impl Opt {
    /// Applies command line overrides on top of the loaded configuration.
    fn apply_to(self, config: &mut NodeConfig) {
        if let Some(dir) = self.data_dir {
            config.storage.data_dir = dir.to_string_lossy().to_string();
        }
        if let Some(addr) = self.rpc_addr {
            config.rpc.listen_addr = addr;
        }
        if self.metrics {
            config.metrics.enabled = true;
        }
        if let Some(addr) = self.metrics_addr {
            config.metrics.listen_addr = addr;
        }
        if let Some(owner) = self.owner {
            config.genesis.owner = owner;
        }
        if let Some(supply) = self.initial_supply {
            config.genesis.initial_supply = supply;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let opt = Opt::from_args();

    // Load configuration
    let mut config = match &opt.config {
        Some(path) => NodeConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => {
            let mut config = NodeConfig::default();
            if let Some(mut dir) = dirs::data_dir() {
                dir.push("simplecoin");
                config.storage.data_dir = dir.to_string_lossy().to_string();
            }
            config
        }
    };
    opt.apply_to(&mut config);

    let store = SnapshotStore::new(&config.storage.data_dir)?;
    let ledger = open_ledger(&config.genesis, &store)?;
    info!("Serving ledger owned by {}", ledger.owner());

    if config.metrics.enabled {
        let addr: SocketAddr = config
            .metrics
            .listen_addr
            .parse()
            .context("Invalid metrics address")?;
        start_metrics_server(addr).await?;
    }

    let rpc_addr: SocketAddr = config.rpc.listen_addr.parse().context("Invalid RPC address")?;
    start_rpc_server(rpc_addr, NodeState::new(ledger, store)).await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    Ok(())
}
