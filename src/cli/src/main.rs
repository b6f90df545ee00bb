//! CLI wallet for the SimpleCoin ledger node.

use anyhow::Result;
use coin_cli::commands::{authorize, mint, query, resolve_caller, send, transfer_from};
use coin_cli::{RpcClient, WalletConfig};
use colored::Colorize;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Command line arguments for the CLI wallet.
#[derive(Debug, StructOpt)]
#[structopt(name = "coin", about = "SimpleCoin ledger wallet")]
struct Opt {
    /// Path to the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Node to connect to
    #[structopt(short, long)]
    node: Option<String>,

    /// Calling account (defaults to the configured account)
    #[structopt(short, long)]
    from: Option<String>,

    /// Subcommand to run
    #[structopt(subcommand)]
    cmd: Command,
}

/// Subcommands for the CLI wallet.
#[derive(Debug, StructOpt)]
enum Command {
    /// Show the ledger owner
    #[structopt(name = "owner")]
    Owner,

    /// Show the total supply
    #[structopt(name = "total-supply")]
    TotalSupply,

    /// Get the balance of an account (defaults to the calling account)
    #[structopt(name = "balance")]
    Balance {
        /// Account address
        #[structopt(long)]
        account: Option<String>,
    },

    /// Get how much a spender may still move out of an owner's balance
    #[structopt(name = "allowance")]
    Allowance {
        /// Funds holder address
        #[structopt(long)]
        owner: String,

        /// Spender address
        #[structopt(long)]
        spender: String,
    },

    /// Mint new tokens (owner only)
    #[structopt(name = "mint")]
    Mint {
        /// Recipient address
        #[structopt(long)]
        to: String,

        /// Amount to mint
        #[structopt(long)]
        amount: String,
    },

    /// Send tokens to another account
    #[structopt(name = "send")]
    Send {
        /// Recipient address
        #[structopt(long)]
        to: String,

        /// Amount to send
        #[structopt(long)]
        amount: String,
    },

    /// Set how much a spender may move out of the calling account
    #[structopt(name = "authorize")]
    Authorize {
        /// Spender address
        #[structopt(long)]
        spender: String,

        /// Allowance, replacing any previous one
        #[structopt(long)]
        amount: String,
    },

    /// Spend from another account's balance on an allowance
    #[structopt(name = "transfer-from")]
    TransferFrom {
        /// Funds holder address
        #[structopt(long)]
        owner: String,

        /// Recipient address
        #[structopt(long)]
        to: String,

        /// Amount to transfer
        #[structopt(long)]
        amount: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let opt = Opt::from_args();

    // Load configuration
    let mut config = match opt.config.clone().or_else(WalletConfig::default_path) {
        Some(path) if path.exists() => WalletConfig::from_file(&path)?,
        _ => WalletConfig::default(),
    };

    // Override node if specified
    if let Some(node) = opt.node {
        config.node = node;
    }

    let client = RpcClient::new(&config.node);
    let from = opt.from.as_deref();

    match opt.cmd {
        Command::Owner => {
            let owner = query::owner(&client).await?;
            println!("{} {}", "Owner:".green(), owner);
        }
        Command::TotalSupply => {
            let supply = query::total_supply(&client).await?;
            println!("{} {}", "Total supply:".green(), supply);
        }
        Command::Balance { account } => {
            let account = match account {
                Some(account) => account,
                None => resolve_caller(&config, from)?.to_string(),
            };
            let balance = query::balance(&client, &account).await?;
            println!("{} {}", "Balance:".green(), balance);
        }
        Command::Allowance { owner, spender } => {
            let allowance = query::allowance(&client, &owner, &spender).await?;
            println!("{} {}", "Allowance:".green(), allowance);
        }
        Command::Mint { to, amount } => {
            let caller = resolve_caller(&config, from)?;
            mint::run(&client, &caller, &to, &amount).await?;
            println!("{} {} to {}", "Minted".green(), amount, to);
        }
        Command::Send { to, amount } => {
            let caller = resolve_caller(&config, from)?;
            send::run(&client, &caller, &to, &amount).await?;
            println!("{} {} to {}", "Sent".green(), amount, to);
        }
        Command::Authorize { spender, amount } => {
            let caller = resolve_caller(&config, from)?;
            authorize::run(&client, &caller, &spender, &amount).await?;
            println!("{} {} for {}", "Authorized".green(), spender, amount);
        }
        Command::TransferFrom { owner, to, amount } => {
            let caller = resolve_caller(&config, from)?;
            transfer_from::run(&client, &caller, &owner, &to, &amount).await?;
            println!("{} {} from {} to {}", "Transferred".green(), amount, owner, to);
        }
    }

    Ok(())
}
