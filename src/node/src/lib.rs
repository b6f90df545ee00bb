//! Node daemon hosting the token ledger.

pub mod config;
pub mod errors;
pub mod metrics;
pub mod rpc;
pub mod storage;

use coin_core::{parse_amount, Address, LedgerMsg, SharedLedger, TokenLedger};
use config::GenesisConfig;
use errors::NodeError;
use storage::SnapshotStore;
use tracing::{debug, info, warn};

/// State shared by every request the node serves.
#[derive(Clone, Debug)]
pub struct NodeState {
    /// The ledger
    pub ledger: SharedLedger,
    /// Where every successful mutation is persisted
    pub store: SnapshotStore,
}

impl NodeState {
    /// Creates the node state from an already opened ledger and store.
    pub fn new(ledger: SharedLedger, store: SnapshotStore) -> Self {
        Self { ledger, store }
    }
}

/// Opens the ledger: restores the stored snapshot if there is one, otherwise
/// constructs a new ledger from `genesis` and persists it.
pub fn open_ledger(genesis: &GenesisConfig, store: &SnapshotStore) -> Result<SharedLedger, NodeError> {
    if let Some(snapshot) = store.load()? {
        let ledger = TokenLedger::restore(snapshot)?;
        info!(
            "Ledger restored from {}: owner {}, total supply {}",
            store.path().display(),
            ledger.owner(),
            ledger.total_supply()
        );
        metrics::TOTAL_SUPPLY.set(ledger.total_supply() as f64);
        return Ok(SharedLedger::new(ledger));
    }

    let owner = genesis.owner.parse::<Address>()?;
    let initial_supply = parse_amount(&genesis.initial_supply)?;
    let ledger = TokenLedger::new(owner, initial_supply);
    store.save(&ledger.snapshot())?;
    metrics::TOTAL_SUPPLY.set(ledger.total_supply() as f64);

    Ok(SharedLedger::new(ledger))
}

/// Handles a ledger message: applies it, persists the result and records
/// metrics.
///
/// The mutation only becomes visible once the snapshot is on disk; if either
/// step fails the ledger is unchanged.
pub fn handle_msg(msg: &LedgerMsg, state: &NodeState) -> Result<(), NodeError> {
    debug!("Received {}", msg);
    let op = msg.name();
    let timer = metrics::OPERATION_TIME.with_label_values(&[op]).start_timer();

    // The supply gauge is set under the write lock so it tracks commit order
    let result = state.ledger.apply_with(msg, |snapshot| {
        state.store.save(snapshot)?;
        metrics::TOTAL_SUPPLY.set(snapshot.total_supply as f64);
        Ok(())
    });
    timer.observe_duration();

    match result {
        Ok(()) => {
            metrics::OPERATION_COUNTER.with_label_values(&[op]).inc();
            info!("Applied {}", msg);
            Ok(())
        }
        Err(e) => {
            let kind = match &e {
                NodeError::CoreError(core) => core.kind(),
                _ => "Internal",
            };
            metrics::REJECTION_COUNTER.with_label_values(&[op, kind]).inc();
            warn!("Rejected {}: {}", msg, e);
            Err(e)
        }
    }
}
