//! On-disk persistence of the ledger state.

use crate::errors::NodeError;
use coin_core::snapshot::LedgerSnapshot;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const SNAPSHOT_FILE: &str = "ledger.bin";
const SNAPSHOT_TMP_FILE: &str = "ledger.bin.tmp";

/// Stores the latest ledger snapshot in a data directory.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    /// The data directory
    dir: PathBuf,
}

impl SnapshotStore {
    /// Opens a store in `dir`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, NodeError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            NodeError::StorageError(format!("Failed to create {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    /// Writes a snapshot, replacing the previous one.
    ///
    /// The bytes go to a temporary file first and are renamed into place, so a
    /// crash mid-write leaves the previous snapshot intact.
    pub fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), NodeError> {
        let bytes = snapshot.to_bytes()?;
        let tmp = self.dir.join(SNAPSHOT_TMP_FILE);

        fs::write(&tmp, &bytes)
            .map_err(|e| NodeError::StorageError(format!("Failed to write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, self.path())
            .map_err(|e| NodeError::StorageError(format!("Failed to replace snapshot: {}", e)))?;

        debug!("Saved snapshot ({} bytes) to {}", bytes.len(), self.path().display());
        Ok(())
    }

    /// Reads the snapshot, or `None` if none was ever written.
    pub fn load(&self) -> Result<Option<LedgerSnapshot>, NodeError> {
        let bytes = match fs::read(self.path()) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(NodeError::StorageError(format!(
                    "Failed to read {}: {}",
                    self.path().display(),
                    e
                )))
            }
        };

        Ok(Some(LedgerSnapshot::from_bytes(&bytes)?))
    }
}
