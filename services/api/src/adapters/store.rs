//! services/api/src/adapters/store.rs
//!
//! This module contains the adapter for the persisted session snapshot.
//! It implements the `SnapshotStore` port from the `core` crate as a single
//! JSON file, fully overwritten on every save.

use async_trait::async_trait;
use coach_core::domain::{SessionSnapshot, SNAPSHOT_VERSION};
use coach_core::ports::{PortError, PortResult, SnapshotStore};
use std::path::PathBuf;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that persists the session snapshot to one JSON file on disk.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a new `JsonFileStore`, creating parent directories as needed.
    pub fn new(path: PathBuf) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    fn temp_path(&self) -> PathBuf {
        let mut path = self.path.clone();
        path.set_extension("json.tmp");
        path
    }
}

//=========================================================================================
// `SnapshotStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl SnapshotStore for JsonFileStore {
    /// Loads the stored snapshot. A missing file is `None`; a corrupt
    /// payload or an unknown version is an error, which the core store
    /// converts into the default snapshot at rehydration time.
    async fn load(&self) -> PortResult<Option<SessionSnapshot>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PortError::Unexpected(format!(
                    "Failed to read snapshot file: {e}"
                )))
            }
        };

        let snapshot: SessionSnapshot = serde_json::from_slice(&bytes)
            .map_err(|e| PortError::Unexpected(format!("Corrupt snapshot payload: {e}")))?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(PortError::Unexpected(format!(
                "Unsupported snapshot version {}",
                snapshot.version
            )));
        }

        Ok(Some(snapshot))
    }

    /// Overwrites the stored snapshot. Writes go to a temp file first and
    /// are renamed into place, so a crash mid-write cannot leave a
    /// half-written snapshot behind.
    async fn save(&self, snapshot: &SessionSnapshot) -> PortResult<()> {
        let json = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| PortError::Unexpected(format!("Failed to serialize snapshot: {e}")))?;

        let temp = self.temp_path();
        tokio::fs::write(&temp, &json)
            .await
            .map_err(|e| PortError::Unexpected(format!("Failed to write snapshot file: {e}")))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| PortError::Unexpected(format!("Failed to replace snapshot file: {e}")))?;

        Ok(())
    }
}
