//! Seed and snapshot data for the in-memory backend.
//!
//! A [`StoreSnapshot`] is the external form of everything a backend holds
//! besides its roles and adaptation data. The same JSON document seeds a new
//! backend and records the state of a running one.
//!
//! Snapshots are written atomically: the JSON is written to a temporary file
//! in the target directory, which is then renamed over the destination. A
//! written file matches the in-memory state at the time of the call and
//! nothing more.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{PersistenceError, PersistenceResult};
use crate::model::{AccountCredentials, JobCredentials, UserReport};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub accounts: Vec<AccountCredentials>,
    #[serde(default)]
    pub reports: Vec<UserReport>,
    #[serde(default)]
    pub jobs: Vec<JobCredentials>,
}

impl StoreSnapshot {
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.reports.is_empty() && self.jobs.is_empty()
    }
}

/// Load a snapshot from a JSON file.
pub async fn read_snapshot(path: &Path) -> PersistenceResult<StoreSnapshot> {
    let contents = fs::read(path).await.map_err(|e| {
        PersistenceError::Io(format!("Failed to read snapshot {}: {}", path.display(), e))
    })?;

    let snapshot: StoreSnapshot = serde_json::from_slice(&contents).map_err(|e| {
        PersistenceError::Serialization(format!("Failed to parse snapshot: {}", e))
    })?;

    debug!(
        "Read snapshot {}: {} accounts, {} reports, {} jobs",
        path.display(),
        snapshot.accounts.len(),
        snapshot.reports.len(),
        snapshot.jobs.len()
    );
    Ok(snapshot)
}

/// Write a snapshot as pretty-printed JSON, replacing `path` atomically.
pub async fn write_snapshot(path: &Path, snapshot: &StoreSnapshot) -> PersistenceResult<()> {
    let json = serde_json::to_vec_pretty(snapshot).map_err(|e| {
        PersistenceError::Serialization(format!("Failed to serialize snapshot: {}", e))
    })?;
    write_atomically(path, &json).await
}

async fn write_atomically(path: &Path, data: &[u8]) -> PersistenceResult<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    fs::create_dir_all(dir)
        .await
        .map_err(|e| PersistenceError::Io(format!("Failed to create directory: {}", e)))?;

    let temp_path = NamedTempFile::new_in(dir)
        .map_err(|e| PersistenceError::Io(format!("Failed to create temporary file: {}", e)))?
        .into_temp_path();

    let mut file = fs::File::create(&temp_path)
        .await
        .map_err(|e| PersistenceError::Io(format!("Failed to create file: {}", e)))?;
    file.write_all(data)
        .await
        .map_err(|e| PersistenceError::Io(format!("Failed to write to file: {}", e)))?;
    file.flush()
        .await
        .map_err(|e| PersistenceError::Io(format!("Failed to flush file: {}", e)))?;
    drop(file);

    temp_path
        .persist(path)
        .map_err(|e| PersistenceError::Io(format!("Failed to rename file: {}", e)))?;

    Ok(())
}
