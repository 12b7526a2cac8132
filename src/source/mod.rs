//! Record sources.
//!
//! Defines the `RecordSource` trait — the seam between the engine and
//! whatever owns the fetch/cache/poll lifecycle — and provides the snapshot
//! file implementation used by the binary. The engine itself never fetches:
//! it is handed whatever record snapshot the source produced.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::types::PredictionRecord;

/// Abstraction over upstream prediction feeds.
///
/// Implementors own all I/O and asynchrony; the engine only ever sees the
/// returned snapshot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the current prediction snapshot.
    async fn fetch_records(&self) -> Result<Vec<PredictionRecord>>;

    /// Source name for logging and identification.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Snapshot file source
// ---------------------------------------------------------------------------

/// Reads the snapshot JSON written by the external fetch layer.
///
/// The file is a plain array of records in the upstream camelCase wire
/// format. Unknown result strings and sport labels degrade gracefully at
/// the type level (`pending` / `Other`), so one dirty record does not sink
/// the snapshot.
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl RecordSource for SnapshotSource {
    async fn fetch_records(&self) -> Result<Vec<PredictionRecord>> {
        let path = &self.path;
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;

        let records: Vec<PredictionRecord> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse snapshot: {}", path.display()))?;

        info!(
            path = %path.display(),
            records = records.len(),
            "Snapshot loaded"
        );

        Ok(records)
    }

    fn name(&self) -> &str {
        "snapshot-file"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
