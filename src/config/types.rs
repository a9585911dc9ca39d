use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Directory holding `orders-*.txt` snapshots, created on first save.
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
    /// How long one order takes to prepare.
    #[serde(default = "default_preparation_time_ms")]
    pub preparation_time_ms: u64,
    /// Newest snapshots to keep after a save. Unset keeps all of them.
    #[serde(default)]
    pub keep_snapshots: Option<usize>,
    /// Request buffer of the roster actor.
    #[serde(default = "default_roster_buffer")]
    pub roster_buffer: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: default_snapshot_dir(),
            preparation_time_ms: default_preparation_time_ms(),
            keep_snapshots: None,
            roster_buffer: default_roster_buffer(),
        }
    }
}

impl PipelineConfig {
    pub fn preparation_time(&self) -> Duration {
        Duration::from_millis(self.preparation_time_ms)
    }
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("orders")
}

fn default_preparation_time_ms() -> u64 {
    3000
}

fn default_roster_buffer() -> usize {
    32
}
