use super::error::PersistenceError;
use super::format::{encode_orders, parse_orders};
use crate::model::Order;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

static SNAPSHOT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^orders-\d{4}-\d{2}-\d{2}-\d{2}-\d{2}-\d{2}\.txt$")
        .expect("snapshot name pattern compiles")
});

const SNAPSHOT_NAME_FORMAT: &str = "orders-%Y-%m-%d-%H-%M-%S.txt";

/// Timestamped roster snapshots in one directory.
///
/// Clones share a single read/write lock: reads run alongside each other,
/// a save excludes everything else. The lock guards the files only, never the
/// in-memory roster.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    dir: PathBuf,
    keep: Option<usize>,
    lock: Arc<RwLock<()>>,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            keep: None,
            lock: Arc::new(RwLock::new(())),
        }
    }

    /// After each save, delete all but the newest `keep` snapshots.
    /// `None` keeps everything.
    pub fn with_retention(mut self, keep: Option<usize>) -> Self {
        self.keep = keep;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `orders` to a new snapshot. Failures are logged and reported as
    /// `None`; they never propagate.
    pub async fn save_orders(&self, orders: &[Order]) -> Option<PathBuf> {
        match self.try_save(orders).await {
            Ok(path) => Some(path),
            Err(e) => {
                error!(error = %e, "Failed to save orders");
                None
            }
        }
    }

    /// Writes `orders` to `orders-<timestamp>.txt` via a temporary file and a
    /// rename, so a crash never leaves a truncated snapshot behind.
    pub async fn try_save(&self, orders: &[Order]) -> Result<PathBuf, PersistenceError> {
        let _guard = self.lock.write().await;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PersistenceError::io(&self.dir, e))?;

        let name = chrono::Local::now().format(SNAPSHOT_NAME_FORMAT).to_string();
        let path = self.dir.join(&name);
        let tmp_path = self.dir.join(format!("{name}.tmp"));

        let body = encode_orders(orders);
        if let Err(e) = write_synced(&tmp_path, body.as_bytes()).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(PersistenceError::io(&tmp_path, e));
        }
        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(PersistenceError::io(&path, e));
        }
        info!(path = %path.display(), count = orders.len(), "Orders saved");

        if let Some(keep) = self.keep {
            self.prune(keep).await;
        }
        Ok(path)
    }

    /// Reads the newest snapshot. A missing directory, no snapshots, an I/O
    /// failure or a malformed file all yield an empty roster.
    pub async fn read_all_orders(&self) -> Vec<Order> {
        match self.try_read_latest().await {
            Ok(orders) => orders,
            Err(e) => {
                error!(error = %e, "Failed to read saved orders");
                Vec::new()
            }
        }
    }

    /// Reads the newest snapshot, reporting what went wrong.
    ///
    /// Only the lexicographically greatest matching file name is read; older
    /// snapshots are never merged in.
    pub async fn try_read_latest(&self) -> Result<Vec<Order>, PersistenceError> {
        let _guard = self.lock.read().await;

        let Some(latest) = self.snapshots().await?.pop() else {
            debug!(dir = %self.dir.display(), "No snapshot found");
            return Ok(Vec::new());
        };
        let text = tokio::fs::read_to_string(&latest)
            .await
            .map_err(|e| PersistenceError::io(&latest, e))?;
        let orders = parse_orders(&text)?;
        info!(path = %latest.display(), count = orders.len(), "Orders loaded");
        Ok(orders)
    }

    /// Snapshot files in ascending name order. A missing directory has none.
    async fn snapshots(&self) -> Result<Vec<PathBuf>, PersistenceError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PersistenceError::io(&self.dir, e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PersistenceError::io(&self.dir, e))?
        {
            let name = entry.file_name();
            if let Some(name) = name.to_str() {
                if SNAPSHOT_NAME.is_match(name) {
                    names.push(name.to_owned());
                }
            }
        }
        names.sort();
        Ok(names.into_iter().map(|name| self.dir.join(name)).collect())
    }

    /// Called with the write lock held.
    async fn prune(&self, keep: usize) {
        let snapshots = match self.snapshots().await {
            Ok(snapshots) => snapshots,
            Err(e) => {
                warn!(error = %e, "Could not list snapshots for pruning");
                return;
            }
        };
        let excess = snapshots.len().saturating_sub(keep);
        for path in snapshots.into_iter().take(excess) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "Old snapshot removed"),
                Err(e) => warn!(path = %path.display(), error = %e, "Could not remove old snapshot"),
            }
        }
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}
