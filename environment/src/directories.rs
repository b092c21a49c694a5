//! On-disk data directories of an environment
//!
//! The coordinator gets one directory; brokers share a root directory with
//! one subdirectory per broker. Deletion is always best effort: failures are
//! logged and never abort construction or teardown.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

pub const COORDINATOR_DIR_NAME: &str = "inmzookeeper";
pub const BROKER_ROOT_NAME: &str = "inmkafkabroker";

/// Data directory layout of one environment
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDirectoryManager {
    coordinator_dir: PathBuf,
    broker_root: PathBuf,
    broker_dirs: Vec<PathBuf>,
}

impl ResourceDirectoryManager {
    /// Compute the layout under `root` for `broker_count` brokers
    ///
    /// Broker directories are named `ID<index><uuid>` so that neither brokers
    /// nor environments share a directory.
    pub fn new(root: &Path, broker_count: u32) -> Self {
        let broker_root = root.join(BROKER_ROOT_NAME);
        let broker_dirs = (0..broker_count)
            .map(|index| broker_root.join(format!("ID{index}{}", Uuid::new_v4())))
            .collect();

        Self {
            coordinator_dir: root.join(COORDINATOR_DIR_NAME),
            broker_root,
            broker_dirs,
        }
    }

    /// Compute the layout and remove leftovers of an unclean previous run
    pub async fn prepare(root: &Path, broker_count: u32) -> Self {
        let manager = Self::new(root, broker_count);
        manager.clean_up().await;
        manager
    }

    pub fn coordinator_dir(&self) -> &Path {
        &self.coordinator_dir
    }

    pub fn broker_root(&self) -> &Path {
        &self.broker_root
    }

    /// Data directory of the broker with the given index
    pub fn broker_dir(&self, index: u32) -> Option<&Path> {
        self.broker_dirs.get(index as usize).map(PathBuf::as_path)
    }

    pub fn broker_dirs(&self) -> &[PathBuf] {
        &self.broker_dirs
    }

    /// Delete the coordinator directory and the broker root
    pub async fn clean_up(&self) {
        remove_best_effort(&self.coordinator_dir).await;
        remove_best_effort(&self.broker_root).await;
    }
}

async fn remove_best_effort(dir: &Path) {
    match fs::remove_dir_all(dir).await {
        Ok(()) => debug!("🧹 Removed data directory {}", dir.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("⚠️ Could not remove data directory {}: {}", dir.display(), e),
    }
}
