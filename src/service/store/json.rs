//! Flat JSON file implementation of the store.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::base::types::{PanelList, StoreKind, TriggerTable, Void};

use super::GenericStore;

/// Stores each collection as a pretty-printed JSON file.
///
/// The trigger table is an object of string to string; the panel list is an
/// array of strings.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    trigger_path: PathBuf,
    panel_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(trigger_path: PathBuf, panel_path: PathBuf) -> Self {
        Self { trigger_path, panel_path }
    }

    pub fn path(&self, kind: StoreKind) -> &Path {
        match kind {
            StoreKind::Triggers => &self.trigger_path,
            StoreKind::Panel => &self.panel_path,
        }
    }
}

#[async_trait]
impl GenericStore for JsonFileStore {
    async fn load_triggers(&self) -> TriggerTable {
        read_or_default(self.path(StoreKind::Triggers), StoreKind::Triggers).await
    }

    async fn save_triggers(&self, triggers: &TriggerTable) -> Void {
        write_atomically(self.path(StoreKind::Triggers), triggers).await
    }

    async fn load_panel(&self) -> PanelList {
        read_or_default(self.path(StoreKind::Panel), StoreKind::Panel).await
    }

    async fn save_panel(&self, panel: &PanelList) -> Void {
        write_atomically(self.path(StoreKind::Panel), panel).await
    }
}

// Helpers.

/// Reads and parses `path`, falling back to `T::default()` on any failure.
#[instrument(skip_all, fields(kind = ?kind))]
async fn read_or_default<T>(path: &Path, kind: StoreKind) -> T
where
    T: DeserializeOwned + Default,
{
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("No data file at {}; using empty default.", path.display());
            return T::default();
        }
        Err(err) => {
            warn!("Failed to read {}: {}; using empty default.", path.display(), err);
            return T::default();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(err) => {
            warn!("Invalid data in {}: {}; using empty default.", path.display(), err);
            T::default()
        }
    }
}

/// Writes `value` to a sibling temp file and renames it over `path`.
///
/// Readers see either the previous contents or the new contents, never a partial write.
#[instrument(skip_all)]
async fn write_atomically<T>(path: &Path, value: &T) -> Void
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_vec_pretty(value).context("Failed to serialize collection")?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let tmp = temp_path(path);

    tokio::fs::write(&tmp, &json).await.with_context(|| format!("Failed to write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path).await.with_context(|| format!("Failed to replace {}", path.display()))?;

    debug!("Wrote {} bytes to {}.", json.len(), path.display());

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

// Tests.
