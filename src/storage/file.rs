// SPDX-License-Identifier: GPL-3.0-only

//! Settings persisted as a JSON object on disk.

use super::{drain, merge, SettingsChange, SettingsStore, StorageError, StorageResult, Subscribers};
use crate::config::SettingsMap;
use futures::channel::mpsc;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Settings store backed by a JSON file.
///
/// A missing file reads as empty settings. Writes replace the whole file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: Arc<PathBuf>,
    /// Serializes read-modify-write cycles.
    lock: Arc<Mutex<()>>,
    subscribers: Arc<Subscribers>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            lock: Arc::new(Mutex::new(())),
            subscribers: Arc::new(Subscribers::default()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> StorageResult<SettingsMap> {
        let contents = match tokio::fs::read_to_string(self.path.as_ref()).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(SettingsMap::new()),
            Err(err) => return Err(err.into()),
        };

        if contents.trim().is_empty() {
            return Ok(SettingsMap::new());
        }

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StorageError::Malformed("expected a JSON object".into())),
            Err(err) => Err(StorageError::Malformed(err.to_string())),
        }
    }

    async fn write(&self, items: &SettingsMap) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(items)
            .map_err(|e| StorageError::Malformed(e.to_string()))?;
        tokio::fs::write(self.path.as_ref(), json).await?;
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    async fn get(&self) -> StorageResult<SettingsMap> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    async fn set(&self, items: SettingsMap) -> StorageResult<()> {
        let change = {
            let _guard = self.lock.lock().await;
            let mut stored = self.read().await?;
            let change = merge(&mut stored, items);
            self.write(&stored).await?;
            change
        };
        tracing::debug!("Wrote settings to {}", self.path.display());
        self.subscribers.notify(change);
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        let change = {
            let _guard = self.lock.lock().await;
            let mut stored = self.read().await?;
            let change = drain(&mut stored);
            self.write(&stored).await?;
            change
        };
        self.subscribers.notify(change);
        Ok(())
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<SettingsChange> {
        self.subscribers.subscribe()
    }
}
