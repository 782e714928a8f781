// SPDX-License-Identifier: GPL-3.0-only

//! Settings storage capability.
//!
//! Settings live in an asynchronous key-value store with change notification.
//! The page agent and the control panel only see the [`SettingsStore`] trait;
//! two implementations are provided:
//!
//! - [`MemorySettingsStore`]: in-process storage, shareable between surfaces
//! - [`JsonFileStore`]: settings persisted as one JSON object on disk
//!
//! Stores notify subscribers with a [`SettingsChange`] listing only the keys
//! whose value actually changed.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemorySettingsStore;

use crate::config::SettingsMap;
use futures::channel::mpsc;
use serde_json::Value;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while talking to a settings store.
#[derive(Debug)]
pub enum StorageError {
    /// Storage is not available in the current context.
    Unavailable,
    /// Reading or writing the backing file failed.
    Io(std::io::Error),
    /// The stored data is not a valid settings object.
    Malformed(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "settings storage is not available"),
            StorageError::Io(err) => write!(f, "settings storage I/O failed: {}", err),
            StorageError::Malformed(msg) => write!(f, "stored settings are malformed: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err)
    }
}

/// A batch of changed settings, as delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsChange {
    /// Changed keys with their new values. A removed key has a `null` value.
    pub changes: SettingsMap,
}

impl SettingsChange {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Asynchronous key-value settings storage.
#[allow(async_fn_in_trait)]
pub trait SettingsStore {
    /// Reads every stored setting.
    async fn get(&self) -> StorageResult<SettingsMap>;

    /// Merges `items` into the store.
    async fn set(&self, items: SettingsMap) -> StorageResult<()>;

    /// Removes every stored setting.
    async fn clear(&self) -> StorageResult<()>;

    /// Registers for change notifications.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<SettingsChange>;
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Change notification fan-out shared by the store implementations.
#[derive(Debug, Default)]
pub(crate) struct Subscribers {
    senders: Mutex<Vec<mpsc::UnboundedSender<SettingsChange>>>,
}

impl Subscribers {
    pub(crate) fn subscribe(&self) -> mpsc::UnboundedReceiver<SettingsChange> {
        let (tx, rx) = mpsc::unbounded();
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Sends `change` to every live subscriber, dropping closed ones.
    pub(crate) fn notify(&self, change: SettingsChange) {
        if change.is_empty() {
            return;
        }
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        senders.retain(|tx| tx.unbounded_send(change.clone()).is_ok());
        tracing::debug!(
            "Settings changed ({} keys), {} subscribers notified",
            change.changes.len(),
            senders.len()
        );
    }
}

/// Merges `items` into `stored`, returning the keys whose value changed.
pub(crate) fn merge(stored: &mut SettingsMap, items: SettingsMap) -> SettingsChange {
    let mut change = SettingsChange::default();
    for (key, value) in items {
        if stored.get(&key) != Some(&value) {
            change.changes.insert(key.clone(), value.clone());
        }
        stored.insert(key, value);
    }
    change
}

/// Empties `stored`, returning every removed key with a `null` value.
pub(crate) fn drain(stored: &mut SettingsMap) -> SettingsChange {
    let changes = std::mem::take(stored)
        .into_iter()
        .map(|(key, _)| (key, Value::Null))
        .collect();
    SettingsChange { changes }
}
