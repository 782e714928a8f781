// SPDX-License-Identifier: GPL-3.0-only

//! In-process settings store.

use super::{drain, merge, SettingsChange, SettingsStore, StorageError, StorageResult, Subscribers};
use crate::config::SettingsMap;
use futures::channel::mpsc;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct Inner {
    items: Mutex<SettingsMap>,
    subscribers: Subscribers,
    unavailable: bool,
}

/// Settings store held in memory. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    inner: Arc<Inner>,
}

impl MemorySettingsStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `items`.
    #[must_use]
    pub fn with_items(items: SettingsMap) -> Self {
        Self {
            inner: Arc::new(Inner {
                items: Mutex::new(items),
                ..Inner::default()
            }),
        }
    }

    /// Creates a store that behaves as if storage were absent from the context.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            inner: Arc::new(Inner {
                unavailable: true,
                ..Inner::default()
            }),
        }
    }

    fn check(&self) -> StorageResult<()> {
        if self.inner.unavailable {
            return Err(StorageError::Unavailable);
        }
        Ok(())
    }

    /// Snapshot of the stored items.
    #[must_use]
    pub fn items(&self) -> SettingsMap {
        self.inner
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SettingsStore for MemorySettingsStore {
    async fn get(&self) -> StorageResult<SettingsMap> {
        self.check()?;
        Ok(self.items())
    }

    async fn set(&self, items: SettingsMap) -> StorageResult<()> {
        self.check()?;
        let change = {
            let mut stored = self.inner.items.lock().unwrap_or_else(PoisonError::into_inner);
            merge(&mut stored, items)
        };
        self.inner.subscribers.notify(change);
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        self.check()?;
        let change = {
            let mut stored = self.inner.items.lock().unwrap_or_else(PoisonError::into_inner);
            drain(&mut stored)
        };
        self.inner.subscribers.notify(change);
        Ok(())
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<SettingsChange> {
        self.inner.subscribers.subscribe()
    }
}
