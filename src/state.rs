// SPDX-License-Identifier: GPL-3.0-only

//! Widget position state.
//!
//! Two pieces of position state exist:
//!
//! - [`WidgetPosition`]: the `{left, top}` pair persisted to page-local storage
//!   under [`POSITION_STORAGE_KEY`] when a drag ends, and read back on open.
//! - [`InlinePosition`]: a snapshot of every position-related inline style,
//!   captured before a rebuild and reapplied afterwards.

use crate::app_settings::POSITION_STORAGE_KEY;
use crate::dom::{DomResult, ElementId, HostDocument};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Widget position that persists between page visits.
///
/// Values are CSS lengths as written to the widget's inline style (`"120px"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetPosition {
    pub left: String,
    pub top: String,
}

impl WidgetPosition {
    /// Parses a stored position. Malformed data yields `None`.
    #[must_use]
    pub fn parse(stored: &str) -> Option<Self> {
        match serde_json::from_str(stored) {
            Ok(position) => Some(position),
            Err(err) => {
                tracing::debug!("Ignoring malformed stored position: {}", err);
                None
            }
        }
    }

    /// Loads the persisted position from local storage.
    pub fn load(storage: &impl LocalStorage) -> Option<Self> {
        storage
            .get_item(POSITION_STORAGE_KEY)
            .and_then(|stored| Self::parse(&stored))
    }

    /// Writes the position to local storage. Failures are logged and ignored.
    pub fn save(&self, storage: &mut impl LocalStorage) {
        match serde_json::to_string(self) {
            Ok(json) => storage.set_item(POSITION_STORAGE_KEY, &json),
            Err(err) => tracing::warn!("Failed to serialize widget position: {}", err),
        }
    }
}

/// Position-related inline styles of the widget.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InlinePosition {
    pub left: Option<String>,
    pub top: Option<String>,
    pub right: Option<String>,
    pub bottom: Option<String>,
    pub transform: Option<String>,
}

impl InlinePosition {
    /// Reads the position styles of `element`.
    pub fn capture(document: &impl HostDocument, element: ElementId) -> Self {
        Self {
            left: document.style(element, "left"),
            top: document.style(element, "top"),
            right: document.style(element, "right"),
            bottom: document.style(element, "bottom"),
            transform: document.style(element, "transform"),
        }
    }

    /// Writes back every captured property and clears the ones that were
    /// absent, so `element` ends up with exactly the captured position.
    pub fn restore(&self, document: &mut impl HostDocument, element: ElementId) -> DomResult<()> {
        let properties = [
            ("left", &self.left),
            ("top", &self.top),
            ("right", &self.right),
            ("bottom", &self.bottom),
            ("transform", &self.transform),
        ];
        for (property, value) in properties {
            document.set_style(element, property, value.as_deref().unwrap_or(""))?;
        }
        Ok(())
    }
}

// ============================================================================
// Local Storage
// ============================================================================

/// Page-local synchronous string storage.
pub trait LocalStorage {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&mut self, key: &str, value: &str);
}

/// Local storage held in memory. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocalStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryLocalStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryLocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSpec, MemoryDocument};

    #[test]
    fn test_position_persistence_roundtrip() {
        let mut storage = MemoryLocalStorage::new();
        assert_eq!(WidgetPosition::load(&storage), None);

        let position = WidgetPosition {
            left: "120px".into(),
            top: "48.5px".into(),
        };
        position.save(&mut storage);

        assert_eq!(
            storage.get_item(POSITION_STORAGE_KEY).as_deref(),
            Some(r#"{"left":"120px","top":"48.5px"}"#)
        );
        assert_eq!(WidgetPosition::load(&storage), Some(position));
    }

    #[test]
    fn test_malformed_position_is_ignored() {
        let mut storage = MemoryLocalStorage::new();
        storage.set_item(POSITION_STORAGE_KEY, "{not json");
        assert_eq!(WidgetPosition::load(&storage), None);

        storage.set_item(POSITION_STORAGE_KEY, r#"{"left":"1px"}"#);
        assert_eq!(WidgetPosition::load(&storage), None, "Missing top is malformed");
    }

    #[test]
    fn test_inline_position_capture_and_restore() {
        let mut doc = MemoryDocument::new();
        let source = doc.create_element(
            ElementSpec::new("div")
                .with_style("left", "10px")
                .with_style("top", "20px")
                .with_style("right", "auto")
                .with_style("transform", "translateX(4px)"),
        );
        let target = doc.create_element(ElementSpec::new("div").with_style("bottom", "20px"));

        let captured = InlinePosition::capture(&doc, source);
        assert_eq!(captured.bottom, None);

        captured.restore(&mut doc, target).unwrap();
        assert_eq!(InlinePosition::capture(&doc, target), captured);
        assert_eq!(doc.style(target, "bottom"), None, "Absent properties are cleared");
    }
}
