// SPDX-License-Identifier: GPL-3.0-only

//! Widget lifecycle: open, close, rebuild and the header actions.
//!
//! At most one widget exists per page. [`WIDGET_ID`] doubles as the singleton
//! guard: `open` does nothing while an element with that id is attached.

use super::PageAgent;
use crate::app_settings::{GRID_ID, WIDGET_ID};
use crate::config::{SettingKey, SettingsMap};
use crate::dom::{ElementId, HostDocument};
use crate::layout::resolve_keys;
use crate::renderer::{render_keys, render_panel, Placement};
use crate::state::{InlinePosition, LocalStorage, WidgetPosition};
use crate::storage::SettingsStore;

impl<D, S, P> PageAgent<D, S, P>
where
    D: HostDocument,
    S: SettingsStore,
    P: LocalStorage,
{
    /// Opens the widget with the current settings.
    ///
    /// Returns `false` when a widget already exists or the document refused it.
    pub fn open_widget(&mut self) -> bool {
        if self.document.element_by_id(WIDGET_ID).is_some() {
            tracing::debug!("Widget already open");
            return false;
        }

        let placement = self.placement();
        let widget = match self
            .document
            .append_to_body(render_panel(&self.settings, &placement))
        {
            Ok(widget) => widget,
            Err(e) => {
                tracing::error!("Failed to open widget: {}", e);
                return false;
            }
        };
        self.widget = Some(widget);
        self.populate_grid(widget);
        self.remove_icon();

        tracing::debug!("Widget opened with {} layout", self.settings.layout);
        true
    }

    /// Closes the widget. Closing a closed widget does nothing.
    pub fn close_widget(&mut self) {
        self.drag = None;
        if let Some(widget) = self.widget.take() {
            self.document.remove(widget);
            tracing::debug!("Widget closed");
        }
    }

    /// Re-renders the open widget, keeping its position.
    pub fn rebuild_widget(&mut self) {
        let Some(widget) = self.widget else {
            return;
        };
        let saved = InlinePosition::capture(&self.document, widget);

        self.close_widget();
        self.open_widget();

        if let Some(widget) = self.widget {
            if let Err(e) = saved.restore(&mut self.document, widget) {
                tracing::error!("Failed to restore widget position: {}", e);
            }
        }
    }

    /// Switches to the next layout, persists it and rebuilds.
    pub async fn cycle_layout(&mut self) {
        self.settings.layout = self.settings.layout.next();
        tracing::debug!("Layout switched to {}", self.settings.layout);
        self.persist(SettingKey::Layout).await;
        self.rebuild_widget();
    }

    /// Flips the transliteration captions, persists the flag and rebuilds.
    pub async fn toggle_transliteration(&mut self) {
        self.settings.show_transliteration = !self.settings.show_transliteration;
        self.persist(SettingKey::ShowTransliteration).await;
        self.rebuild_widget();
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn placement(&self) -> Placement {
        if !self.settings.persist_position {
            return Placement::Corner;
        }
        WidgetPosition::load(&self.local_storage).map_or(Placement::Corner, Placement::Persisted)
    }

    fn populate_grid(&mut self, widget: ElementId) {
        let grid = self
            .document
            .element_by_id(GRID_ID)
            .filter(|grid| self.document.contains(widget, *grid));
        let Some(grid) = grid else {
            tracing::error!("Widget has no key grid");
            return;
        };

        let labels = resolve_keys(self.settings.layout, &self.settings.custom_keys);
        for key in render_keys(&labels, self.settings.show_transliteration) {
            if let Err(e) = self.document.append_child(grid, key) {
                tracing::error!("Failed to add key: {}", e);
                return;
            }
        }
    }

    async fn persist(&self, key: SettingKey) {
        let mut items = SettingsMap::new();
        items.insert(key.as_str().to_owned(), self.settings.value_of(key));
        if let Err(e) = self.store.set(items).await {
            tracing::warn!("Could not save {}: {}", key.as_str(), e);
        }
    }
}
