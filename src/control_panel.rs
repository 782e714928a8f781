// SPDX-License-Identifier: GPL-3.0-only

//! The settings control panel.
//!
//! The panel is a form bound one-to-one to the settings store. It loads the
//! stored settings into its fields, writes them back on save, restores the
//! defaults on reset, and can ask the page agent in the active page to open
//! its widget.

use crate::config::{SettingKey, Settings, SettingsMap, Size, Theme};
use crate::layout::LayoutKind;
use crate::messaging::{AgentMessenger, AgentReply, AgentRequest};
use crate::storage::{SettingsStore, StorageResult};
use serde_json::Value;

/// Field values of the control panel form.
///
/// `keys_per_row` holds the raw text of its number input, which may be empty
/// or not a number while the user edits it.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelForm {
    pub theme: Theme,
    pub size: Size,
    pub opacity: f64,
    pub translucent: bool,
    pub draggable: bool,
    pub show_icon: bool,
    pub auto_open: bool,
    pub persist_position: bool,
    pub close_on_blur: bool,
    pub layout: LayoutKind,
    pub keys_per_row: String,
    pub show_transliteration: bool,
    pub custom_keys: String,
    pub keyboard_color: String,
}

impl Default for PanelForm {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl PanelForm {
    /// Fills the form from settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            theme: settings.theme,
            size: settings.size,
            opacity: settings.opacity,
            translucent: settings.translucent,
            draggable: settings.draggable,
            show_icon: settings.show_icon,
            auto_open: settings.auto_open,
            persist_position: settings.persist_position,
            close_on_blur: settings.close_on_blur,
            layout: settings.layout,
            keys_per_row: settings.keys_per_row.to_string(),
            show_transliteration: settings.show_transliteration,
            custom_keys: settings.custom_keys.clone(),
            keyboard_color: settings.keyboard_color.clone(),
        }
    }

    /// The columns field as a number. Empty, zero or non-numeric text saves as 12.
    #[must_use]
    pub fn keys_per_row_value(&self) -> f64 {
        match self.keys_per_row.trim().parse::<f64>() {
            Ok(n) if n != 0.0 && !n.is_nan() => n,
            _ => Settings::default().keys_per_row,
        }
    }

    /// Converts the form to a settings object for the store.
    #[must_use]
    pub fn to_items(&self) -> SettingsMap {
        let fields = [
            (SettingKey::Theme, Value::from(self.theme.as_str())),
            (SettingKey::Size, Value::from(self.size.as_str())),
            (SettingKey::Opacity, Value::from(self.opacity)),
            (SettingKey::Translucent, Value::from(self.translucent)),
            (SettingKey::Draggable, Value::from(self.draggable)),
            (SettingKey::ShowIcon, Value::from(self.show_icon)),
            (SettingKey::AutoOpen, Value::from(self.auto_open)),
            (SettingKey::PersistPosition, Value::from(self.persist_position)),
            (SettingKey::CloseOnBlur, Value::from(self.close_on_blur)),
            (SettingKey::Layout, Value::from(self.layout.as_str())),
            (SettingKey::KeysPerRow, Value::from(self.keys_per_row_value())),
            (SettingKey::ShowTransliteration, Value::from(self.show_transliteration)),
            (SettingKey::CustomKeys, Value::from(self.custom_keys.as_str())),
            (SettingKey::KeyboardColor, Value::from(self.keyboard_color.trim())),
        ];

        fields
            .into_iter()
            .map(|(key, value)| (key.as_str().to_owned(), value))
            .collect()
    }
}

/// Control panel bound to a settings store.
#[derive(Debug)]
pub struct ControlPanel<S> {
    store: S,
    form: PanelForm,
}

impl<S: SettingsStore> ControlPanel<S> {
    /// Creates a panel showing the default settings. Call [`load`](Self::load)
    /// to show the stored ones.
    pub fn new(store: S) -> Self {
        Self {
            store,
            form: PanelForm::default(),
        }
    }

    pub fn form(&self) -> &PanelForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PanelForm {
        &mut self.form
    }

    /// Text of the opacity read-out next to the slider.
    #[must_use]
    pub fn opacity_label(&self) -> String {
        self.form.opacity.to_string()
    }

    /// Moves the opacity slider.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.form.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Fills the form from the store.
    pub async fn load(&mut self) -> StorageResult<()> {
        let items = self.store.get().await?;
        self.form = PanelForm::from_settings(&Settings::from_items(&items));
        Ok(())
    }

    /// Writes every form field to the store.
    pub async fn save(&self) -> StorageResult<()> {
        self.store.set(self.form.to_items()).await?;
        tracing::info!("Settings saved");
        Ok(())
    }

    /// Clears the store, writes the defaults and reloads the form.
    pub async fn reset(&mut self) -> StorageResult<()> {
        self.store.clear().await?;
        self.store.set(Settings::default().to_items()).await?;
        self.load().await?;
        tracing::info!("Settings reset to defaults");
        Ok(())
    }

    /// Asks the page agent of the active page to open its widget.
    ///
    /// Without a messenger (no active page) this does nothing. Messaging
    /// failures are logged and yield `None`.
    pub async fn open_keyboard(&self, messenger: Option<&AgentMessenger>) -> Option<AgentReply> {
        let messenger = messenger?;
        match messenger.send(AgentRequest::OpenKeyboard).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                tracing::warn!("Could not open the keyboard: {}", e);
                None
            }
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
