// SPDX-License-Identifier: GPL-3.0-only

//! User settings shared by the control panel and the page agent.
//!
//! Settings are stored as a flat JSON object with camelCase keys. Values read
//! back from storage are coerced leniently: a stored value of the wrong shape
//! falls back to the setting's default rather than failing the whole load.

use crate::layout::LayoutKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A raw settings object as exchanged with the settings store.
pub type SettingsMap = Map<String, Value>;

// ============================================================================
// Enumerated Values
// ============================================================================

/// Color theme of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Parses a stored theme token. Anything but `"dark"` is light.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if token == "dark" { Theme::Dark } else { Theme::Light }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete size scale of the widget keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    #[default]
    Medium,
    Large,
}

impl Size {
    /// Parses a stored size token. Unknown tokens map to medium.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token {
            "small" => Size::Small,
            "large" => Size::Large,
            _ => Size::Medium,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Size::Small => "small",
            Size::Medium => "medium",
            Size::Large => "large",
        }
    }
}

// ============================================================================
// Setting Keys
// ============================================================================

/// The fixed set of setting names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Theme,
    Size,
    Opacity,
    Translucent,
    Draggable,
    ShowIcon,
    AutoOpen,
    Layout,
    KeysPerRow,
    ShowTransliteration,
    PersistPosition,
    CloseOnBlur,
    CustomKeys,
    KeyboardColor,
}

impl SettingKey {
    /// All keys, in schema order.
    pub const ALL: [SettingKey; 14] = [
        SettingKey::Theme,
        SettingKey::Size,
        SettingKey::Opacity,
        SettingKey::Translucent,
        SettingKey::Draggable,
        SettingKey::ShowIcon,
        SettingKey::AutoOpen,
        SettingKey::Layout,
        SettingKey::KeysPerRow,
        SettingKey::ShowTransliteration,
        SettingKey::PersistPosition,
        SettingKey::CloseOnBlur,
        SettingKey::CustomKeys,
        SettingKey::KeyboardColor,
    ];

    /// Returns the storage name of the key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::Theme => "theme",
            SettingKey::Size => "size",
            SettingKey::Opacity => "opacity",
            SettingKey::Translucent => "translucent",
            SettingKey::Draggable => "draggable",
            SettingKey::ShowIcon => "showIcon",
            SettingKey::AutoOpen => "autoOpen",
            SettingKey::Layout => "layout",
            SettingKey::KeysPerRow => "keysPerRow",
            SettingKey::ShowTransliteration => "showTransliteration",
            SettingKey::PersistPosition => "persistPosition",
            SettingKey::CloseOnBlur => "closeOnBlur",
            SettingKey::CustomKeys => "customKeys",
            SettingKey::KeyboardColor => "keyboardColor",
        }
    }

    /// Looks up a key by its storage name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }

    /// Whether a change to this key requires the open widget to be rebuilt.
    #[must_use]
    pub fn affects_rendering(&self) -> bool {
        matches!(
            self,
            SettingKey::Theme
                | SettingKey::Size
                | SettingKey::Translucent
                | SettingKey::Opacity
                | SettingKey::Layout
                | SettingKey::KeysPerRow
                | SettingKey::ShowTransliteration
                | SettingKey::KeyboardColor
        )
    }
}

// ============================================================================
// Settings
// ============================================================================

/// The complete set of user settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    pub size: Size,
    /// Widget opacity in `[0, 1]`.
    pub opacity: f64,
    pub translucent: bool,
    pub draggable: bool,
    pub show_icon: bool,
    pub auto_open: bool,
    pub layout: LayoutKind,
    /// Requested grid columns; see [`crate::layout::column_count`].
    pub keys_per_row: f64,
    pub show_transliteration: bool,
    pub persist_position: bool,
    pub close_on_blur: bool,
    /// Newline-separated labels of the custom layout.
    pub custom_keys: String,
    /// Base color as `#rrggbb`, or empty for the theme defaults.
    pub keyboard_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            size: Size::Medium,
            opacity: 1.0,
            translucent: false,
            draggable: true,
            show_icon: true,
            auto_open: false,
            layout: LayoutKind::Standard,
            keys_per_row: 12.0,
            show_transliteration: false,
            persist_position: true,
            close_on_blur: true,
            custom_keys: String::new(),
            keyboard_color: String::new(),
        }
    }
}

impl Settings {
    /// Builds settings from a stored object, filling missing keys with defaults.
    ///
    /// Unknown keys are ignored.
    #[must_use]
    pub fn from_items(items: &SettingsMap) -> Self {
        let mut settings = Self::default();
        for (name, value) in items {
            if let Some(key) = SettingKey::from_name(name) {
                settings.apply(key, value);
            }
        }
        settings
    }

    /// Serializes all settings to a storage object.
    #[must_use]
    pub fn to_items(&self) -> SettingsMap {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => SettingsMap::new(),
        }
    }

    /// Returns the stored value of a single setting.
    #[must_use]
    pub fn value_of(&self, key: SettingKey) -> Value {
        self.to_items().remove(key.as_str()).unwrap_or(Value::Null)
    }

    /// Applies a single stored value. `null` restores the default.
    pub fn apply(&mut self, key: SettingKey, value: &Value) {
        let defaults = Settings::default();
        match key {
            SettingKey::Theme => {
                self.theme = text(value).map_or(defaults.theme, |t| Theme::from_token(&t));
            }
            SettingKey::Size => {
                self.size = text(value).map_or(defaults.size, |s| Size::from_token(&s));
            }
            SettingKey::Opacity => {
                self.opacity = number(value).unwrap_or(defaults.opacity).clamp(0.0, 1.0);
            }
            SettingKey::Translucent => self.translucent = flag(value, defaults.translucent),
            SettingKey::Draggable => self.draggable = flag(value, defaults.draggable),
            SettingKey::ShowIcon => self.show_icon = flag(value, defaults.show_icon),
            SettingKey::AutoOpen => self.auto_open = flag(value, defaults.auto_open),
            SettingKey::Layout => {
                self.layout = text(value).map_or(defaults.layout, |l| LayoutKind::from_token(&l));
            }
            SettingKey::KeysPerRow => {
                self.keys_per_row = number(value).unwrap_or(defaults.keys_per_row);
            }
            SettingKey::ShowTransliteration => {
                self.show_transliteration = flag(value, defaults.show_transliteration);
            }
            SettingKey::PersistPosition => {
                self.persist_position = flag(value, defaults.persist_position);
            }
            SettingKey::CloseOnBlur => self.close_on_blur = flag(value, defaults.close_on_blur),
            SettingKey::CustomKeys => self.custom_keys = text(value).unwrap_or_default(),
            SettingKey::KeyboardColor => self.keyboard_color = text(value).unwrap_or_default(),
        }
    }
}

// ============================================================================
// Lenient Coercion
// ============================================================================

/// Coerces a stored value to a usable number.
///
/// Numeric strings are parsed; zero, `NaN` and non-numeric values yield `None`.
fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(true) => 1.0,
        _ => return None,
    };
    (n != 0.0 && !n.is_nan()).then_some(n)
}

/// Coerces a stored value to a boolean using truthiness; `null` yields the default.
fn flag(value: &Value, default: bool) -> bool {
    match value {
        Value::Null => default,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items(value: Value) -> SettingsMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_defaults_match_schema() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.size, Size::Medium);
        assert_eq!(settings.opacity, 1.0);
        assert!(!settings.translucent);
        assert!(settings.draggable);
        assert!(settings.show_icon);
        assert!(!settings.auto_open);
        assert_eq!(settings.layout, LayoutKind::Standard);
        assert_eq!(settings.keys_per_row, 12.0);
        assert!(!settings.show_transliteration);
        assert!(settings.persist_position);
        assert!(settings.close_on_blur);
        assert!(settings.custom_keys.is_empty());
        assert!(settings.keyboard_color.is_empty());
    }

    #[test]
    fn test_items_roundtrip_uses_camel_case() {
        let map = Settings::default().to_items();
        assert_eq!(map.len(), SettingKey::ALL.len());
        for key in SettingKey::ALL {
            assert!(map.contains_key(key.as_str()), "Missing key {}", key.as_str());
        }
        assert_eq!(map["showIcon"], json!(true));
        assert_eq!(map["layout"], json!("standard"));
        assert_eq!(Settings::from_items(&map), Settings::default());
    }

    #[test]
    fn test_from_items_merges_with_defaults() {
        let settings = Settings::from_items(&items(json!({
            "theme": "dark",
            "layout": "phonetic",
            "autoOpen": true,
            "somethingElse": 42
        })));

        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.layout, LayoutKind::Phonetic);
        assert!(settings.auto_open);
        assert!(settings.show_icon, "Missing keys keep their default");
    }

    #[test]
    fn test_numbers_are_coerced_leniently() {
        let settings = Settings::from_items(&items(json!({
            "opacity": "0.5",
            "keysPerRow": "8"
        })));
        assert_eq!(settings.opacity, 0.5);
        assert_eq!(settings.keys_per_row, 8.0);

        let settings = Settings::from_items(&items(json!({
            "opacity": 0,
            "keysPerRow": "lots"
        })));
        assert_eq!(settings.opacity, 1.0, "Zero opacity falls back to the default");
        assert_eq!(settings.keys_per_row, 12.0);

        let settings = Settings::from_items(&items(json!({ "opacity": 7 })));
        assert_eq!(settings.opacity, 1.0, "Opacity is clamped");
    }

    #[test]
    fn test_null_restores_default() {
        let mut settings = Settings::default();
        settings.apply(SettingKey::Draggable, &json!(false));
        settings.apply(SettingKey::Theme, &json!("dark"));
        assert!(!settings.draggable);

        settings.apply(SettingKey::Draggable, &Value::Null);
        settings.apply(SettingKey::Theme, &Value::Null);
        assert!(settings.draggable);
        assert_eq!(settings.theme, Theme::Light);
    }

    #[test]
    fn test_flags_follow_truthiness() {
        let mut settings = Settings::default();
        settings.apply(SettingKey::Translucent, &json!(1));
        assert!(settings.translucent);
        settings.apply(SettingKey::Translucent, &json!(""));
        assert!(!settings.translucent);
        settings.apply(SettingKey::Translucent, &json!("yes"));
        assert!(settings.translucent);
    }

    #[test]
    fn test_rendering_keys() {
        let rebuilding: Vec<&str> = SettingKey::ALL
            .iter()
            .filter(|k| k.affects_rendering())
            .map(|k| k.as_str())
            .collect();
        assert_eq!(
            rebuilding,
            vec![
                "theme",
                "size",
                "opacity",
                "translucent",
                "layout",
                "keysPerRow",
                "showTransliteration",
                "keyboardColor"
            ]
        );
        assert!(!SettingKey::CustomKeys.affects_rendering());
        assert_eq!(SettingKey::from_name("closeOnBlur"), Some(SettingKey::CloseOnBlur));
        assert_eq!(SettingKey::from_name("close_on_blur"), None);
    }
}
