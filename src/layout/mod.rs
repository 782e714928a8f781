// SPDX-License-Identifier: GPL-3.0-only

//! Key layouts for the Arabic keyboard.
//!
//! A layout is an ordered sequence of key labels. Labels are graphemes
//! (`"ب"`, `"لا"`) or one of two control glyphs:
//!
//! - [`BACKSPACE`] (`⌫`): deletes the character before the caret
//! - [`SPACE`] (`␣`): inserts a literal space
//!
//! Three layouts exist: the two built-in sequences ([`STANDARD`] and
//! [`PHONETIC`]) and a custom layout built from the user's `customKeys`
//! setting, one key per line.
//!
//! # Example
//!
//! ```rust,ignore
//! use arabic_keyboard::layout::{resolve_keys, LayoutKind};
//!
//! let keys = resolve_keys(LayoutKind::Custom, "ا\nب\n\n  ت  \n");
//! assert_eq!(keys, vec!["ا", "ب", "ت"]);
//! ```

pub mod transliteration;

pub use transliteration::transliterate;

use crate::app_settings::{DEFAULT_KEYS_PER_ROW, MAX_KEYS_PER_ROW, MIN_KEYS_PER_ROW};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backspace control glyph.
pub const BACKSPACE: &str = "⌫";

/// Visual placeholder for the space key.
pub const SPACE: &str = "␣";

/// Standard Arabic (101-style) key order.
pub const STANDARD: [&str; 35] = [
    "ض", "ص", "ث", "ق", "ف", "غ", "ع", "ه", "خ", "ح", "ج", "د", //
    "ش", "س", "ي", "ب", "ل", "ا", "ت", "ن", "م", "ك", "ط", "⌫", //
    "ئ", "ء", "ؤ", "ر", "لا", "ى", "ة", "و", "ز", "ظ", "␣",
];

/// Phonetic key order, roughly following a Latin QWERTY arrangement.
pub const PHONETIC: [&str; 35] = [
    "ق", "و", "ع", "ر", "ت", "ي", "ى", "ح", "س", "د", "ف", "غ", //
    "ك", "ل", "م", "ن", "ه", "ب", "ا", "ش", "ص", "ض", "ط", "⌫", //
    "ذ", "ئ", "ء", "ؤ", "لا", "ة", "ظ", "ز", "ج", "خ", "␣",
];

// ============================================================================
// Layout Kind
// ============================================================================

/// The three selectable layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// Built-in standard Arabic order.
    #[default]
    Standard,
    /// Built-in phonetic order.
    Phonetic,
    /// User-supplied keys from the `customKeys` setting.
    Custom,
}

impl LayoutKind {
    /// Fixed cycling order used by the widget's layout button.
    pub const CYCLE: [LayoutKind; 3] = [LayoutKind::Standard, LayoutKind::Phonetic, LayoutKind::Custom];

    /// Parses a stored layout token. Unknown tokens map to [`LayoutKind::Standard`].
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token {
            "phonetic" => LayoutKind::Phonetic,
            "custom" => LayoutKind::Custom,
            _ => LayoutKind::Standard,
        }
    }

    /// Returns the storage token for this layout.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Standard => "standard",
            LayoutKind::Phonetic => "phonetic",
            LayoutKind::Custom => "custom",
        }
    }

    /// Returns the layout that follows this one in the cycle.
    #[must_use]
    pub fn next(self) -> Self {
        let index = Self::CYCLE.iter().position(|kind| *kind == self).unwrap_or(0);
        Self::CYCLE[(index + 1) % Self::CYCLE.len()]
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Key Classification
// ============================================================================

/// How a key label is rendered and applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// Inserts its label.
    Character,
    /// Inserts a space; rendered as the `␣` glyph.
    Space,
    /// Deletes backwards; rendered as a wide key.
    Backspace,
}

impl KeyRole {
    /// Classifies a key label.
    #[must_use]
    pub fn of(label: &str) -> Self {
        match label {
            SPACE | " " => KeyRole::Space,
            BACKSPACE => KeyRole::Backspace,
            _ => KeyRole::Character,
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Splits the `customKeys` setting into key labels.
///
/// Lines are split on `\n` or `\r\n`, trimmed, and blank lines are dropped.
#[must_use]
pub fn parse_custom_keys(custom_keys: &str) -> Vec<String> {
    custom_keys
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Resolves the key sequence for a layout.
///
/// The custom layout falls back to [`STANDARD`] when `custom_keys` yields no
/// keys.
#[must_use]
pub fn resolve_keys(kind: LayoutKind, custom_keys: &str) -> Vec<String> {
    let builtin: &[&str] = match kind {
        LayoutKind::Standard => &STANDARD,
        LayoutKind::Phonetic => &PHONETIC,
        LayoutKind::Custom => {
            let keys = parse_custom_keys(custom_keys);
            if !keys.is_empty() {
                return keys;
            }
            tracing::debug!("Custom layout is empty, falling back to standard keys");
            &STANDARD
        }
    };

    builtin.iter().map(|key| (*key).to_owned()).collect()
}

/// Computes the effective grid column count from the `keysPerRow` setting.
///
/// `NaN` and zero map to the default of 12. Other values are rounded and
/// clamped into `[6, 14]`.
#[must_use]
pub fn column_count(keys_per_row: f64) -> u32 {
    if keys_per_row.is_nan() || keys_per_row == 0.0 {
        return DEFAULT_KEYS_PER_ROW;
    }

    keys_per_row
        .round()
        .clamp(f64::from(MIN_KEYS_PER_ROW), f64::from(MAX_KEYS_PER_ROW)) as u32
}

// ============================================================================
// Tests
// ============================================================================
