// SPDX-License-Identifier: GPL-3.0-only

//! Theme integration for the keyboard widget.
//!
//! The widget's colors come from CSS variables in the embedded stylesheet.
//! When the user picks a `keyboardColor`, this module derives the full set of
//! variables from that single base color:
//!
//! - `--kb-bg`: the base color itself
//! - `--kb-key-bg`: key background, slightly offset from the base
//! - `--kb-key-border`: key border, further offset
//! - `--kb-text`: label color, offset the most for contrast
//!
//! Light bases (HSL lightness above 55%) derive darker shades; dark bases
//! derive lighter ones.

use crate::config::{Settings, Theme};
use palette::{Clamp, FromColor, Hsl, Srgb};

/// Lightness (percent) above which a base color counts as light.
const LIGHT_THRESHOLD: f32 = 55.0;

/// Lightness offsets (key background, border, text) for light bases.
const LIGHT_BASE_OFFSETS: (f32, f32, f32) = (-10.0, -20.0, -35.0);

/// Lightness offsets (key background, border, text) for dark bases.
const DARK_BASE_OFFSETS: (f32, f32, f32) = (8.0, 12.0, 28.0);

// ============================================================================
// Color Math
// ============================================================================

/// Parses a `#rrggbb` color. Surrounding whitespace is ignored.
#[must_use]
pub fn parse_hex(hex: &str) -> Option<Srgb<u8>> {
    let hex = hex.trim();
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    digits.parse().ok()
}

/// Formats a color as lowercase `#rrggbb`.
#[must_use]
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// HSL lightness of a color, in percent.
#[must_use]
pub fn lightness(color: Srgb<u8>) -> f32 {
    to_hsl(color).lightness * 100.0
}

/// Shifts the HSL lightness of a color by `delta` percentage points.
#[must_use]
pub fn adjust_lightness(color: Srgb<u8>, delta: f32) -> Srgb<u8> {
    let mut hsl = to_hsl(color);
    hsl.lightness = ((hsl.lightness * 100.0 + delta).clamp(0.0, 100.0)) / 100.0;
    let rgb: Srgb<f32> = Srgb::from_color(hsl);
    rgb.clamp().into_format()
}

fn to_hsl(color: Srgb<u8>) -> Hsl<palette::encoding::Srgb, f32> {
    let rgb: Srgb<f32> = color.into_format();
    Hsl::from_color(rgb)
}

// ============================================================================
// Key Palette
// ============================================================================

/// Widget colors derived from a user-chosen base color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPalette {
    pub background: String,
    pub key_background: String,
    pub key_border: String,
    pub text: String,
}

impl KeyPalette {
    /// Derives the palette from a `#rrggbb` base color.
    ///
    /// Returns `None` for empty or invalid colors, in which case the stylesheet
    /// defaults apply.
    #[must_use]
    pub fn derive(base: &str) -> Option<Self> {
        let color = parse_hex(base)?;
        let (key_bg, border, text) = if lightness(color) > LIGHT_THRESHOLD {
            LIGHT_BASE_OFFSETS
        } else {
            DARK_BASE_OFFSETS
        };

        Some(Self {
            background: to_hex(color),
            key_background: to_hex(adjust_lightness(color, key_bg)),
            key_border: to_hex(adjust_lightness(color, border)),
            text: to_hex(adjust_lightness(color, text)),
        })
    }

    /// The palette as CSS custom properties.
    #[must_use]
    pub fn css_variables(&self) -> [(&'static str, &str); 4] {
        [
            ("--kb-bg", &self.background),
            ("--kb-key-bg", &self.key_background),
            ("--kb-key-border", &self.key_border),
            ("--kb-text", &self.text),
        ]
    }
}

// ============================================================================
// Container Classes
// ============================================================================

/// CSS classes applied to the widget container for the given settings.
#[must_use]
pub fn container_classes(settings: &Settings) -> Vec<String> {
    let mut classes = Vec::with_capacity(3);
    if settings.theme == Theme::Dark {
        classes.push("arabic-kb--dark".to_owned());
    }
    classes.push(format!("arabic-kb--size-{}", settings.size.as_str()));
    if settings.translucent {
        classes.push("arabic-kb--translucent".to_owned());
    }
    classes
}
