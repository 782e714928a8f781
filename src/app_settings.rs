// SPDX-License-Identifier: GPL-3.0-only

//! Centralized application settings and constants.

/// Reserved element id of the keyboard widget, used as the singleton guard.
pub const WIDGET_ID: &str = "arabic-keyboard-container";

/// Element id of the floating trigger icon.
pub const ICON_ID: &str = "arabic-keyboard-icon";

/// Element id of the key grid inside the widget.
pub const GRID_ID: &str = "arabic-kb-grid";

/// Element id of the injected widget stylesheet.
pub const STYLESHEET_ID: &str = "arabic-keyboard-style";

/// Local storage key holding the persisted widget position.
pub const POSITION_STORAGE_KEY: &str = "arabic_kb_pos";

/// Delay between a focus-out and the close-on-blur check, in milliseconds.
///
/// Focus-out fires for the outgoing element before the incoming element is
/// focused; the check runs after this delay so the new active element is known.
pub const SETTLE_DELAY_MS: u64 = 100;

/// Minimum distance kept between floating elements and the page edge, in pixels.
pub const PAGE_MARGIN: f64 = 8.0;

/// Default widget offset from the bottom-right viewport corner.
pub const DEFAULT_CORNER_OFFSET: &str = "20px";

/// Horizontal offset of the trigger icon from the target's right edge.
pub const ICON_OFFSET_X: f64 = 28.0;

/// Vertical offset of the trigger icon above the target's top edge.
pub const ICON_OFFSET_Y: f64 = 10.0;

/// Smallest number of key columns the grid will use.
pub const MIN_KEYS_PER_ROW: u32 = 6;

/// Largest number of key columns the grid will use.
pub const MAX_KEYS_PER_ROW: u32 = 14;

/// Column count used when the setting is unset, zero or not a number.
pub const DEFAULT_KEYS_PER_ROW: u32 = 12;

/// Gap between grid cells.
pub const GRID_GAP: &str = "6px";

/// Stacking order of the trigger icon (top of the page).
pub const ICON_Z_INDEX: &str = "2147483647";
