// SPDX-License-Identifier: GPL-3.0-only

//! Trigger icon rendering.
//!
//! The icon floats over the top-right corner of the focused field and opens
//! the widget when clicked. It is positioned in page coordinates, so the
//! viewport scroll offset is added to the field's viewport-relative box.

use crate::app_settings::{ICON_ID, ICON_OFFSET_X, ICON_OFFSET_Y, ICON_Z_INDEX, PAGE_MARGIN};
use crate::dom::{ElementSpec, Rect, Viewport};
use crate::fl;
use crate::renderer::ACTION_ATTR;

/// Action value of the trigger icon.
pub const ICON_ACTION: &str = "icon";

const ICON_GLYPH: &str = "⌨️";

/// Page position `(left, top)` of the icon for a field's bounding box.
#[must_use]
pub fn icon_position(rect: Rect, viewport: Viewport) -> (f64, f64) {
    let left = (rect.right() + viewport.scroll_x - ICON_OFFSET_X).max(PAGE_MARGIN);
    let top = (rect.top + viewport.scroll_y - ICON_OFFSET_Y).max(PAGE_MARGIN);
    (left, top)
}

/// Renders the trigger icon anchored to a field's bounding box.
#[must_use]
pub fn render_icon(rect: Rect, viewport: Viewport) -> ElementSpec {
    let (left, top) = icon_position(rect, viewport);

    ElementSpec::new("div")
        .with_id(ICON_ID)
        .with_attr("aria-label", fl!("open-keyboard"))
        .with_attr(ACTION_ATTR, ICON_ACTION)
        .with_text(ICON_GLYPH)
        .with_style("position", "absolute")
        .with_style("left", format!("{}px", left))
        .with_style("top", format!("{}px", top))
        .with_style("font-size", "22px")
        .with_style("background", "#fff")
        .with_style("border", "1px solid #ccc")
        .with_style("border-radius", "6px")
        .with_style("padding", "4px")
        .with_style("cursor", "pointer")
        .with_style("box-shadow", "0 2px 6px rgba(0,0,0,0.15)")
        .with_style("z-index", ICON_Z_INDEX)
        .with_style("user-select", "none")
}
