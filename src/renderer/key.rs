// SPDX-License-Identifier: GPL-3.0-only

//! Key rendering for the keyboard grid.
//!
//! Every key is a `<button type="button">` carrying its label twice: once as
//! visible text and once in `data-kb-key`, which the agent reads back when the
//! key is clicked. Special keys get modifier classes so the stylesheet can
//! widen them.

use crate::dom::ElementSpec;
use crate::layout::{transliterate, KeyRole, SPACE};
use crate::renderer::{ACTION_ATTR, KEY_ATTR};

/// Class shared by every key button.
pub const KEY_CLASS: &str = "arabic-kb__key";

/// Modifier class of the space bar.
pub const SPACE_CLASS: &str = "arabic-kb__key--space";

/// Modifier class of wide keys (backspace).
pub const WIDE_CLASS: &str = "arabic-kb__key--wide";

/// Class of the transliteration caption under a key label.
pub const SUB_CLASS: &str = "arabic-kb__sub";

/// Action value identifying key buttons.
pub const KEY_ACTION: &str = "key";

/// Text displayed on a key.
///
/// A literal space is shown as the visible space symbol.
#[must_use]
pub fn display_label(label: &str) -> &str {
    match KeyRole::of(label) {
        KeyRole::Space => SPACE,
        _ => label,
    }
}

/// Renders a single key button.
///
/// With `show_transliteration`, the button also carries a caption with the
/// Latin transliteration of its label.
#[must_use]
pub fn render_key(label: &str, show_transliteration: bool) -> ElementSpec {
    let mut button = ElementSpec::new("button")
        .with_attr("type", "button")
        .with_attr(ACTION_ATTR, KEY_ACTION)
        .with_attr(KEY_ATTR, label)
        .with_class(KEY_CLASS)
        .with_style("user-select", "none")
        .with_text(display_label(label));

    match KeyRole::of(label) {
        KeyRole::Space => button = button.with_class(SPACE_CLASS),
        KeyRole::Backspace => button = button.with_class(WIDE_CLASS),
        KeyRole::Character => {}
    }

    if show_transliteration {
        button = button.with_child(
            ElementSpec::new("div")
                .with_class(SUB_CLASS)
                .with_text(transliterate(label)),
        );
    }

    button
}

/// Renders one button per label, in order.
#[must_use]
pub fn render_keys(labels: &[String], show_transliteration: bool) -> Vec<ElementSpec> {
    labels
        .iter()
        .map(|label| render_key(label, show_transliteration))
        .collect()
}
