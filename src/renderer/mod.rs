// SPDX-License-Identifier: GPL-3.0-only

//! Widget renderer for the Arabic keyboard.
//!
//! This module turns [`Settings`](crate::config::Settings) into declarative
//! [`ElementSpec`] trees that the agent hands to the host document. Nothing in
//! here touches the document itself.
//!
//! # Architecture
//!
//! - **theme**: color derivation from `keyboardColor` and container classes.
//! - **panel**: the widget container with header, empty grid and footer.
//! - **key**: individual key buttons with optional transliteration captions.
//! - **icon**: the floating trigger icon shown next to focused fields.
//!
//! Interactive elements carry a `data-kb-action` attribute naming what a click
//! on them does; key buttons also carry their label in `data-kb-key`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use arabic_keyboard::config::Settings;
//! use arabic_keyboard::layout::resolve_keys;
//! use arabic_keyboard::renderer::{render_keys, render_panel, Placement};
//!
//! let settings = Settings::default();
//! let panel = render_panel(&settings, &Placement::Corner);
//! let keys = render_keys(
//!     &resolve_keys(settings.layout, &settings.custom_keys),
//!     settings.show_transliteration,
//! );
//! ```

pub mod icon;
pub mod key;
pub mod panel;
pub mod theme;

pub use icon::{render_icon, ICON_ACTION};
pub use key::{render_key, render_keys, KEY_ACTION};
pub use panel::{
    render_grid, render_panel, Placement, CLOSE_ACTION, DRAG_ACTION, LAYOUT_ACTION,
    TRANSLIT_ACTION,
};
pub use theme::{container_classes, KeyPalette};

use crate::app_settings::STYLESHEET_ID;
use crate::dom::ElementSpec;
use rust_embed::RustEmbed;

/// Attribute naming the click action of an element.
pub const ACTION_ATTR: &str = "data-kb-action";

/// Attribute holding the label of a key button.
pub const KEY_ATTR: &str = "data-kb-key";

const STYLESHEET_FILE: &str = "keyboard.css";

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

/// The embedded widget stylesheet.
#[must_use]
pub fn stylesheet() -> Option<String> {
    let file = Assets::get(STYLESHEET_FILE)?;
    match std::str::from_utf8(file.data.as_ref()) {
        Ok(css) => Some(css.to_owned()),
        Err(err) => {
            tracing::error!("Embedded stylesheet is not UTF-8: {}", err);
            None
        }
    }
}

/// Renders the `<style>` element carrying the widget stylesheet.
#[must_use]
pub fn render_stylesheet() -> Option<ElementSpec> {
    let css = stylesheet()?;
    Some(ElementSpec::new("style").with_id(STYLESHEET_ID).with_text(css))
}
