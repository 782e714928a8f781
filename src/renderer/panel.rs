// SPDX-License-Identifier: GPL-3.0-only

//! Widget panel rendering.
//!
//! The panel is the widget container with three sections:
//!
//! ```text
//! +--------------------------------------------------+
//! | header: ☰ title            [Layout] [⇆] [✕]      |
//! +--------------------------------------------------+
//! | body:   empty key grid (filled by the agent)     |
//! +--------------------------------------------------+
//! | footer: Layout: standard   Theme: light          |
//! +--------------------------------------------------+
//! ```
//!
//! The grid is rendered empty; keys are appended once the container is
//! attached, so the container can be inspected before population.

use crate::app_settings::{DEFAULT_CORNER_OFFSET, GRID_GAP, GRID_ID, WIDGET_ID};
use crate::config::Settings;
use crate::dom::ElementSpec;
use crate::fl;
use crate::layout::column_count;
use crate::renderer::theme::{container_classes, KeyPalette};
use crate::renderer::ACTION_ATTR;
use crate::state::WidgetPosition;

/// Action value of the drag handle.
pub const DRAG_ACTION: &str = "drag";

/// Action value of the layout cycle button.
pub const LAYOUT_ACTION: &str = "layout";

/// Action value of the transliteration toggle.
pub const TRANSLIT_ACTION: &str = "translit";

/// Action value of the close button.
pub const CLOSE_ACTION: &str = "close";

/// Toggle glyph while transliteration is shown.
const TRANSLIT_ON: &str = "⇄";

/// Toggle glyph while transliteration is hidden.
const TRANSLIT_OFF: &str = "⇆";

const DRAG_GLYPH: &str = "☰";
const CLOSE_GLYPH: &str = "✕";

/// Where a newly opened widget is placed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Placement {
    /// Offset from the bottom-right viewport corner.
    #[default]
    Corner,
    /// A persisted position from an earlier drag.
    Persisted(WidgetPosition),
}

// ============================================================================
// Panel
// ============================================================================

/// Renders the widget container with an empty grid.
#[must_use]
pub fn render_panel(settings: &Settings, placement: &Placement) -> ElementSpec {
    let mut container = ElementSpec::new("div")
        .with_id(WIDGET_ID)
        .with_attr("dir", "rtl")
        .with_attr("lang", "ar")
        .with_style("opacity", settings.opacity.to_string());

    for class in container_classes(settings) {
        container = container.with_class(class);
    }

    if let Some(palette) = KeyPalette::derive(&settings.keyboard_color) {
        for (variable, value) in palette.css_variables() {
            container = container.with_style(variable, value);
        }
    }

    container = match placement {
        Placement::Persisted(position) => container
            .with_style("position", "fixed")
            .with_style("left", position.left.as_str())
            .with_style("top", position.top.as_str())
            .with_style("right", "auto")
            .with_style("bottom", "auto"),
        Placement::Corner => container
            .with_style("bottom", DEFAULT_CORNER_OFFSET)
            .with_style("right", DEFAULT_CORNER_OFFSET),
    };

    container
        .with_child(render_header(settings))
        .with_child(ElementSpec::new("div").with_class("arabic-kb__body").with_child(render_grid(settings)))
        .with_child(render_footer(settings))
}

/// Renders the empty key grid.
#[must_use]
pub fn render_grid(settings: &Settings) -> ElementSpec {
    let columns = column_count(settings.keys_per_row);
    ElementSpec::new("div")
        .with_id(GRID_ID)
        .with_class("arabic-kb__grid")
        .with_style("grid-template-columns", format!("repeat({}, 1fr)", columns))
        .with_style("gap", GRID_GAP)
}

// ============================================================================
// Sections
// ============================================================================

fn render_header(settings: &Settings) -> ElementSpec {
    let mut handle = ElementSpec::new("div")
        .with_class("arabic-kb__drag-handle")
        .with_attr("title", fl!("drag-handle"))
        .with_text(DRAG_GLYPH);
    if settings.draggable {
        handle = handle.with_attr(ACTION_ATTR, DRAG_ACTION);
    }

    let title = ElementSpec::new("strong")
        .with_class("arabic-kb__title")
        .with_text(fl!("keyboard-title"));

    let translit_glyph = if settings.show_transliteration {
        TRANSLIT_ON
    } else {
        TRANSLIT_OFF
    };

    let actions = ElementSpec::new("div")
        .with_class("arabic-kb__actions")
        .with_child(header_button(LAYOUT_ACTION, fl!("change-layout"), fl!("layout-button")))
        .with_child(header_button(TRANSLIT_ACTION, fl!("toggle-transliteration"), translit_glyph))
        .with_child(header_button(CLOSE_ACTION, fl!("close"), CLOSE_GLYPH));

    ElementSpec::new("div")
        .with_class("arabic-kb__header")
        .with_child(
            ElementSpec::new("div")
                .with_class("arabic-kb__brand")
                .with_child(handle)
                .with_child(title),
        )
        .with_child(actions)
}

fn header_button(action: &str, title: String, label: impl Into<String>) -> ElementSpec {
    ElementSpec::new("button")
        .with_attr("type", "button")
        .with_attr("title", title)
        .with_attr(ACTION_ATTR, action)
        .with_class("arabic-kb__button")
        .with_text(label)
}

fn render_footer(settings: &Settings) -> ElementSpec {
    let layout = settings.layout.as_str();
    let theme = settings.theme.as_str();
    ElementSpec::new("div")
        .with_class("arabic-kb__footer")
        .with_child(ElementSpec::new("div").with_text(fl!("footer-layout", layout = layout)))
        .with_child(ElementSpec::new("div").with_text(fl!("footer-theme", theme = theme)))
}
