// SPDX-License-Identifier: GPL-3.0-only

//! Dragging the widget by its handle.
//!
//! A drag session starts with a primary-button press on the drag handle and
//! ends with the next pointer release. While it is active, pointer moves
//! reposition the widget with fixed positioning, kept at least
//! [`PAGE_MARGIN`] pixels inside the viewport.

use super::PageAgent;
use crate::app_settings::PAGE_MARGIN;
use crate::dom::{ElementId, HostDocument, Rect, Viewport};
use crate::renderer::DRAG_ACTION;
use crate::state::{LocalStorage, WidgetPosition};
use crate::storage::SettingsStore;

/// Primary pointer button.
const PRIMARY_BUTTON: u16 = 0;

/// An active drag of the widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    origin_x: f64,
    origin_y: f64,
    start: Rect,
}

impl DragSession {
    /// Starts a drag at pointer `(x, y)` with the widget at `start`.
    #[must_use]
    pub fn begin(start: Rect, x: f64, y: f64) -> Self {
        Self {
            origin_x: x,
            origin_y: y,
            start,
        }
    }

    /// Widget `(left, top)` for the pointer at `(x, y)`.
    #[must_use]
    pub fn position(&self, x: f64, y: f64, viewport: Viewport) -> (f64, f64) {
        let left = (self.start.left + x - self.origin_x)
            .max(PAGE_MARGIN)
            .min(viewport.width - self.start.width - PAGE_MARGIN);
        let top = (self.start.top + y - self.origin_y)
            .max(PAGE_MARGIN)
            .min(viewport.height - self.start.height - PAGE_MARGIN);
        (left, top)
    }
}

impl<D, S, P> PageAgent<D, S, P>
where
    D: HostDocument,
    S: SettingsStore,
    P: LocalStorage,
{
    /// Starts a drag when the primary button goes down on the drag handle.
    pub fn on_pointer_down(&mut self, element: ElementId, button: u16, x: f64, y: f64) {
        if button != PRIMARY_BUTTON || !self.settings.draggable {
            return;
        }
        let Some(widget) = self.widget else {
            return;
        };
        if self.action_at(element).map(|(_, action)| action).as_deref() != Some(DRAG_ACTION) {
            return;
        }
        let Some(rect) = self.document.bounding_rect(widget) else {
            return;
        };

        tracing::debug!("Drag started at ({}, {})", x, y);
        self.drag = Some(DragSession::begin(rect, x, y));
    }

    /// Moves the widget while a drag is active.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        let (Some(session), Some(widget)) = (self.drag, self.widget) else {
            return;
        };

        let (left, top) = session.position(x, y, self.document.viewport());
        let styles = [
            ("left", format!("{}px", left)),
            ("top", format!("{}px", top)),
            ("right", "auto".to_owned()),
            ("bottom", "auto".to_owned()),
            ("position", "fixed".to_owned()),
        ];
        for (property, value) in &styles {
            if let Err(e) = self.document.set_style(widget, property, value) {
                tracing::error!("Failed to move widget: {}", e);
                self.drag = None;
                return;
            }
        }
    }

    /// Ends the drag, persisting the position when enabled.
    pub fn on_pointer_up(&mut self) {
        if self.drag.take().is_none() {
            return;
        }
        tracing::debug!("Drag ended");

        if !self.settings.persist_position {
            return;
        }
        let Some(widget) = self.widget else {
            return;
        };
        let position = WidgetPosition {
            left: self.document.style(widget, "left").unwrap_or_default(),
            top: self.document.style(widget, "top").unwrap_or_default(),
        };
        position.save(&mut self.local_storage);
    }

    /// Whether a drag session is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}
