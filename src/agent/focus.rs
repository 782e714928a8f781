// SPDX-License-Identifier: GPL-3.0-only

//! Focus tracking and the trigger icon.

use super::{PageAgent, TriggerIcon};
use crate::dom::{classify, ElementId, HostDocument};
use crate::renderer::render_icon;
use crate::state::LocalStorage;
use crate::storage::SettingsStore;

impl<D, S, P> PageAgent<D, S, P>
where
    D: HostDocument,
    S: SettingsStore,
    P: LocalStorage,
{
    /// Handles focus entering `element`.
    ///
    /// Text-accepting elements become the focus target. While no widget is
    /// open they get the trigger icon when `showIcon` is set. With `autoOpen`
    /// the widget opens for them. Other elements are ignored.
    pub async fn on_focus_in(&mut self, element: ElementId) {
        let Some(info) = self.document.describe(element) else {
            return;
        };
        if !classify(&info).accepts_text() {
            return;
        }

        tracing::debug!("Focus target is now element {}", element.raw());
        self.target = Some(element);

        if self.settings.show_icon && self.widget.is_none() {
            self.show_icon(element);
        }
        if self.settings.auto_open {
            self.reload_settings().await;
            self.open_widget();
        }
    }

    /// Handles focus leaving an element.
    ///
    /// Returns `true` when the widget may need to close, in which case the
    /// caller runs [`settle_blur`](Self::settle_blur) after the settle delay.
    #[must_use]
    pub fn on_focus_out(&mut self, _element: ElementId) -> bool {
        self.widget.is_some() && self.settings.close_on_blur
    }

    /// Closes the widget unless focus settled on the target or the widget.
    pub fn settle_blur(&mut self) {
        let Some(widget) = self.widget else {
            return;
        };

        if let Some(active) = self.document.active_element() {
            if Some(active) == self.target || self.document.contains(widget, active) {
                return;
            }
        }

        tracing::debug!("Focus left the target and the widget, closing");
        self.close_widget();
    }

    /// Shows the trigger icon next to `target`, replacing any previous icon.
    ///
    /// Failures are logged; focus handling carries on without an icon.
    pub fn show_icon(&mut self, target: ElementId) {
        self.remove_icon();

        let Some(rect) = self.document.bounding_rect(target) else {
            return;
        };
        let spec = render_icon(rect, self.document.viewport());

        match self.document.append_to_body(spec) {
            Ok(element) => self.icon = Some(TriggerIcon { element, target }),
            Err(e) => tracing::error!("Failed to show trigger icon: {}", e),
        }
    }

    /// Removes the trigger icon, if shown.
    pub fn remove_icon(&mut self) {
        if let Some(icon) = self.icon.take() {
            self.document.remove(icon.element);
        }
    }
}
