// SPDX-License-Identifier: GPL-3.0-only

//! The page agent.
//!
//! One [`PageAgent`] runs per page. It tracks which text field has focus,
//! shows the trigger icon, opens and closes the keyboard widget, and types
//! into the focus target when keys are pressed.
//!
//! # Architecture
//!
//! - **focus**: focus-in/out handling, the settle check and the trigger icon.
//! - **widget**: open, close and rebuild of the widget plus header actions.
//! - **insertion**: applying a key label to the focus target.
//! - **drag**: repositioning the widget by its handle.
//! - **runtime**: the event loop multiplexing page events, settings changes,
//!   open requests and the settle timer.
//!
//! The agent owns all of its state; handlers are plain methods called from
//! [`PageAgent::handle_event`], so tests can drive them without a runtime.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut agent = PageAgent::new(document, store, MemoryLocalStorage::new());
//! agent.start().await;
//! agent.run(events, requests).await;
//! ```

mod drag;
mod focus;
pub mod insertion;
mod runtime;
mod widget;

pub use drag::DragSession;
pub use insertion::{apply_keystroke, EditOutcome, Keystroke};

use crate::app_settings::STYLESHEET_ID;
use crate::config::{SettingKey, Settings};
use crate::dom::{ElementId, HostDocument};
use crate::messaging::{AgentReply, AgentRequest, RequestEnvelope};
use crate::renderer::{
    render_stylesheet, ACTION_ATTR, CLOSE_ACTION, ICON_ACTION, KEY_ACTION, KEY_ATTR,
    LAYOUT_ACTION, TRANSLIT_ACTION,
};
use crate::state::LocalStorage;
use crate::storage::{SettingsChange, SettingsStore, StorageError};

// ============================================================================
// Events
// ============================================================================

/// Page events delivered to the agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    /// Focus moved into an element.
    FocusIn(ElementId),
    /// Focus left an element.
    FocusOut(ElementId),
    /// An element was clicked.
    Click(ElementId),
    /// A pointer button went down over an element, at viewport `(x, y)`.
    PointerDown {
        target: ElementId,
        button: u16,
        x: f64,
        y: f64,
    },
    /// The pointer moved to viewport `(x, y)`.
    PointerMove { x: f64, y: f64 },
    /// The pointer button was released.
    PointerUp,
}

/// Work left for the event loop after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Followup {
    None,
    /// Run the blur check once focus has settled.
    SettleCheck,
}

/// The trigger icon and the field it was shown for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerIcon {
    pub element: ElementId,
    pub target: ElementId,
}

// ============================================================================
// Page Agent
// ============================================================================

/// Per-page keyboard controller.
///
/// Generic over the host document, the settings store and the page-local
/// storage used for the widget position.
#[derive(Debug)]
pub struct PageAgent<D, S, P> {
    document: D,
    store: S,
    local_storage: P,
    settings: Settings,
    /// The field keystrokes are applied to.
    target: Option<ElementId>,
    widget: Option<ElementId>,
    icon: Option<TriggerIcon>,
    drag: Option<DragSession>,
}

impl<D, S, P> PageAgent<D, S, P>
where
    D: HostDocument,
    S: SettingsStore,
    P: LocalStorage,
{
    /// Creates an agent with default settings. Call [`start`](Self::start)
    /// before delivering events.
    pub fn new(document: D, store: S, local_storage: P) -> Self {
        Self {
            document,
            store,
            local_storage,
            settings: Settings::default(),
            target: None,
            widget: None,
            icon: None,
            drag: None,
        }
    }

    /// Loads settings, installs the stylesheet and adopts an already focused
    /// field as the focus target.
    pub async fn start(&mut self) {
        self.reload_settings().await;
        self.install_stylesheet();

        if let Some(active) = self.document.active_element() {
            self.on_focus_in(active).await;
        }
        tracing::info!("Page agent started");
    }

    /// Re-reads settings from the store. Unreadable storage yields defaults.
    pub async fn reload_settings(&mut self) {
        self.settings = match self.store.get().await {
            Ok(items) => Settings::from_items(&items),
            Err(StorageError::Unavailable) => {
                tracing::warn!("Settings storage unavailable, using defaults");
                Settings::default()
            }
            Err(e) => {
                tracing::warn!("Failed to load settings, using defaults: {}", e);
                Settings::default()
            }
        };
    }

    /// Applies a change notification from the settings store.
    ///
    /// An open widget is rebuilt when a rendering setting changed value, and
    /// the trigger icon is removed once `showIcon` is off.
    pub fn on_settings_changed(&mut self, change: SettingsChange) {
        let mut rebuild = false;
        for (name, value) in &change.changes {
            let Some(key) = SettingKey::from_name(name) else {
                continue;
            };
            let before = self.settings.value_of(key);
            self.settings.apply(key, value);
            if key.affects_rendering() && self.settings.value_of(key) != before {
                rebuild = true;
            }
        }

        if !self.settings.show_icon {
            self.remove_icon();
        }
        if rebuild && self.widget.is_some() {
            tracing::debug!("Rendering settings changed, rebuilding widget");
            self.rebuild_widget();
        }
    }

    /// Dispatches a page event to its handler.
    pub async fn handle_event(&mut self, event: PageEvent) -> Followup {
        match event {
            PageEvent::FocusIn(element) => self.on_focus_in(element).await,
            PageEvent::FocusOut(element) => {
                if self.on_focus_out(element) {
                    return Followup::SettleCheck;
                }
            }
            PageEvent::Click(element) => self.handle_click(element).await,
            PageEvent::PointerDown { target, button, x, y } => {
                self.on_pointer_down(target, button, x, y);
            }
            PageEvent::PointerMove { x, y } => self.on_pointer_move(x, y),
            PageEvent::PointerUp => self.on_pointer_up(),
        }
        Followup::None
    }

    /// Handles a click on the widget or the trigger icon.
    ///
    /// Clicks elsewhere on the page are ignored.
    pub async fn handle_click(&mut self, element: ElementId) {
        let Some((source, action)) = self.action_at(element) else {
            return;
        };

        match action.as_str() {
            KEY_ACTION => {
                let label = self.document.attribute(source, KEY_ATTR).unwrap_or_default();
                if let Err(e) = apply_keystroke(&mut self.document, self.target, &label) {
                    tracing::error!("Failed to apply key {:?}: {}", label, e);
                }
            }
            LAYOUT_ACTION => self.cycle_layout().await,
            TRANSLIT_ACTION => self.toggle_transliteration().await,
            CLOSE_ACTION => self.close_widget(),
            ICON_ACTION => {
                let Some(icon) = self.icon else {
                    return;
                };
                self.reload_settings().await;
                self.target = Some(icon.target);
                self.open_widget();
            }
            _ => {}
        }
    }

    /// Answers a request from the control panel.
    pub async fn handle_request(&mut self, envelope: RequestEnvelope) {
        match envelope.request {
            AgentRequest::OpenKeyboard => {
                self.reload_settings().await;
                self.open_widget();
            }
        }
        envelope.respond(AgentReply::ok());
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The current focus target.
    pub fn target(&self) -> Option<ElementId> {
        self.target
    }

    /// The open widget's container.
    pub fn widget(&self) -> Option<ElementId> {
        self.widget
    }

    pub fn icon(&self) -> Option<TriggerIcon> {
        self.icon
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn install_stylesheet(&mut self) {
        if self.document.element_by_id(STYLESHEET_ID).is_some() {
            return;
        }
        let Some(style) = render_stylesheet() else {
            tracing::error!("Widget stylesheet is missing from the build");
            return;
        };
        if let Err(e) = self.document.append_to_head(style) {
            tracing::error!("Failed to install widget stylesheet: {}", e);
        }
    }

    /// Finds the nearest element at or above `element` carrying an action,
    /// limited to the widget and the trigger icon.
    fn action_at(&self, element: ElementId) -> Option<(ElementId, String)> {
        let owned = self.widget.is_some_and(|w| self.document.contains(w, element))
            || self.icon.is_some_and(|i| self.document.contains(i.element, element));
        if !owned {
            return None;
        }

        let mut current = Some(element);
        while let Some(node) = current {
            if let Some(action) = self.document.attribute(node, ACTION_ATTR) {
                return Some((node, action));
            }
            current = self.document.parent(node);
        }
        None
    }
}
