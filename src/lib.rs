// SPDX-License-Identifier: GPL-3.0-only

//! Arabic Keyboard - an on-screen Arabic keyboard for web page text fields
//!
//! This crate provides a floating virtual keyboard that types Arabic into the
//! focused text field of a host page, plus the control panel that edits its
//! settings.
//!
//! # Architecture
//!
//! The system consists of two surfaces sharing a settings store:
//!
//! 1. **Page Agent** (`agent`): runs against a host page through the
//!    [`HostDocument`](dom::HostDocument) trait. Tracks the focused field,
//!    shows a trigger icon, opens the keyboard widget and inserts text.
//!
//! 2. **Control Panel** (`control_panel`): a settings form that writes to the
//!    store and can ask the page agent to open its widget.
//!
//! Settings changes reach the agent as store notifications; open requests
//! travel over the `messaging` channel.
//!
//! # Modules
//!
//! - `agent`: Page agent, event loop and text insertion
//! - `app_settings`: Centralized constants (element ids, delays, bounds)
//! - `config`: Typed user settings with lenient coercion
//! - `control_panel`: Settings form bound to the store
//! - `dom`: Host document abstraction and the in-memory document
//! - `i18n`: Localization support using fluent translations
//! - `layout`: Built-in layouts, custom keys and transliteration
//! - `messaging`: Request channel from the control panel to the agent
//! - `renderer`: Widget, key and icon element rendering
//! - `state`: Widget position persistence
//! - `storage`: Settings store trait with memory and JSON file backends

pub mod agent;
pub mod app_settings;
pub mod config;
pub mod control_panel;
pub mod dom;
pub mod i18n;
pub mod layout;
pub mod messaging;
pub mod renderer;
pub mod state;
pub mod storage;

// Re-export the fl! macro for localization
pub use crate::i18n::LANGUAGE_LOADER;

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod integration_tests {
    use crate::agent::{PageAgent, PageEvent};
    use crate::app_settings::{GRID_ID, ICON_ID, POSITION_STORAGE_KEY, WIDGET_ID};
    use crate::config::SettingsMap;
    use crate::dom::{ElementId, ElementSpec, HostDocument, MemoryDocument, Rect, TextRange, Viewport};
    use crate::messaging::{self, AgentReply, AgentRequest};
    use crate::renderer::key::KEY_CLASS;
    use crate::renderer::{ACTION_ATTR, KEY_ATTR, LAYOUT_ACTION, TRANSLIT_ACTION};
    use crate::state::{LocalStorage, MemoryLocalStorage};
    use crate::storage::{MemorySettingsStore, SettingsStore};
    use futures::channel::mpsc;
    use futures::StreamExt;
    use serde_json::{json, Value};
    use std::time::Duration;

    type TestAgent = PageAgent<MemoryDocument, MemorySettingsStore, MemoryLocalStorage>;

    fn items(value: Value) -> SettingsMap {
        value.as_object().cloned().unwrap_or_default()
    }

    /// Builds a started agent over `doc` with the given stored settings.
    async fn started_agent(doc: &MemoryDocument, stored: Value) -> TestAgent {
        let store = MemorySettingsStore::with_items(items(stored));
        let mut agent = PageAgent::new(doc.clone(), store, MemoryLocalStorage::new());
        agent.start().await;
        agent
    }

    /// Key buttons of the open widget, in order.
    fn keys(doc: &MemoryDocument) -> Vec<ElementId> {
        doc.elements_with_class(KEY_CLASS)
    }

    fn key_labeled(doc: &MemoryDocument, label: &str) -> ElementId {
        keys(doc)
            .into_iter()
            .find(|k| doc.attribute(*k, KEY_ATTR).as_deref() == Some(label))
            .unwrap_or_else(|| panic!("No key labeled {:?}", label))
    }

    fn action_button(doc: &MemoryDocument, widget: ElementId, action: &str) -> ElementId {
        let mut pending = vec![widget];
        while let Some(element) = pending.pop() {
            if doc.attribute(element, ACTION_ATTR).as_deref() == Some(action) {
                return element;
            }
            pending.extend(doc.children(element));
        }
        panic!("No {:?} button in the widget", action);
    }

    /// Integration Test 1: Rendered key count matches the layout
    ///
    /// Built-in layouts render all 35 keys; a custom layout renders one key
    /// per non-blank line and falls back to standard when blank.
    #[tokio::test]
    async fn test_key_count_per_layout() {
        let cases = [
            (json!({}), 35),
            (json!({ "layout": "phonetic" }), 35),
            (json!({ "layout": "custom", "customKeys": "ا\n\n  ب  \r\nت\n" }), 3),
            (json!({ "layout": "custom", "customKeys": "  \n " }), 35),
        ];

        for (stored, expected) in cases {
            let doc = MemoryDocument::new();
            let mut agent = started_agent(&doc, stored.clone()).await;
            assert!(agent.open_widget());

            assert_eq!(keys(&doc).len(), expected, "Key count for {}", stored);
            let grid = doc.element_by_id(GRID_ID).expect("grid exists");
            assert_eq!(doc.children(grid).len(), expected);
        }
    }

    /// Integration Test 2: Open and close are idempotent
    #[tokio::test]
    async fn test_open_close_idempotent() {
        let doc = MemoryDocument::new();
        let mut agent = started_agent(&doc, json!({})).await;

        agent.close_widget();
        assert_eq!(agent.widget(), None, "Closing a closed widget does nothing");

        assert!(agent.open_widget());
        assert!(!agent.open_widget(), "Second open is a no-op");
        assert_eq!(doc.count_by_id(WIDGET_ID), 1);

        agent.close_widget();
        agent.close_widget();
        assert_eq!(doc.count_by_id(WIDGET_ID), 0);
        assert_eq!(agent.widget(), None);
    }

    /// Integration Test 3: Rebuild keeps the widget where it was
    #[tokio::test]
    async fn test_rebuild_preserves_position() {
        let mut doc = MemoryDocument::new();
        let mut agent = started_agent(&doc, json!({})).await;
        agent.open_widget();

        let widget = agent.widget().expect("widget open");
        for (property, value) in [
            ("left", "123px"),
            ("top", "45px"),
            ("right", "auto"),
            ("bottom", "auto"),
            ("transform", "scale(0.9)"),
        ] {
            doc.set_style(widget, property, value).unwrap();
        }

        agent.rebuild_widget();

        let rebuilt = agent.widget().expect("widget reopened");
        assert_ne!(rebuilt, widget, "Rebuild replaces the container");
        assert_eq!(doc.count_by_id(WIDGET_ID), 1);
        assert_eq!(doc.style(rebuilt, "left").as_deref(), Some("123px"));
        assert_eq!(doc.style(rebuilt, "top").as_deref(), Some("45px"));
        assert_eq!(doc.style(rebuilt, "right").as_deref(), Some("auto"));
        assert_eq!(doc.style(rebuilt, "bottom").as_deref(), Some("auto"));
        assert_eq!(doc.style(rebuilt, "transform").as_deref(), Some("scale(0.9)"));
    }

    /// Integration Test 4: Typing through the widget's keys
    ///
    /// Clicking keys edits the focus target at its caret and notifies the page.
    #[tokio::test]
    async fn test_typing_through_keys() {
        let doc = MemoryDocument::new();
        let field = doc.create_input("text");
        let mut agent = started_agent(&doc, json!({})).await;

        agent.handle_event(PageEvent::FocusIn(field)).await;
        agent.open_widget();

        doc.set_field_state(field, "hllo", TextRange::caret(1));
        agent.handle_event(PageEvent::Click(key_labeled(&doc, "ا"))).await;
        assert_eq!(doc.value(field).as_deref(), Some("hاllo"));
        assert_eq!(doc.selection_range(field), Some(TextRange::caret(2)));

        doc.set_field_state(field, "ا", TextRange::caret(1));
        agent.handle_event(PageEvent::Click(key_labeled(&doc, "⌫"))).await;
        assert_eq!(doc.value(field).as_deref(), Some(""));
        assert_eq!(doc.selection_range(field), Some(TextRange::caret(0)));

        agent.handle_event(PageEvent::Click(key_labeled(&doc, "␣"))).await;
        assert_eq!(doc.value(field).as_deref(), Some(" "));
        assert_eq!(doc.input_event_count(field), 3);
        assert_eq!(doc.active_element(), Some(field));
    }

    /// Integration Test 4b: Clicking a key's caption presses the key
    #[tokio::test]
    async fn test_caption_click_presses_key() {
        let doc = MemoryDocument::new();
        let region = doc.create_editable("div");
        let mut agent = started_agent(&doc, json!({ "showTransliteration": true })).await;
        agent.handle_event(PageEvent::FocusIn(region)).await;
        agent.open_widget();

        let caption = doc.children(key_labeled(&doc, "ش"))[0];
        assert_eq!(doc.text_content(caption), "sh");
        agent.handle_event(PageEvent::Click(caption)).await;

        assert_eq!(doc.text_content(region), "ش");
        assert_eq!(doc.input_event_count(region), 1);
    }

    /// Integration Test 5: Keys without a focus target are dropped
    #[tokio::test]
    async fn test_keystroke_without_target() {
        let doc = MemoryDocument::new();
        let field = doc.create_textarea();
        let mut agent = started_agent(&doc, json!({})).await;
        agent.open_widget();

        agent.handle_event(PageEvent::Click(key_labeled(&doc, "ب"))).await;

        assert_eq!(agent.target(), None);
        assert_eq!(doc.value(field).as_deref(), Some(""));
        assert_eq!(doc.input_event_count(field), 0);
    }

    /// Integration Test 6: Focus leaving for another element closes the widget
    ///
    /// The close only happens once the settle delay has passed.
    #[tokio::test(start_paused = true)]
    async fn test_blur_closes_after_settle_delay() {
        let doc = MemoryDocument::new();
        let field = doc.create_input("text");
        let button = doc.create_element(ElementSpec::new("button"));
        let mut agent = started_agent(&doc, json!({})).await;
        agent.handle_event(PageEvent::FocusIn(field)).await;
        agent.open_widget();

        let (events_tx, events_rx) = mpsc::unbounded();
        let (_messenger, requests) = messaging::channel(1);
        let mut host = doc.clone();

        let script = async move {
            host.focus(button).unwrap();
            events_tx.unbounded_send(PageEvent::FocusOut(field)).unwrap();
            events_tx.unbounded_send(PageEvent::FocusIn(button)).unwrap();

            tokio::time::sleep(Duration::from_millis(50)).await;
            assert_eq!(host.count_by_id(WIDGET_ID), 1, "Still open before the delay");

            tokio::time::sleep(Duration::from_millis(100)).await;
            assert_eq!(host.count_by_id(WIDGET_ID), 0, "Closed after the delay");
            drop(events_tx);
        };
        futures::join!(agent.run(events_rx, requests), script);

        assert_eq!(agent.widget(), None);
    }

    /// Integration Test 7: Focus moving into the widget keeps it open
    #[tokio::test(start_paused = true)]
    async fn test_widget_click_does_not_close() {
        let doc = MemoryDocument::new();
        let field = doc.create_input("text");
        let mut agent = started_agent(&doc, json!({})).await;
        agent.handle_event(PageEvent::FocusIn(field)).await;
        agent.open_widget();

        let (events_tx, events_rx) = mpsc::unbounded();
        let (_messenger, requests) = messaging::channel(1);
        let mut host = doc.clone();
        let key = key_labeled(&doc, "س");

        let script = async move {
            host.focus(key).unwrap();
            events_tx.unbounded_send(PageEvent::FocusOut(field)).unwrap();
            events_tx.unbounded_send(PageEvent::FocusIn(key)).unwrap();
            events_tx.unbounded_send(PageEvent::Click(key)).unwrap();

            tokio::time::sleep(Duration::from_millis(500)).await;
            assert_eq!(host.count_by_id(WIDGET_ID), 1, "Widget stays open");
            assert_eq!(host.value(field).as_deref(), Some("س"));
            drop(events_tx);
        };
        futures::join!(agent.run(events_rx, requests), script);

        assert!(agent.widget().is_some());
        assert_eq!(agent.target(), Some(field));
    }

    /// Integration Test 8: Keyboard color flows into the widget variables
    #[tokio::test]
    async fn test_keyboard_color_variables() {
        let doc = MemoryDocument::new();
        let mut agent = started_agent(&doc, json!({ "keyboardColor": "#ffffff" })).await;
        agent.open_widget();
        let widget = agent.widget().expect("widget open");

        assert_eq!(doc.style(widget, "--kb-bg").as_deref(), Some("#ffffff"));
        let key_bg = doc.style(widget, "--kb-key-bg").expect("key background set");
        let text = doc.style(widget, "--kb-text").expect("text color set");
        assert!(key_bg.as_str() < "#ffffff", "Key background darker than white");
        assert!(text.as_str() < key_bg.as_str(), "Text darker than key background");

        let plain = MemoryDocument::new();
        let mut agent = started_agent(&plain, json!({ "keyboardColor": "#12" })).await;
        agent.open_widget();
        let widget = agent.widget().expect("widget open");
        assert_eq!(plain.style(widget, "--kb-bg"), None, "Invalid colors set no variables");
    }

    /// Integration Test 9: Settings changes rebuild the open widget
    #[tokio::test]
    async fn test_settings_change_rebuilds_widget() {
        let doc = MemoryDocument::new();
        let store = MemorySettingsStore::new();
        let mut changes = store.subscribe();
        let mut agent = PageAgent::new(doc.clone(), store.clone(), MemoryLocalStorage::new());
        agent.start().await;
        agent.open_widget();
        let first = agent.widget().expect("widget open");

        // A non-rendering setting leaves the widget alone.
        store.set(items(json!({ "autoOpen": true }))).await.unwrap();
        agent.on_settings_changed(changes.next().await.expect("change delivered"));
        assert_eq!(agent.widget(), Some(first));

        store
            .set(items(json!({ "keysPerRow": "8", "theme": "dark" })))
            .await
            .unwrap();
        agent.on_settings_changed(changes.next().await.expect("change delivered"));

        let rebuilt = agent.widget().expect("widget reopened");
        assert_ne!(rebuilt, first);
        assert!(doc.has_class(rebuilt, "arabic-kb--dark"));
        let grid = doc.element_by_id(GRID_ID).expect("grid exists");
        assert_eq!(
            doc.style(grid, "grid-template-columns").as_deref(),
            Some("repeat(8, 1fr)")
        );
    }

    /// Integration Test 10: Header buttons cycle the layout and toggle captions
    #[tokio::test]
    async fn test_header_actions_persist() {
        let doc = MemoryDocument::new();
        let store = MemorySettingsStore::new();
        let mut agent = PageAgent::new(doc.clone(), store.clone(), MemoryLocalStorage::new());
        agent.start().await;
        agent.open_widget();

        let widget = agent.widget().expect("widget open");
        agent
            .handle_event(PageEvent::Click(action_button(&doc, widget, LAYOUT_ACTION)))
            .await;
        assert_eq!(store.items()["layout"], json!("phonetic"));
        assert!(keys(&doc).iter().any(|k| doc.attribute(*k, KEY_ATTR).as_deref() == Some("ذ")));

        let widget = agent.widget().expect("widget reopened");
        agent
            .handle_event(PageEvent::Click(action_button(&doc, widget, TRANSLIT_ACTION)))
            .await;
        assert_eq!(store.items()["showTransliteration"], json!(true));
        assert_eq!(doc.elements_with_class("arabic-kb__sub").len(), 35);

        // Two more cycles wrap back around to standard.
        for _ in 0..2 {
            let widget = agent.widget().expect("widget open");
            agent
                .handle_event(PageEvent::Click(action_button(&doc, widget, LAYOUT_ACTION)))
                .await;
        }
        assert_eq!(store.items()["layout"], json!("standard"));
    }

    /// Integration Test 11: The control panel opens the widget over messaging
    #[tokio::test]
    async fn test_open_request_replies_ok() {
        let doc = MemoryDocument::new();
        let store = MemorySettingsStore::new();
        let mut agent = PageAgent::new(doc.clone(), store.clone(), MemoryLocalStorage::new());
        agent.start().await;

        // Settings written after start are picked up by the open request.
        store.set(items(json!({ "size": "large" }))).await.unwrap();

        let (messenger, requests) = messaging::channel(4);
        let (events_tx, events_rx) = mpsc::unbounded::<PageEvent>();
        let script = async move {
            let reply = messenger.send(AgentRequest::OpenKeyboard).await;
            drop(events_tx);
            reply
        };
        let ((), reply) = futures::join!(agent.run(events_rx, requests), script);

        assert_eq!(reply, Ok(AgentReply::ok()));
        let widget = agent.widget().expect("widget open");
        assert!(doc.has_class(widget, "arabic-kb--size-large"));
    }

    /// Integration Test 12: Document failures never interrupt focus handling
    #[tokio::test]
    async fn test_icon_failure_is_contained() {
        let doc = MemoryDocument::new();
        let field = doc.create_input("text");
        doc.set_read_only(true);
        let mut agent = started_agent(&doc, json!({ "autoOpen": true })).await;

        agent.handle_event(PageEvent::FocusIn(field)).await;

        assert_eq!(agent.target(), Some(field), "Target tracked despite failures");
        assert!(agent.icon().is_none());
        assert!(agent.widget().is_none());
        assert_eq!(doc.count_by_id(ICON_ID), 0);
    }

    /// Integration Test 13: Dragging moves the widget and persists the position
    #[tokio::test]
    async fn test_drag_persists_position() {
        let doc = MemoryDocument::new();
        let local = MemoryLocalStorage::new();
        let store = MemorySettingsStore::new();
        let mut agent = PageAgent::new(doc.clone(), store, local.clone());
        agent.start().await;
        agent.open_widget();

        let widget = agent.widget().expect("widget open");
        doc.set_rect(widget, Rect::new(900.0, 600.0, 300.0, 150.0));
        let handle = doc.elements_with_class("arabic-kb__drag-handle")[0];

        agent
            .handle_event(PageEvent::PointerDown { target: handle, button: 0, x: 1000.0, y: 650.0 })
            .await;
        assert!(agent.is_dragging());
        agent.handle_event(PageEvent::PointerMove { x: 900.0, y: 600.0 }).await;

        assert_eq!(doc.style(widget, "left").as_deref(), Some("800px"));
        assert_eq!(doc.style(widget, "top").as_deref(), Some("550px"));
        assert_eq!(doc.style(widget, "position").as_deref(), Some("fixed"));

        agent.handle_event(PageEvent::PointerUp).await;
        assert!(!agent.is_dragging());
        agent.handle_event(PageEvent::PointerMove { x: 0.0, y: 0.0 }).await;
        assert_eq!(doc.style(widget, "left").as_deref(), Some("800px"), "Moves ignored after release");

        assert_eq!(
            local.get_item(POSITION_STORAGE_KEY).as_deref(),
            Some(r#"{"left":"800px","top":"550px"}"#)
        );

        agent.close_widget();
        agent.open_widget();
        let reopened = agent.widget().expect("widget reopened");
        assert_eq!(doc.style(reopened, "left").as_deref(), Some("800px"));
        assert_eq!(doc.style(reopened, "bottom").as_deref(), Some("auto"));
    }

    /// Integration Test 14: Secondary buttons and plain clicks do not drag
    #[tokio::test]
    async fn test_drag_requires_primary_button_on_handle() {
        let doc = MemoryDocument::new();
        let mut agent = started_agent(&doc, json!({})).await;
        agent.open_widget();
        let handle = doc.elements_with_class("arabic-kb__drag-handle")[0];
        let key = key_labeled(&doc, "ب");

        agent
            .handle_event(PageEvent::PointerDown { target: handle, button: 2, x: 0.0, y: 0.0 })
            .await;
        assert!(!agent.is_dragging());

        agent
            .handle_event(PageEvent::PointerDown { target: key, button: 0, x: 0.0, y: 0.0 })
            .await;
        assert!(!agent.is_dragging());
    }

    /// Integration Test 15: Rebuild keeps a corner widget in the corner
    ///
    /// Turning on position persistence while a position is stored must not
    /// move the open widget on its next rebuild.
    #[tokio::test]
    async fn test_rebuild_ignores_newly_enabled_stored_position() {
        let doc = MemoryDocument::new();
        let store = MemorySettingsStore::with_items(items(json!({ "persistPosition": false })));
        let mut local = MemoryLocalStorage::new();
        local.set_item(POSITION_STORAGE_KEY, r#"{"left":"10px","top":"10px"}"#);
        let mut changes = store.subscribe();
        let mut agent = PageAgent::new(doc.clone(), store.clone(), local);
        agent.start().await;
        agent.open_widget();

        let widget = agent.widget().expect("widget open");
        assert_eq!(doc.style(widget, "left"), None, "Opened in the corner");

        store.set(items(json!({ "persistPosition": true }))).await.unwrap();
        agent.on_settings_changed(changes.next().await.expect("change delivered"));
        store.set(items(json!({ "theme": "dark" }))).await.unwrap();
        agent.on_settings_changed(changes.next().await.expect("change delivered"));

        let rebuilt = agent.widget().expect("widget reopened");
        assert_ne!(rebuilt, widget);
        assert_eq!(doc.style(rebuilt, "left"), None);
        assert_eq!(doc.style(rebuilt, "top"), None);
        assert_eq!(doc.style(rebuilt, "right").as_deref(), Some("20px"));
        assert_eq!(doc.style(rebuilt, "bottom").as_deref(), Some("20px"));
    }

    /// Integration Test 16: Without position persistence nothing is read or written
    #[tokio::test]
    async fn test_position_not_persisted_when_disabled() {
        let doc = MemoryDocument::new();
        let store = MemorySettingsStore::with_items(items(json!({ "persistPosition": false })));
        let mut local = MemoryLocalStorage::new();
        local.set_item(POSITION_STORAGE_KEY, r#"{"left":"10px","top":"10px"}"#);
        let mut agent = PageAgent::new(doc.clone(), store, local.clone());
        agent.start().await;
        agent.open_widget();

        let widget = agent.widget().expect("widget open");
        assert_eq!(doc.style(widget, "left"), None, "Stored position ignored");
        assert_eq!(doc.style(widget, "right").as_deref(), Some("20px"));

        doc.set_rect(widget, Rect::new(900.0, 600.0, 300.0, 150.0));
        let handle = doc.elements_with_class("arabic-kb__drag-handle")[0];
        agent
            .handle_event(PageEvent::PointerDown { target: handle, button: 0, x: 1000.0, y: 650.0 })
            .await;
        agent.handle_event(PageEvent::PointerMove { x: 900.0, y: 600.0 }).await;
        agent.handle_event(PageEvent::PointerUp).await;

        assert_eq!(doc.style(widget, "left").as_deref(), Some("800px"), "Drag still moves");
        assert_eq!(
            local.get_item(POSITION_STORAGE_KEY).as_deref(),
            Some(r#"{"left":"10px","top":"10px"}"#),
            "Release does not overwrite the stored position"
        );
    }

    /// Integration Test 17: A malformed stored position opens in the corner
    #[tokio::test]
    async fn test_malformed_position_opens_in_corner() {
        let doc = MemoryDocument::new();
        let mut local = MemoryLocalStorage::new();
        local.set_item(POSITION_STORAGE_KEY, "{\"left\":");
        let mut agent = PageAgent::new(doc.clone(), MemorySettingsStore::new(), local);
        agent.start().await;

        assert!(agent.open_widget());
        let widget = agent.widget().expect("widget open");
        assert_eq!(doc.style(widget, "left"), None);
        assert_eq!(doc.style(widget, "position"), None);
        assert_eq!(doc.style(widget, "right").as_deref(), Some("20px"));
        assert_eq!(doc.style(widget, "bottom").as_deref(), Some("20px"));
    }

    /// Integration Test 18: Focus returning to the target keeps the widget open
    #[tokio::test(start_paused = true)]
    async fn test_focus_back_on_target_keeps_widget() {
        let doc = MemoryDocument::new();
        let field = doc.create_input("text");
        let mut agent = started_agent(&doc, json!({})).await;
        agent.handle_event(PageEvent::FocusIn(field)).await;
        agent.open_widget();

        let (events_tx, events_rx) = mpsc::unbounded();
        let (_messenger, requests) = messaging::channel(1);
        let mut host = doc.clone();

        let script = async move {
            host.blur();
            events_tx.unbounded_send(PageEvent::FocusOut(field)).unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;
            host.focus(field).unwrap();

            tokio::time::sleep(Duration::from_millis(500)).await;
            assert_eq!(host.count_by_id(WIDGET_ID), 1, "Widget stays open");
            drop(events_tx);
        };
        futures::join!(agent.run(events_rx, requests), script);

        assert!(agent.widget().is_some());
        assert_eq!(agent.target(), Some(field));
    }

    /// Integration Test 19: No trigger icon while the widget is open
    #[tokio::test]
    async fn test_focus_in_with_open_widget_shows_no_icon() {
        let doc = MemoryDocument::new();
        let field = doc.create_input("text");
        let mut agent = started_agent(&doc, json!({})).await;

        agent.handle_event(PageEvent::FocusIn(field)).await;
        assert!(agent.icon().is_some(), "Icon shown while closed");
        agent.open_widget();
        assert!(agent.icon().is_none(), "Opening removes the icon");

        // Every keystroke refocuses the field.
        agent.handle_event(PageEvent::Click(key_labeled(&doc, "ب"))).await;
        agent.handle_event(PageEvent::FocusIn(field)).await;

        assert!(agent.icon().is_none());
        assert_eq!(doc.count_by_id(ICON_ID), 0);
        assert_eq!(agent.target(), Some(field));
    }

    /// Integration Test 20: Dragging stays inside the viewport margin
    #[tokio::test]
    async fn test_drag_clamps_to_viewport() {
        let doc = MemoryDocument::new();
        doc.set_viewport(Viewport { width: 640.0, height: 480.0, ..Viewport::default() });
        let mut agent = started_agent(&doc, json!({ "persistPosition": false })).await;
        agent.open_widget();

        let widget = agent.widget().expect("widget open");
        doc.set_rect(widget, Rect::new(300.0, 300.0, 300.0, 150.0));
        let handle = doc.elements_with_class("arabic-kb__drag-handle")[0];
        agent
            .handle_event(PageEvent::PointerDown { target: handle, button: 0, x: 350.0, y: 320.0 })
            .await;

        agent.handle_event(PageEvent::PointerMove { x: 2000.0, y: 2000.0 }).await;
        assert_eq!(doc.style(widget, "left").as_deref(), Some("332px"));
        assert_eq!(doc.style(widget, "top").as_deref(), Some("322px"));

        agent.handle_event(PageEvent::PointerMove { x: -500.0, y: -500.0 }).await;
        assert_eq!(doc.style(widget, "left").as_deref(), Some("8px"));
        assert_eq!(doc.style(widget, "top").as_deref(), Some("8px"));
    }
}
