// SPDX-License-Identifier: GPL-3.0-only

//! Arabic Keyboard demo
//!
//! Runs the page agent against an in-memory page with a single text area,
//! opens the keyboard through the control panel and types a word by clicking
//! keys. Pass a path to keep settings in a JSON file instead of memory.

use arabic_keyboard::agent::{PageAgent, PageEvent};
use arabic_keyboard::control_panel::ControlPanel;
use arabic_keyboard::dom::{ElementId, HostDocument, MemoryDocument};
use arabic_keyboard::renderer::key::KEY_CLASS;
use arabic_keyboard::renderer::KEY_ATTR;
use arabic_keyboard::state::MemoryLocalStorage;
use arabic_keyboard::storage::{JsonFileStore, MemorySettingsStore, SettingsStore};
use arabic_keyboard::{i18n, messaging};
use futures::channel::mpsc;

/// Word typed by the demo, one key label per letter.
const DEMO_WORD: [&str; 4] = ["س", "ل", "ا", "م"];

#[tokio::main]
async fn main() {
    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "arabic_keyboard=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!("Using settings file {}", path);
            run_demo(JsonFileStore::new(path)).await;
        }
        None => run_demo(MemorySettingsStore::new()).await,
    }
}

async fn run_demo<S: SettingsStore + Clone>(store: S) {
    let mut page = MemoryDocument::new();
    let field = page.create_textarea();

    let mut agent = PageAgent::new(page.clone(), store.clone(), MemoryLocalStorage::new());
    agent.start().await;

    let mut panel = ControlPanel::new(store);
    if let Err(e) = panel.load().await {
        tracing::warn!("Could not load settings into the control panel: {}", e);
    }

    let (events_tx, events_rx) = mpsc::unbounded();
    let (messenger, requests) = messaging::channel(4);

    let script = async {
        if let Err(e) = page.focus(field) {
            tracing::error!("Could not focus the demo field: {}", e);
            return;
        }
        if events_tx.unbounded_send(PageEvent::FocusIn(field)).is_err() {
            return;
        }

        match panel.open_keyboard(Some(&messenger)).await {
            Some(reply) => tracing::info!("Agent replied ok={}", reply.ok),
            None => tracing::warn!("Agent did not reply"),
        }

        for letter in DEMO_WORD {
            let Some(key) = find_key(&page, letter) else {
                tracing::warn!("Layout has no {:?} key", letter);
                continue;
            };
            if events_tx.unbounded_send(PageEvent::Click(key)).is_err() {
                return;
            }
        }
        events_tx.close_channel();
    };

    futures::join!(agent.run(events_rx, requests), script);

    let typed = page.value(field).unwrap_or_default();
    tracing::info!("Field now reads {:?}", typed);
    println!("{}", typed);
}

fn find_key(page: &MemoryDocument, label: &str) -> Option<ElementId> {
    page.elements_with_class(KEY_CLASS)
        .into_iter()
        .find(|key| page.attribute(*key, KEY_ATTR).as_deref() == Some(label))
}
