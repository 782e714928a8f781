// SPDX-License-Identifier: GPL-3.0-only

//! The agent's event loop.

use super::{Followup, PageAgent, PageEvent};
use crate::app_settings::SETTLE_DELAY_MS;
use crate::dom::HostDocument;
use crate::messaging::RequestEnvelope;
use crate::state::LocalStorage;
use crate::storage::SettingsStore;
use futures::channel::mpsc;
use futures::{Stream, StreamExt};
use std::time::Duration;
use tokio::time::Instant;

impl<D, S, P> PageAgent<D, S, P>
where
    D: HostDocument,
    S: SettingsStore,
    P: LocalStorage,
{
    /// Runs the agent until the page event stream ends.
    ///
    /// Multiplexes page events, settings change notifications, open requests
    /// and the settle timer. The timer is re-armed by every focus-out that
    /// needs a blur check.
    pub async fn run<E>(&mut self, mut events: E, mut requests: mpsc::Receiver<RequestEnvelope>)
    where
        E: Stream<Item = PageEvent> + Unpin,
    {
        let mut changes = self.store.subscribe();
        let settle_delay = Duration::from_millis(SETTLE_DELAY_MS);
        let settle = tokio::time::sleep(settle_delay);
        tokio::pin!(settle);
        let mut settle_armed = false;

        loop {
            tokio::select! {
                event = events.next() => {
                    let Some(event) = event else {
                        tracing::debug!("Page event stream ended");
                        break;
                    };
                    if self.handle_event(event).await == Followup::SettleCheck {
                        settle.as_mut().reset(Instant::now() + settle_delay);
                        settle_armed = true;
                    }
                }
                Some(change) = changes.next() => self.on_settings_changed(change),
                Some(envelope) = requests.next() => self.handle_request(envelope).await,
                () = &mut settle, if settle_armed => {
                    settle_armed = false;
                    self.settle_blur();
                }
            }
        }
    }
}
