// SPDX-License-Identifier: GPL-3.0-only

//! Request channel between the control panel and the page agent.
//!
//! The control panel asks the agent in the active page to open its widget.
//! Requests travel over a bounded `futures` channel; each one carries a
//! oneshot sender for the reply.
//!
//! # Wire format
//!
//! - Request: `{"action":"openKeyboard"}`
//! - Reply: `{"ok":true}`, sent after settings are reloaded and the widget
//!   is open

use futures::channel::{mpsc, oneshot};
use futures::SinkExt;
use serde::{Deserialize, Serialize};

/// Requests the page agent understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum AgentRequest {
    /// Reload settings and open the widget for the current focus target.
    OpenKeyboard,
}

/// Reply to an [`AgentRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReply {
    pub ok: bool,
}

impl AgentReply {
    #[must_use]
    pub const fn ok() -> Self {
        Self { ok: true }
    }
}

/// A request in flight, with the channel its reply goes back on.
#[derive(Debug)]
pub struct RequestEnvelope {
    pub request: AgentRequest,
    reply_tx: oneshot::Sender<AgentReply>,
}

impl RequestEnvelope {
    /// Sends the reply. A requester that stopped waiting is logged and ignored.
    pub fn respond(self, reply: AgentReply) {
        if self.reply_tx.send(reply).is_err() {
            tracing::debug!("Requester went away before {:?} was answered", self.request);
        }
    }
}

/// Result type for messaging operations.
pub type MessagingResult<T> = Result<T, MessagingError>;

/// Errors that can occur while messaging the page agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagingError {
    /// No agent is listening (for example, no page is active).
    Unavailable,
    /// The agent dropped the request without replying.
    Disconnected,
    /// A request or reply could not be encoded or decoded.
    Malformed(String),
}

impl std::fmt::Display for MessagingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessagingError::Unavailable => write!(f, "no page agent is listening"),
            MessagingError::Disconnected => write!(f, "page agent disconnected before replying"),
            MessagingError::Malformed(msg) => write!(f, "malformed agent message: {}", msg),
        }
    }
}

impl std::error::Error for MessagingError {}

/// Creates a request channel holding at most `buffer` pending requests.
#[must_use]
pub fn channel(buffer: usize) -> (AgentMessenger, mpsc::Receiver<RequestEnvelope>) {
    let (tx, rx) = mpsc::channel(buffer);
    (AgentMessenger { tx }, rx)
}

/// Sending half of the request channel.
#[derive(Debug, Clone)]
pub struct AgentMessenger {
    tx: mpsc::Sender<RequestEnvelope>,
}

impl AgentMessenger {
    /// Sends a request and waits for the agent's reply.
    pub async fn send(&self, request: AgentRequest) -> MessagingResult<AgentReply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let envelope = RequestEnvelope { request, reply_tx };

        tracing::debug!("Sending {:?} to page agent", request);
        self.tx
            .clone()
            .send(envelope)
            .await
            .map_err(|_| MessagingError::Unavailable)?;

        reply_rx.await.map_err(|_| MessagingError::Disconnected)
    }

    /// Sends a JSON-encoded request and returns the JSON-encoded reply.
    pub async fn send_json(&self, request: &str) -> MessagingResult<String> {
        let request: AgentRequest =
            serde_json::from_str(request).map_err(|e| MessagingError::Malformed(e.to_string()))?;
        let reply = self.send(request).await?;
        serde_json::to_string(&reply).map_err(|e| MessagingError::Malformed(e.to_string()))
    }
}
