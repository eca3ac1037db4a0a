//! Chat transcript and the send/receive exchange.
//!
//! A send is split in two so the UI can render between the halves:
//! [`ChatSession::begin_send`] appends the user turn and marks the session
//! pending (typing indicator on, send control disabled), and
//! [`ChatSession::finish_send`] appends the bot turn and clears pending no
//! matter how the request ended. [`deliver`] is the API call in between.
//!
//! The transcript is append-only and lives only in memory.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use supportdesk_shared::ChatResponse;

use crate::api::WidgetApi;
use crate::consts::{ACK_REPLY, APOLOGY_REPLY};
use crate::error::WidgetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Modifier class on the message bubble.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub sender: Sender,
    pub content: String,
    /// Epoch milliseconds.
    pub timestamp: f64,
}

/// Text accepted by [`ChatSession::begin_send`], ready to POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    pending: bool,
    next_id: u64,
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// A request is in flight: show typing, disable send.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Start a send. Blank input, or a send already in flight, changes
    /// nothing and returns `None`.
    pub fn begin_send(&mut self, input: &str, now: f64) -> Option<PendingSend> {
        let text = input.trim();
        if text.is_empty() || self.pending {
            return None;
        }
        self.push(Sender::User, text.to_string(), now);
        self.pending = true;
        Some(PendingSend { message: text.to_string() })
    }

    /// Record the outcome of the request started by [`begin_send`](Self::begin_send).
    pub fn finish_send(&mut self, result: Result<ChatResponse, WidgetError>, now: f64) -> &ChatMessage {
        self.pending = false;
        let reply = reply_text(result);
        self.push(Sender::Bot, reply, now)
    }

    fn push(&mut self, sender: Sender, content: String, timestamp: f64) -> &ChatMessage {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage { id, sender, content, timestamp });
        &self.messages[self.messages.len() - 1]
    }
}

/// POST a pending message. Without a usable widget id nothing is sent.
pub async fn deliver<A: WidgetApi>(
    api: &A,
    widget_id: Option<&str>,
    pending: &PendingSend,
) -> Result<ChatResponse, WidgetError> {
    match widget_id {
        Some(id) => api.chat(id, &pending.message).await,
        None => Err(WidgetError::MissingWidgetId),
    }
}

/// Bot text for a finished request.
fn reply_text(result: Result<ChatResponse, WidgetError>) -> String {
    match result {
        Ok(ChatResponse { response: Some(text) }) if !text.trim().is_empty() => text,
        Ok(_) => ACK_REPLY.to_string(),
        Err(err) => {
            log::error!("chat request failed: {err}");
            APOLOGY_REPLY.to_string()
        }
    }
}
