//! In-memory [`WidgetApi`] that records every call.

use std::cell::RefCell;

use supportdesk_shared::{ChatResponse, PartialWidgetConfig, StatusResponse};

use crate::api::WidgetApi;
use crate::error::WidgetError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Status(String),
    Config(String),
    Chat(String, String),
}

/// Unset responses behave like an unreachable server.
#[derive(Default)]
pub struct MockApi {
    pub status: Option<Result<StatusResponse, WidgetError>>,
    pub config: Option<Result<PartialWidgetConfig, WidgetError>>,
    pub chat: Option<Result<ChatResponse, WidgetError>>,
    /// Widget ids whose status request never answers.
    pub stalled: Vec<String>,
    pub calls: RefCell<Vec<Call>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, result: Result<StatusResponse, WidgetError>) -> Self {
        self.status = Some(result);
        self
    }

    pub fn with_config(mut self, result: Result<PartialWidgetConfig, WidgetError>) -> Self {
        self.config = Some(result);
        self
    }

    pub fn with_chat(mut self, result: Result<ChatResponse, WidgetError>) -> Self {
        self.chat = Some(result);
        self
    }

    pub fn with_stalled_status(mut self, widget_id: &str) -> Self {
        self.stalled.push(widget_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn unreachable<T>() -> Result<T, WidgetError> {
        Err(WidgetError::Network("connection refused".into()))
    }
}

impl WidgetApi for MockApi {
    async fn status(&self, widget_id: &str) -> Result<StatusResponse, WidgetError> {
        self.calls.borrow_mut().push(Call::Status(widget_id.to_string()));
        if self.stalled.iter().any(|id| id == widget_id) {
            futures::future::pending::<()>().await;
        }
        self.status.clone().unwrap_or_else(Self::unreachable)
    }

    async fn config(&self, widget_id: &str) -> Result<PartialWidgetConfig, WidgetError> {
        self.calls.borrow_mut().push(Call::Config(widget_id.to_string()));
        self.config.clone().unwrap_or_else(Self::unreachable)
    }

    async fn chat(&self, widget_id: &str, message: &str) -> Result<ChatResponse, WidgetError> {
        self.calls
            .borrow_mut()
            .push(Call::Chat(widget_id.to_string(), message.to_string()));
        self.chat.clone().unwrap_or_else(Self::unreachable)
    }
}
