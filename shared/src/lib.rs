//! Wire contract between the embeddable widget and the widget API.
//!
//! Every payload is JSON with camelCase field names. Enum-like fields
//! (`position`, `iconType`) stay plain strings on the wire so an unexpected
//! value from an older dashboard never fails the whole payload; the widget
//! parses them leniently.


use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest chat message (in characters) the API accepts.
pub const MAX_MESSAGE_LEN: usize = 4000;

/// Longest widget id accepted by either side.
pub const MAX_WIDGET_ID_LEN: usize = 128;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("invalid widget id: {0:?}")]
    InvalidWidgetId(String),

    #[error("chat message is empty")]
    EmptyMessage,

    #[error("chat message too long: {len} chars, max {max}")]
    MessageTooLong { len: usize, max: usize },
}

/// Widget fields as they travel on the wire. Absent (or `null`) means
/// "not specified here"; the consumer decides the fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialWidgetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// `GET /api/widgets/{id}` response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetEnvelope {
    #[serde(default)]
    pub widget: PartialWidgetConfig,
}

/// `GET /api/widgets/{id}/status` response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[serde(default)]
    pub is_active: bool,
}

/// `POST /api/widgets/{id}/chat` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    /// Check the message against the limits the API enforces.
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.message.trim().is_empty() {
            return Err(ContractError::EmptyMessage);
        }
        let len = self.message.chars().count();
        if len > MAX_MESSAGE_LEN {
            return Err(ContractError::MessageTooLong { len, max: MAX_MESSAGE_LEN });
        }
        Ok(())
    }
}

/// `POST /api/widgets/{id}/chat` response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

/// Widget ids are URL path segments and DOM id fragments, so both sides
/// restrict them to `[A-Za-z0-9_-]{1,128}`.
pub fn validate_widget_id(id: &str) -> Result<(), ContractError> {
    let ok = !id.is_empty()
        && id.len() <= MAX_WIDGET_ID_LEN
        && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if ok {
        Ok(())
    } else {
        Err(ContractError::InvalidWidgetId(id.to_string()))
    }
}
