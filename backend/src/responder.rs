//! Where chat replies come from.
//!
//! With an upstream configured, each message goes to an OpenAI-compatible
//! `/chat/completions` endpoint with the widget's system prompt. Without
//! one, the widget's `autoReply` (or the server default) is returned.

#[cfg(test)]
#[path = "responder_test.rs"]
mod responder_test;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ServerConfig, UpstreamConfig};
use crate::error::ApiError;
use crate::registry::WidgetRecord;

const UPSTREAM_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful customer support assistant. Keep answers short and friendly.";

pub enum Responder {
    Canned { default_reply: Option<String> },
    Upstream(UpstreamClient),
}

impl Responder {
    pub fn from_config(config: &ServerConfig) -> Result<Self, reqwest::Error> {
        Ok(match &config.upstream {
            Some(upstream) => Self::Upstream(UpstreamClient::new(upstream.clone())?),
            None => Self::Canned {
                default_reply: config.default_auto_reply.clone(),
            },
        })
    }

    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Canned { .. } => "canned",
            Self::Upstream(_) => "upstream",
        }
    }

    /// Reply text for one message. `None` lets the widget show its own
    /// acknowledgement.
    pub async fn reply(&self, record: &WidgetRecord, message: &str) -> Result<Option<String>, ApiError> {
        match self {
            Self::Canned { default_reply } => Ok(record.auto_reply.clone().or_else(|| default_reply.clone())),
            Self::Upstream(client) => {
                let system = record.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT);
                client.complete(system, message).await.map(Some)
            }
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [CompletionMessage<'a>; 2],
}

#[derive(Serialize)]
struct CompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct UpstreamClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http, config })
    }

    async fn complete(&self, system: &str, message: &str) -> Result<String, ApiError> {
        let body = CompletionRequest {
            model: &self.config.model,
            messages: [
                CompletionMessage { role: "system", content: system },
                CompletionMessage { role: "user", content: message },
            ],
        };
        let mut request = self
            .http
            .post(format!("{}/chat/completions", self.config.url))
            .json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Upstream(format!("upstream returned {status}")));
        }
        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ApiError::Upstream("empty completion".into()))
    }
}
