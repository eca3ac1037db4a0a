//! Server configuration from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_WIDGETS_FILE: &str = "widgets.json";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid BIND_ADDR {value:?}: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

/// OpenAI-compatible chat completions endpoint used for replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    /// Base URL; `/chat/completions` is appended.
    pub url: String,
    pub api_key: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub widgets_file: PathBuf,
    /// Served at `/` when set (demo page, wasm bundle).
    pub static_dir: Option<PathBuf>,
    pub upstream: Option<UpstreamConfig>,
    /// Reply for widgets without an `autoReply`. Unset means the response
    /// carries no text and the widget shows its own acknowledgement.
    pub default_auto_reply: Option<String>,
}

impl ServerConfig {
    /// Read from the process environment (after `.env` is loaded).
    ///
    /// - `BIND_ADDR`: default `0.0.0.0:8080`
    /// - `WIDGETS_FILE`: default `widgets.json`
    /// - `STATIC_DIR`: optional
    /// - `CHAT_UPSTREAM_URL`, `CHAT_UPSTREAM_KEY`, `CHAT_MODEL`: optional
    /// - `DEFAULT_AUTO_REPLY`: optional
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| get(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse()
            .map_err(|source| ConfigError::BindAddr { value: bind.clone(), source })?;

        let upstream = var("CHAT_UPSTREAM_URL").map(|url| UpstreamConfig {
            url: url.trim_end_matches('/').to_string(),
            api_key: var("CHAT_UPSTREAM_KEY"),
            model: var("CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
        });

        Ok(Self {
            bind_addr,
            widgets_file: var("WIDGETS_FILE")
                .unwrap_or_else(|| DEFAULT_WIDGETS_FILE.to_string())
                .into(),
            static_dir: var("STATIC_DIR").map(PathBuf::from),
            upstream,
            default_auto_reply: var("DEFAULT_AUTO_REPLY"),
        })
    }
}
