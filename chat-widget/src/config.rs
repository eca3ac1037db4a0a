//! Widget configuration.
//!
//! A [`WidgetConfig`] is always fully populated: it starts from hardcoded
//! defaults and is shallow-overwritten by whatever the embed supplies (script
//! tag attributes or the global config object), and later, at most once, by
//! the server's copy. Blank strings and unparseable enum values count as
//! absent, so a bad value never reaches the rendered UI.
//!
//! [`EmbedSettings`] carries the per-embed runtime options (API origin,
//! timeout) alongside the partial config.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::collections::HashMap;

use serde::Deserialize;
use supportdesk_shared::{validate_widget_id, PartialWidgetConfig};

use crate::consts::{
    DEFAULT_DESCRIPTION, DEFAULT_ICON_EMOJI, DEFAULT_PRIMARY_COLOR, DEFAULT_PRODUCT_NAME,
    DEFAULT_TIMEOUT_MS, DEFAULT_WELCOME_MESSAGE, DEFAULT_WIDGET_TITLE, MAX_TIMEOUT_MS,
    MIN_TIMEOUT_MS,
};
use crate::error::WidgetError;

/// Corner of the viewport the widget is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl Position {
    /// Parse the attribute/wire spelling. Unknown values yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "bottom-right" => Some(Self::BottomRight),
            "bottom-left" => Some(Self::BottomLeft),
            "top-right" => Some(Self::TopRight),
            "top-left" => Some(Self::TopLeft),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
            Self::TopRight => "top-right",
            Self::TopLeft => "top-left",
        }
    }

    #[must_use]
    pub fn is_top(self) -> bool {
        matches!(self, Self::TopRight | Self::TopLeft)
    }

    #[must_use]
    pub fn is_left(self) -> bool {
        matches!(self, Self::BottomLeft | Self::TopLeft)
    }
}

/// How the avatar is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconType {
    /// First letter of the product name.
    #[default]
    Default,
    /// A single emoji glyph.
    Emoji,
    /// A remote image URL.
    Image,
}

impl IconType {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "default" => Some(Self::Default),
            "emoji" => Some(Self::Emoji),
            "image" => Some(Self::Image),
            _ => None,
        }
    }
}

/// Fully resolved configuration for one widget instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub widget_id: Option<String>,
    pub position: Position,
    pub primary_color: String,
    pub product_name: String,
    pub widget_title: String,
    pub welcome_message: String,
    pub description: String,
    pub icon_type: IconType,
    pub icon_emoji: String,
    pub custom_icon: String,
    pub is_active: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            widget_id: None,
            position: Position::default(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            widget_title: DEFAULT_WIDGET_TITLE.to_string(),
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            icon_type: IconType::default(),
            icon_emoji: DEFAULT_ICON_EMOJI.to_string(),
            custom_icon: String::new(),
            is_active: true,
        }
    }
}

impl WidgetConfig {
    /// Defaults, then every field the partial specifies.
    #[must_use]
    pub fn resolve(partial: &PartialWidgetConfig) -> Self {
        let mut config = Self::default();
        config.apply(partial);
        config
    }

    /// Shallow overwrite: each field present in `partial` replaces ours,
    /// absent fields are left alone. No nested merging.
    pub fn apply(&mut self, partial: &PartialWidgetConfig) {
        if let Some(id) = present(partial.widget_id.as_ref()) {
            self.widget_id = Some(id.to_string());
        }
        if let Some(position) = partial.position.as_deref().and_then(Position::parse) {
            self.position = position;
        }
        if let Some(color) = partial.primary_color.as_deref().and_then(sanitize_color) {
            self.primary_color = color;
        }
        overwrite(&mut self.product_name, partial.product_name.as_ref());
        overwrite(&mut self.widget_title, partial.widget_title.as_ref());
        overwrite(&mut self.welcome_message, partial.welcome_message.as_ref());
        overwrite(&mut self.description, partial.description.as_ref());
        if let Some(icon_type) = partial.icon_type.as_deref().and_then(IconType::parse) {
            self.icon_type = icon_type;
        }
        overwrite(&mut self.icon_emoji, partial.icon_emoji.as_ref());
        overwrite(&mut self.custom_icon, partial.custom_icon.as_ref());
        if let Some(active) = partial.is_active {
            self.is_active = active;
        }
    }

    /// The widget id, if it is one the API will accept.
    #[must_use]
    pub fn valid_widget_id(&self) -> Option<&str> {
        self.widget_id
            .as_deref()
            .filter(|id| validate_widget_id(id).is_ok())
    }

    /// Per-instance key used to scope the stylesheet and its element id.
    #[must_use]
    pub fn instance_key(&self, serial: usize) -> String {
        match self.valid_widget_id() {
            Some(id) => format!("{id}-{serial}"),
            None => format!("local-{serial}"),
        }
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn overwrite(slot: &mut String, value: Option<&String>) {
    if let Some(v) = present(value) {
        *slot = v.to_string();
    }
}

/// Accept a color only if it cannot break out of a CSS declaration.
/// Anything else (`var(--brand)`, `rgb(0 0 0 / 50%)`) is left to the browser.
#[must_use]
pub fn sanitize_color(value: &str) -> Option<String> {
    let value = value.trim();
    let ok = !value.is_empty()
        && value.len() <= 64
        && !value
            .chars()
            .any(|c| c.is_control() || matches!(c, ';' | '{' | '}' | '<' | '>' | '"' | '\'' | '\\'));
    ok.then(|| value.to_string())
}

// =============================================================
// Embed sources
// =============================================================

/// Anything that can answer "what is the value of attribute X".
pub trait AttributeSource {
    fn attribute(&self, name: &str) -> Option<String>;
}

impl AttributeSource for web_sys::Element {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }
}

impl AttributeSource for HashMap<String, String> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Runtime options for one embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedSettings {
    pub config: PartialWidgetConfig,
    /// Origin API paths are joined onto; empty means same-origin.
    pub api_base: String,
    pub timeout_ms: u32,
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            config: PartialWidgetConfig::default(),
            api_base: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Shape of `window.ModernSupportWidgetConfig` and of the constructor
/// argument to `new ModernSupportWidget(...)`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GlobalConfig {
    #[serde(flatten)]
    config: PartialWidgetConfig,
    #[serde(default)]
    api_base: Option<String>,
    #[serde(default)]
    timeout_ms: Option<u32>,
}

impl EmbedSettings {
    /// Read settings from a script tag's `data-*` attributes.
    ///
    /// The API base is `data-api-base` if given, else the origin of the tag's
    /// `src`, else same-origin. `page_url` resolves a protocol-relative `src`.
    pub fn from_attributes(source: &impl AttributeSource, page_url: Option<&str>) -> Self {
        let attr = |name: &str| source.attribute(name);
        let config = PartialWidgetConfig {
            widget_id: attr("data-widget-id"),
            position: attr("data-position"),
            primary_color: attr("data-primary-color"),
            product_name: attr("data-product-name"),
            widget_title: attr("data-widget-title"),
            welcome_message: attr("data-welcome-message"),
            description: attr("data-description"),
            icon_type: attr("data-icon-type"),
            icon_emoji: attr("data-icon-emoji"),
            custom_icon: attr("data-custom-icon"),
            is_active: attr("data-is-active").map(|v| v.trim() != "false"),
        };
        let api_base = attr("data-api-base")
            .filter(|v| !v.trim().is_empty())
            .or_else(|| attr("src").and_then(|src| script_origin(&src, page_url)))
            .unwrap_or_default();
        let timeout_ms = attr("data-timeout-ms").and_then(|v| match v.trim().parse::<u32>() {
            Ok(ms) => Some(ms),
            Err(err) => {
                log::warn!("ignoring data-timeout-ms {v:?}: {err}");
                None
            }
        });
        Self::build(config, Some(api_base), timeout_ms)
    }

    /// Parse the JSON form of the global config object.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Decode`] if the JSON is not an object of the
    /// expected shape.
    pub fn from_json(json: &str) -> Result<Self, WidgetError> {
        let global: GlobalConfig =
            serde_json::from_str(json).map_err(|e| WidgetError::Decode(e.to_string()))?;
        Ok(Self::build(global.config, global.api_base, global.timeout_ms))
    }

    fn build(config: PartialWidgetConfig, api_base: Option<String>, timeout_ms: Option<u32>) -> Self {
        Self {
            config,
            api_base: normalize_api_base(api_base.as_deref().unwrap_or_default()),
            timeout_ms: timeout_ms
                .map_or(DEFAULT_TIMEOUT_MS, |ms| ms.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS)),
        }
    }

    /// `data-is-active="false"` (or `isActive: false`) opts the embed out
    /// before any request is made.
    #[must_use]
    pub fn explicitly_disabled(&self) -> bool {
        self.config.is_active == Some(false)
    }
}

fn normalize_api_base(base: &str) -> String {
    base.trim().trim_end_matches('/').to_string()
}

/// Origin of a script `src`. A protocol-relative `//host/...` takes the
/// page's scheme; a path-relative src has no origin of its own.
#[must_use]
pub fn script_origin(src: &str, page_url: Option<&str>) -> Option<String> {
    let src = src.trim();
    match src.strip_prefix("//") {
        Some(rest) => {
            let (scheme, _) = page_url?.trim().split_once("://")?;
            origin_of(&format!("{scheme}://{rest}"))
        }
        None => origin_of(src),
    }
}

/// `scheme://host[:port]` of an absolute http(s) URL.
#[must_use]
pub fn origin_of(url: &str) -> Option<String> {
    let url = url.trim();
    let (scheme, rest) = url.split_once("://")?;
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return None;
    }
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if authority.is_empty() {
        return None;
    }
    Some(format!("{scheme}://{authority}"))
}
