//! Shared constants for the widget runtime.

// ── Defaults ────────────────────────────────────────────────────

pub const DEFAULT_PRIMARY_COLOR: &str = "#6366F1";
pub const DEFAULT_PRODUCT_NAME: &str = "Support";
pub const DEFAULT_WIDGET_TITLE: &str = "Chat with us";
pub const DEFAULT_WELCOME_MESSAGE: &str = "Hi! How can I help you today?";
pub const DEFAULT_DESCRIPTION: &str = "We typically reply in a few minutes.";
pub const DEFAULT_ICON_EMOJI: &str = "💬";

/// Letter shown in the default avatar when the product name is empty.
pub const FALLBACK_LETTER: char = 'S';

// ── Chat copy ───────────────────────────────────────────────────

/// Bot turn used when the API answers 2xx without a `response`.
pub const ACK_REPLY: &str = "Thanks for your message! We'll get back to you soon.";

/// Bot turn used when the chat call fails for any reason.
pub const APOLOGY_REPLY: &str =
    "Sorry, I'm having trouble connecting right now. Please try again later.";

// ── Network ─────────────────────────────────────────────────────

pub const DEFAULT_TIMEOUT_MS: u32 = 15_000;
pub const MIN_TIMEOUT_MS: u32 = 1_000;
pub const MAX_TIMEOUT_MS: u32 = 120_000;

// ── Timing (ms) ─────────────────────────────────────────────────

/// Delay between `display: flex` and adding `.open`, so the transition runs.
pub const OPEN_CLASS_DELAY_MS: u32 = 10;

/// Upper bound on waiting for `transitionend`. The stylesheet transition is
/// 300ms; this only fires when the browser never reports the end.
pub const TRANSITION_FALLBACK_MS: u32 = 450;

/// Delay before focusing the composer after switching to the chat view.
pub const FOCUS_DELAY_MS: u32 = 50;

// ── DOM ─────────────────────────────────────────────────────────

pub const ROOT_CLASS: &str = "modern-support-widget";
pub const STYLE_ID_PREFIX: &str = "modern-support-widget-styles-";

/// Maximum composer height before it scrolls instead of growing.
pub const COMPOSER_MAX_HEIGHT_PX: i32 = 120;

/// Global object name a host page may define to configure one widget.
pub const GLOBAL_CONFIG_NAME: &str = "ModernSupportWidgetConfig";

/// Selector for embed tags picked up by auto-init.
pub const EMBED_SELECTOR: &str = "script[data-widget-id]";
