use supportdesk_shared::ContractError;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Everything that can go wrong inside the widget. None of these ever reach
/// the host page: callers at the JS boundary log and swallow them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("request timed out after {0} ms")]
    Timeout(u32),

    #[error("widget has no id")]
    MissingWidgetId,

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("DOM error: {0}")]
    Dom(String),
}

impl From<gloo_net::Error> for WidgetError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => Self::Decode(e.to_string()),
            other => Self::Network(other.to_string()),
        }
    }
}

/// Convert a thrown JS value into a [`WidgetError::Dom`].
pub(crate) fn js_error(value: JsValue) -> WidgetError {
    WidgetError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}
