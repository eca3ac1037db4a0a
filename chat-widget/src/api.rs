//! HTTP client for the widget API.
//!
//! [`WidgetApi`] is the seam the rest of the runtime talks to; [`HttpApi`]
//! is the browser implementation over `gloo-net`. Every call is raced
//! against the embed's timeout and aborted through an `AbortController`
//! when it loses, so a hung network never leaves the UI waiting forever.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use futures::{pin_mut, select, FutureExt};
use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use supportdesk_shared::{
    validate_widget_id, ChatRequest, ChatResponse, PartialWidgetConfig, StatusResponse,
    WidgetEnvelope,
};
use web_sys::AbortController;

use crate::config::EmbedSettings;
use crate::error::{js_error, WidgetError};

/// The three calls the widget makes. Futures are not `Send`; everything runs
/// on the browser's single thread.
#[allow(async_fn_in_trait)]
pub trait WidgetApi {
    /// `GET /api/widgets/{id}/status`
    async fn status(&self, widget_id: &str) -> Result<StatusResponse, WidgetError>;

    /// `GET /api/widgets/{id}`, unwrapped from its `{widget}` envelope.
    async fn config(&self, widget_id: &str) -> Result<PartialWidgetConfig, WidgetError>;

    /// `POST /api/widgets/{id}/chat`
    async fn chat(&self, widget_id: &str, message: &str) -> Result<ChatResponse, WidgetError>;
}

impl<T: WidgetApi> WidgetApi for &T {
    async fn status(&self, widget_id: &str) -> Result<StatusResponse, WidgetError> {
        (**self).status(widget_id).await
    }

    async fn config(&self, widget_id: &str) -> Result<PartialWidgetConfig, WidgetError> {
        (**self).config(widget_id).await
    }

    async fn chat(&self, widget_id: &str, message: &str) -> Result<ChatResponse, WidgetError> {
        (**self).chat(widget_id, message).await
    }
}

/// URL builder for the widget API under one base origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    #[must_use]
    pub fn new(base: &str) -> Self {
        Self { base: base.trim_end_matches('/').to_string() }
    }

    #[must_use]
    pub fn widget(&self, widget_id: &str) -> String {
        format!("{}/api/widgets/{}", self.base, urlencoding::encode(widget_id))
    }

    #[must_use]
    pub fn status(&self, widget_id: &str) -> String {
        format!("{}/status", self.widget(widget_id))
    }

    #[must_use]
    pub fn chat(&self, widget_id: &str) -> String {
        format!("{}/chat", self.widget(widget_id))
    }
}

#[derive(Debug, Clone)]
pub struct HttpApi {
    endpoints: Endpoints,
    timeout_ms: u32,
}

impl HttpApi {
    #[must_use]
    pub fn new(settings: &EmbedSettings) -> Self {
        Self {
            endpoints: Endpoints::new(&settings.api_base),
            timeout_ms: settings.timeout_ms,
        }
    }

    #[cfg(test)]
    fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Send one request and decode a 2xx JSON body, within the timeout.
    async fn exchange<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        body: Option<&ChatRequest>,
    ) -> Result<T, WidgetError> {
        let controller = AbortController::new().map_err(js_error)?;
        let builder = builder.abort_signal(Some(&controller.signal()));
        let request = match body {
            Some(body) => builder.json(body)?,
            None => builder.build()?,
        };

        let exchange = async move {
            let response = request.send().await?;
            let status = response.status();
            if !(200..300).contains(&status) {
                return Err(WidgetError::Status(status));
            }
            Ok(response.json::<T>().await?)
        }
        .fuse();
        let timeout = TimeoutFuture::new(self.timeout_ms).fuse();
        pin_mut!(exchange, timeout);

        select! {
            result = exchange => result,
            () = timeout => {
                controller.abort();
                Err(WidgetError::Timeout(self.timeout_ms))
            }
        }
    }
}

impl WidgetApi for HttpApi {
    async fn status(&self, widget_id: &str) -> Result<StatusResponse, WidgetError> {
        validate_widget_id(widget_id)?;
        self.exchange(Request::get(&self.endpoints.status(widget_id)), None).await
    }

    async fn config(&self, widget_id: &str) -> Result<PartialWidgetConfig, WidgetError> {
        validate_widget_id(widget_id)?;
        let envelope: WidgetEnvelope =
            self.exchange(Request::get(&self.endpoints.widget(widget_id)), None).await?;
        Ok(envelope.widget)
    }

    async fn chat(&self, widget_id: &str, message: &str) -> Result<ChatResponse, WidgetError> {
        validate_widget_id(widget_id)?;
        let body = ChatRequest { message: message.to_string() };
        self.exchange(Request::post(&self.endpoints.chat(widget_id)), Some(&body)).await
    }
}
