//! Router assembly and the three widget endpoints.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use supportdesk_shared::{validate_widget_id, ChatRequest, ChatResponse, StatusResponse, WidgetEnvelope};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::registry::{Registry, WidgetRecord};
use crate::responder::Responder;

#[derive(Clone)]
pub struct AppState {
    registry: Arc<Registry>,
    responder: Arc<Responder>,
}

impl AppState {
    pub fn new(registry: Registry, responder: Responder) -> Self {
        Self {
            registry: Arc::new(registry),
            responder: Arc::new(responder),
        }
    }

    fn widget(&self, widget_id: &str) -> Result<&WidgetRecord, ApiError> {
        validate_widget_id(widget_id)?;
        self.registry.get(widget_id).ok_or(ApiError::NotFound)
    }
}

pub fn app(state: AppState, static_dir: Option<&FsPath>) -> Router {
    // Widgets are embedded on arbitrary sites.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/api/widgets/:id", get(widget_config))
        .route("/api/widgets/:id/status", get(widget_status))
        .route("/api/widgets/:id/chat", post(widget_chat))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(cors).layer(TraceLayer::new_for_http())
}

// GET /api/widgets/{id}/status
async fn widget_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let record = state.widget(&id)?;
    Ok(Json(StatusResponse { is_active: record.is_active() }))
}

// GET /api/widgets/{id}
async fn widget_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WidgetEnvelope>, ApiError> {
    let record = state.widget(&id)?;
    Ok(Json(WidgetEnvelope { widget: record.public_config(&id) }))
}

// POST /api/widgets/{id}/chat
async fn widget_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let record = state.widget(&id)?;
    if !record.is_active() {
        return Err(ApiError::Inactive);
    }
    let Json(request) = body.map_err(|e| ApiError::BadBody(e.body_text()))?;
    request.validate()?;

    let response = state.responder.reply(record, request.message.trim()).await?;
    tracing::info!(widget = %id, replied = response.is_some(), "chat message handled");
    Ok(Json(ChatResponse { response }))
}
