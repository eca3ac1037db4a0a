mod config;
mod error;
mod registry;
mod responder;
mod routes;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use registry::Registry;
use responder::Responder;
use routes::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("🚀 SupportDesk backend starting");
    let config = ServerConfig::from_env()?;

    let registry = Registry::load(&config.widgets_file)?;
    tracing::info!(widgets = registry.len(), file = %config.widgets_file.display(), "widget registry loaded");
    if registry.is_empty() {
        tracing::warn!("registry is empty; every widget will be reported as not found");
    }

    let responder = Responder::from_config(&config)?;
    tracing::info!(mode = responder.describe(), "chat replies configured");

    if let Some(dir) = &config.static_dir {
        tracing::info!(dir = %dir.display(), "serving static files");
    }
    let app = routes::app(AppState::new(registry, responder), config.static_dir.as_deref());

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
