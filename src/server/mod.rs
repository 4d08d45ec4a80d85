pub mod handlers;
pub mod types;
mod viewer;

use crate::{Result, config::Config, gateway::Gateway};
use axum::{Router, routing::get};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(gateway: Gateway) -> Router {
    let app_state = handlers::AppState {
        gateway: Arc::new(gateway),
    };

    Router::new()
        .route("/health", get(handlers::health))
        .route("/models/export-info", get(handlers::export_info))
        .route("/models/download", get(handlers::download_model))
        .route("/viewer/generate", get(handlers::generate_model))
        .route("/viewer/show", get(handlers::show_viewer))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn run(config: Config) -> Result<()> {
    info!(
        "Generator: {} {} (timeout {}s)",
        config.generator.interpreter,
        config.generator.script.display(),
        config.generator.timeout_secs
    );

    let app = router(Gateway::from_config(&config.generator));

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
