use super::{
    types::{GenerateQuery, HealthResponse, ShowQuery},
    viewer,
};
use crate::{
    Result,
    gateway::{Gateway, GenerationResponse},
    generator::OutputFormat,
};
use axum::{
    extract::{Query, State},
    response::{Html, Json},
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn export_info(State(state): State<AppState>) -> Result<GenerationResponse> {
    info!("Received export-info request");

    state.gateway.export_info().await.inspect_err(|e| {
        error!("Export info failed: {}", e);
    })
}

pub async fn generate_model(
    State(state): State<AppState>,
    Query(query): Query<GenerateQuery>,
) -> Result<GenerationResponse> {
    let request = query.into_request(state.gateway.default_format(), OutputFormat::Base64Text)?;
    info!(
        "Received generate request for {} (size {})",
        request.shape, request.size
    );

    state
        .gateway
        .generate_model(&request)
        .await
        .inspect_err(|e| error!("Generation of {} failed: {}", request.shape, e))
}

pub async fn download_model(
    State(state): State<AppState>,
    Query(query): Query<GenerateQuery>,
) -> Result<GenerationResponse> {
    let request = query.into_request(state.gateway.default_format(), OutputFormat::RawBytes)?;
    info!(
        "Received download request for {}.{} (size {})",
        request.shape, request.format, request.size
    );

    state
        .gateway
        .generate_model(&request)
        .await
        .inspect_err(|e| error!("Download of {} failed: {}", request.shape, e))
}

pub async fn show_viewer(
    State(state): State<AppState>,
    Query(query): Query<ShowQuery>,
) -> Result<Html<String>> {
    let (shape, size) = query.parse()?;
    info!("Rendering viewer for {} (side {})", shape, size);

    let view = state
        .gateway
        .render_with_model(shape, size)
        .await
        .inspect_err(|e| error!("Viewer generation failed: {}", e))?;

    Ok(Html(viewer::render(&view)?))
}
