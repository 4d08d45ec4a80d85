use super::MockProcessRunner;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use machine_parts_gateway::{gateway::Gateway, generator::ModelFormat, server};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

/// Build the full router around a mock runner, returning the runner for inspection
pub fn create_test_app(runner: MockProcessRunner) -> (Router, Arc<MockProcessRunner>) {
    let runner = Arc::new(runner);
    let gateway = Gateway::new(runner.clone(), ModelFormat::Glb);
    (server::router(gateway), runner)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_string(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub fn content_type(response: &Response<Body>) -> String {
    response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Sample export-info document, shaped like the generator's catalogue
pub const SAMPLE_EXPORT_INFO: &str = r#"{
    "shapes": [
        {"name": "cube", "parameters": ["size"]},
        {"name": "sphere", "parameters": ["size"]},
        {"name": "cylinder", "parameters": ["radius", "height"]},
        {"name": "cone", "parameters": ["radius", "height"]}
    ]
}"#;
