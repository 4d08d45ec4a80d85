//! End-to-end runs against real `/bin/sh` children standing in for the generator.
#![cfg(unix)]

use axum::http::StatusCode;
use machine_parts_gateway::{
    Error,
    config::{Config, GeneratorConfig},
    gateway::{Gateway, ResponseBody},
    generator::{GenerationRequest, ModelFormat, OutputFormat, Shape, Size},
    server,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::{path::PathBuf, time::Instant};
use tempfile::TempDir;

mod common;
use common::{body_string, get};

/// Write a fake generator script and point a gateway at it through `sh`.
fn script_gateway(body: &str, timeout_secs: u64) -> (TempDir, Gateway) {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("main.sh");
    std::fs::write(&script, body).unwrap();

    let config = GeneratorConfig {
        interpreter: "/bin/sh".to_string(),
        script,
        working_dir: Some(dir.path().to_path_buf()),
        timeout_secs,
        default_format: ModelFormat::Glb,
    };
    (dir, Gateway::from_config(&config))
}

fn sphere() -> GenerationRequest {
    GenerationRequest::model(
        Shape::parse("sphere").unwrap(),
        Size::parse("5").unwrap(),
        ModelFormat::Glb,
        OutputFormat::Base64Text,
    )
}

#[tokio::test]
async fn test_generator_receives_argument_vector() {
    let (dir, gateway) = script_gateway(
        r#"printf '%s\n' "$@" > args.txt; printf '  QUJD  \n'"#,
        10,
    );

    let response = gateway.generate_model(&sphere()).await.unwrap();

    assert_eq!(response.body, ResponseBody::Text("QUJD".to_string()));
    let args = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
    assert_eq!(args, "sphere\n--size\n5\n--as-base64\n--format\nglb\n");
}

#[tokio::test]
async fn test_export_info_from_script() {
    let (_dir, gateway) = script_gateway(
        r#"[ "$1" = "--export-info" ] || exit 9
printf '{\n    "shapes": [{"name": "cube", "parameters": ["size"]}]\n}\n'"#,
        10,
    );

    let response = gateway.export_info().await.unwrap();

    assert_eq!(
        response.body,
        ResponseBody::Json(json!({"shapes": [{"name": "cube", "parameters": ["size"]}]}))
    );
}

#[tokio::test]
async fn test_script_error_over_http() {
    let (_dir, gateway) = script_gateway("echo 'missing module' >&2; exit 1", 10);

    let response = get(server::router(gateway), "/models/export-info").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(body_string(response).await.contains("missing module"));
}

#[tokio::test]
async fn test_slow_generator_times_out() {
    let (_dir, gateway) = script_gateway("exec sleep 30", 1);

    let started = Instant::now();
    let err = gateway.generate_model(&sphere()).await.unwrap_err();

    assert!(matches!(err, Error::Timeout(_)));
    assert!(started.elapsed().as_secs() < 10);
}

#[tokio::test]
async fn test_missing_interpreter_is_launch_error() {
    let config = Config {
        generator: GeneratorConfig {
            interpreter: "/definitely/not/python".to_string(),
            script: PathBuf::from("main.py"),
            ..Default::default()
        },
        ..Default::default()
    };
    let gateway = Gateway::from_config(&config.generator);

    let err = gateway.export_info().await.unwrap_err();

    assert!(matches!(err, Error::Launch(_)));
}
