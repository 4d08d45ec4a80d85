//! The single place where a request becomes a generator invocation and the
//! captured output becomes a response.

mod types;

pub use types::*;

use crate::{
    Error, Result,
    config::GeneratorConfig,
    error::describe_exit,
    generator::{
        GenerationRequest, Mode, ModelFormat, OutputFormat, Shape, Size, build_args,
    },
    process::{CommandRunner, ProcessResult, ProcessRunner},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use regex::Regex;
use serde_json::{Value, json};
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

static MIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9.+-]*/[A-Za-z0-9][A-Za-z0-9.+-]*$")
        .expect("valid media type regex")
});

#[derive(Clone)]
pub struct Gateway {
    runner: Arc<dyn ProcessRunner>,
    default_format: ModelFormat,
}

impl Gateway {
    pub fn new(runner: Arc<dyn ProcessRunner>, default_format: ModelFormat) -> Self {
        Self {
            runner,
            default_format,
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(
            Arc::new(CommandRunner::from_config(config)),
            config.default_format,
        )
    }

    pub fn default_format(&self) -> ModelFormat {
        self.default_format
    }

    /// Asks the generator to describe itself; stdout must be one JSON document.
    pub async fn export_info(&self) -> Result<GenerationResponse> {
        let result = self.invoke(&GenerationRequest::export_info()).await?;
        let stdout = result.trimmed_stdout();
        if stdout.is_empty() {
            return Err(Error::parse("generator printed no export info"));
        }

        let value: Value = serde_json::from_slice(stdout)
            .map_err(|e| Error::parse(format!("export info is not valid JSON: {}", e)))?;
        Ok(GenerationResponse::json(value))
    }

    pub async fn generate_model(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        if request.mode != Mode::GenerateModel {
            return Err(Error::internal("generate_model called with a non-generation request"));
        }

        let payload = self.model_payload(request).await?;
        match request.output {
            OutputFormat::Base64Text => Ok(GenerationResponse::text(payload)),
            OutputFormat::Json => Ok(GenerationResponse::json(json!({
                "shape": request.shape.as_str(),
                "size": request.size.value(),
                "format": request.format,
                "model": payload,
            }))),
            OutputFormat::RawBytes => {
                let bytes = decode_payload(&payload)?;
                debug!("Decoded {} model bytes", bytes.len());
                Ok(GenerationResponse::bytes(
                    request.format.mime_type(),
                    bytes,
                    format!("{}.{}", request.shape, request.format),
                ))
            }
        }
    }

    /// Same invocation as `generate_model`, but the payload is returned for a
    /// page to embed instead of becoming the body.
    pub async fn render_with_model(&self, shape: Shape, size: Size) -> Result<ModelView> {
        let request = GenerationRequest::model(
            shape,
            size,
            self.default_format,
            OutputFormat::Base64Text,
        );
        let payload = self.model_payload(&request).await?;
        let (tagged_mime, data) = split_data_uri(&payload)?;
        let mime_type = tagged_mime.unwrap_or(request.format.mime_type());
        Ok(ModelView::new(
            &request.shape,
            request.size,
            request.format,
            mime_type.to_string(),
            data.to_string(),
        ))
    }

    async fn model_payload(&self, request: &GenerationRequest) -> Result<String> {
        let result = self.invoke(request).await?;
        let stdout = result.trimmed_stdout();
        if stdout.is_empty() {
            return Err(Error::parse("generator printed no model data"));
        }
        String::from_utf8(stdout.to_vec())
            .map_err(|_| Error::parse("generator output is not valid UTF-8 text"))
    }

    async fn invoke(&self, request: &GenerationRequest) -> Result<ProcessResult> {
        let args = build_args(request);
        let result = self.runner.run(&args).await?;

        if result.has_stderr() || !result.success() {
            let stderr = if result.has_stderr() {
                result.stderr_text()
            } else {
                "(no error output)".to_string()
            };
            warn!(
                "Generator failed ({}): {}",
                describe_exit(result.exit_code),
                stderr
            );
            return Err(Error::Script {
                exit_code: result.exit_code,
                stderr,
            });
        }

        Ok(result)
    }
}

/// Splits an optional `data:<mime>;base64,` tag off a payload, returning the
/// media type it named (if any) and the bare base64 text.
fn split_data_uri(payload: &str) -> Result<(Option<&str>, &str)> {
    let Some(rest) = payload.strip_prefix("data:") else {
        return Ok((None, payload));
    };

    let (mime, data) = rest
        .split_once(";base64,")
        .ok_or_else(|| Error::parse("data URI payload is not base64 encoded"))?;
    let data = data.trim();
    if data.is_empty() {
        return Err(Error::parse("data URI payload carries no model data"));
    }
    if mime.is_empty() {
        return Ok((None, data));
    }
    if !MIME_PATTERN.is_match(mime) {
        return Err(Error::parse(format!(
            "data URI names an invalid media type {:?}",
            mime
        )));
    }
    Ok((Some(mime), data))
}

fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    let (_, encoded) = split_data_uri(payload)?;
    STANDARD
        .decode(encoded)
        .map_err(|e| Error::parse(format!("model payload is not valid base64: {}", e)))
}
