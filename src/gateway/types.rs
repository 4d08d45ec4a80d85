use crate::generator::{ModelFormat, Shape, Size};
use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Bytes(Vec<u8>),
}

/// HTTP-ready result of one generator invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResponse {
    pub content_type: &'static str,
    pub body: ResponseBody,
    /// Set for downloads; becomes an attachment `Content-Disposition`.
    pub file_name: Option<String>,
}

impl GenerationResponse {
    pub fn json(value: Value) -> Self {
        Self {
            content_type: APPLICATION_JSON,
            body: ResponseBody::Json(value),
            file_name: None,
        }
    }

    pub fn text(text: String) -> Self {
        Self {
            content_type: TEXT_PLAIN,
            body: ResponseBody::Text(text),
            file_name: None,
        }
    }

    pub fn bytes(content_type: &'static str, bytes: Vec<u8>, file_name: String) -> Self {
        Self {
            content_type,
            body: ResponseBody::Bytes(bytes),
            file_name: Some(file_name),
        }
    }
}

impl IntoResponse for GenerationResponse {
    fn into_response(self) -> Response {
        let body = match self.body {
            ResponseBody::Json(value) => value.to_string().into_bytes(),
            ResponseBody::Text(text) => text.into_bytes(),
            ResponseBody::Bytes(bytes) => bytes,
        };

        match self.file_name {
            Some(name) => (
                [
                    (header::CONTENT_TYPE, self.content_type.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", name),
                    ),
                ],
                body,
            )
                .into_response(),
            None => ([(header::CONTENT_TYPE, self.content_type.to_string())], body).into_response(),
        }
    }
}

/// Named values handed to the viewer page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelView {
    pub shape: String,
    pub size: String,
    pub format: ModelFormat,
    pub mime_type: String,
    /// Bare base64 payload, any `data:` tag removed.
    pub model: String,
}

impl ModelView {
    pub fn new(
        shape: &Shape,
        size: Size,
        format: ModelFormat,
        mime_type: String,
        model: String,
    ) -> Self {
        Self {
            shape: shape.to_string(),
            size: size.to_arg(),
            format,
            mime_type,
            model,
        }
    }
}
