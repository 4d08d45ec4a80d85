use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::LazyLock};

/// Shapes are bare tokens: they start with an alphanumeric so they can never
/// be read as a flag, and carry no quoting or shell metacharacters.
static SHAPE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{0,63}$").expect("valid shape regex"));

pub const DEFAULT_SHAPE: &str = "cube";
pub const DEFAULT_SIZE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ExportInfo,
    GenerateModel,
}

/// Export format handed to the generator via `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    #[default]
    Glb,
    Stl,
}

impl ModelFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Glb => "glb",
            Self::Stl => "stl",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Glb => "model/gltf-binary",
            Self::Stl => "model/stl",
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "glb" => Ok(Self::Glb),
            "stl" => Ok(Self::Stl),
            other => Err(Error::validation(format!(
                "unsupported format '{}': expected glb or stl",
                other
            ))),
        }
    }
}

/// How the captured stdout is turned into a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    RawBytes,
    Base64Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape(String);

impl Shape {
    pub fn parse(raw: &str) -> Result<Self> {
        if SHAPE_PATTERN.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(Error::validation(format!(
                "invalid shape {:?}: use letters, digits, '-' or '_' (max 64 chars)",
                raw
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self(DEFAULT_SHAPE.to_string())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A finite, non-negative dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size(f64);

impl Size {
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::validation(format!(
                "size must be a finite number, got {}",
                value
            )));
        }
        if value < 0.0 {
            return Err(Error::validation(format!(
                "size must not be negative, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::validation(format!("size {:?} is not a number", raw)))?;
        Self::new(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Canonical decimal rendering. Whole numbers print without a fractional
    /// part so `5` and `5.0` yield the same argument.
    pub fn to_arg(&self) -> String {
        if self.0.fract() == 0.0 && self.0 < 1e15 {
            format!("{}", self.0 as i64)
        } else {
            format!("{}", self.0)
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self(DEFAULT_SIZE)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_arg())
    }
}

/// Per-request parameters for one generator invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub mode: Mode,
    pub shape: Shape,
    pub size: Size,
    pub radius: Option<Size>,
    pub height: Option<Size>,
    pub format: ModelFormat,
    pub output: OutputFormat,
}

impl GenerationRequest {
    pub fn export_info() -> Self {
        Self {
            mode: Mode::ExportInfo,
            shape: Shape::default(),
            size: Size::default(),
            radius: None,
            height: None,
            format: ModelFormat::default(),
            output: OutputFormat::Json,
        }
    }

    pub fn model(shape: Shape, size: Size, format: ModelFormat, output: OutputFormat) -> Self {
        Self {
            mode: Mode::GenerateModel,
            shape,
            size,
            radius: None,
            height: None,
            format,
            output,
        }
    }

    pub fn with_radius(mut self, radius: Option<Size>) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_height(mut self, height: Option<Size>) -> Self {
        self.height = height;
        self
    }
}
