use crate::{
    Result,
    generator::{GenerationRequest, ModelFormat, OutputFormat, Shape, Size},
};
use serde::{Deserialize, Serialize};

/// Query string for the generation and download routes. Numbers arrive as
/// text so malformed values surface as validation errors.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateQuery {
    #[serde(default)]
    pub shape: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub radius: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

impl GenerateQuery {
    pub fn into_request(
        self,
        default_format: ModelFormat,
        output: OutputFormat,
    ) -> Result<GenerationRequest> {
        let shape = parse_shape(self.shape.as_deref())?;
        let size = parse_size(self.size.as_deref())?;
        let format = match self.format.as_deref() {
            Some(raw) => raw.parse()?,
            None => default_format,
        };

        Ok(GenerationRequest::model(shape, size, format, output)
            .with_radius(self.radius.as_deref().map(Size::parse).transpose()?)
            .with_height(self.height.as_deref().map(Size::parse).transpose()?))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ShowQuery {
    #[serde(default)]
    pub shape: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
}

impl ShowQuery {
    pub fn parse(&self) -> Result<(Shape, Size)> {
        Ok((
            parse_shape(self.shape.as_deref())?,
            parse_size(self.side.as_deref())?,
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

fn parse_shape(raw: Option<&str>) -> Result<Shape> {
    raw.map(Shape::parse).unwrap_or_else(|| Ok(Shape::default()))
}

fn parse_size(raw: Option<&str>) -> Result<Size> {
    raw.map(Size::parse).unwrap_or_else(|| Ok(Size::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_to_cube_of_ten() {
        let request = GenerateQuery::default()
            .into_request(ModelFormat::Glb, OutputFormat::Base64Text)
            .unwrap();
        assert_eq!(request.shape.as_str(), "cube");
        assert_eq!(request.size.to_arg(), "10");
        assert_eq!(request.format, ModelFormat::Glb);
        assert_eq!(request.radius, None);
    }

    #[test]
    fn test_explicit_format_wins_over_default() {
        let query = GenerateQuery {
            format: Some("stl".to_string()),
            ..Default::default()
        };
        let request = query
            .into_request(ModelFormat::Glb, OutputFormat::RawBytes)
            .unwrap();
        assert_eq!(request.format, ModelFormat::Stl);
    }

    #[test]
    fn test_bad_radius_rejected() {
        let query = GenerateQuery {
            radius: Some("-3".to_string()),
            ..Default::default()
        };
        let err = query
            .into_request(ModelFormat::Glb, OutputFormat::Base64Text)
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_show_query_side_is_size() {
        let query = ShowQuery {
            shape: None,
            side: Some("12.5".to_string()),
        };
        let (shape, size) = query.parse().unwrap();
        assert_eq!(shape.as_str(), "cube");
        assert_eq!(size.to_arg(), "12.5");
    }
}
