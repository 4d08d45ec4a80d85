use super::types::{GenerationRequest, Mode};

pub const EXPORT_INFO_FLAG: &str = "--export-info";

/// Argument vector for the generator script, one element per argument.
pub fn build_args(request: &GenerationRequest) -> Vec<String> {
    match request.mode {
        Mode::ExportInfo => vec![EXPORT_INFO_FLAG.to_string()],
        Mode::GenerateModel => {
            let mut args = vec![
                request.shape.as_str().to_string(),
                "--size".to_string(),
                request.size.to_arg(),
            ];
            if let Some(radius) = request.radius {
                args.push("--radius".to_string());
                args.push(radius.to_arg());
            }
            if let Some(height) = request.height {
                args.push("--height".to_string());
                args.push(height.to_arg());
            }
            args.push("--as-base64".to_string());
            args.push("--format".to_string());
            args.push(request.format.as_str().to_string());
            args
        }
    }
}
