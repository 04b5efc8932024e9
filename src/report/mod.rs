pub mod json;
pub mod md;

use crate::error::SafeRouteError;
use crate::types::report::Output;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render(output: &Output, format: OutputFormat) -> Result<String, SafeRouteError> {
    match format {
        OutputFormat::Json => json::to_json(output).map_err(SafeRouteError::Json),
        OutputFormat::Md => Ok(md::to_markdown(output)),
    }
}
