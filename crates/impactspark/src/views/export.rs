//! Export view: a result set in reference manager formats.

use serde_json::json;

use super::{DashboardView, ViewContext};
use crate::error::ViewResult;
use crate::formatters::export_publications;
use crate::models::ExportInput;

/// Result set export.
pub struct ExportView;

#[async_trait::async_trait]
impl DashboardView for ExportView {
    fn name(&self) -> &'static str {
        "export"
    }

    fn description(&self) -> &'static str {
        "Export a result set as CSV (all columns), RIS, BibTeX or EndNote."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "resultId": {"type": "string"},
                "format": {
                    "type": "string",
                    "enum": ["csv", "ris", "bibtex", "endnote"],
                    "default": "csv"
                }
            },
            "required": ["resultId"]
        })
    }

    async fn execute(&self, ctx: &ViewContext, input: serde_json::Value) -> ViewResult<String> {
        let params: ExportInput = serde_json::from_value(input)?;
        params.validate()?;

        let set = ctx.results.require(&params.result_id).await?;
        let publications = set.publications().await;

        tracing::info!(result_id = %set.id, format = ?params.format, count = publications.len(), "export");
        Ok(export_publications(&publications, params.format))
    }
}
