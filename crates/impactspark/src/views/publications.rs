//! Single-publication views: detail card and similar papers.

use serde_json::json;

use super::{DashboardView, ViewContext, response_format_schema, select_publication, selector_properties};
use crate::analytics::similarity::similar_publications;
use crate::error::ViewResult;
use crate::formatters::{self, truncate};
use crate::models::{PublicationDetailInput, ResponseFormat, SimilarPapersInput};

/// Characters of scraped full text shown in the detail card.
const FULL_TEXT_PREVIEW: usize = 1000;

/// Publication detail panel.
pub struct PublicationDetailView;

#[async_trait::async_trait]
impl DashboardView for PublicationDetailView {
    fn name(&self) -> &'static str {
        "publication_detail"
    }

    fn description(&self) -> &'static str {
        "Show every field of one publication in a result set, selected by index, DOI or title."
    }

    fn input_schema(&self) -> serde_json::Value {
        let mut properties = selector_properties();
        properties["resultId"] = json!({"type": "string"});
        properties["responseFormat"] = response_format_schema();
        json!({
            "type": "object",
            "properties": properties,
            "required": ["resultId"]
        })
    }

    async fn execute(&self, ctx: &ViewContext, input: serde_json::Value) -> ViewResult<String> {
        let params: PublicationDetailInput = serde_json::from_value(input)?;
        params.validate()?;

        let set = ctx.results.require(&params.result_id).await?;
        let publications = set.publications().await;
        let index = select_publication(&publications, &params.selector)?;
        let publication = &publications[index];

        match params.response_format {
            ResponseFormat::Markdown => {
                let mut output = formatters::format_publication_markdown(publication, index + 1);
                if let Some(text) = &publication.full_text {
                    output.push_str(&format!("\n**Page text**: {}\n", truncate(text, FULL_TEXT_PREVIEW)));
                }
                Ok(output)
            }
            ResponseFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "index": index,
                "publication": publication,
                "doiUrl": publication.doi_url(),
                "openAccessStatus": publication.open_access_status()
            }))?),
        }
    }
}

/// Similar papers within a result set.
pub struct SimilarPapersView;

#[async_trait::async_trait]
impl DashboardView for SimilarPapersView {
    fn name(&self) -> &'static str {
        "similar_papers"
    }

    fn description(&self) -> &'static str {
        "Find the publications in a result set whose abstract, title and keywords \
         are most similar to a selected publication (cosine similarity)."
    }

    fn input_schema(&self) -> serde_json::Value {
        let mut properties = selector_properties();
        properties["resultId"] = json!({"type": "string"});
        properties["topN"] = json!({"type": "integer", "minimum": 1, "default": 5});
        properties["responseFormat"] = response_format_schema();
        json!({
            "type": "object",
            "properties": properties,
            "required": ["resultId"]
        })
    }

    async fn execute(&self, ctx: &ViewContext, input: serde_json::Value) -> ViewResult<String> {
        let params: SimilarPapersInput = serde_json::from_value(input)?;
        params.validate()?;

        let set = ctx.results.require(&params.result_id).await?;
        let publications = set.publications().await;
        let target = select_publication(&publications, &params.selector)?;
        let similar = similar_publications(&publications, target, params.top_n);

        match params.response_format {
            ResponseFormat::Markdown => {
                let mut output = format!("# Papers Similar to \"{}\"\n\n", publications[target].title);
                if similar.is_empty() {
                    output.push_str("Not enough publications in this result set to compare.\n");
                    return Ok(output);
                }

                let rows: Vec<Vec<String>> = similar
                    .iter()
                    .map(|s| {
                        let p = &publications[s.index];
                        vec![
                            s.index.to_string(),
                            truncate(&p.title, 100).into_owned(),
                            p.year.map(|y| y.to_string()).unwrap_or_default(),
                            p.citations.to_string(),
                            format!("{:.3}", s.similarity),
                        ]
                    })
                    .collect();
                output.push_str(&formatters::markdown_table(
                    &["Index", "Title", "Year", "Citations", "Similarity"],
                    &rows,
                ));
                Ok(output)
            }
            ResponseFormat::Json => {
                let items: Vec<serde_json::Value> = similar
                    .iter()
                    .map(|s| {
                        let mut row = formatters::compact_publication(&publications[s.index]);
                        row["index"] = json!(s.index);
                        row["similarity"] = json!(s.similarity);
                        row
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json!({
                    "target": target,
                    "similar": items
                }))?)
            }
        }
    }
}
