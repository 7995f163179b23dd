//! Scraping views: abstract enrichment and related publication discovery.

use serde_json::json;

use super::{DashboardView, ViewContext, response_format_schema};
use crate::error::{ViewError, ViewResult};
use crate::formatters::truncate;
use crate::models::{EnrichInput, Publication, RelatedPublicationsInput, ResponseFormat, normalize_doi};
use crate::scraping::{DEFAULT_MAX_LINKS, extract_doi_from_url};

/// Characters of a new abstract echoed back.
const PREVIEW_CHARS: usize = 200;

/// Copy scraped text into the stored publications with the same id.
///
/// Only publications still lacking an abstract are touched.
fn merge_enriched(stored: &mut [Publication], enriched: &[Publication]) -> usize {
    let mut merged = 0;
    for update in enriched.iter().filter(|p| p.full_text.is_some()) {
        if let Some(target) = stored.iter_mut().find(|p| p.id == update.id && !p.has_abstract()) {
            target.abstract_text.clone_from(&update.abstract_text);
            target.full_text.clone_from(&update.full_text);
            merged += 1;
        }
    }
    merged
}

/// Abstract enrichment from DOI landing pages.
pub struct EnrichView;

#[async_trait::async_trait]
impl DashboardView for EnrichView {
    fn name(&self) -> &'static str {
        "enrich"
    }

    fn description(&self) -> &'static str {
        "Fill missing abstracts by scraping the DOI landing pages of the first publications \
         in a result set."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "resultId": {"type": "string"},
                "maxItems": {"type": "integer", "minimum": 1, "description": "Defaults to the configured limit"},
                "responseFormat": response_format_schema()
            },
            "required": ["resultId"]
        })
    }

    async fn execute(&self, ctx: &ViewContext, input: serde_json::Value) -> ViewResult<String> {
        let params: EnrichInput = serde_json::from_value(input)?;
        params.validate()?;

        let set = ctx.results.require(&params.result_id).await?;
        let max_items = params.max_items.unwrap_or(ctx.config.max_enrich_items);

        let mut publications = set.publications().await;
        let before: Vec<bool> = publications.iter().map(Publication::has_abstract).collect();
        let enriched = ctx.scraper.enrich_publications(&mut publications, max_items).await;

        let updated: Vec<Publication> = publications
            .into_iter()
            .zip(before)
            .filter(|(p, had)| !had && p.full_text.is_some())
            .map(|(p, _)| p)
            .collect();
        let merged = set.update(|stored| merge_enriched(stored, &updated)).await;
        if merged != enriched {
            tracing::debug!(enriched, merged, "result set changed during enrichment");
        }

        match params.response_format {
            ResponseFormat::Markdown => {
                let mut output = format!(
                    "# Enrichment\n\n**Enriched**: {merged} of the first {max_items} publications\n\n"
                );
                for p in &updated {
                    output.push_str(&format!(
                        "- **{}**: {}\n",
                        p.title,
                        truncate(p.abstract_text.as_deref().unwrap_or_default(), PREVIEW_CHARS)
                    ));
                }
                Ok(output)
            }
            ResponseFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "resultId": set.id,
                "enriched": merged,
                "maxItems": max_items,
                "publications": updated
                    .iter()
                    .map(|p| json!({"id": p.id, "title": p.title, "abstract": p.abstract_text}))
                    .collect::<Vec<_>>()
            }))?),
        }
    }
}

/// Related DOIs linked from a landing page.
pub struct RelatedPublicationsView;

#[async_trait::async_trait]
impl DashboardView for RelatedPublicationsView {
    fn name(&self) -> &'static str {
        "related_publications"
    }

    fn description(&self) -> &'static str {
        "List the DOI links found on a publication's landing page (given by DOI or URL)."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "doi": {"type": "string"},
                "url": {"type": "string", "format": "uri"},
                "maxLinks": {"type": "integer", "minimum": 1, "default": DEFAULT_MAX_LINKS},
                "responseFormat": response_format_schema()
            }
        })
    }

    async fn execute(&self, ctx: &ViewContext, input: serde_json::Value) -> ViewResult<String> {
        let params: RelatedPublicationsInput = serde_json::from_value(input)?;
        params.validate()?;

        let url = match (params.url.as_deref().map(str::trim), params.doi.as_deref()) {
            (Some(page), _) if !page.is_empty() => {
                url::Url::parse(page).map_err(|e| ViewError::validation("url", e.to_string()))?;
                page.to_string()
            }
            (_, Some(doi)) => format!("https://doi.org/{}", normalize_doi(doi)),
            _ => return Err(ViewError::validation("doi", "either doi or url is required")),
        };

        let links = ctx.scraper.find_related_publications(&url, params.max_links).await;

        match params.response_format {
            ResponseFormat::Markdown => {
                let mut output = format!("# Related Publications\n\n**Source**: {url}\n\n");
                if links.is_empty() {
                    output.push_str("No related DOI links found.\n");
                }
                for link in &links {
                    output.push_str(&format!("- [{}]({link})\n", extract_doi_from_url(link)));
                }
                Ok(output)
            }
            ResponseFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "source": url,
                "related": links
                    .iter()
                    .map(|link| json!({"url": link, "doi": extract_doi_from_url(link)}))
                    .collect::<Vec<_>>()
            }))?),
        }
    }
}
