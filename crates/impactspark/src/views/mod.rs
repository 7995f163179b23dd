//! Dashboard views.
//!
//! Each view is one dashboard page or action. A view:
//! 1. Parses and validates its camelCase JSON input
//! 2. Calls the API clients or reads a stored result set
//! 3. Formats the outcome as Markdown or JSON

mod citations;
mod enrichment;
mod export;
mod impact;
mod publications;
mod search;

pub use citations::*;
pub use enrichment::*;
pub use export::*;
pub use impact::*;
pub use publications::*;
pub use search::*;

use std::sync::Arc;

use serde_json::Value;

use crate::client::{CrossrefClient, OpenAlexClient};
use crate::config::Config;
use crate::error::{ViewError, ViewResult};
use crate::models::{Publication, PublicationSelector, normalize_doi};
use crate::results::ResultStore;
use crate::scraping::WebScraper;

/// Shown when a search returns nothing.
pub const NO_RESULTS_MESSAGE: &str =
    "No results found for your search criteria. Please try different keywords or filters.";

/// Shown when the citation range removes every result.
pub const NO_CITATION_MATCH_MESSAGE: &str =
    "No results match your citation filters. Please adjust the citation range.";

/// View execution context.
#[derive(Debug, Clone)]
pub struct ViewContext {
    /// OpenAlex client.
    pub openalex: Arc<OpenAlexClient>,
    /// Crossref client.
    pub crossref: Arc<CrossrefClient>,
    /// Landing page scraper.
    pub scraper: Arc<WebScraper>,
    /// Stored search results.
    pub results: Arc<ResultStore>,
    /// Settings the views read (enrichment limit).
    pub config: Arc<Config>,
}

impl ViewContext {
    /// Build the clients, scraper and an empty result store from `config`.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be initialized.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        Ok(Self {
            openalex: Arc::new(OpenAlexClient::new(&config)?),
            crossref: Arc::new(CrossrefClient::new(&config)?),
            scraper: Arc::new(WebScraper::new(&config)?),
            results: Arc::new(ResultStore::new()),
            config: Arc::new(config),
        })
    }
}

/// Trait for dashboard views.
#[async_trait::async_trait]
pub trait DashboardView: Send + Sync {
    /// View name (e.g., "citation_analytics").
    fn name(&self) -> &'static str;

    /// One-line description shown in the view list.
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> Value;

    /// Execute the view with given input.
    async fn execute(&self, ctx: &ViewContext, input: Value) -> ViewResult<String>;
}

/// Register all views.
#[must_use]
pub fn register_all_views() -> Vec<Box<dyn DashboardView>> {
    vec![
        // Search (2)
        Box::new(search::SearchView),
        Box::new(search::CrossrefSearchView),

        // Single publications (2)
        Box::new(publications::PublicationDetailView),
        Box::new(publications::SimilarPapersView),

        // Analytics pages (4)
        Box::new(citations::CitationAnalyticsView),
        Box::new(citations::ArticleTrackerView),
        Box::new(citations::CitationDistributionView),
        Box::new(impact::ImpactAnalysisView),

        // Scraping (2)
        Box::new(enrichment::EnrichView),
        Box::new(enrichment::RelatedPublicationsView),

        // Export (1)
        Box::new(export::ExportView),
    ]
}

/// Resolve a selector to an index into `publications`.
///
/// Index wins over DOI, DOI over title. DOIs compare after normalization and
/// titles compare case-insensitively.
///
/// # Errors
///
/// Returns `NotFound` when nothing matches and `Validation` when no selector is set.
pub fn select_publication(publications: &[Publication], selector: &PublicationSelector) -> ViewResult<usize> {
    if let Some(index) = selector.index {
        return if index < publications.len() {
            Ok(index)
        } else {
            Err(ViewError::not_found(format!(
                "publication #{index} (result set has {} publications)",
                publications.len()
            )))
        };
    }

    if let Some(doi) = selector.doi.as_deref() {
        let wanted = normalize_doi(doi).to_ascii_lowercase();
        return publications
            .iter()
            .position(|p| p.doi.as_deref().is_some_and(|d| normalize_doi(d).to_ascii_lowercase() == wanted))
            .ok_or_else(|| ViewError::not_found(format!("publication with DOI '{doi}'")));
    }

    if let Some(title) = selector.title.as_deref() {
        let wanted = title.trim().to_lowercase();
        return publications
            .iter()
            .position(|p| p.title.to_lowercase() == wanted)
            .ok_or_else(|| ViewError::not_found(format!("publication titled '{title}'")));
    }

    Err(ViewError::validation("index", "one of index, doi or title is required"))
}

/// Earliest and latest publication year in `publications`.
#[must_use]
pub fn year_bounds(publications: &[Publication]) -> Option<(i32, i32)> {
    let years = publications.iter().filter_map(Publication::effective_year);
    years.fold(None, |acc, y| match acc {
        None => Some((y, y)),
        Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
    })
}

/// Whether `year` lies inside the optional bounds. Unknown years pass only when unbounded.
#[must_use]
pub fn year_in_range(year: Option<i32>, start: Option<i32>, end: Option<i32>) -> bool {
    match (start, end) {
        (None, None) => true,
        _ => year.is_some_and(|y| start.is_none_or(|s| y >= s) && end.is_none_or(|e| y <= e)),
    }
}

/// Schema fragment shared by views that take a `responseFormat`.
fn response_format_schema() -> Value {
    serde_json::json!({
        "type": "string",
        "enum": ["markdown", "json"],
        "default": "markdown"
    })
}

/// Schema fragment for a publication selector.
fn selector_properties() -> Value {
    serde_json::json!({
        "index": {"type": "integer", "minimum": 0, "description": "Zero-based position in the result set"},
        "doi": {"type": "string", "description": "DOI (bare or https://doi.org/...)"},
        "title": {"type": "string", "description": "Exact title (case-insensitive)"}
    })
}
