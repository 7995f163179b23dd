//! Input models for dashboard view parameters.
//!
//! Each dashboard page or action takes one of these as camelCase JSON.

use serde::{Deserialize, Serialize};

use super::{
    AnalysisType, AuthorSortKey, CrossrefSearchKind, ExportFormat, GroupBy, Language,
    PublicationType, ResearchField, ResponseFormat, SearchMethod, SortKey, SortOrder, TimePeriod,
    TrackerMode,
};
use crate::config::dashboard;
use crate::error::{ViewError, ViewResult};

fn require_non_empty(field: &str, value: &str) -> ViewResult<()> {
    if value.trim().is_empty() {
        return Err(ViewError::validation(field, "cannot be empty"));
    }
    Ok(())
}

fn require_year_order(start: Option<i32>, end: Option<i32>) -> ViewResult<()> {
    match (start, end) {
        (Some(s), Some(e)) if s > e => {
            Err(ViewError::validation("startYear", format!("{s} is after endYear {e}")))
        }
        _ => Ok(()),
    }
}

/// Input for the main search page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInput {
    /// Keyword/topic, or a DOI when `searchMethod` is `doi`.
    pub query: String,

    /// How to interpret the query.
    #[serde(default)]
    pub search_method: SearchMethod,

    /// Start of the publication date range (YYYY-MM-DD).
    #[serde(default)]
    pub start_date: Option<String>,

    /// End of the publication date range (YYYY-MM-DD).
    #[serde(default)]
    pub end_date: Option<String>,

    /// Restrict to these work types.
    #[serde(default)]
    pub publication_types: Vec<PublicationType>,

    /// Only open access works.
    #[serde(default)]
    pub open_access_only: bool,

    /// Minimum citations (inclusive).
    #[serde(default)]
    pub min_citations: u32,

    /// Maximum citations (inclusive).
    #[serde(default = "default_max_citations")]
    pub max_citations: u32,

    /// Restrict to these research fields.
    #[serde(default)]
    pub fields: Vec<ResearchField>,

    /// Restrict to these languages.
    #[serde(default)]
    pub languages: Vec<Language>,

    /// Only the last two years; overrides `startDate`.
    #[serde(default)]
    pub recent_only: bool,

    /// Result page (1-based).
    #[serde(default = "default_page")]
    pub page: u32,

    /// Results per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Table sort column.
    #[serde(default)]
    pub sort_by: SortKey,

    /// Table sort direction.
    #[serde(default)]
    pub sort_order: SortOrder,

    /// Replace the publications of this result set instead of creating a new one.
    #[serde(default)]
    pub result_id: Option<String>,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn default_max_citations() -> u32 {
    dashboard::CITATION_SLIDER_MAX
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    dashboard::DEFAULT_PER_PAGE
}

impl SearchInput {
    /// Check the input before any request is made.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending field.
    pub fn validate(&self) -> ViewResult<()> {
        require_non_empty("query", &self.query)?;
        if self.min_citations > self.max_citations {
            return Err(ViewError::validation("minCitations", "must not exceed maxCitations"));
        }
        if self.page == 0 {
            return Err(ViewError::validation("page", "must be at least 1"));
        }
        if self.per_page == 0 || self.per_page > dashboard::MAX_PER_PAGE {
            return Err(ViewError::validation(
                "perPage",
                format!("must be between 1 and {}", dashboard::MAX_PER_PAGE),
            ));
        }
        Ok(())
    }

    /// Whether a citation bound narrows the results.
    #[must_use]
    pub const fn has_citation_filter(&self) -> bool {
        self.min_citations > 0 || self.max_citations < dashboard::CITATION_SLIDER_MAX
    }
}

/// Input for a Crossref search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossrefSearchInput {
    /// Query text, author name, or journal title/ISSN.
    pub query: String,

    /// What the query names.
    #[serde(default)]
    pub kind: CrossrefSearchKind,

    /// Earliest publication date (only the year is used).
    #[serde(default)]
    pub from_date: Option<String>,

    /// Latest publication date (only the year is used).
    #[serde(default)]
    pub until_date: Option<String>,

    /// Rows to fetch.
    #[serde(default = "default_per_page")]
    pub rows: u32,

    /// Offset into the result list.
    #[serde(default)]
    pub offset: u32,

    /// Replace the publications of this result set.
    #[serde(default)]
    pub result_id: Option<String>,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl CrossrefSearchInput {
    /// Check the input.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty query or an out-of-range row count.
    pub fn validate(&self) -> ViewResult<()> {
        require_non_empty("query", &self.query)?;
        if self.rows == 0 || self.rows > 1000 {
            return Err(ViewError::validation("rows", "must be between 1 and 1000"));
        }
        Ok(())
    }
}

/// Selects one publication within a result set.
///
/// The first present selector wins: index, then DOI, then exact title.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationSelector {
    /// Zero-based position in the result set.
    #[serde(default)]
    pub index: Option<usize>,

    /// DOI (bare or resolver URL).
    #[serde(default)]
    pub doi: Option<String>,

    /// Exact title.
    #[serde(default)]
    pub title: Option<String>,
}

impl PublicationSelector {
    /// Whether any selector is set.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.index.is_some() || self.doi.is_some() || self.title.is_some()
    }
}

/// Input for the publication detail panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationDetailInput {
    /// Result set to look in.
    pub result_id: String,

    /// Which publication.
    #[serde(flatten)]
    pub selector: PublicationSelector,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl PublicationDetailInput {
    /// Check the input.
    ///
    /// # Errors
    ///
    /// Returns a validation error when no selector is given.
    pub fn validate(&self) -> ViewResult<()> {
        require_non_empty("resultId", &self.result_id)?;
        if !self.selector.is_set() {
            return Err(ViewError::validation("index", "one of index, doi or title is required"));
        }
        Ok(())
    }
}

/// Input for the citation analytics page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationAnalyticsInput {
    /// Result set to analyse.
    pub result_id: String,

    /// First publication year (defaults to the earliest in the set).
    #[serde(default)]
    pub start_year: Option<i32>,

    /// Last publication year (defaults to the latest in the set).
    #[serde(default)]
    pub end_year: Option<i32>,

    /// Minimum citations.
    #[serde(default)]
    pub min_citations: Option<u32>,

    /// Maximum citations.
    #[serde(default)]
    pub max_citations: Option<u32>,

    /// Restrict to one source/journal.
    #[serde(default)]
    pub journal: Option<String>,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl CitationAnalyticsInput {
    /// Check the input.
    ///
    /// # Errors
    ///
    /// Returns a validation error for inverted ranges.
    pub fn validate(&self) -> ViewResult<()> {
        require_non_empty("resultId", &self.result_id)?;
        require_year_order(self.start_year, self.end_year)?;
        match (self.min_citations, self.max_citations) {
            (Some(lo), Some(hi)) if lo > hi => {
                Err(ViewError::validation("minCitations", "must not exceed maxCitations"))
            }
            _ => Ok(()),
        }
    }
}

/// Input for the article tracker page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleTrackerInput {
    /// Result set to track within.
    pub result_id: String,

    /// One article or a filtered subset.
    #[serde(default)]
    pub mode: TrackerMode,

    /// The tracked article (individual mode).
    #[serde(flatten)]
    pub selector: PublicationSelector,

    /// First publication year (multiple mode).
    #[serde(default)]
    pub start_year: Option<i32>,

    /// Last publication year (multiple mode).
    #[serde(default)]
    pub end_year: Option<i32>,

    /// Source filter (multiple mode).
    #[serde(default)]
    pub journal: Option<String>,

    /// Author filter (multiple mode).
    #[serde(default)]
    pub author: Option<String>,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl ArticleTrackerInput {
    /// Check the input.
    ///
    /// # Errors
    ///
    /// Returns a validation error when individual mode lacks a selector.
    pub fn validate(&self) -> ViewResult<()> {
        require_non_empty("resultId", &self.result_id)?;
        require_year_order(self.start_year, self.end_year)?;
        if self.mode == TrackerMode::Individual && !self.selector.is_set() {
            return Err(ViewError::validation("index", "individual mode needs index, doi or title"));
        }
        Ok(())
    }
}

/// Input for the citation distribution page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationDistributionInput {
    /// Result set to analyse.
    pub result_id: String,

    /// Time window.
    #[serde(default)]
    pub time_period: TimePeriod,

    /// First year for a custom window.
    #[serde(default)]
    pub start_year: Option<i32>,

    /// Last year for a custom window.
    #[serde(default)]
    pub end_year: Option<i32>,

    /// Grouping variable.
    #[serde(default)]
    pub group_by: GroupBy,

    /// Histogram bin count.
    #[serde(default = "default_bins")]
    pub bins: usize,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn default_bins() -> usize {
    20
}

impl CitationDistributionInput {
    /// Check the input.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `bins` is outside 5..=100.
    pub fn validate(&self) -> ViewResult<()> {
        require_non_empty("resultId", &self.result_id)?;
        require_year_order(self.start_year, self.end_year)?;
        if !(5..=100).contains(&self.bins) {
            return Err(ViewError::validation("bins", "must be between 5 and 100"));
        }
        Ok(())
    }
}

/// Input for the impact analysis page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactAnalysisInput {
    /// Result set to analyse.
    pub result_id: String,

    /// Section to compute.
    #[serde(default)]
    pub analysis_type: AnalysisType,

    /// First publication year.
    #[serde(default)]
    pub start_year: Option<i32>,

    /// Last publication year.
    #[serde(default)]
    pub end_year: Option<i32>,

    /// Minimum citations.
    #[serde(default)]
    pub min_citations: u32,

    /// Author table ordering.
    #[serde(default)]
    pub author_sort: AuthorSortKey,

    /// Keywords to chart over time (at most five); empty means the three most frequent.
    #[serde(default)]
    pub trend_keywords: Vec<String>,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl ImpactAnalysisInput {
    /// Check the input.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an inverted year range.
    pub fn validate(&self) -> ViewResult<()> {
        require_non_empty("resultId", &self.result_id)?;
        require_year_order(self.start_year, self.end_year)
    }
}

/// Input for scraping enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichInput {
    /// Result set to enrich.
    pub result_id: String,

    /// Publications to process (defaults to the configured maximum).
    #[serde(default)]
    pub max_items: Option<usize>,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl EnrichInput {
    /// Check the input.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty id or zero items.
    pub fn validate(&self) -> ViewResult<()> {
        require_non_empty("resultId", &self.result_id)?;
        if self.max_items == Some(0) {
            return Err(ViewError::validation("maxItems", "must be at least 1"));
        }
        Ok(())
    }
}

/// Input for related publication discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedPublicationsInput {
    /// DOI whose landing page is scanned.
    #[serde(default)]
    pub doi: Option<String>,

    /// Any page URL to scan instead of a DOI.
    #[serde(default)]
    pub url: Option<String>,

    /// Maximum links to return.
    #[serde(default = "default_max_links")]
    pub max_links: usize,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn default_max_links() -> usize {
    5
}

impl RelatedPublicationsInput {
    /// Check the input.
    ///
    /// # Errors
    ///
    /// Returns a validation error when neither DOI nor URL is given.
    pub fn validate(&self) -> ViewResult<()> {
        let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        if !has(&self.doi) && !has(&self.url) {
            return Err(ViewError::validation("doi", "either doi or url is required"));
        }
        if self.max_links == 0 {
            return Err(ViewError::validation("maxLinks", "must be at least 1"));
        }
        Ok(())
    }
}

/// Input for similar paper discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarPapersInput {
    /// Result set to search within.
    pub result_id: String,

    /// Target publication.
    #[serde(flatten)]
    pub selector: PublicationSelector,

    /// Number of neighbours.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn default_top_n() -> usize {
    5
}

impl SimilarPapersInput {
    /// Check the input.
    ///
    /// # Errors
    ///
    /// Returns a validation error when no target is selected.
    pub fn validate(&self) -> ViewResult<()> {
        require_non_empty("resultId", &self.result_id)?;
        if !self.selector.is_set() {
            return Err(ViewError::validation("index", "one of index, doi or title is required"));
        }
        if self.top_n == 0 {
            return Err(ViewError::validation("topN", "must be at least 1"));
        }
        Ok(())
    }
}

/// Input for result set export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportInput {
    /// Result set to export.
    pub result_id: String,

    /// File format.
    #[serde(default)]
    pub format: ExportFormat,
}

impl ExportInput {
    /// Check the input.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty id.
    pub fn validate(&self) -> ViewResult<()> {
        require_non_empty("resultId", &self.result_id)
    }
}
