//! Normalized publication record shared by every dashboard view.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::crossref::CrossrefWork;
use super::openalex::Work;

/// Placeholder shown when a work lists no named authors.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// One publication, normalized from OpenAlex or Crossref metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    /// OpenAlex work URL, or the DOI for Crossref records.
    pub id: String,

    /// Single-line title ("Untitled" if missing).
    pub title: String,

    /// Author names in byline order.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Publication year.
    #[serde(default)]
    pub year: Option<i32>,

    /// Publication date.
    #[serde(default)]
    pub publication_date: Option<NaiveDate>,

    /// Journal, repository or book title.
    #[serde(default)]
    pub source: String,

    /// Institutions of the first author.
    #[serde(default)]
    pub institutions: Vec<String>,

    /// Country codes of the first author's institutions.
    #[serde(default)]
    pub country_codes: Vec<String>,

    /// Citation count.
    #[serde(default)]
    pub citations: u32,

    /// Related works (OpenAlex) or deposited references (Crossref).
    #[serde(default)]
    pub related_count: u32,

    /// Field-weighted citation impact.
    #[serde(default)]
    pub fwci: f64,

    /// Normalized citation percentile.
    #[serde(default)]
    pub citation_percentile: f64,

    /// Work type.
    #[serde(default)]
    pub work_type: String,

    /// First concept.
    #[serde(default)]
    pub topic: String,

    /// Second concept.
    #[serde(default)]
    pub subfield: String,

    /// Third concept.
    #[serde(default)]
    pub field: String,

    /// Domain of the primary topic.
    #[serde(default)]
    pub domain: String,

    /// Whether any version is open access.
    #[serde(default)]
    pub open_access: bool,

    /// Bare DOI.
    #[serde(default)]
    pub doi: Option<String>,

    /// Abstract text.
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,

    /// Scraped landing page text.
    #[serde(default)]
    pub full_text: Option<String>,

    /// Keywords or subject categories.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Language code.
    #[serde(default)]
    pub language: Option<String>,
}

/// Strip the resolver prefix from a DOI.
#[must_use]
pub fn normalize_doi(doi: &str) -> String {
    let doi = doi.trim();
    let lower = doi.to_ascii_lowercase();
    for prefix in ["https://doi.org/", "http://doi.org/", "https://dx.doi.org/", "http://dx.doi.org/", "doi:"] {
        if lower.starts_with(prefix) {
            return doi[prefix.len()..].trim().to_string();
        }
    }
    doi.to_string()
}

fn single_line(title: &str) -> String {
    title.replace(['\n', '\r'], " ").trim().to_string()
}

fn non_empty(values: impl IntoIterator<Item = Option<String>>) -> Vec<String> {
    values.into_iter().flatten().filter(|s| !s.trim().is_empty()).collect()
}

impl Publication {
    /// Normalize an OpenAlex work.
    #[must_use]
    pub fn from_openalex(work: &Work) -> Self {
        let title = work.title_text().map_or_else(|| "Untitled".to_string(), single_line);

        let authors = non_empty(work.authorships.iter().map(|a| a.author.display_name.clone()));

        let first_institutions = work.authorships.first().map(|a| a.institutions.as_slice()).unwrap_or_default();
        let institutions = non_empty(first_institutions.iter().map(|i| i.display_name.clone()));
        let country_codes = non_empty(first_institutions.iter().map(|i| i.country_code.clone()));

        let concept = |i: usize| {
            work.concepts.get(i).and_then(|c| c.display_name.clone()).unwrap_or_default()
        };

        let publication_date = work
            .publication_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        Self {
            id: work.id.clone(),
            title,
            authors,
            year: work.publication_year,
            publication_date,
            source: work.source_name().unwrap_or_default().to_string(),
            institutions,
            country_codes,
            citations: work.citations(),
            related_count: u32::try_from(work.related_works.len()).unwrap_or(u32::MAX),
            fwci: work.fwci.unwrap_or(0.0),
            citation_percentile: work
                .citation_normalized_percentile
                .as_ref()
                .and_then(|p| p.value)
                .unwrap_or(0.0),
            work_type: work.work_type.clone().unwrap_or_default(),
            topic: concept(0),
            subfield: concept(1),
            field: concept(2),
            domain: work
                .primary_topic
                .as_ref()
                .and_then(|t| t.domain.as_ref())
                .and_then(|d| d.display_name.clone())
                .unwrap_or_default(),
            open_access: work.is_open_access(),
            doi: work.bare_doi().map(str::to_string),
            abstract_text: work.abstract_text(),
            full_text: None,
            keywords: non_empty(work.keywords.iter().map(|k| k.display_name.clone())),
            language: work.language.clone(),
        }
    }

    /// Normalize a Crossref work.
    #[must_use]
    pub fn from_crossref(work: &CrossrefWork) -> Self {
        let title = work.title.first().map_or_else(|| "Untitled".to_string(), |t| single_line(t));
        let date = work.best_date();
        let doi = normalize_doi(&work.doi);

        let first_affiliations = work.author.first().map(|a| a.affiliation.as_slice()).unwrap_or_default();

        Self {
            id: if doi.is_empty() { work.url.clone().unwrap_or_default() } else { doi.clone() },
            title,
            authors: non_empty(work.author.iter().map(|a| a.full_name())),
            year: date.and_then(|d| d.year()),
            publication_date: date.and_then(|d| d.to_date()),
            source: work.container_title.first().cloned().unwrap_or_default(),
            institutions: non_empty(first_affiliations.iter().map(|a| a.name.clone())),
            country_codes: Vec::new(),
            citations: work.is_referenced_by_count.unwrap_or(0),
            related_count: work.references_count.unwrap_or(0),
            fwci: 0.0,
            citation_percentile: 0.0,
            work_type: work.work_type.clone().unwrap_or_default(),
            topic: work.subject.first().cloned().unwrap_or_default(),
            subfield: work.subject.get(1).cloned().unwrap_or_default(),
            field: work.subject.get(2).cloned().unwrap_or_default(),
            domain: String::new(),
            open_access: false,
            doi: if doi.is_empty() { None } else { Some(doi) },
            abstract_text: work.plain_abstract(),
            full_text: None,
            keywords: work.subject.clone(),
            language: work.language.clone(),
        }
    }

    /// Citation count under its dashboard alias.
    #[must_use]
    pub const fn cited_by(&self) -> u32 {
        self.citations
    }

    /// A paper's contribution to the h-index of a set is bounded by its citations.
    #[must_use]
    pub const fn h_index_contribution(&self) -> u32 {
        self.citations
    }

    /// Resolver URL for the DOI.
    #[must_use]
    pub fn doi_url(&self) -> Option<String> {
        let doi = self.doi.as_deref().filter(|d| !d.is_empty())?;
        if doi.starts_with("http") { Some(doi.to_string()) } else { Some(format!("https://doi.org/{doi}")) }
    }

    /// Authors joined by ", ", or the unknown-author placeholder.
    #[must_use]
    pub fn authors_joined(&self) -> String {
        if self.authors.is_empty() { UNKNOWN_AUTHOR.to_string() } else { self.authors.join(", ") }
    }

    /// "Yes" or "No".
    #[must_use]
    pub const fn open_access_status(&self) -> &'static str {
        if self.open_access { "Yes" } else { "No" }
    }

    /// Year, falling back to the year of the publication date.
    #[must_use]
    pub fn effective_year(&self) -> Option<i32> {
        self.year.or_else(|| self.publication_date.map(|d| d.year()))
    }

    /// Whether an abstract is present and non-blank.
    #[must_use]
    pub fn has_abstract(&self) -> bool {
        self.abstract_text.as_deref().is_some_and(|a| !a.trim().is_empty())
    }
}
