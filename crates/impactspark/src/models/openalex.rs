//! Work data model matching the OpenAlex API schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// OpenAlex returns `null` for some list fields; treat it as empty.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A scholarly work from OpenAlex.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Work {
    /// OpenAlex work ID (e.g., `https://openalex.org/W2741809807`).
    #[serde(default)]
    pub id: String,

    /// DOI as a full URL (`https://doi.org/...`).
    #[serde(default)]
    pub doi: Option<String>,

    /// Work title.
    #[serde(default)]
    pub title: Option<String>,

    /// Display name (same as title in practice).
    #[serde(default)]
    pub display_name: Option<String>,

    /// Publication year.
    #[serde(default)]
    pub publication_year: Option<i32>,

    /// Publication date in ISO format (YYYY-MM-DD).
    #[serde(default)]
    pub publication_date: Option<String>,

    /// Work type (article, book-chapter, ...).
    #[serde(default, rename = "type")]
    pub work_type: Option<String>,

    /// ISO 639-1 language code.
    #[serde(default)]
    pub language: Option<String>,

    /// Number of works citing this one.
    #[serde(default)]
    pub cited_by_count: Option<u32>,

    /// Field-weighted citation impact.
    #[serde(default)]
    pub fwci: Option<f64>,

    /// Citation percentile normalized by field and year.
    #[serde(default)]
    pub citation_normalized_percentile: Option<CitationPercentile>,

    /// Author list with affiliations.
    #[serde(default, deserialize_with = "null_as_default")]
    pub authorships: Vec<Authorship>,

    /// Best location for the work.
    #[serde(default)]
    pub primary_location: Option<Location>,

    /// Legacy venue object (older API responses).
    #[serde(default)]
    pub host_venue: Option<Source>,

    /// Open access status.
    #[serde(default)]
    pub open_access: Option<OpenAccess>,

    /// Concepts, ordered by score.
    #[serde(default, deserialize_with = "null_as_default")]
    pub concepts: Vec<Concept>,

    /// Primary topic with its subfield, field and domain.
    #[serde(default)]
    pub primary_topic: Option<Topic>,

    /// Author/indexer keywords.
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<Keyword>,

    /// IDs of related works.
    #[serde(default, deserialize_with = "null_as_default")]
    pub related_works: Vec<String>,

    /// Abstract as an inverted index (word -> positions).
    #[serde(default)]
    pub abstract_inverted_index: Option<BTreeMap<String, Vec<usize>>>,
}

impl Work {
    /// Get the title, falling back to the display name.
    #[must_use]
    pub fn title_text(&self) -> Option<&str> {
        self.title.as_deref().or(self.display_name.as_deref())
    }

    /// Get the bare DOI (without the `https://doi.org/` prefix).
    #[must_use]
    pub fn bare_doi(&self) -> Option<&str> {
        let doi = self.doi.as_deref()?;
        let doi = doi.strip_prefix("https://doi.org/").unwrap_or(doi);
        if doi.is_empty() { None } else { Some(doi) }
    }

    /// Get the citation count or 0 if not available.
    #[must_use]
    pub fn citations(&self) -> u32 {
        self.cited_by_count.unwrap_or(0)
    }

    /// Check if the work is open access.
    #[must_use]
    pub fn is_open_access(&self) -> bool {
        self.open_access.as_ref().is_some_and(|oa| oa.is_oa)
    }

    /// Source (journal/repository) display name.
    #[must_use]
    pub fn source_name(&self) -> Option<&str> {
        self.primary_location
            .as_ref()
            .and_then(|loc| loc.source.as_ref())
            .and_then(|s| s.display_name.as_deref())
            .filter(|s| !s.is_empty())
            .or_else(|| self.host_venue.as_ref()?.display_name.as_deref())
    }

    /// Rebuild the plain-text abstract from the inverted index.
    #[must_use]
    pub fn abstract_text(&self) -> Option<String> {
        let index = self.abstract_inverted_index.as_ref()?;

        let mut positioned: Vec<(usize, &str)> = index
            .iter()
            .flat_map(|(word, positions)| positions.iter().map(move |&p| (p, word.as_str())))
            .collect();

        if positioned.is_empty() {
            return None;
        }

        positioned.sort_unstable_by_key(|&(p, _)| p);
        Some(positioned.into_iter().map(|(_, w)| w).collect::<Vec<_>>().join(" "))
    }
}

/// One author's contribution to a work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Authorship {
    /// first, middle or last.
    #[serde(default)]
    pub author_position: Option<String>,

    /// The author.
    #[serde(default)]
    pub author: DehydratedAuthor,

    /// Institutions listed for this author on this work.
    #[serde(default, deserialize_with = "null_as_default")]
    pub institutions: Vec<DehydratedInstitution>,
}

/// Minimal author reference embedded in works.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DehydratedAuthor {
    /// OpenAlex author ID.
    #[serde(default)]
    pub id: Option<String>,

    /// Author name.
    #[serde(default)]
    pub display_name: Option<String>,

    /// ORCID URL.
    #[serde(default)]
    pub orcid: Option<String>,
}

/// Minimal institution reference embedded in works and authors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DehydratedInstitution {
    /// OpenAlex institution ID.
    #[serde(default)]
    pub id: Option<String>,

    /// Institution name.
    #[serde(default)]
    pub display_name: Option<String>,

    /// ISO 3166-1 alpha-2 country code.
    #[serde(default)]
    pub country_code: Option<String>,

    /// Institution type (education, company, ...).
    #[serde(default, rename = "type")]
    pub institution_type: Option<String>,
}

/// A place where a work is hosted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    /// Hosting source (journal, repository).
    #[serde(default)]
    pub source: Option<Source>,

    /// Landing page URL.
    #[serde(default)]
    pub landing_page_url: Option<String>,

    /// PDF URL.
    #[serde(default)]
    pub pdf_url: Option<String>,

    /// Whether this location is open access.
    #[serde(default)]
    pub is_oa: Option<bool>,
}

/// Journal, conference or repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Source {
    /// OpenAlex source ID.
    #[serde(default)]
    pub id: Option<String>,

    /// Source name.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Linking ISSN.
    #[serde(default)]
    pub issn_l: Option<String>,
}

/// Open access information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAccess {
    /// Whether any version is open access.
    #[serde(default)]
    pub is_oa: bool,

    /// gold, green, hybrid, bronze, closed.
    #[serde(default)]
    pub oa_status: Option<String>,

    /// Best open access URL.
    #[serde(default)]
    pub oa_url: Option<String>,
}

/// Citation percentile normalized by field and year.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitationPercentile {
    /// Percentile as a fraction in `[0, 1]`.
    #[serde(default)]
    pub value: Option<f64>,

    /// Whether the work is in the top 1%.
    #[serde(default)]
    pub is_in_top_1_percent: Option<bool>,

    /// Whether the work is in the top 10%.
    #[serde(default)]
    pub is_in_top_10_percent: Option<bool>,
}

/// A concept tagged on a work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Concept {
    /// OpenAlex concept ID.
    #[serde(default)]
    pub id: Option<String>,

    /// Concept name.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Hierarchy level (0 = root).
    #[serde(default)]
    pub level: Option<u32>,

    /// Relevance score.
    #[serde(default)]
    pub score: Option<f64>,
}

/// Named node in the topic hierarchy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicNode {
    /// OpenAlex ID.
    #[serde(default)]
    pub id: Option<String>,

    /// Name.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Topic with its place in the hierarchy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topic {
    /// OpenAlex topic ID.
    #[serde(default)]
    pub id: Option<String>,

    /// Topic name.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Subfield.
    #[serde(default)]
    pub subfield: Option<TopicNode>,

    /// Field.
    #[serde(default)]
    pub field: Option<TopicNode>,

    /// Domain.
    #[serde(default)]
    pub domain: Option<TopicNode>,
}

/// Keyword tagged on a work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Keyword {
    /// OpenAlex keyword ID.
    #[serde(default)]
    pub id: Option<String>,

    /// Keyword text.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Relevance score.
    #[serde(default)]
    pub score: Option<f64>,
}

/// Paging metadata for list endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Total number of matching records.
    #[serde(default)]
    pub count: u64,

    /// Current page (1-based).
    #[serde(default)]
    pub page: Option<u32>,

    /// Records per page.
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// A page of works from `/works`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorksPage {
    /// Paging metadata.
    #[serde(default)]
    pub meta: Meta,

    /// Works on this page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Work>,
}

impl WorksPage {
    /// Check if there are more pages after this one.
    #[must_use]
    pub fn has_more(&self) -> bool {
        let page = u64::from(self.meta.page.unwrap_or(1));
        let per_page = u64::from(self.meta.per_page.unwrap_or(0));
        per_page > 0 && page * per_page < self.meta.count
    }
}
