//! Author, institution and concept entities from the OpenAlex API.

use serde::{Deserialize, Serialize};

use super::openalex::{DehydratedInstitution, null_as_default};

/// Summary statistics OpenAlex computes for authors and institutions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    /// h-index.
    #[serde(default)]
    pub h_index: Option<u32>,

    /// i10-index.
    #[serde(default)]
    pub i10_index: Option<u32>,

    /// Mean citations received in the last two years.
    #[serde(default, rename = "2yr_mean_citedness")]
    pub two_year_mean_citedness: Option<f64>,
}

/// A research author from OpenAlex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    /// OpenAlex author ID.
    pub id: String,

    /// Author name.
    #[serde(default)]
    pub display_name: Option<String>,

    /// ORCID URL.
    #[serde(default)]
    pub orcid: Option<String>,

    /// Total number of works.
    #[serde(default)]
    pub works_count: Option<u32>,

    /// Total citation count across all works.
    #[serde(default)]
    pub cited_by_count: Option<u32>,

    /// h-index, i10-index, mean citedness.
    #[serde(default)]
    pub summary_stats: Option<SummaryStats>,

    /// Most recent institutions.
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_known_institutions: Vec<DehydratedInstitution>,
}

impl Author {
    /// Get the author name, falling back to "Unknown" if not available.
    #[must_use]
    pub fn name_or_default(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Unknown")
    }

    /// Get the primary affiliation if available.
    #[must_use]
    pub fn primary_affiliation(&self) -> Option<&str> {
        self.last_known_institutions.first()?.display_name.as_deref()
    }

    /// Get the h-index or 0 if not available.
    #[must_use]
    pub fn h_index_value(&self) -> u32 {
        self.summary_stats.as_ref().and_then(|s| s.h_index).unwrap_or(0)
    }

    /// Get citation count or 0 if not available.
    #[must_use]
    pub fn citations(&self) -> u32 {
        self.cited_by_count.unwrap_or(0)
    }

    /// Get works count or 0 if not available.
    #[must_use]
    pub fn works(&self) -> u32 {
        self.works_count.unwrap_or(0)
    }
}

/// A research institution from OpenAlex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Institution {
    /// OpenAlex institution ID.
    pub id: String,

    /// Institution name.
    #[serde(default)]
    pub display_name: Option<String>,

    /// ISO 3166-1 alpha-2 country code.
    #[serde(default)]
    pub country_code: Option<String>,

    /// Institution type.
    #[serde(default, rename = "type")]
    pub institution_type: Option<String>,

    /// ROR identifier.
    #[serde(default)]
    pub ror: Option<String>,

    /// Homepage URL.
    #[serde(default)]
    pub homepage_url: Option<String>,

    /// Number of works.
    #[serde(default)]
    pub works_count: Option<u32>,

    /// Citations across all works.
    #[serde(default)]
    pub cited_by_count: Option<u32>,

    /// h-index, i10-index, mean citedness.
    #[serde(default)]
    pub summary_stats: Option<SummaryStats>,
}

/// A concept from the OpenAlex concept tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptDetail {
    /// OpenAlex concept ID.
    pub id: String,

    /// Concept name.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Hierarchy level (0 = root).
    #[serde(default)]
    pub level: Option<u32>,

    /// Short description.
    #[serde(default)]
    pub description: Option<String>,

    /// Number of tagged works.
    #[serde(default)]
    pub works_count: Option<u32>,

    /// Citations across tagged works.
    #[serde(default)]
    pub cited_by_count: Option<u32>,
}
