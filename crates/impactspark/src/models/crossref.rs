//! Crossref REST API schemas.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::openalex::null_as_default;

/// Envelope wrapping every Crossref response.
#[derive(Debug, Clone, Deserialize)]
pub struct CrossrefEnvelope<T> {
    /// "ok" on success.
    #[serde(default)]
    pub status: Option<String>,

    /// Payload.
    pub message: T,
}

/// A page of works.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrossrefWorkList {
    /// Total number of matching works.
    #[serde(default, rename = "total-results")]
    pub total_results: u64,

    /// Works requested per page.
    #[serde(default, rename = "items-per-page")]
    pub items_per_page: Option<u32>,

    /// Works on this page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<CrossrefWork>,
}

/// A work (publication) registered with Crossref.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrossrefWork {
    /// DOI.
    #[serde(rename = "DOI", default)]
    pub doi: String,

    /// Titles (usually one).
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: Vec<String>,

    /// JATS-formatted abstract.
    #[serde(rename = "abstract", default)]
    pub abstract_text: Option<String>,

    /// Authors.
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: Vec<CrossrefAuthor>,

    /// Print publication date.
    #[serde(rename = "published-print", default)]
    pub published_print: Option<DateParts>,

    /// Online publication date.
    #[serde(rename = "published-online", default)]
    pub published_online: Option<DateParts>,

    /// Earliest known publication date.
    #[serde(default)]
    pub issued: Option<DateParts>,

    /// Journal or book titles.
    #[serde(rename = "container-title", default, deserialize_with = "null_as_default")]
    pub container_title: Vec<String>,

    /// Number of works citing this one.
    #[serde(rename = "is-referenced-by-count", default)]
    pub is_referenced_by_count: Option<u32>,

    /// Number of references deposited.
    #[serde(rename = "references-count", default)]
    pub references_count: Option<u32>,

    /// Work type (journal-article, book-chapter, ...).
    #[serde(rename = "type", default)]
    pub work_type: Option<String>,

    /// Subject categories.
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: Vec<String>,

    /// Language code.
    #[serde(default)]
    pub language: Option<String>,

    /// Publisher name.
    #[serde(default)]
    pub publisher: Option<String>,

    /// Resolver URL.
    #[serde(rename = "URL", default)]
    pub url: Option<String>,

    /// ISSNs of the container.
    #[serde(rename = "ISSN", default, deserialize_with = "null_as_default")]
    pub issn: Vec<String>,
}

impl CrossrefWork {
    /// Best publication date: print, then online, then issued.
    #[must_use]
    pub fn best_date(&self) -> Option<&DateParts> {
        [&self.published_print, &self.published_online, &self.issued]
            .into_iter()
            .flatten()
            .find(|d| d.year().is_some())
    }

    /// Abstract with JATS/XML tags removed and entities decoded.
    #[must_use]
    pub fn plain_abstract(&self) -> Option<String> {
        let raw = self.abstract_text.as_deref()?;
        let fragment = scraper::Html::parse_fragment(raw);
        let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
        let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if cleaned.is_empty() { None } else { Some(cleaned) }
    }
}

/// A Crossref contributor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrossrefAuthor {
    /// Given name.
    #[serde(default)]
    pub given: Option<String>,

    /// Family name.
    #[serde(default)]
    pub family: Option<String>,

    /// Organisation or literal name.
    #[serde(default)]
    pub name: Option<String>,

    /// ORCID URL.
    #[serde(rename = "ORCID", default)]
    pub orcid: Option<String>,

    /// Affiliations.
    #[serde(default, deserialize_with = "null_as_default")]
    pub affiliation: Vec<CrossrefAffiliation>,
}

impl CrossrefAuthor {
    /// "Given Family", or the literal name.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        match (&self.given, &self.family) {
            (Some(g), Some(f)) => Some(format!("{g} {f}")),
            (None, Some(f)) => Some(f.clone()),
            (Some(g), None) => Some(g.clone()),
            (None, None) => self.name.clone(),
        }
    }
}

/// Author affiliation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrossrefAffiliation {
    /// Affiliation name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Crossref partial date: `{"date-parts": [[2021, 3, 14]]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateParts {
    /// Year, month, day; later parts (and sometimes the year) may be null.
    #[serde(rename = "date-parts", default)]
    pub date_parts: Vec<Vec<Option<i32>>>,
}

impl DateParts {
    fn part(&self, i: usize) -> Option<i32> {
        self.date_parts.first()?.get(i).copied().flatten()
    }

    /// Year component.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.part(0)
    }

    /// Full date; missing month/day default to 1.
    #[must_use]
    pub fn to_date(&self) -> Option<NaiveDate> {
        let year = self.year()?;
        let month = self.part(1).unwrap_or(1).clamp(1, 12) as u32;
        let day = self.part(2).unwrap_or(1).max(1) as u32;
        NaiveDate::from_ymd_opt(year, month, day).or_else(|| NaiveDate::from_ymd_opt(year, month, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_parts() {
        let d: DateParts = serde_json::from_str(r#"{"date-parts": [[2021, 3, 14]]}"#).unwrap();
        assert_eq!(d.year(), Some(2021));
        assert_eq!(d.to_date(), NaiveDate::from_ymd_opt(2021, 3, 14));

        let d: DateParts = serde_json::from_str(r#"{"date-parts": [[2019]]}"#).unwrap();
        assert_eq!(d.to_date(), NaiveDate::from_ymd_opt(2019, 1, 1));

        let d: DateParts = serde_json::from_str(r#"{"date-parts": [[null]]}"#).unwrap();
        assert_eq!(d.year(), None);
    }

    #[test]
    fn test_best_date_prefers_print() {
        let json = r#"{
            "DOI": "10.1/x",
            "published-print": {"date-parts": [[2020, 5]]},
            "published-online": {"date-parts": [[2019, 12, 1]]}
        }"#;
        let work: CrossrefWork = serde_json::from_str(json).unwrap();
        assert_eq!(work.best_date().and_then(DateParts::year), Some(2020));
    }

    #[test]
    fn test_plain_abstract_strips_jats() {
        let work = CrossrefWork {
            abstract_text: Some("<jats:p>Deep <jats:italic>learning</jats:italic> works.</jats:p>".into()),
            ..Default::default()
        };
        assert_eq!(work.plain_abstract().as_deref(), Some("Deep learning works."));
    }

    #[test]
    fn test_plain_abstract_decodes_entities() {
        let work = CrossrefWork {
            abstract_text: Some("<jats:p>Heat &amp; light: T &lt; 5 K</jats:p>".into()),
            ..Default::default()
        };
        assert_eq!(work.plain_abstract().as_deref(), Some("Heat & light: T < 5 K"));

        let empty = CrossrefWork { abstract_text: Some("<jats:p> </jats:p>".into()), ..Default::default() };
        assert_eq!(empty.plain_abstract(), None);
    }

    #[test]
    fn test_author_full_name() {
        let a = CrossrefAuthor { given: Some("Ada".into()), family: Some("Lovelace".into()), ..Default::default() };
        assert_eq!(a.full_name().as_deref(), Some("Ada Lovelace"));

        let org = CrossrefAuthor { name: Some("WHO".into()), ..Default::default() };
        assert_eq!(org.full_name().as_deref(), Some("WHO"));
    }
}
