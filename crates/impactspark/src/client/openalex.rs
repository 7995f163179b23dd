//! OpenAlex API client.

use chrono::{Datelike, Duration as ChronoDuration, NaiveDate};

use super::HttpCore;
use crate::config::{Config, dashboard};
use crate::error::ClientResult;
use crate::models::{Author, ConceptDetail, Institution, Work, WorksPage, normalize_doi};

/// Parameters of a `/works` search.
#[derive(Debug, Clone)]
pub struct WorkQuery {
    /// Full-text search terms.
    pub search: String,

    /// Start of the publication date range (YYYY-MM-DD).
    pub start_date: Option<String>,

    /// End of the publication date range (YYYY-MM-DD).
    pub end_date: Option<String>,

    /// Work types (`type` filter, OR-ed).
    pub types: Vec<String>,

    /// Only open access works.
    pub open_access_only: bool,

    /// Concept display names (OR-ed).
    pub concepts: Vec<String>,

    /// ISO 639-1 language codes (OR-ed).
    pub languages: Vec<String>,

    /// Any other `field:value` filters.
    pub extra_filters: Vec<(String, String)>,

    /// Page number (1-based).
    pub page: u32,

    /// Results per page.
    pub per_page: u32,
}

impl WorkQuery {
    /// A search over the default date window.
    #[must_use]
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            start_date: None,
            end_date: None,
            types: Vec::new(),
            open_access_only: false,
            concepts: Vec::new(),
            languages: Vec::new(),
            extra_filters: Vec::new(),
            page: 1,
            per_page: dashboard::DEFAULT_PER_PAGE,
        }
    }

    /// Publication date bounds; a missing start defaults to ten years before `today`,
    /// a missing end to `today`. Any unparseable bound yields the last ten calendar years.
    #[must_use]
    pub fn date_bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let lookback = ChronoDuration::days(365 * i64::from(dashboard::DEFAULT_LOOKBACK_YEARS));
        let parse = |value: &Option<String>, default: NaiveDate| match value.as_deref().map(str::trim) {
            None | Some("") => Some(default),
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok(),
        };

        match (parse(&self.start_date, today - lookback), parse(&self.end_date, today)) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                tracing::warn!(
                    start = ?self.start_date,
                    end = ?self.end_date,
                    "invalid date range, using the last ten years"
                );
                ten_year_window(today.year())
            }
        }
    }

    /// Comma-joined `filter` parameter.
    #[must_use]
    pub fn filter_string(&self, today: NaiveDate) -> String {
        let (start, end) = self.date_bounds(today);
        let mut filters = vec![
            format!("from_publication_date:{}", start.format("%Y-%m-%d")),
            format!("to_publication_date:{}", end.format("%Y-%m-%d")),
        ];

        if !self.types.is_empty() {
            filters.push(format!("type:{}", self.types.join("|")));
        }
        if self.open_access_only {
            filters.push("is_oa:true".to_string());
        }
        if !self.concepts.is_empty() {
            filters.push(format!("concepts.display_name:{}", self.concepts.join("|")));
        }
        if !self.languages.is_empty() {
            filters.push(format!("language:{}", self.languages.join("|")));
        }
        for (field, value) in &self.extra_filters {
            filters.push(format!("{field}:{value}"));
        }

        filters.join(",")
    }
}

fn ten_year_window(year: i32) -> (NaiveDate, NaiveDate) {
    let years = dashboard::DEFAULT_LOOKBACK_YEARS;
    let start = NaiveDate::from_ymd_opt(year - years, 1, 1).unwrap_or(NaiveDate::MIN);
    let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX);
    (start, end)
}

/// Percent-encode a DOI for use in a URL path, keeping `/` separators.
#[must_use]
pub fn encode_doi_path(doi: &str) -> String {
    doi.split('/').map(|segment| urlencoding::encode(segment).into_owned()).collect::<Vec<_>>().join("/")
}

/// OpenAlex API client.
#[derive(Debug, Clone)]
pub struct OpenAlexClient {
    http: HttpCore,

    /// API base URL.
    base_url: String,

    /// Polite pool contact.
    mailto: String,
}

impl OpenAlexClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            http: HttpCore::new(config, "openalex")?,
            base_url: config.openalex_api_url.trim_end_matches('/').to_string(),
            mailto: config.user_email.clone(),
        })
    }

    /// Search works.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn search_works(&self, query: &WorkQuery) -> ClientResult<WorksPage> {
        self.search_works_on(query, chrono::Local::now().date_naive()).await
    }

    /// Search works with an explicit "today" for the date window.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn search_works_on(&self, query: &WorkQuery, today: NaiveDate) -> ClientResult<WorksPage> {
        let url = format!("{}/works", self.base_url);

        let params = vec![
            ("search".to_string(), query.search.clone()),
            ("page".to_string(), query.page.to_string()),
            ("per-page".to_string(), query.per_page.to_string()),
            ("filter".to_string(), query.filter_string(today)),
            ("mailto".to_string(), self.mailto.clone()),
        ];

        let page: WorksPage = self.http.get(&url, &params).await?;
        tracing::info!(
            search = %query.search,
            total = page.meta.count,
            returned = page.results.len(),
            "OpenAlex works search"
        );
        Ok(page)
    }

    /// Get a single work by DOI (bare or resolver URL).
    ///
    /// # Errors
    ///
    /// Returns error on API failure, including `NotFound` for unknown DOIs.
    pub async fn get_work_by_doi(&self, doi: &str) -> ClientResult<Work> {
        let doi = normalize_doi(doi);
        let url = format!("{}/works/https://doi.org/{}", self.base_url, encode_doi_path(&doi));
        self.http.get(&url, &self.polite()).await
    }

    /// Get an author by OpenAlex ID.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn get_author(&self, author_id: &str) -> ClientResult<Author> {
        let url = format!("{}/authors/{}", self.base_url, author_id.trim());
        self.http.get(&url, &self.polite()).await
    }

    /// Get an institution by OpenAlex ID.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn get_institution(&self, institution_id: &str) -> ClientResult<Institution> {
        let url = format!("{}/institutions/{}", self.base_url, institution_id.trim());
        self.http.get(&url, &self.polite()).await
    }

    /// Get a concept by OpenAlex ID.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn get_concept(&self, concept_id: &str) -> ClientResult<ConceptDetail> {
        let url = format!("{}/concepts/{}", self.base_url, concept_id.trim());
        self.http.get(&url, &self.polite()).await
    }

    fn polite(&self) -> Vec<(String, String)> {
        vec![("mailto".to_string(), self.mailto.clone())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_filter_with_valid_range() {
        let mut query = WorkQuery::new("graphs");
        query.start_date = Some("2015-01-01".into());
        query.end_date = Some("2020-06-30".into());

        let filter = query.filter_string(day(2024, 5, 1));
        assert_eq!(filter, "from_publication_date:2015-01-01,to_publication_date:2020-06-30");
    }

    #[test]
    fn test_filter_invalid_range_falls_back() {
        let mut query = WorkQuery::new("graphs");
        query.start_date = Some("2015/01/01".into());
        query.end_date = Some("2020-06-30".into());

        let filter = query.filter_string(day(2024, 5, 1));
        assert!(filter.starts_with("from_publication_date:2014-01-01,to_publication_date:2024-12-31"));
    }

    #[test]
    fn test_filter_default_window() {
        let query = WorkQuery::new("graphs");
        let (start, end) = query.date_bounds(day(2024, 5, 1));
        assert_eq!(end, day(2024, 5, 1));
        assert_eq!(start, day(2024, 5, 1) - ChronoDuration::days(3650));
    }

    #[test]
    fn test_filter_all_parts() {
        let mut query = WorkQuery::new("climate");
        query.start_date = Some("2020-01-01".into());
        query.end_date = Some("2021-01-01".into());
        query.types = vec!["article".into(), "book".into()];
        query.open_access_only = true;
        query.concepts = vec!["Biology".into(), "Medicine".into()];
        query.languages = vec!["en".into(), "de".into()];
        query.extra_filters = vec![("has_doi".into(), "true".into())];

        let filter = query.filter_string(day(2024, 1, 1));
        assert_eq!(
            filter,
            "from_publication_date:2020-01-01,to_publication_date:2021-01-01,type:article|book,\
             is_oa:true,concepts.display_name:Biology|Medicine,language:en|de,has_doi:true"
        );
    }

    #[test]
    fn test_encode_doi_path() {
        assert_eq!(encode_doi_path("10.1234/abc"), "10.1234/abc");
        assert_eq!(encode_doi_path("10.1002/(SICI)1097"), "10.1002/%28SICI%291097");
        assert_eq!(encode_doi_path("10.1/a b"), "10.1/a%20b");
    }
}
