//! Crossref REST API client.

use super::HttpCore;
use super::openalex::encode_doi_path;
use crate::config::Config;
use crate::error::ClientResult;
use crate::models::{CrossrefEnvelope, CrossrefWork, CrossrefWorkList, normalize_doi};

/// Whether `value` looks like an ISSN (eight digits once hyphens are removed).
#[must_use]
pub fn is_issn(value: &str) -> bool {
    let digits: String = value.trim().chars().filter(|c| *c != '-').collect();
    digits.len() == 8 && digits.chars().all(|c| c.is_ascii_digit())
}

fn year_part(date: Option<&str>) -> Option<i32> {
    date?.trim().split('-').next()?.parse().ok()
}

/// Crossref `filter` value for a date range; only the year of each date is used.
///
/// Returns `None` when neither bound has a parsable year.
#[must_use]
pub fn crossref_date_filter(from: Option<&str>, until: Option<&str>) -> Option<String> {
    let parts: Vec<String> = [
        year_part(from).map(|y| format!("from-pub-date:{y}")),
        year_part(until).map(|y| format!("until-pub-date:{y}")),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() { None } else { Some(parts.join(",")) }
}

/// Crossref API client.
#[derive(Debug, Clone)]
pub struct CrossrefClient {
    http: HttpCore,

    /// API base URL.
    base_url: String,

    /// Polite pool contact.
    mailto: String,
}

impl CrossrefClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            http: HttpCore::new(config, "crossref")?,
            base_url: config.crossref_api_url.trim_end_matches('/').to_string(),
            mailto: config.user_email.clone(),
        })
    }

    /// Free-text bibliographic search.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn search_works(
        &self,
        query: &str,
        from_date: Option<&str>,
        until_date: Option<&str>,
        rows: u32,
        offset: u32,
    ) -> ClientResult<CrossrefWorkList> {
        let url = format!("{}/works", self.base_url);
        let params = self.params(("query", query), from_date, until_date, rows, offset);
        self.fetch_list(&url, &params).await
    }

    /// Search works by author name.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn search_by_author(
        &self,
        author: &str,
        from_date: Option<&str>,
        until_date: Option<&str>,
        rows: u32,
        offset: u32,
    ) -> ClientResult<CrossrefWorkList> {
        let url = format!("{}/works", self.base_url);
        let params = self.params(("query.author", author), from_date, until_date, rows, offset);
        self.fetch_list(&url, &params).await
    }

    /// Search works in a journal given by title or ISSN.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn search_by_journal(
        &self,
        journal: &str,
        from_date: Option<&str>,
        until_date: Option<&str>,
        rows: u32,
        offset: u32,
    ) -> ClientResult<CrossrefWorkList> {
        if is_issn(journal) {
            let url = format!("{}/journals/{}/works", self.base_url, journal.trim());
            let params = self.params(("", ""), from_date, until_date, rows, offset);
            return self.fetch_list(&url, &params).await;
        }

        let url = format!("{}/works", self.base_url);
        let params = self.params(("query.container-title", journal), from_date, until_date, rows, offset);
        self.fetch_list(&url, &params).await
    }

    /// Get a work by DOI (bare or resolver URL).
    ///
    /// # Errors
    ///
    /// Returns error on API failure, including `NotFound` for unknown DOIs.
    pub async fn get_work_by_doi(&self, doi: &str) -> ClientResult<CrossrefWork> {
        let url = format!("{}/works/{}", self.base_url, encode_doi_path(&normalize_doi(doi)));
        let params = vec![("mailto".to_string(), self.mailto.clone())];
        let envelope: CrossrefEnvelope<CrossrefWork> = self.http.get(&url, &params).await?;
        Ok(envelope.message)
    }

    fn params(
        &self,
        (key, value): (&str, &str),
        from_date: Option<&str>,
        until_date: Option<&str>,
        rows: u32,
        offset: u32,
    ) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(5);
        if !key.is_empty() {
            params.push((key.to_string(), value.to_string()));
        }
        if let Some(filter) = crossref_date_filter(from_date, until_date) {
            params.push(("filter".to_string(), filter));
        }
        params.push(("rows".to_string(), rows.to_string()));
        params.push(("offset".to_string(), offset.to_string()));
        params.push(("mailto".to_string(), self.mailto.clone()));
        params
    }

    async fn fetch_list(&self, url: &str, params: &[(String, String)]) -> ClientResult<CrossrefWorkList> {
        let envelope: CrossrefEnvelope<CrossrefWorkList> = self.http.get(url, params).await?;
        tracing::info!(
            url,
            total = envelope.message.total_results,
            returned = envelope.message.items.len(),
            "Crossref works search"
        );
        Ok(envelope.message)
    }
}
