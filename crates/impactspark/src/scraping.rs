//! Landing page scraping for publication enrichment.
//!
//! Fetches the page behind a DOI, pulls its main text, and collects DOI links
//! that point at related work.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use scraper::{Html, Selector};

use crate::client::HttpCore;
use crate::config::Config;
use crate::models::Publication;

/// Characters of scraped text kept as the abstract.
pub const ABSTRACT_CHARS: usize = 500;

/// Related links returned by default.
pub const DEFAULT_MAX_LINKS: usize = 5;

static DOI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"10\.\d{4,9}/[-._;()/:A-Za-z0-9]+").expect("valid DOI regex pattern"));

static DOI_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://doi\.org/10\.\d{4,9}/[-._;()/:A-Za-z0-9]+").expect("valid DOI link regex pattern")
});

/// DOI carried by a URL: the path of a `doi.org` URL, else the first DOI-shaped
/// substring, else an empty string.
#[must_use]
pub fn extract_doi_from_url(url: &str) -> String {
    if url.contains("doi.org") {
        if let Ok(parsed) = url::Url::parse(url) {
            return parsed.path().trim_start_matches('/').to_string();
        }
    }
    DOI_RE.find(url).map(|m| m.as_str().to_string()).unwrap_or_default()
}

/// Distinct `https://doi.org/...` links in `html`, first-seen order, without `exclude`.
#[must_use]
pub fn related_doi_links(html: &str, exclude: &str, max_links: usize) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for found in DOI_LINK_RE.find_iter(html) {
        let link = found.as_str();
        if link != exclude && !links.iter().any(|l| l == link) {
            links.push(link.to_string());
        }
    }
    links.truncate(max_links);
    links
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compiled selectors for main-text extraction.
struct TextSelectors {
    main_paragraphs: Selector,
    paragraphs: Selector,
    body: Selector,
}

impl TextSelectors {
    fn new() -> anyhow::Result<Self> {
        let parse = |css: &str| {
            Selector::parse(css).map_err(|e| anyhow::anyhow!("invalid selector '{css}': {e}"))
        };
        Ok(Self {
            main_paragraphs: parse("article p, main p")?,
            paragraphs: parse("p")?,
            body: parse("body")?,
        })
    }

    /// Paragraphs inside `article`/`main`, else every paragraph, else the body text.
    fn main_text(&self, html: &str) -> String {
        let document = Html::parse_document(html);

        for selector in [&self.main_paragraphs, &self.paragraphs] {
            let paragraphs: Vec<String> = document
                .select(selector)
                .map(|p| collapse_whitespace(&p.text().collect::<String>()))
                .filter(|p| !p.is_empty())
                .collect();
            if !paragraphs.is_empty() {
                return paragraphs.join("\n");
            }
        }

        document
            .select(&self.body)
            .next()
            .map(|body| collapse_whitespace(&body.text().collect::<Vec<_>>().join(" ")))
            .unwrap_or_default()
    }
}

/// Fetches publication landing pages.
pub struct WebScraper {
    http: HttpCore,
    delay: Duration,
    selectors: TextSelectors,
}

impl WebScraper {
    /// Create a scraper sharing the client stack's settings.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client or selectors cannot be built.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            http: HttpCore::new(config, "scraper")?,
            delay: config.scrape_delay,
            selectors: TextSelectors::new()?,
        })
    }

    /// Main text of the page at `url`, or an empty string on any failure.
    pub async fn fetch_text_content(&self, url: &str) -> String {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.http.get_text(url).await {
            Ok(html) => self.selectors.main_text(&html),
            Err(e) => {
                tracing::warn!(url, error = %e, "failed to fetch page content");
                String::new()
            }
        }
    }

    /// Fill abstracts from landing pages.
    ///
    /// Looks at the first `max_items` publications and scrapes those with a DOI
    /// and no abstract, one at a time. Returns how many were enriched.
    pub async fn enrich_publications(&self, publications: &mut [Publication], max_items: usize) -> usize {
        let mut enriched = 0;

        for publication in publications.iter_mut().take(max_items) {
            if publication.has_abstract() {
                continue;
            }
            let Some(url) = publication.doi_url() else { continue };

            let content = self.fetch_text_content(&url).await;
            if content.is_empty() {
                continue;
            }

            publication.abstract_text = Some(content.chars().take(ABSTRACT_CHARS).collect());
            publication.full_text = Some(content);
            enriched += 1;
        }

        tracing::info!(enriched, max_items, "enrichment finished");
        enriched
    }

    /// DOI links found on the page at `url`, excluding `url` itself.
    pub async fn find_related_publications(&self, url: &str, max_links: usize) -> Vec<String> {
        match self.http.get_text(url).await {
            Ok(html) => related_doi_links(&html, url, max_links),
            Err(e) => {
                tracing::warn!(url, error = %e, "failed to find related publications");
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for WebScraper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebScraper").field("delay", &self.delay).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_doi_from_url() {
        assert_eq!(extract_doi_from_url("https://doi.org/10.1038/nature12373"), "10.1038/nature12373");
        assert_eq!(
            extract_doi_from_url("https://www.nature.com/articles/10.1038/nature12373?x=1"),
            "10.1038/nature12373"
        );
        assert_eq!(extract_doi_from_url("https://example.com/paper"), "");
    }

    #[test]
    fn test_related_doi_links() {
        let html = r#"
            <a href="https://doi.org/10.1000/self">self</a>
            <a href="https://doi.org/10.1000/a">a</a>
            <a href="https://doi.org/10.1000/b">b</a>
            <a href="https://doi.org/10.1000/a">a again</a>
        "#;
        let links = related_doi_links(html, "https://doi.org/10.1000/self", 5);
        assert_eq!(links, vec!["https://doi.org/10.1000/a", "https://doi.org/10.1000/b"]);
        assert_eq!(related_doi_links(html, "", 1).len(), 1);
    }

    #[test]
    fn test_main_text_prefers_article() {
        let selectors = TextSelectors::new().unwrap();
        let html = "<html><body><p>nav</p><article><p>First   para.</p><p>Second</p></article></body></html>";
        assert_eq!(selectors.main_text(html), "First para.\nSecond");
    }

    #[test]
    fn test_main_text_fallbacks() {
        let selectors = TextSelectors::new().unwrap();
        assert_eq!(selectors.main_text("<html><body><p>only</p></body></html>"), "only");
        assert_eq!(selectors.main_text("<html><body><div>plain\n text</div></body></html>"), "plain text");
    }
}
