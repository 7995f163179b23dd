//! JSON output formatting.

use serde_json::{Value, json};

use crate::models::Publication;

/// Compact publication representation for table rows and charts.
#[must_use]
pub fn compact_publication(publication: &Publication) -> Value {
    let mut obj = json!({
        "id": publication.id,
        "title": publication.title,
        "authors": publication.authors,
        "year": publication.year,
        "citations": publication.citations,
    });

    // Optional fields only if present
    if let Some(date) = publication.publication_date {
        obj["publicationDate"] = json!(date);
    }
    if !publication.source.is_empty() {
        obj["journal"] = json!(publication.source);
    }
    if !publication.institutions.is_empty() {
        obj["institutions"] = json!(publication.institutions);
    }
    if !publication.country_codes.is_empty() {
        obj["countryCodes"] = json!(publication.country_codes);
    }
    if let Some(url) = publication.doi_url() {
        obj["doiUrl"] = json!(url);
    }
    if publication.fwci > 0.0 {
        obj["fwci"] = json!(publication.fwci);
    }
    if publication.citation_percentile > 0.0 {
        obj["citationPercentile"] = json!(publication.citation_percentile);
    }

    obj
}

/// Compact rows for a list of publications.
#[must_use]
pub fn compact_publications(publications: &[&Publication]) -> Vec<Value> {
    publications.iter().map(|p| compact_publication(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_publication() {
        let publication = Publication {
            id: "https://openalex.org/W1".to_string(),
            title: "Test Paper".to_string(),
            authors: vec!["John Doe".to_string()],
            year: Some(2024),
            citations: 42,
            doi: Some("10.1/x".to_string()),
            ..Default::default()
        };

        let compact = compact_publication(&publication);

        assert_eq!(compact["title"], "Test Paper");
        assert_eq!(compact["year"], 2024);
        assert_eq!(compact["citations"], 42);
        assert_eq!(compact["authors"], json!(["John Doe"]));
        assert_eq!(compact["doiUrl"], "https://doi.org/10.1/x");
        assert!(compact.get("journal").is_none());
        assert!(compact.get("fwci").is_none());
    }
}
