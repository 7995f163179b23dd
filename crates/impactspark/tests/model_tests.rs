//! Model parsing and normalization tests.

use chrono::NaiveDate;
use proptest::prelude::*;
use serde_json::json;

use impactspark::client::WorkQuery;
use impactspark::models::{CrossrefWork, Publication, SearchInput, UNKNOWN_AUTHOR, Work, normalize_doi};

#[test]
fn test_work_with_nulls_normalizes() {
    let work: Work = serde_json::from_value(json!({
        "id": "https://openalex.org/W1",
        "title": null,
        "authorships": null,
        "concepts": null,
        "keywords": null,
        "related_works": null,
        "cited_by_count": null
    }))
    .unwrap();

    let p = Publication::from_openalex(&work);
    assert_eq!(p.title, "Untitled");
    assert!(p.authors.is_empty());
    assert_eq!(p.authors_joined(), UNKNOWN_AUTHOR);
    assert_eq!(p.citations, 0);
}

#[test]
fn test_work_full_normalization() {
    let work: Work = serde_json::from_value(json!({
        "id": "https://openalex.org/W2",
        "doi": "https://doi.org/10.1038/nature12373",
        "title": "Nanometre-scale\nthermometry",
        "publication_year": 2013,
        "publication_date": "2013-08-01",
        "type": "article",
        "cited_by_count": 1200,
        "fwci": 35.2,
        "citation_normalized_percentile": {"value": 0.999},
        "authorships": [
            {"author": {"display_name": "G. Kucsko"}, "institutions": [
                {"display_name": "Harvard University", "country_code": "US"}
            ]},
            {"author": {"display_name": "P. C. Maurer"}, "institutions": []}
        ],
        "primary_location": {"source": {"display_name": "Nature"}},
        "open_access": {"is_oa": true, "oa_status": "green"},
        "concepts": [
            {"display_name": "Thermometer"},
            {"display_name": "Nanoscopic scale"},
            {"display_name": "Physics"}
        ],
        "primary_topic": {"domain": {"display_name": "Physical Sciences"}},
        "related_works": ["W3", "W4"],
        "abstract_inverted_index": {"Quantum": [0], "thermometry": [1], "works": [2]}
    }))
    .unwrap();

    let p = Publication::from_openalex(&work);
    assert_eq!(p.title, "Nanometre-scale thermometry");
    assert_eq!(p.authors, vec!["G. Kucsko", "P. C. Maurer"]);
    assert_eq!(p.publication_date, NaiveDate::from_ymd_opt(2013, 8, 1));
    assert_eq!(p.source, "Nature");
    assert_eq!(p.institutions, vec!["Harvard University"]);
    assert_eq!(p.country_codes, vec!["US"]);
    assert_eq!(p.related_count, 2);
    assert_eq!(p.topic, "Thermometer");
    assert_eq!(p.field, "Physics");
    assert_eq!(p.domain, "Physical Sciences");
    assert!(p.open_access);
    assert_eq!(p.doi.as_deref(), Some("10.1038/nature12373"));
    assert_eq!(p.abstract_text.as_deref(), Some("Quantum thermometry works"));
}

#[test]
fn test_crossref_work_prefers_print_date() {
    let work: CrossrefWork = serde_json::from_value(json!({
        "DOI": "10.1000/x",
        "title": ["Dated"],
        "published-print": {"date-parts": [[2019, 4, 2]]},
        "issued": {"date-parts": [[2018]]}
    }))
    .unwrap();

    let p = Publication::from_crossref(&work);
    assert_eq!(p.year, Some(2019));
    assert_eq!(p.id, "10.1000/x");
}

#[test]
fn test_normalize_doi_strips_resolver() {
    assert_eq!(normalize_doi("https://doi.org/10.1000/ABC"), "10.1000/ABC");
    assert_eq!(normalize_doi("  10.1000/abc "), "10.1000/abc");
}

#[test]
fn test_filter_string_valid_range_has_both_dates() {
    let mut query = WorkQuery::new("x");
    query.start_date = Some("2001-02-03".into());
    query.end_date = Some("2004-05-06".into());

    let filter = query.filter_string(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert!(filter.contains("from_publication_date:2001-02-03"));
    assert!(filter.contains("to_publication_date:2004-05-06"));
}

#[test]
fn test_filter_string_invalid_range_falls_back() {
    let mut query = WorkQuery::new("x");
    query.start_date = Some("yesterday".into());

    let filter = query.filter_string(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    assert!(filter.starts_with("from_publication_date:2014-01-01,to_publication_date:2024-12-31"));
}

#[test]
fn test_search_input_defaults() {
    let input: SearchInput = serde_json::from_value(json!({"query": "q"})).unwrap();
    assert_eq!(input.page, 1);
    assert_eq!(input.per_page, 25);
    assert!(!input.has_citation_filter());
    input.validate().unwrap();
}

#[test]
fn test_search_input_accepts_language_codes() {
    let input: SearchInput =
        serde_json::from_value(json!({"query": "q", "languages": ["en", "German"]})).unwrap();
    let codes: Vec<&str> = input.languages.iter().map(|l| l.iso_code()).collect();
    assert_eq!(codes, vec!["en", "de"]);
}

proptest! {
    /// Normalizing twice changes nothing.
    #[test]
    fn normalize_doi_idempotent(suffix in "[a-z0-9./-]{1,30}") {
        let doi = format!("https://doi.org/10.1000/{suffix}");
        let once = normalize_doi(&doi);
        prop_assert_eq!(normalize_doi(&once), once.clone());
        prop_assert!(!once.starts_with("https://doi.org/"));
    }

    /// Any date range yields exactly one from/to pair.
    #[test]
    fn filter_string_always_has_one_date_pair(start in "[0-9-]{0,12}", end in "[0-9-]{0,12}") {
        let mut query = WorkQuery::new("x");
        query.start_date = Some(start);
        query.end_date = Some(end);
        let filter = query.filter_string(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        prop_assert_eq!(filter.matches("from_publication_date:").count(), 1);
        prop_assert_eq!(filter.matches("to_publication_date:").count(), 1);
    }
}
