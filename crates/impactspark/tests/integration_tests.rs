//! Integration tests against the live OpenAlex and Crossref APIs.
//!
//! Run with: `cargo test --features integration --test integration_tests -- --nocapture`

#![cfg(feature = "integration")]

use impactspark::client::{CrossrefClient, OpenAlexClient, WorkQuery};
use impactspark::config::Config;
use impactspark::models::Publication;

/// "Nanometre-scale thermometry in a living cell", Nature 2013.
const KNOWN_DOI: &str = "10.1038/nature12373";

fn config() -> Config {
    Config::new(std::env::var("USER_EMAIL").ok())
}

#[tokio::test]
async fn test_openalex_keyword_search() {
    let client = OpenAlexClient::new(&config()).expect("client");
    let mut query = WorkQuery::new("graph neural networks");
    query.per_page = 5;

    match client.search_works(&query).await {
        Ok(page) => {
            assert!(page.meta.count > 0);
            assert!(page.results.len() <= 5);
        }
        // Throttling is acceptable without a polite-pool email
        Err(e) => println!("Note: search returned error (likely rate limited): {e:?}"),
    }
}

#[tokio::test]
async fn test_openalex_doi_lookup() {
    let client = OpenAlexClient::new(&config()).expect("client");

    match client.get_work_by_doi(KNOWN_DOI).await {
        Ok(work) => {
            let p = Publication::from_openalex(&work);
            assert_eq!(p.doi.as_deref().map(str::to_ascii_lowercase).as_deref(), Some(KNOWN_DOI));
            assert_eq!(p.year, Some(2013));
        }
        Err(e) => println!("Note: DOI lookup returned error: {e:?}"),
    }
}

#[tokio::test]
async fn test_crossref_journal_by_issn() {
    let client = CrossrefClient::new(&config()).expect("client");

    match client.search_by_journal("0028-0836", Some("2020-01-01"), Some("2020-12-31"), 5, 0).await {
        Ok(list) => assert!(list.items.len() <= 5),
        Err(e) => println!("Note: Crossref returned error: {e:?}"),
    }
}
