//! Dashboard view tests using wiremock for the scholarly APIs.
#![allow(clippy::needless_pass_by_value)]

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use impactspark::config::Config;
use impactspark::error::ViewError;
use impactspark::models::Publication;
use impactspark::views::{
    ArticleTrackerView, CitationAnalyticsView, CitationDistributionView, CrossrefSearchView, DashboardView,
    EnrichView, ExportView, ImpactAnalysisView,
    NO_CITATION_MATCH_MESSAGE, NO_RESULTS_MESSAGE, PublicationDetailView, RelatedPublicationsView, SearchView,
    SimilarPapersView, ViewContext,
};

/// Create a test context with a mock server.
fn setup_test_context(mock_server: &MockServer) -> ViewContext {
    ViewContext::new(Config::for_testing(&mock_server.uri())).unwrap()
}

fn sample_work_json(id: &str, title: &str, year: i32, citations: u32, author: &str) -> serde_json::Value {
    json!({
        "id": format!("https://openalex.org/{id}"),
        "doi": format!("https://doi.org/10.1234/{id}"),
        "title": title,
        "publication_year": year,
        "publication_date": format!("{year}-06-01"),
        "type": "article",
        "cited_by_count": citations,
        "authorships": [{"author": {"display_name": author}, "institutions": []}],
        "primary_location": {"source": {"display_name": "Journal of Tests"}},
        "open_access": {"is_oa": false}
    })
}

fn works_page(works: Vec<serde_json::Value>) -> serde_json::Value {
    json!({"meta": {"count": works.len()}, "results": works})
}

fn publication(id: &str, title: &str, year: i32, citations: u32) -> Publication {
    Publication {
        id: id.to_string(),
        title: title.to_string(),
        authors: vec!["Ada Lovelace".to_string()],
        year: Some(year),
        source: "Journal of Tests".to_string(),
        citations,
        work_type: "article".to_string(),
        doi: Some(format!("10.1234/{id}")),
        abstract_text: Some(format!("{title} abstract text")),
        ..Default::default()
    }
}

async fn mount_search(mock_server: &MockServer, works: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/openalex/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(works_page(works)))
        .mount(mock_server)
        .await;
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_stores_result_set() {
    let mock_server = MockServer::start().await;
    mount_search(
        &mock_server,
        vec![
            sample_work_json("W1", "Deep Learning", 2020, 120, "Ada Lovelace"),
            sample_work_json("W2", "Shallow Learning", 2021, 8, "Alan Turing"),
        ],
    )
    .await;
    let ctx = setup_test_context(&mock_server);

    let output = SearchView
        .execute(&ctx, json!({"query": "learning", "responseFormat": "json"}))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    let result_id = value["resultId"].as_str().unwrap();
    let set = ctx.results.get(result_id).await.unwrap();
    assert_eq!(set.len().await, 2);
    assert_eq!(set.query().await, "keyword: learning");
}

#[tokio::test]
async fn test_search_markdown_has_summary_and_table() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server, vec![sample_work_json("W1", "Deep Learning", 2020, 120, "Ada Lovelace")]).await;
    let ctx = setup_test_context(&mock_server);

    let output = SearchView.execute(&ctx, json!({"query": "learning"})).await.unwrap();

    assert!(output.contains("# Search Results"));
    assert!(output.contains("Result set"));
    assert!(output.contains("Deep Learning"));
    assert!(output.contains("h-index"));
}

#[tokio::test]
async fn test_search_no_results_message() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server, vec![]).await;
    let ctx = setup_test_context(&mock_server);

    let err = SearchView.execute(&ctx, json!({"query": "nothing"})).await.unwrap_err();

    assert!(matches!(err, ViewError::NoResults(_)));
    assert_eq!(err.to_user_message(), NO_RESULTS_MESSAGE);
    assert_eq!(ctx.results.count().await, 0);
}

#[tokio::test]
async fn test_search_citation_filter_without_match() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server, vec![sample_work_json("W1", "Rarely Cited", 2020, 2, "Ada Lovelace")]).await;
    let ctx = setup_test_context(&mock_server);

    let err = SearchView
        .execute(&ctx, json!({"query": "rare", "minCitations": 50}))
        .await
        .unwrap_err();

    assert_eq!(err.to_user_message(), NO_CITATION_MATCH_MESSAGE);
}

#[tokio::test]
async fn test_search_rejects_empty_query() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let err = SearchView.execute(&ctx, json!({"query": "   "})).await.unwrap_err();
    assert!(matches!(err, ViewError::Validation { .. }));
}

#[tokio::test]
async fn test_search_by_doi_not_found_is_no_results() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    let ctx = setup_test_context(&mock_server);

    let err = SearchView
        .execute(&ctx, json!({"query": "10.9999/missing", "searchMethod": "doi"}))
        .await
        .unwrap_err();

    assert_eq!(err.to_user_message(), NO_RESULTS_MESSAGE);
}

#[tokio::test]
async fn test_search_replaces_existing_result_set() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server, vec![sample_work_json("W1", "Deep Learning", 2020, 120, "Ada Lovelace")]).await;
    let ctx = setup_test_context(&mock_server);

    let existing = ctx.results.create("old", vec![publication("P1", "Old", 2000, 1)]).await;
    SearchView
        .execute(&ctx, json!({"query": "learning", "resultId": existing.id}))
        .await
        .unwrap();

    assert_eq!(ctx.results.count().await, 1);
    assert_eq!(existing.query().await, "keyword: learning");
}

#[tokio::test]
async fn test_crossref_search_view() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crossref/works"))
        .and(query_param("query.author", "Hopper"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "message": {
                "total-results": 1,
                "items": [{
                    "DOI": "10.5555/cobol",
                    "title": ["COBOL"],
                    "author": [{"given": "Grace", "family": "Hopper"}],
                    "issued": {"date-parts": [[1960]]},
                    "is-referenced-by-count": 99
                }]
            }
        })))
        .mount(&mock_server)
        .await;
    let ctx = setup_test_context(&mock_server);

    let output = CrossrefSearchView
        .execute(&ctx, json!({"query": "Hopper", "kind": "author"}))
        .await
        .unwrap();

    assert!(output.contains("COBOL"));
    assert_eq!(ctx.results.count().await, 1);
}

// =============================================================================
// Analytic views over a stored result set
// =============================================================================

async fn stored_context(mock_server: &MockServer) -> (ViewContext, String) {
    let ctx = setup_test_context(mock_server);
    let set = ctx
        .results
        .create(
            "keyword: tests",
            vec![
                publication("W1", "Graph Networks", 2018, 150),
                publication("W2", "Graph Kernels", 2019, 40),
                publication("W3", "Sparse Graphs", 2020, 12),
                publication("W4", "Dense Matrices", 2021, 0),
            ],
        )
        .await;
    let id = set.id.clone();
    (ctx, id)
}

#[tokio::test]
async fn test_citation_analytics_json() {
    let mock_server = MockServer::start().await;
    let (ctx, id) = stored_context(&mock_server).await;

    let output = CitationAnalyticsView
        .execute(&ctx, json!({"resultId": id, "startYear": 2019, "responseFormat": "json"}))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["count"], 3);
    assert_eq!(value["totalCitations"], 52);
    assert_eq!(value["filters"]["endYear"], 2021);
}

#[tokio::test]
async fn test_citation_analytics_unknown_result_set() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let err = CitationAnalyticsView.execute(&ctx, json!({"resultId": "missing"})).await.unwrap_err();
    assert!(matches!(err, ViewError::NotFound(_)));
}

#[tokio::test]
async fn test_impact_overview() {
    let mock_server = MockServer::start().await;
    let (ctx, id) = stored_context(&mock_server).await;

    let output = ImpactAnalysisView
        .execute(&ctx, json!({"resultId": id, "analysisType": "overview", "responseFormat": "json"}))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["metrics"]["total_publications"], 4);
    assert_eq!(value["metrics"]["h_index"], 3);
}

#[tokio::test]
async fn test_impact_authors_markdown() {
    let mock_server = MockServer::start().await;
    let (ctx, id) = stored_context(&mock_server).await;

    let output = ImpactAnalysisView
        .execute(&ctx, json!({"resultId": id, "analysisType": "authors"}))
        .await
        .unwrap();

    assert!(output.contains("Ada Lovelace"));
}

async fn store(ctx: &ViewContext, publications: Vec<Publication>) -> String {
    ctx.results.create("keyword: tests", publications).await.id.clone()
}

fn authored(id: &str, year: i32, citations: u32, authors: &[&str]) -> Publication {
    Publication {
        authors: authors.iter().map(|a| (*a).to_string()).collect(),
        ..publication(id, &format!("Paper {id}"), year, citations)
    }
}

#[tokio::test]
async fn test_impact_authors_matrix_follows_sort() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let mut publications = Vec::new();
    for i in 0..10 {
        let name = format!("Prolific{i}");
        publications.push(authored(&format!("P{i}a"), 2020, 0, &[name.as_str()]));
        publications.push(authored(&format!("P{i}b"), 2021, 0, &[name.as_str()]));
    }
    publications.push(authored("STAR", 2020, 1000, &["Star X", "Star Y"]));
    let id = store(&ctx, publications).await;

    let output = ImpactAnalysisView
        .execute(
            &ctx,
            json!({"resultId": id, "analysisType": "authors", "authorSort": "citations", "responseFormat": "json"}),
        )
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["topAuthors"][0]["citations"], 1000);
    let matrix: Vec<&str> = value["coauthorship"]["authors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a.as_str().unwrap())
        .collect();
    assert_eq!(matrix.len(), 10);
    assert_eq!(&matrix[..2], ["Star X", "Star Y"]);
    assert_eq!(value["coauthorship"]["counts"][0][1], 1);
}

#[tokio::test]
async fn test_impact_keywords_explicit() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let tagged = |id: &str, year: i32, citations: u32, keywords: &[&str]| Publication {
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        ..publication(id, &format!("Paper {id}"), year, citations)
    };
    let id = store(
        &ctx,
        vec![
            tagged("K1", 2019, 30, &["graphs", "learning"]),
            tagged("K2", 2020, 10, &["graphs", "learning"]),
            tagged("K3", 2020, 20, &["graphs"]),
            tagged("K4", 2021, 5, &["optics"]),
        ],
    )
    .await;

    let output = ImpactAnalysisView
        .execute(&ctx, json!({"resultId": id, "analysisType": "keywords", "responseFormat": "json"}))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["source"], "keywords");
    assert_eq!(value["frequency"][0]["keyword"], "graphs");
    assert_eq!(value["frequency"][0]["frequency"], 3);
    assert_eq!(value["trendKeywords"], json!(["graphs", "learning", "optics"]));
    // only "graphs" reaches three papers
    assert_eq!(value["impact"].as_array().unwrap().len(), 1);
    assert_eq!(value["impact"][0]["total_citations"], 60);
    assert!(value["cooccurrence"].is_object());

    let trends = value["trends"].as_array().unwrap();
    assert!(trends.iter().any(|t| t["keyword"] == "graphs" && t["year"] == 2020 && t["count"] == 2));
}

#[tokio::test]
async fn test_impact_keywords_falls_back_to_title_terms() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);
    let id = store(
        &ctx,
        vec![
            publication("T1", "Graph Networks", 2019, 3),
            publication("T2", "Graph Kernels", 2020, 2),
            publication("T3", "Graph Sparsity", 2021, 1),
            publication("T4", "Dense Matrices", 2021, 0),
        ],
    )
    .await;

    let output = ImpactAnalysisView
        .execute(&ctx, json!({"resultId": id, "analysisType": "keywords", "responseFormat": "json"}))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["source"], "title_terms");
    assert_eq!(value["frequency"], json!([{"keyword": "graph", "frequency": 3}]));
    assert!(value["cooccurrence"].is_null());
    assert_eq!(value["trends"], json!([]));

    let markdown = ImpactAnalysisView
        .execute(&ctx, json!({"resultId": id, "analysisType": "keywords"}))
        .await
        .unwrap();
    assert!(markdown.contains("showing frequent title terms"));
}

#[tokio::test]
async fn test_impact_temporal() {
    let mock_server = MockServer::start().await;
    let (ctx, id) = stored_context(&mock_server).await;

    let output = ImpactAnalysisView
        .execute(&ctx, json!({"resultId": id, "analysisType": "temporal", "responseFormat": "json"}))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    let yearly = value["yearlyMetrics"].as_array().unwrap();
    assert_eq!(yearly.len(), 4);
    assert_eq!(yearly[0]["year"], 2018);
    assert_eq!(yearly[3]["cumulative_publications"], 4);
    assert_eq!(yearly[3]["cumulative_citations"], 202);
    assert_eq!(value["normalizedTrends"].as_array().unwrap().len(), 4);
    assert!(value["citationVelocity"].is_array());

    let markdown = ImpactAnalysisView
        .execute(&ctx, json!({"resultId": id, "analysisType": "temporal", "startYear": 2020}))
        .await
        .unwrap();
    assert!(markdown.contains("# Temporal Analysis"));
    assert!(!markdown.contains("| 2018 |"));
}

#[tokio::test]
async fn test_article_tracker_individual_same_year() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);
    let id = store(
        &ctx,
        vec![
            publication("A1", "Tracked Paper", 2020, 100),
            publication("A2", "Same Year Peer", 2020, 20),
            publication("A3", "Later Paper", 2021, 5),
        ],
    )
    .await;

    let output = ArticleTrackerView
        .execute(&ctx, json!({"resultId": id, "doi": "https://doi.org/10.1234/A1", "responseFormat": "json"}))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["index"], 0);
    assert_eq!(value["impact"]["citations"], 100);
    assert_eq!(value["impact"]["same_year_average"], 60.0);
    assert_eq!(value["impact"]["difference_from_average"], 40.0);
    assert_eq!(value["impact"]["percentile"], 100.0);

    let markdown = ArticleTrackerView
        .execute(&ctx, json!({"resultId": id, "index": 0}))
        .await
        .unwrap();
    assert!(markdown.contains("# Article Impact: Tracked Paper"));
    assert!(markdown.contains("**Same-year average**: 60.00 | **Difference**: +40.00"));
}

#[tokio::test]
async fn test_article_tracker_individual_needs_selector() {
    let mock_server = MockServer::start().await;
    let (ctx, id) = stored_context(&mock_server).await;

    let err = ArticleTrackerView.execute(&ctx, json!({"resultId": id})).await.unwrap_err();
    assert!(matches!(err, ViewError::Validation { .. }));
}

#[tokio::test]
async fn test_article_tracker_multiple() {
    let mock_server = MockServer::start().await;
    let (ctx, id) = stored_context(&mock_server).await;

    let output = ArticleTrackerView
        .execute(
            &ctx,
            json!({"resultId": id, "mode": "multiple", "startYear": 2019, "author": "Lovelace", "responseFormat": "json"}),
        )
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["summary"]["articles"], 3);
    assert_eq!(value["summary"]["total_citations"], 52);
    assert_eq!(value["articles"][0]["title"], "Graph Kernels");

    let err = ArticleTrackerView
        .execute(&ctx, json!({"resultId": id, "mode": "multiple", "journal": "Unknown Journal"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ViewError::NoResults(_)));
}

#[tokio::test]
async fn test_citation_distribution_by_journal() {
    let mock_server = MockServer::start().await;
    let (ctx, id) = stored_context(&mock_server).await;

    let output = CitationDistributionView
        .execute(&ctx, json!({"resultId": id, "groupBy": "journal", "bins": 5, "responseFormat": "json"}))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["publications"], 4);
    assert_eq!(value["groupBy"], "journal");
    assert_eq!(value["histogram"].as_array().unwrap().len(), 5);
    assert_eq!(value["groupStats"][0]["group"], "Journal of Tests");
    assert_eq!(value["mostCited"][0]["title"], "Graph Networks");
}

#[tokio::test]
async fn test_citation_distribution_custom_period_journal_fallback() {
    let mock_server = MockServer::start().await;
    let (ctx, id) = stored_context(&mock_server).await;

    // two papers left in the period, too few for a journal group
    let input = json!({
        "resultId": id,
        "timePeriod": "custom",
        "startYear": 2019,
        "endYear": 2020,
        "groupBy": "journal"
    });
    let markdown = CitationDistributionView.execute(&ctx, input.clone()).await.unwrap();
    assert!(markdown.contains("**Period**: 2019–2020 | **Publications**: 2"));
    assert!(markdown.contains("No journal has at least three papers"));

    let mut json_input = input;
    json_input["responseFormat"] = json!("json");
    let output = CitationDistributionView.execute(&ctx, json_input).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["publications"], 2);
    assert_eq!(value["groupBy"], "none");
    assert_eq!(value["groupStats"][0]["group"], "All");
}

#[tokio::test]
async fn test_citation_distribution_rejects_bins_and_empty_period() {
    let mock_server = MockServer::start().await;
    let (ctx, id) = stored_context(&mock_server).await;

    for bins in [4, 101] {
        let err = CitationDistributionView
            .execute(&ctx, json!({"resultId": id, "bins": bins}))
            .await
            .unwrap_err();
        assert!(matches!(err, ViewError::Validation { .. }));
    }

    let err = CitationDistributionView
        .execute(&ctx, json!({"resultId": id, "timePeriod": "custom", "startYear": 1990, "endYear": 1995}))
        .await
        .unwrap_err();
    assert!(matches!(err, ViewError::NoResults(_)));
}

#[tokio::test]
async fn test_publication_detail_by_title() {
    let mock_server = MockServer::start().await;
    let (ctx, id) = stored_context(&mock_server).await;

    let output = PublicationDetailView
        .execute(&ctx, json!({"resultId": id, "title": "graph kernels", "responseFormat": "json"}))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["index"], 1);
    assert_eq!(value["doiUrl"], "https://doi.org/10.1234/W2");
}

#[tokio::test]
async fn test_similar_papers_excludes_target() {
    let mock_server = MockServer::start().await;
    let (ctx, id) = stored_context(&mock_server).await;

    let output = SimilarPapersView
        .execute(&ctx, json!({"resultId": id, "index": 0, "topN": 2, "responseFormat": "json"}))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    let similar = value["similar"].as_array().unwrap();
    assert!(similar.len() <= 2);
    assert!(similar.iter().all(|s| s["index"] != 0));
}

#[tokio::test]
async fn test_export_csv_has_header_and_rows() {
    let mock_server = MockServer::start().await;
    let (ctx, id) = stored_context(&mock_server).await;

    let output = ExportView.execute(&ctx, json!({"resultId": id, "format": "csv"})).await.unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert!(lines[0].starts_with("title,authors,year"));
    assert_eq!(lines.len(), 5);
}

#[tokio::test]
async fn test_enrich_skips_publications_with_abstracts() {
    let mock_server = MockServer::start().await;
    let (ctx, id) = stored_context(&mock_server).await;

    let output = EnrichView
        .execute(&ctx, json!({"resultId": id, "responseFormat": "json"}))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["enriched"], 0);
    assert_eq!(value["maxItems"], 10);
}

#[tokio::test]
async fn test_related_publications_from_page() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <a href="https://doi.org/10.1000/one">one</a>
                <a href="https://doi.org/10.1000/two">two</a>
                <a href="https://doi.org/10.1000/one">again</a>
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;
    let ctx = setup_test_context(&mock_server);

    let output = RelatedPublicationsView
        .execute(
            &ctx,
            json!({"url": format!("{}/landing", mock_server.uri()), "responseFormat": "json"}),
        )
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    let related = value["related"].as_array().unwrap();
    assert_eq!(related.len(), 2);
    assert_eq!(related[0]["doi"], "10.1000/one");
}

#[tokio::test]
async fn test_related_publications_requires_doi_or_url() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let err = RelatedPublicationsView.execute(&ctx, json!({})).await.unwrap_err();
    assert!(matches!(err, ViewError::Validation { .. }));
}
