//! Search views: OpenAlex main search and Crossref search.

use std::cmp::Ordering;

use chrono::{Duration as ChronoDuration, NaiveDate};
use serde_json::json;

use super::{
    DashboardView, NO_CITATION_MATCH_MESSAGE, NO_RESULTS_MESSAGE, ViewContext, response_format_schema,
};
use crate::analytics::authors::author_counts;
use crate::analytics::geo::{TOP_COUNTRIES, country_citations};
use crate::analytics::temporal::publications_by_year;
use crate::analytics::{citations_of, impact_metrics, most_cited};
use crate::client::WorkQuery;
use crate::config::dashboard;
use crate::error::{ClientError, ViewError, ViewResult};
use crate::formatters::{self, fmt2};
use crate::models::{
    CrossrefSearchInput, CrossrefSearchKind, Publication, ResponseFormat, SearchInput, SearchMethod,
    SortKey, SortOrder,
};

/// Most cited papers on the main page.
const TOP_CITED: usize = 5;

/// Authors on the main page.
const TOP_AUTHOR_COUNT: usize = 10;

/// Build the OpenAlex query for a search input.
///
/// "Recent only" replaces the start date with `today` minus two years.
#[must_use]
pub fn work_query(params: &SearchInput, today: NaiveDate) -> WorkQuery {
    let mut query = WorkQuery::new(params.query.trim());

    query.start_date = if params.recent_only {
        let start = today - ChronoDuration::days(dashboard::RECENT_LOOKBACK_DAYS);
        Some(start.format("%Y-%m-%d").to_string())
    } else {
        params.start_date.clone()
    };
    query.end_date = params.end_date.clone();
    query.types = params.publication_types.iter().map(|t| t.as_str().to_string()).collect();
    query.open_access_only = params.open_access_only;
    query.concepts = params.fields.iter().map(|f| f.display_name().to_string()).collect();
    query.languages = params.languages.iter().map(|l| l.iso_code().to_string()).collect();
    query.page = params.page;
    query.per_page = params.per_page;

    query
}

fn compare(a: &Publication, b: &Publication, key: SortKey) -> Ordering {
    match key {
        SortKey::Citations => a.citations.cmp(&b.citations),
        SortKey::Year => a.effective_year().cmp(&b.effective_year()),
        SortKey::PublicationDate => a.publication_date.cmp(&b.publication_date),
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortKey::Fwci => a.fwci.total_cmp(&b.fwci),
        SortKey::CitationPercentile => a.citation_percentile.total_cmp(&b.citation_percentile),
    }
}

/// Sort table rows. Stable, so ties keep API order.
pub fn sort_publications(rows: &mut [&Publication], key: SortKey, order: SortOrder) {
    match order {
        SortOrder::Ascending => rows.sort_by(|a, b| compare(a, b, key)),
        SortOrder::Descending => rows.sort_by(|a, b| compare(b, a, key)),
    }
}

/// Keep publications inside the citation range when the range narrows anything.
fn apply_citation_filter(publications: &mut Vec<Publication>, params: &SearchInput) -> ViewResult<()> {
    if !params.has_citation_filter() {
        return Ok(());
    }
    publications.retain(|p| p.citations >= params.min_citations && p.citations <= params.max_citations);
    if publications.is_empty() {
        return Err(ViewError::no_results(NO_CITATION_MATCH_MESSAGE));
    }
    Ok(())
}

/// Main search page.
pub struct SearchView;

#[async_trait::async_trait]
impl DashboardView for SearchView {
    fn name(&self) -> &'static str {
        "search"
    }

    fn description(&self) -> &'static str {
        "Search OpenAlex by keyword or DOI with date, type, open access, citation, \
         field and language filters. Stores the results for the analytic views."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "Keyword/topic, or a DOI"},
                "searchMethod": {"type": "string", "enum": ["keyword", "doi"], "default": "keyword"},
                "startDate": {"type": "string", "format": "date"},
                "endDate": {"type": "string", "format": "date"},
                "publicationTypes": {
                    "type": "array",
                    "items": {"type": "string", "enum": [
                        "article", "book", "book-chapter", "dissertation", "posted-content",
                        "proceedings", "reference-entry", "report", "peer-review"
                    ]}
                },
                "openAccessOnly": {"type": "boolean", "default": false},
                "minCitations": {"type": "integer", "minimum": 0, "default": 0},
                "maxCitations": {"type": "integer", "minimum": 0, "default": dashboard::CITATION_SLIDER_MAX},
                "fields": {
                    "type": "array",
                    "items": {"type": "string", "enum": [
                        "Biology", "Chemistry", "Computer Science", "Economics", "Engineering",
                        "Environmental Science", "Mathematics", "Medicine", "Physics",
                        "Psychology", "Social Sciences"
                    ]}
                },
                "languages": {
                    "type": "array",
                    "items": {"type": "string", "enum": ["English", "Chinese", "Spanish", "German", "French", "Japanese"]}
                },
                "recentOnly": {"type": "boolean", "default": false, "description": "Only the last two years"},
                "page": {"type": "integer", "minimum": 1, "default": 1},
                "perPage": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": dashboard::MAX_PER_PAGE,
                    "default": dashboard::DEFAULT_PER_PAGE
                },
                "sortBy": {
                    "type": "string",
                    "enum": ["citations", "year", "publication_date", "title", "fwci", "citation_percentile"],
                    "default": "citations"
                },
                "sortOrder": {"type": "string", "enum": ["descending", "ascending"], "default": "descending"},
                "resultId": {"type": "string", "description": "Replace this result set"},
                "responseFormat": response_format_schema()
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, ctx: &ViewContext, input: serde_json::Value) -> ViewResult<String> {
        let params: SearchInput = serde_json::from_value(input)?;
        params.validate()?;

        let (mut publications, total_available) = match params.search_method {
            SearchMethod::Doi => {
                let work = ctx.openalex.get_work_by_doi(&params.query).await.map_err(|e| match e {
                    ClientError::NotFound { .. } => ViewError::no_results(NO_RESULTS_MESSAGE),
                    other => ViewError::from(other),
                })?;
                (vec![Publication::from_openalex(&work)], 1)
            }
            SearchMethod::Keyword => {
                let query = work_query(&params, chrono::Local::now().date_naive());
                let page = ctx.openalex.search_works(&query).await.map_err(ViewError::from)?;
                let publications: Vec<Publication> = page.results.iter().map(Publication::from_openalex).collect();
                (publications, page.meta.count)
            }
        };

        if publications.is_empty() {
            return Err(ViewError::no_results(NO_RESULTS_MESSAGE));
        }
        apply_citation_filter(&mut publications, &params)?;

        let description = match params.search_method {
            SearchMethod::Keyword => format!("keyword: {}", params.query.trim()),
            SearchMethod::Doi => format!("doi: {}", params.query.trim()),
        };
        let set = ctx.results.store(params.result_id.as_deref(), description, publications.clone()).await;

        tracing::info!(
            result_id = %set.id,
            query = %params.query,
            count = publications.len(),
            total_available,
            "search completed"
        );

        let mut rows: Vec<&Publication> = publications.iter().collect();
        sort_publications(&mut rows, params.sort_by, params.sort_order);

        let citations = citations_of(&publications);
        let metrics = impact_metrics(&citations);
        let max_citations = citations.iter().copied().max().unwrap_or(0);
        let top_cited = most_cited(&publications, TOP_CITED);
        let top_authors = author_counts(&publications, TOP_AUTHOR_COUNT);
        let countries: Vec<_> = country_citations(&publications).into_iter().take(TOP_COUNTRIES).collect();
        let timeline = publications_by_year(&publications);

        match params.response_format {
            ResponseFormat::Markdown => {
                let mut output = format!("# Search Results: \"{}\"\n\n", params.query.trim());
                output.push_str(&format!(
                    "**Result set**: `{}` ({} publications shown, {} available)\n\n",
                    set.id,
                    publications.len(),
                    total_available
                ));

                output.push_str("## Summary\n\n");
                output.push_str(&format!(
                    "**Total publications**: {} | **Total citations**: {} | **Average citations**: {} | \
                     **Median citations**: {} | **Max citations**: {} | **h-index**: {}\n\n",
                    metrics.total_publications,
                    metrics.total_citations,
                    fmt2(metrics.avg_citations),
                    fmt2(metrics.median_citations),
                    max_citations,
                    metrics.h_index
                ));

                output.push_str("## Publications\n\n");
                output.push_str(&formatters::format_publications_table(&rows));
                output.push('\n');

                output.push_str("## Most Cited\n\n");
                output.push_str(&formatters::format_ranked_list(&top_cited));
                output.push('\n');

                if !top_authors.is_empty() {
                    output.push_str("## Top Authors\n\n");
                    let author_rows: Vec<Vec<String>> =
                        top_authors.iter().map(|(name, n)| vec![name.clone(), n.to_string()]).collect();
                    output.push_str(&formatters::markdown_table(&["Author", "Publications"], &author_rows));
                    output.push('\n');
                }

                if !countries.is_empty() {
                    output.push_str("## Top Countries\n\n");
                    let country_rows: Vec<Vec<String>> = countries
                        .iter()
                        .map(|c| vec![c.country.clone(), c.citations.to_string(), c.publications.to_string()])
                        .collect();
                    output.push_str(&formatters::markdown_table(
                        &["Country", "Citations", "Publications"],
                        &country_rows,
                    ));
                    output.push('\n');
                }

                if !timeline.is_empty() {
                    output.push_str("## Publications Timeline\n\n");
                    let timeline_rows: Vec<Vec<String>> = timeline
                        .iter()
                        .map(|y| {
                            vec![
                                y.year.to_string(),
                                y.count.to_string(),
                                y.cumulative.to_string(),
                                y.growth_rate.map(|g| format!("{}%", fmt2(g))).unwrap_or_else(|| "-".into()),
                            ]
                        })
                        .collect();
                    output.push_str(&formatters::markdown_table(
                        &["Year", "Publications", "Cumulative", "Growth"],
                        &timeline_rows,
                    ));
                }

                Ok(output)
            }
            ResponseFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "resultId": set.id,
                "query": params.query.trim(),
                "totalAvailable": total_available,
                "metrics": {
                    "totalPublications": metrics.total_publications,
                    "totalCitations": metrics.total_citations,
                    "avgCitations": metrics.avg_citations,
                    "medianCitations": metrics.median_citations,
                    "maxCitations": max_citations,
                    "hIndex": metrics.h_index
                },
                "publications": formatters::compact_publications(&rows),
                "topCited": formatters::compact_publications(&top_cited),
                "topAuthors": top_authors
                    .iter()
                    .map(|(name, n)| json!({"author": name, "publications": n}))
                    .collect::<Vec<_>>(),
                "topCountries": countries,
                "timeline": timeline
            }))?),
        }
    }
}

/// Crossref search (query, author or journal).
pub struct CrossrefSearchView;

#[async_trait::async_trait]
impl DashboardView for CrossrefSearchView {
    fn name(&self) -> &'static str {
        "crossref_search"
    }

    fn description(&self) -> &'static str {
        "Search Crossref by free text, author or journal (title or ISSN). \
         Stores the results for the analytic views."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "kind": {"type": "string", "enum": ["query", "author", "journal"], "default": "query"},
                "fromDate": {"type": "string", "description": "Only the year is used"},
                "untilDate": {"type": "string", "description": "Only the year is used"},
                "rows": {"type": "integer", "minimum": 1, "maximum": 1000, "default": dashboard::DEFAULT_PER_PAGE},
                "offset": {"type": "integer", "minimum": 0, "default": 0},
                "resultId": {"type": "string"},
                "responseFormat": response_format_schema()
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, ctx: &ViewContext, input: serde_json::Value) -> ViewResult<String> {
        let params: CrossrefSearchInput = serde_json::from_value(input)?;
        params.validate()?;

        let query = params.query.trim();
        let from = params.from_date.as_deref();
        let until = params.until_date.as_deref();

        let list = match params.kind {
            CrossrefSearchKind::Query => ctx.crossref.search_works(query, from, until, params.rows, params.offset).await,
            CrossrefSearchKind::Author => {
                ctx.crossref.search_by_author(query, from, until, params.rows, params.offset).await
            }
            CrossrefSearchKind::Journal => {
                ctx.crossref.search_by_journal(query, from, until, params.rows, params.offset).await
            }
        }
        .map_err(ViewError::from)?;

        let publications: Vec<Publication> = list.items.iter().map(Publication::from_crossref).collect();
        if publications.is_empty() {
            return Err(ViewError::no_results(NO_RESULTS_MESSAGE));
        }

        let kind = match params.kind {
            CrossrefSearchKind::Query => "crossref",
            CrossrefSearchKind::Author => "crossref author",
            CrossrefSearchKind::Journal => "crossref journal",
        };
        let set = ctx.results.store(params.result_id.as_deref(), format!("{kind}: {query}"), publications.clone()).await;

        let metrics = impact_metrics(&citations_of(&publications));
        let rows: Vec<&Publication> = publications.iter().collect();

        match params.response_format {
            ResponseFormat::Markdown => {
                let mut output = format!("# Crossref Results: \"{query}\"\n\n");
                output.push_str(&format!(
                    "**Result set**: `{}` ({} of {} results)\n\n",
                    set.id,
                    publications.len(),
                    list.total_results
                ));
                output.push_str(&formatters::format_metrics_markdown(&metrics));
                output.push_str(&formatters::format_publications_table(&rows));
                Ok(output)
            }
            ResponseFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "resultId": set.id,
                "totalResults": list.total_results,
                "metrics": metrics,
                "publications": formatters::compact_publications(&rows)
            }))?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Language, PublicationType, ResearchField};

    fn input(value: serde_json::Value) -> SearchInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_work_query_maps_filters() {
        let params = input(json!({
            "query": " graphs ",
            "publicationTypes": ["article"],
            "fields": ["Computer Science"],
            "languages": ["de"],
            "openAccessOnly": true,
            "startDate": "2015-01-01",
            "perPage": 50
        }));
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let query = work_query(&params, today);

        assert_eq!(query.search, "graphs");
        assert_eq!(query.types, vec![PublicationType::Article.as_str()]);
        assert_eq!(query.concepts, vec![ResearchField::ComputerScience.display_name()]);
        assert_eq!(query.languages, vec![Language::German.iso_code()]);
        assert!(query.open_access_only);
        assert_eq!(query.start_date.as_deref(), Some("2015-01-01"));
        assert_eq!(query.per_page, 50);
    }

    #[test]
    fn test_recent_only_overrides_start() {
        let params = input(json!({"query": "x", "recentOnly": true, "startDate": "2000-01-01"}));
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let query = work_query(&params, today);
        assert_eq!(query.start_date.as_deref(), Some("2022-06-02"));
    }

    #[test]
    fn test_sort_publications() {
        let a = Publication { title: "b".into(), citations: 5, year: Some(2020), ..Default::default() };
        let b = Publication { title: "A".into(), citations: 9, year: None, ..Default::default() };
        let c = Publication { title: "c".into(), citations: 5, year: Some(2018), ..Default::default() };

        let mut rows = vec![&a, &b, &c];
        sort_publications(&mut rows, SortKey::Citations, SortOrder::Descending);
        assert_eq!(rows.iter().map(|p| p.title.as_str()).collect::<Vec<_>>(), ["A", "b", "c"]);

        sort_publications(&mut rows, SortKey::Title, SortOrder::Ascending);
        assert_eq!(rows.iter().map(|p| p.title.as_str()).collect::<Vec<_>>(), ["A", "b", "c"]);

        sort_publications(&mut rows, SortKey::Year, SortOrder::Ascending);
        assert_eq!(rows.iter().map(|p| p.title.as_str()).collect::<Vec<_>>(), ["A", "c", "b"]);
    }

    #[test]
    fn test_citation_filter() {
        let mut pubs = vec![
            Publication { citations: 3, ..Default::default() },
            Publication { citations: 30, ..Default::default() },
        ];
        let params = input(json!({"query": "x", "minCitations": 10}));
        apply_citation_filter(&mut pubs, &params).unwrap();
        assert_eq!(pubs.len(), 1);

        let params = input(json!({"query": "x", "minCitations": 100}));
        let err = apply_citation_filter(&mut pubs, &params).unwrap_err();
        assert_eq!(err.to_user_message(), NO_CITATION_MATCH_MESSAGE);
    }

    #[test]
    fn test_unbounded_range_keeps_everything() {
        let mut pubs = vec![Publication { citations: 50_000, ..Default::default() }];
        let params = input(json!({"query": "x"}));
        apply_citation_filter(&mut pubs, &params).unwrap();
        assert_eq!(pubs.len(), 1);
    }
}
