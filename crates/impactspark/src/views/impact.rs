//! Impact analysis page: overview, authors, keywords and temporal sections.

use serde_json::json;

use super::{DashboardView, ViewContext, response_format_schema, year_in_range};
use crate::analytics::authors::{
    MATRIX_AUTHORS, TOP_AUTHORS, author_impact, coauthorship_matrix, top_authors,
};
use crate::analytics::keywords::{
    COOCCURRENCE_KEYWORDS, DEFAULT_TREND_SELECTION, IMPACT_KEYWORDS, KeywordAnalysis, KeywordSource,
    TREND_OPTIONS, keyword_analysis, keyword_cooccurrence, keyword_trends,
};
use crate::analytics::temporal::{citation_velocity, citation_windows, normalized_trends, yearly_metrics};
use crate::analytics::{citations_of, current_year, impact_metrics, most_cited};
use crate::error::{ViewError, ViewResult};
use crate::formatters::{self, fmt2, truncate};
use crate::models::{AnalysisType, ImpactAnalysisInput, Publication, ResponseFormat};

/// Most cited papers in the overview.
const OVERVIEW_TOP: usize = 10;

/// Keywords listed in the frequency table.
const FREQUENCY_ROWS: usize = 20;

/// Impact analysis page.
pub struct ImpactAnalysisView;

#[async_trait::async_trait]
impl DashboardView for ImpactAnalysisView {
    fn name(&self) -> &'static str {
        "impact_analysis"
    }

    fn description(&self) -> &'static str {
        "Impact analysis of a result set: overview metrics (h-, g- and i10-index), author \
         productivity and co-authorship, keyword impact and trends, or temporal citation patterns."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "resultId": {"type": "string"},
                "analysisType": {
                    "type": "string",
                    "enum": ["overview", "authors", "keywords", "temporal"],
                    "default": "overview"
                },
                "startYear": {"type": "integer"},
                "endYear": {"type": "integer"},
                "minCitations": {"type": "integer", "minimum": 0, "default": 0},
                "authorSort": {
                    "type": "string",
                    "enum": ["publications", "citations", "avg_citations", "h_index"],
                    "default": "publications"
                },
                "trendKeywords": {
                    "type": "array",
                    "items": {"type": "string"},
                    "maxItems": TREND_OPTIONS,
                    "description": "Keywords to chart; defaults to the three most frequent"
                },
                "responseFormat": response_format_schema()
            },
            "required": ["resultId"]
        })
    }

    async fn execute(&self, ctx: &ViewContext, input: serde_json::Value) -> ViewResult<String> {
        let params: ImpactAnalysisInput = serde_json::from_value(input)?;
        params.validate()?;

        let set = ctx.results.require(&params.result_id).await?;
        let publications: Vec<Publication> = set
            .publications()
            .await
            .into_iter()
            .filter(|p| year_in_range(p.effective_year(), params.start_year, params.end_year))
            .filter(|p| p.citations >= params.min_citations)
            .collect();

        if publications.is_empty() {
            return Err(ViewError::no_results("No publications match the selected filters."));
        }

        tracing::debug!(
            result_id = %set.id,
            analysis = ?params.analysis_type,
            count = publications.len(),
            "impact analysis"
        );

        match params.analysis_type {
            AnalysisType::Overview => overview(&publications, params.response_format),
            AnalysisType::Authors => authors(&publications, &params),
            AnalysisType::Keywords => keywords(&publications, &params),
            AnalysisType::Temporal => temporal(&publications, params.response_format),
        }
    }
}

fn overview(publications: &[Publication], format: ResponseFormat) -> ViewResult<String> {
    let metrics = impact_metrics(&citations_of(publications));
    let yearly = yearly_metrics(publications, current_year());
    let top = most_cited(publications, OVERVIEW_TOP);

    match format {
        ResponseFormat::Markdown => {
            let mut output = String::from("# Impact Overview\n\n");
            output.push_str(&formatters::format_metrics_markdown(&metrics));

            output.push_str("## Yearly Breakdown\n\n");
            let rows: Vec<Vec<String>> = yearly
                .iter()
                .map(|y| {
                    vec![
                        y.year.to_string(),
                        y.publications.to_string(),
                        y.total_citations.to_string(),
                        fmt2(y.avg_citations),
                    ]
                })
                .collect();
            output.push_str(&formatters::markdown_table(&["Year", "Publications", "Citations", "Average"], &rows));

            output.push_str("\n## Most Cited\n\n");
            output.push_str(&formatters::format_ranked_list(&top));
            Ok(output)
        }
        ResponseFormat::Json => Ok(serde_json::to_string_pretty(&json!({
            "metrics": metrics,
            "yearly": yearly,
            "topCited": formatters::compact_publications(&top)
        }))?),
    }
}

fn authors(publications: &[Publication], params: &ImpactAnalysisInput) -> ViewResult<String> {
    let top = top_authors(publications, params.author_sort, TOP_AUTHORS);
    let repeat_authors = author_impact(publications, 2);
    let matrix_names: Vec<String> = top.iter().take(MATRIX_AUTHORS).map(|a| a.name.clone()).collect();
    let matrix = coauthorship_matrix(publications, &matrix_names);

    match params.response_format {
        ResponseFormat::Markdown => {
            let mut output = String::from("# Author Analysis\n\n");
            if top.is_empty() {
                output.push_str("No named authors in this result set.\n");
                return Ok(output);
            }
            output.push_str(&format!(
                "**Authors with two or more publications**: {}\n\n## Top Authors\n\n",
                repeat_authors.len()
            ));

            let rows: Vec<Vec<String>> = top
                .iter()
                .map(|a| {
                    vec![
                        a.name.clone(),
                        a.institutions.clone(),
                        a.publications.to_string(),
                        a.citations.to_string(),
                        fmt2(a.avg_citations),
                        a.h_index.to_string(),
                    ]
                })
                .collect();
            output.push_str(&formatters::markdown_table(
                &["Author", "Institutions", "Publications", "Citations", "Average", "h-index"],
                &rows,
            ));

            if matrix.authors.len() > 1 {
                output.push_str("\n## Co-authorship (top authors)\n\n");
                let mut headers: Vec<String> = vec![String::new()];
                headers.extend(matrix.authors.iter().map(|a| truncate(a, 20).into_owned()));
                let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
                let rows: Vec<Vec<String>> = matrix
                    .authors
                    .iter()
                    .zip(&matrix.counts)
                    .map(|(name, counts)| {
                        let mut row = vec![name.clone()];
                        row.extend(counts.iter().map(ToString::to_string));
                        row
                    })
                    .collect();
                output.push_str(&formatters::markdown_table(&header_refs, &rows));
            }
            Ok(output)
        }
        ResponseFormat::Json => Ok(serde_json::to_string_pretty(&json!({
            "topAuthors": top,
            "repeatAuthors": repeat_authors,
            "coauthorship": matrix
        }))?),
    }
}

/// Keywords to chart: the requested ones (up to five), else the most frequent.
fn trend_selection(analysis: &KeywordAnalysis, requested: &[String]) -> Vec<String> {
    let requested: Vec<String> = requested
        .iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .take(TREND_OPTIONS)
        .collect();
    if !requested.is_empty() {
        return requested;
    }
    analysis.frequency.iter().take(DEFAULT_TREND_SELECTION).map(|f| f.keyword.clone()).collect()
}

fn keywords(publications: &[Publication], params: &ImpactAnalysisInput) -> ViewResult<String> {
    let analysis = keyword_analysis(publications);
    let impact: Vec<_> = analysis.impact.iter().take(IMPACT_KEYWORDS).cloned().collect();

    let (cooccurrence, trends, selected) = if analysis.source == KeywordSource::Keywords {
        let top: Vec<String> =
            analysis.frequency.iter().take(COOCCURRENCE_KEYWORDS).map(|f| f.keyword.clone()).collect();
        let selected = trend_selection(&analysis, &params.trend_keywords);
        let trends = keyword_trends(publications, &selected);
        (Some(keyword_cooccurrence(publications, &top)), trends, selected)
    } else {
        (None, Vec::new(), Vec::new())
    };

    match params.response_format {
        ResponseFormat::Markdown => {
            let mut output = String::from("# Keyword Analysis\n\n");
            if analysis.frequency.is_empty() {
                output.push_str("No keywords or recurring title terms in this result set.\n");
                return Ok(output);
            }
            if analysis.source == KeywordSource::TitleTerms {
                output.push_str("*No keywords available; showing frequent title terms.*\n\n");
            }

            output.push_str("## Frequency\n\n");
            let rows: Vec<Vec<String>> = analysis
                .frequency
                .iter()
                .take(FREQUENCY_ROWS)
                .map(|f| vec![f.keyword.clone(), f.frequency.to_string()])
                .collect();
            output.push_str(&formatters::markdown_table(&["Keyword", "Frequency"], &rows));

            if !impact.is_empty() {
                output.push_str("\n## Keyword Impact\n\n");
                let rows: Vec<Vec<String>> = impact
                    .iter()
                    .map(|k| {
                        vec![
                            k.keyword.clone(),
                            k.paper_count.to_string(),
                            k.total_citations.to_string(),
                            fmt2(k.avg_citations),
                        ]
                    })
                    .collect();
                output.push_str(&formatters::markdown_table(
                    &["Keyword", "Papers", "Citations", "Average"],
                    &rows,
                ));
            }

            if !trends.is_empty() {
                output.push_str(&format!("\n## Trends ({})\n\n", selected.join(", ")));
                let rows: Vec<Vec<String>> = trends
                    .iter()
                    .map(|t| vec![t.keyword.clone(), t.year.to_string(), t.count.to_string()])
                    .collect();
                output.push_str(&formatters::markdown_table(&["Keyword", "Year", "Papers"], &rows));
            }
            Ok(output)
        }
        ResponseFormat::Json => Ok(serde_json::to_string_pretty(&json!({
            "source": analysis.source,
            "frequency": analysis.frequency,
            "impact": impact,
            "cooccurrence": cooccurrence,
            "trendKeywords": selected,
            "trends": trends
        }))?),
    }
}

fn temporal(publications: &[Publication], format: ResponseFormat) -> ViewResult<String> {
    let year = current_year();
    let yearly = yearly_metrics(publications, year);
    let windows = citation_windows(publications, year);
    let trends = normalized_trends(&yearly);
    let velocity = citation_velocity(publications, year);

    match format {
        ResponseFormat::Markdown => {
            let mut output = String::from("# Temporal Analysis\n\n## Yearly Metrics\n\n");
            let rows: Vec<Vec<String>> = yearly
                .iter()
                .map(|y| {
                    vec![
                        y.year.to_string(),
                        y.publications.to_string(),
                        y.total_citations.to_string(),
                        fmt2(y.avg_citations),
                        fmt2(y.median_citations),
                        y.cumulative_publications.to_string(),
                        y.cumulative_citations.to_string(),
                        fmt2(y.citation_rate),
                    ]
                })
                .collect();
            output.push_str(&formatters::markdown_table(
                &["Year", "Papers", "Citations", "Average", "Median", "Cum. papers", "Cum. citations", "Rate"],
                &rows,
            ));

            if !windows.is_empty() {
                output.push_str("\n## Citation Windows\n\n");
                let rows: Vec<Vec<String>> = windows
                    .iter()
                    .map(|w| vec![w.label.clone(), w.papers.to_string(), fmt2(w.avg_citations)])
                    .collect();
                output.push_str(&formatters::markdown_table(&["Window", "Papers", "Average citations"], &rows));
            }

            output.push_str("\n## Normalized Trends\n\n");
            let rows: Vec<Vec<String>> = trends
                .iter()
                .map(|t| vec![t.year.to_string(), fmt2(t.publications), fmt2(t.citations)])
                .collect();
            output.push_str(&formatters::markdown_table(&["Year", "Publications", "Citations"], &rows));

            output.push_str("\n## Citation Velocity\n\n");
            let rows: Vec<Vec<String>> =
                velocity.iter().map(|v| vec![v.year.to_string(), fmt2(v.velocity)]).collect();
            output.push_str(&formatters::markdown_table(&["Year", "Citations per year"], &rows));
            Ok(output)
        }
        ResponseFormat::Json => Ok(serde_json::to_string_pretty(&json!({
            "yearlyMetrics": yearly,
            "citationWindows": windows,
            "normalizedTrends": trends,
            "citationVelocity": velocity
        }))?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::keywords::KeywordFrequency;

    fn analysis(words: &[&str]) -> KeywordAnalysis {
        KeywordAnalysis {
            source: KeywordSource::Keywords,
            frequency: words
                .iter()
                .map(|w| KeywordFrequency { keyword: (*w).to_string(), frequency: 1 })
                .collect(),
            impact: Vec::new(),
            trends: Vec::new(),
        }
    }

    #[test]
    fn test_trend_selection_defaults_to_three() {
        let a = analysis(&["a", "b", "c", "d"]);
        assert_eq!(trend_selection(&a, &[]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_trend_selection_caps_requested() {
        let a = analysis(&["a"]);
        let requested: Vec<String> = ["x", " ", "y", "z", "w", "v", "u"].iter().map(|s| (*s).to_string()).collect();
        assert_eq!(trend_selection(&a, &requested), vec!["x", "y", "z", "w", "v"]);
    }
}
