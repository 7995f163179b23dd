//! Citation pages: analytics, article tracker and distribution.

use std::collections::BTreeSet;

use serde_json::json;

use super::{
    DashboardView, ViewContext, response_format_schema, select_publication, selector_properties,
    year_bounds,
};
use crate::analytics::distribution::{
    EXTREMES, extremes, filter_by_period, group_citations, group_percentiles, group_stats, histogram,
};
use crate::analytics::metrics::{ANALYTICS_PERCENTILES, citation_ranges, mean, median, percentiles, total};
use crate::analytics::temporal::citations_per_year;
use crate::analytics::tracker::{TrackerFilter, article_impact, track_articles};
use crate::analytics::{citations_of, current_year, most_cited};
use crate::error::{ViewError, ViewResult};
use crate::formatters::{self, fmt2};
use crate::models::{
    ArticleTrackerInput, CitationAnalyticsInput, CitationDistributionInput, GroupBy, Publication,
    ResponseFormat, TimePeriod, TrackerMode,
};

/// Most cited papers on the analytics page.
const ANALYTICS_TOP: usize = 10;

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Citation analytics page.
pub struct CitationAnalyticsView;

#[async_trait::async_trait]
impl DashboardView for CitationAnalyticsView {
    fn name(&self) -> &'static str {
        "citation_analytics"
    }

    fn description(&self) -> &'static str {
        "Citation statistics of a result set filtered by year range, citation range and journal: \
         totals, yearly citations, percentiles, citation ranges and the most cited papers."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "resultId": {"type": "string"},
                "startYear": {"type": "integer"},
                "endYear": {"type": "integer"},
                "minCitations": {"type": "integer", "minimum": 0},
                "maxCitations": {"type": "integer", "minimum": 0},
                "journal": {"type": "string", "description": "Exact source name"},
                "responseFormat": response_format_schema()
            },
            "required": ["resultId"]
        })
    }

    async fn execute(&self, ctx: &ViewContext, input: serde_json::Value) -> ViewResult<String> {
        let params: CitationAnalyticsInput = serde_json::from_value(input)?;
        params.validate()?;

        let set = ctx.results.require(&params.result_id).await?;
        let publications = set.publications().await;

        // Rows without a usable date take no part in this page.
        let dated: Vec<Publication> = publications.into_iter().filter(|p| p.effective_year().is_some()).collect();
        let Some((first_year, last_year)) = year_bounds(&dated) else {
            return Err(ViewError::no_results("No publications with a publication date in this result set."));
        };

        let start = params.start_year.unwrap_or(first_year);
        let end = params.end_year.unwrap_or(last_year);
        let min_citations = params.min_citations.unwrap_or(0);
        let max_citations = params.max_citations.unwrap_or(u32::MAX);
        let journal = non_blank(params.journal.as_deref());

        let journals: BTreeSet<&str> =
            dated.iter().map(|p| p.source.as_str()).filter(|s| !s.is_empty()).collect();

        let filtered: Vec<Publication> = dated
            .iter()
            .filter(|p| p.effective_year().is_some_and(|y| y >= start && y <= end))
            .filter(|p| p.citations >= min_citations && p.citations <= max_citations)
            .filter(|p| journal.is_none_or(|j| p.source == j))
            .cloned()
            .collect();

        if filtered.is_empty() {
            return Err(ViewError::no_results("No publications match the selected filters."));
        }

        let citations = citations_of(&filtered);
        let yearly = citations_per_year(&filtered);
        let points = percentiles(&citations, &ANALYTICS_PERCENTILES);
        let ranges = citation_ranges(&citations);
        let top = most_cited(&filtered, ANALYTICS_TOP);

        tracing::debug!(result_id = %set.id, count = filtered.len(), start, end, "citation analytics");

        match params.response_format {
            ResponseFormat::Markdown => {
                let mut output = String::from("# Citation Analytics\n\n");
                output.push_str(&format!("**Years**: {start}–{end}"));
                if let Some(j) = journal {
                    output.push_str(&format!(" | **Journal**: {j}"));
                }
                output.push_str("\n\n");

                output.push_str(&format!(
                    "**Publications**: {} | **Total citations**: {} | **Mean**: {} | **Median**: {}\n\n",
                    filtered.len(),
                    total(&citations),
                    fmt2(mean(&citations)),
                    fmt2(median(&citations))
                ));

                output.push_str("## Citations by Year\n\n");
                let yearly_rows: Vec<Vec<String>> = yearly
                    .iter()
                    .map(|y| vec![y.year.to_string(), y.total.to_string(), fmt2(y.mean)])
                    .collect();
                output.push_str(&formatters::markdown_table(&["Year", "Total", "Mean"], &yearly_rows));

                output.push_str("\n## Citation Percentiles\n\n");
                let percentile_rows: Vec<Vec<String>> =
                    points.iter().map(|p| vec![format!("{}th", p.percentile), fmt2(p.value)]).collect();
                output.push_str(&formatters::markdown_table(&["Percentile", "Citations"], &percentile_rows));

                output.push_str("\n## Citation Ranges\n\n");
                let range_rows: Vec<Vec<String>> =
                    ranges.iter().map(|r| vec![r.label.to_string(), r.count.to_string()]).collect();
                output.push_str(&formatters::markdown_table(&["Citations", "Papers"], &range_rows));

                output.push_str("\n## Most Cited\n\n");
                output.push_str(&formatters::format_ranked_list(&top));
                Ok(output)
            }
            ResponseFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "filters": {
                    "startYear": start,
                    "endYear": end,
                    "minCitations": min_citations,
                    "maxCitations": params.max_citations,
                    "journal": journal
                },
                "journals": journals,
                "count": filtered.len(),
                "totalCitations": total(&citations),
                "meanCitations": mean(&citations),
                "medianCitations": median(&citations),
                "yearly": yearly,
                "percentiles": points,
                "citationRanges": ranges,
                "topCited": formatters::compact_publications(&top)
            }))?),
        }
    }
}

/// Article tracker page.
pub struct ArticleTrackerView;

#[async_trait::async_trait]
impl DashboardView for ArticleTrackerView {
    fn name(&self) -> &'static str {
        "article_tracker"
    }

    fn description(&self) -> &'static str {
        "Track one article against its result set (citations per year, same-year average, \
         percentile) or summarise a subset filtered by year, journal and author."
    }

    fn input_schema(&self) -> serde_json::Value {
        let mut properties = selector_properties();
        properties["resultId"] = json!({"type": "string"});
        properties["mode"] = json!({"type": "string", "enum": ["individual", "multiple"], "default": "individual"});
        properties["startYear"] = json!({"type": "integer"});
        properties["endYear"] = json!({"type": "integer"});
        properties["journal"] = json!({"type": "string"});
        properties["author"] = json!({"type": "string", "description": "Substring of the author list"});
        properties["responseFormat"] = response_format_schema();
        json!({
            "type": "object",
            "properties": properties,
            "required": ["resultId"]
        })
    }

    async fn execute(&self, ctx: &ViewContext, input: serde_json::Value) -> ViewResult<String> {
        let params: ArticleTrackerInput = serde_json::from_value(input)?;
        params.validate()?;

        let set = ctx.results.require(&params.result_id).await?;
        let publications = set.publications().await;

        match params.mode {
            TrackerMode::Individual => track_individual(&publications, &params),
            TrackerMode::Multiple => track_multiple(&publications, &params),
        }
    }
}

fn track_individual(publications: &[Publication], params: &ArticleTrackerInput) -> ViewResult<String> {
    let index = select_publication(publications, &params.selector)?;
    let article = &publications[index];
    let impact = article_impact(article, publications, current_year());

    match params.response_format {
        ResponseFormat::Markdown => {
            let mut output = format!("# Article Impact: {}\n\n", article.title);
            output.push_str(&format!(
                "**Total citations**: {} | **Years since publication**: {} | **Citations per year**: {}\n\n",
                impact.citations,
                impact.years_since_publication,
                fmt2(impact.citations_per_year)
            ));
            match (impact.same_year_average, impact.difference_from_average) {
                (Some(avg), Some(diff)) => output.push_str(&format!(
                    "**Same-year average**: {} | **Difference**: {:+.2}\n\n",
                    fmt2(avg),
                    diff
                )),
                _ => output.push_str("**Same-year average**: n/a (publication year unknown)\n\n"),
            }
            output.push_str(&format!("**Percentile in result set**: {}\n", fmt2(impact.percentile)));
            Ok(output)
        }
        ResponseFormat::Json => Ok(serde_json::to_string_pretty(&json!({
            "index": index,
            "publication": formatters::compact_publication(article),
            "impact": impact
        }))?),
    }
}

fn track_multiple(publications: &[Publication], params: &ArticleTrackerInput) -> ViewResult<String> {
    let filter = TrackerFilter {
        start_year: params.start_year,
        end_year: params.end_year,
        journal: non_blank(params.journal.as_deref()),
        author: non_blank(params.author.as_deref()),
    };
    let summary = track_articles(publications, &filter);
    if summary.articles == 0 {
        return Err(ViewError::no_results("No articles match the selected filters."));
    }

    let top: Vec<&Publication> = summary.top_indices.iter().map(|&i| &publications[i]).collect();

    match params.response_format {
        ResponseFormat::Markdown => {
            let mut output = String::from("# Article Tracker\n\n");
            output.push_str(&format!(
                "**Articles**: {} | **Total citations**: {} | **Average citations**: {}\n\n",
                summary.articles,
                summary.total_citations,
                fmt2(summary.avg_citations)
            ));

            output.push_str("## Publications by Year\n\n");
            let rows: Vec<Vec<String>> = summary
                .publications_by_year
                .iter()
                .map(|y| vec![y.year.to_string(), y.count.to_string()])
                .collect();
            output.push_str(&formatters::markdown_table(&["Year", "Publications"], &rows));

            output.push_str("\n## Most Cited Articles\n\n");
            output.push_str(&formatters::format_publications_table(&top));
            Ok(output)
        }
        ResponseFormat::Json => Ok(serde_json::to_string_pretty(&json!({
            "summary": summary,
            "articles": formatters::compact_publications(&top)
        }))?),
    }
}

/// Citation distribution page.
pub struct CitationDistributionView;

#[async_trait::async_trait]
impl DashboardView for CitationDistributionView {
    fn name(&self) -> &'static str {
        "citation_distribution"
    }

    fn description(&self) -> &'static str {
        "Citation distribution over a time period: histogram, percentiles and statistics \
         per journal, year or publication type, plus the most and least cited papers."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "resultId": {"type": "string"},
                "timePeriod": {
                    "type": "string",
                    "enum": ["all_time", "last_5_years", "last_10_years", "custom"],
                    "default": "all_time"
                },
                "startYear": {"type": "integer", "description": "Custom period start"},
                "endYear": {"type": "integer", "description": "Custom period end"},
                "groupBy": {"type": "string", "enum": ["none", "journal", "year", "article_type"], "default": "none"},
                "bins": {"type": "integer", "minimum": 5, "maximum": 100, "default": 20},
                "responseFormat": response_format_schema()
            },
            "required": ["resultId"]
        })
    }

    async fn execute(&self, ctx: &ViewContext, input: serde_json::Value) -> ViewResult<String> {
        let params: CitationDistributionInput = serde_json::from_value(input)?;
        params.validate()?;

        let set = ctx.results.require(&params.result_id).await?;
        let publications = set.publications().await;

        let year = current_year();
        let custom_range = (params.start_year.unwrap_or(i32::MIN), params.end_year.unwrap_or(i32::MAX));
        let period = filter_by_period(&publications, params.time_period, custom_range, year);
        if period.is_empty() {
            return Err(ViewError::no_results("No publications in the selected time period."));
        }

        let citations = citations_of(period.iter().copied());
        let bins = histogram(&citations, params.bins);
        let grouping = group_citations(&period, params.group_by);
        let curves = group_percentiles(&grouping);
        let stats = group_stats(&grouping);
        let (top, bottom) = extremes(&period, EXTREMES);
        let fell_back = grouping.applied != params.group_by;

        match params.response_format {
            ResponseFormat::Markdown => {
                let mut output = String::from("# Citation Distribution\n\n");
                let label = match params.time_period {
                    TimePeriod::AllTime => "All time".to_string(),
                    TimePeriod::Last5Years => "Last 5 years".to_string(),
                    TimePeriod::Last10Years => "Last 10 years".to_string(),
                    TimePeriod::Custom => format!(
                        "{}–{}",
                        params.start_year.map(|y| y.to_string()).unwrap_or_default(),
                        params.end_year.map(|y| y.to_string()).unwrap_or_default()
                    ),
                };
                output.push_str(&format!("**Period**: {label} | **Publications**: {}\n\n", period.len()));
                if fell_back && params.group_by == GroupBy::Journal {
                    output.push_str("*No journal has at least three papers; showing all publications.*\n\n");
                }

                output.push_str("## Histogram\n\n");
                let bin_rows: Vec<Vec<String>> = bins
                    .iter()
                    .map(|b| vec![format!("{:.1}–{:.1}", b.lower, b.upper), b.count.to_string()])
                    .collect();
                output.push_str(&formatters::markdown_table(&["Citations", "Papers"], &bin_rows));

                output.push_str("\n## Group Statistics\n\n");
                let stat_rows: Vec<Vec<String>> = stats
                    .iter()
                    .map(|s| {
                        vec![
                            s.group.clone(),
                            s.count.to_string(),
                            fmt2(s.mean),
                            fmt2(s.median),
                            s.std_dev.map(fmt2).unwrap_or_else(|| "-".into()),
                            s.min.to_string(),
                            s.max.to_string(),
                        ]
                    })
                    .collect();
                output.push_str(&formatters::markdown_table(
                    &["Group", "Count", "Mean", "Median", "Std", "Min", "Max"],
                    &stat_rows,
                ));

                output.push_str("\n## Percentiles\n\n");
                for curve in &curves {
                    let quartiles: Vec<String> = curve
                        .points
                        .iter()
                        .filter(|p| [25.0, 50.0, 75.0, 90.0].contains(&p.percentile))
                        .map(|p| format!("P{}: {}", p.percentile, fmt2(p.value)))
                        .collect();
                    output.push_str(&format!("- **{}**: {}\n", curve.group, quartiles.join(" | ")));
                }

                output.push_str("\n## Most Cited\n\n");
                output.push_str(&formatters::format_ranked_list(&top));
                output.push_str("\n## Least Cited\n\n");
                output.push_str(&formatters::format_ranked_list(&bottom));
                Ok(output)
            }
            ResponseFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "publications": period.len(),
                "groupBy": grouping.applied,
                "histogram": bins,
                "groupPercentiles": curves,
                "groupStats": stats,
                "mostCited": formatters::compact_publications(&top),
                "leastCited": formatters::compact_publications(&bottom)
            }))?),
        }
    }
}
