//! Markdown output formatting.

use std::borrow::Cow;

use crate::analytics::ImpactMetrics;
use crate::models::Publication;

/// Characters of abstract shown in publication cards.
const ABSTRACT_PREVIEW: usize = 300;

/// Truncate to `max` characters, appending "..." when anything was cut.
#[must_use]
pub fn truncate(text: &str, max: usize) -> Cow<'_, str> {
    if text.chars().count() > max {
        Cow::Owned(format!("{}...", text.chars().take(max).collect::<String>()))
    } else {
        Cow::Borrowed(text)
    }
}

fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// Render a Markdown table. Cells are escaped.
#[must_use]
pub fn markdown_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut output = format!("| {} |\n", headers.join(" | "));
    output.push_str(&format!("|{}\n", "---|".repeat(headers.len())));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| cell(c)).collect();
        output.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    output
}

/// Format a number with two decimals.
#[must_use]
pub fn fmt2(value: f64) -> String {
    format!("{value:.2}")
}

/// Result table with the default dashboard columns.
#[must_use]
pub fn format_publications_table(publications: &[&Publication]) -> String {
    if publications.is_empty() {
        return "No publications found.".to_string();
    }

    let rows: Vec<Vec<String>> = publications
        .iter()
        .enumerate()
        .map(|(i, p)| {
            vec![
                (i + 1).to_string(),
                truncate(&p.title, 120).into_owned(),
                truncate(&p.authors_joined(), 80).into_owned(),
                p.year.map(|y| y.to_string()).unwrap_or_default(),
                p.institutions.join(", "),
                p.country_codes.join(", "),
                p.citations.to_string(),
                p.doi_url().unwrap_or_default(),
            ]
        })
        .collect();

    markdown_table(
        &["#", "Title", "Authors", "Year", "Institutions", "Countries", "Citations", "DOI"],
        &rows,
    )
}

/// Short title / year / citations table used for "most cited" lists.
#[must_use]
pub fn format_ranked_list(publications: &[&Publication]) -> String {
    let rows: Vec<Vec<String>> = publications
        .iter()
        .enumerate()
        .map(|(i, p)| {
            vec![
                (i + 1).to_string(),
                truncate(&p.title, 100).into_owned(),
                p.year.map(|y| y.to_string()).unwrap_or_default(),
                p.source.clone(),
                p.citations.to_string(),
            ]
        })
        .collect();
    markdown_table(&["#", "Title", "Year", "Journal", "Citations"], &rows)
}

/// Headline metrics block.
#[must_use]
pub fn format_metrics_markdown(metrics: &ImpactMetrics) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "**Publications**: {} | **Total citations**: {} | **Average**: {} | **Median**: {}\n\n",
        metrics.total_publications,
        metrics.total_citations,
        fmt2(metrics.avg_citations),
        fmt2(metrics.median_citations),
    ));
    output.push_str(&format!(
        "**h-index**: {} | **g-index**: {} | **i10-index**: {}\n\n",
        metrics.h_index, metrics.g_index, metrics.i10_index
    ));
    if !metrics.citation_percentiles.is_empty() {
        let points: Vec<String> = metrics
            .citation_percentiles
            .iter()
            .map(|p| format!("P{}: {}", p.percentile, fmt2(p.value)))
            .collect();
        output.push_str(&format!("**Citation percentiles**: {}\n\n", points.join(" | ")));
    }
    output
}

/// Full publication card.
#[must_use]
pub fn format_publication_markdown(publication: &Publication, index: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("## {}. {}\n\n", index, publication.title));
    output.push_str(&format!("**Authors**: {}\n\n", publication.authors_joined()));

    let mut meta = Vec::new();
    if let Some(date) = publication.publication_date {
        meta.push(format!("**Published**: {date}"));
    } else if let Some(year) = publication.year {
        meta.push(format!("**Year**: {year}"));
    }
    meta.push(format!("**Citations**: {}", publication.citations));
    if !publication.source.is_empty() {
        meta.push(format!("**Journal**: {}", publication.source));
    }
    if !publication.work_type.is_empty() {
        meta.push(format!("**Type**: {}", publication.work_type));
    }
    output.push_str(&format!("{}\n\n", meta.join(" | ")));

    output.push_str(&format!(
        "**FWCI**: {} | **Citation percentile**: {} | **Related works**: {} | **Open access**: {}\n\n",
        fmt2(publication.fwci),
        fmt2(publication.citation_percentile),
        publication.related_count,
        publication.open_access_status()
    ));

    if !publication.institutions.is_empty() {
        output.push_str(&format!("**Institutions**: {}\n\n", publication.institutions.join(", ")));
    }
    if !publication.country_codes.is_empty() {
        output.push_str(&format!("**Countries**: {}\n\n", publication.country_codes.join(", ")));
    }

    let topics: Vec<&str> = [&publication.topic, &publication.subfield, &publication.field, &publication.domain]
        .into_iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();
    if !topics.is_empty() {
        output.push_str(&format!("**Topics**: {}\n\n", topics.join(" > ")));
    }

    if !publication.keywords.is_empty() {
        output.push_str(&format!("**Keywords**: {}\n\n", publication.keywords.join(", ")));
    }

    if let Some(url) = publication.doi_url() {
        output.push_str(&format!("**DOI**: [{url}]({url})\n\n"));
    }

    if let Some(abs) = &publication.abstract_text {
        output.push_str(&format!("**Abstract**: {}\n", truncate(abs, ABSTRACT_PREVIEW)));
    }

    output
}
