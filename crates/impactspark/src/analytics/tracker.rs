//! Article tracker: one article against its set, or a filtered subset.

use serde::Serialize;

use super::metrics::mean;
use super::temporal::{publications_by_year, YearCount};
use crate::models::Publication;

/// Papers listed in the multiple-article table.
pub const TRACKER_TOP: usize = 10;

/// Impact of one article relative to the rest of its result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleImpact {
    pub citations: u32,
    /// Zero when the publication year is unknown.
    pub years_since_publication: i32,
    pub citations_per_year: f64,
    /// Mean citations of the set's papers from the same year.
    pub same_year_average: Option<f64>,
    /// `citations - same_year_average`.
    pub difference_from_average: Option<f64>,
    /// Share of the set with at most this many citations, in percent.
    pub percentile: f64,
}

/// Compare `article` with `all` (which normally contains it).
#[must_use]
pub fn article_impact(article: &Publication, all: &[Publication], current_year: i32) -> ArticleImpact {
    let year = article.effective_year();
    let years_since_publication = year.map_or(0, |y| current_year - y);
    let citations_per_year = f64::from(article.citations) / f64::from(years_since_publication.max(1));

    let same_year_average = year.and_then(|y| {
        let same: Vec<u32> =
            all.iter().filter(|p| p.effective_year() == Some(y)).map(|p| p.citations).collect();
        (!same.is_empty()).then(|| mean(&same))
    });

    let percentile = if all.is_empty() {
        0.0
    } else {
        all.iter().filter(|p| p.citations <= article.citations).count() as f64 / all.len() as f64 * 100.0
    };

    ArticleImpact {
        citations: article.citations,
        years_since_publication,
        citations_per_year,
        same_year_average,
        difference_from_average: same_year_average.map(|avg| f64::from(article.citations) - avg),
        percentile,
    }
}

/// Filters of the multiple-article mode. `None` means no restriction.
#[derive(Debug, Clone, Default)]
pub struct TrackerFilter<'a> {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    /// Exact source/journal match.
    pub journal: Option<&'a str>,
    /// Substring of the comma-joined author list.
    pub author: Option<&'a str>,
}

impl TrackerFilter<'_> {
    /// Whether `publication` passes every filter.
    #[must_use]
    pub fn matches(&self, publication: &Publication) -> bool {
        let year = publication.effective_year();
        let in_range = match (self.start_year, self.end_year) {
            (None, None) => true,
            (start, end) => year.is_some_and(|y| {
                start.is_none_or(|s| y >= s) && end.is_none_or(|e| y <= e)
            }),
        };
        in_range
            && self.journal.is_none_or(|j| publication.source == j)
            && self.author.is_none_or(|a| publication.authors_joined().contains(a))
    }
}

/// Summary of a filtered subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerSummary {
    pub articles: usize,
    pub total_citations: u64,
    pub avg_citations: f64,
    pub publications_by_year: Vec<YearCount>,
    /// Indices into the input of the most cited matching papers.
    pub top_indices: Vec<usize>,
}

/// Totals, yearly counts and the most cited papers of the matching subset.
#[must_use]
pub fn track_articles(publications: &[Publication], filter: &TrackerFilter<'_>) -> TrackerSummary {
    let mut matching: Vec<(usize, &Publication)> =
        publications.iter().enumerate().filter(|(_, p)| filter.matches(p)).collect();

    let citations: Vec<u32> = matching.iter().map(|(_, p)| p.citations).collect();
    let subset: Vec<Publication> = matching.iter().map(|(_, p)| (*p).clone()).collect();

    matching.sort_by(|a, b| b.1.citations.cmp(&a.1.citations));

    TrackerSummary {
        articles: citations.len(),
        total_citations: super::metrics::total(&citations),
        avg_citations: mean(&citations),
        publications_by_year: publications_by_year(&subset),
        top_indices: matching.into_iter().take(TRACKER_TOP).map(|(i, _)| i).collect(),
    }
}
