//! Year-by-year views of a publication set.

use std::collections::BTreeMap;

use serde::Serialize;

use super::metrics::{mean, median};
use crate::models::Publication;

/// Citation windows reported by the temporal analysis, in years.
pub const CITATION_WINDOWS: [i32; 4] = [1, 2, 3, 5];

/// Citations of each publication, grouped by effective year.
fn citations_by_year(publications: &[Publication]) -> BTreeMap<i32, Vec<u32>> {
    let mut by_year: BTreeMap<i32, Vec<u32>> = BTreeMap::new();
    for publication in publications {
        if let Some(year) = publication.effective_year() {
            by_year.entry(year).or_default().push(publication.citations);
        }
    }
    by_year
}

/// Publication count for one year with running totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearCount {
    /// Year.
    pub year: i32,
    /// Publications in that year.
    pub count: usize,
    /// Publications up to and including that year.
    pub cumulative: usize,
    /// Change from the previous listed year in percent; `None` for the first year.
    pub growth_rate: Option<f64>,
}

/// Publications per year in ascending year order.
#[must_use]
pub fn publications_by_year(publications: &[Publication]) -> Vec<YearCount> {
    let mut cumulative = 0;
    let mut previous: Option<usize> = None;

    citations_by_year(publications)
        .into_iter()
        .map(|(year, citations)| {
            let count = citations.len();
            cumulative += count;
            let growth_rate = previous.map(|prev| (count as f64 - prev as f64) / prev as f64 * 100.0);
            previous = Some(count);
            YearCount { year, count, cumulative, growth_rate }
        })
        .collect()
}

/// Citation summary for one publication year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyCitations {
    /// Year.
    pub year: i32,
    /// Sum of citations.
    pub total: u64,
    /// Mean citations.
    pub mean: f64,
    /// Median citations.
    pub median: f64,
}

/// Citation sum, mean and median per publication year.
#[must_use]
pub fn citations_per_year(publications: &[Publication]) -> Vec<YearlyCitations> {
    citations_by_year(publications)
        .into_iter()
        .map(|(year, citations)| YearlyCitations {
            year,
            total: super::metrics::total(&citations),
            mean: mean(&citations),
            median: median(&citations),
        })
        .collect()
}

/// Full yearly metrics row used by the temporal analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyMetrics {
    pub year: i32,
    pub publications: usize,
    pub total_citations: u64,
    pub avg_citations: f64,
    pub median_citations: f64,
    pub cumulative_publications: usize,
    pub cumulative_citations: u64,
    /// Total citations divided by the years elapsed since `year` (at least 1).
    pub citation_rate: f64,
}

/// Yearly metrics in ascending year order.
#[must_use]
pub fn yearly_metrics(publications: &[Publication], current_year: i32) -> Vec<YearlyMetrics> {
    let mut cumulative_publications = 0;
    let mut cumulative_citations = 0;

    citations_by_year(publications)
        .into_iter()
        .map(|(year, citations)| {
            let total = super::metrics::total(&citations);
            cumulative_publications += citations.len();
            cumulative_citations += total;
            YearlyMetrics {
                year,
                publications: citations.len(),
                total_citations: total,
                avg_citations: mean(&citations),
                median_citations: median(&citations),
                cumulative_publications,
                cumulative_citations,
                citation_rate: total as f64 / years_since(year, current_year) as f64,
            }
        })
        .collect()
}

/// Years elapsed since `year`, never less than 1.
#[must_use]
pub fn years_since(year: i32, current_year: i32) -> i32 {
    (current_year - year).max(1)
}

/// Mean citations per elapsed year for one publication year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VelocityPoint {
    pub year: i32,
    pub velocity: f64,
}

/// Citation velocity per publication year.
#[must_use]
pub fn citation_velocity(publications: &[Publication], current_year: i32) -> Vec<VelocityPoint> {
    citations_by_year(publications)
        .into_iter()
        .map(|(year, citations)| VelocityPoint {
            year,
            velocity: mean(&citations) / years_since(year, current_year) as f64,
        })
        .collect()
}

/// Papers old enough to have accumulated a full citation window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitationWindow {
    /// "1 Year", "2 Years", ...
    pub label: String,
    /// Window length in years.
    pub years: i32,
    /// Papers published at least `years` ago.
    pub papers: usize,
    /// Mean citations of those papers.
    pub avg_citations: f64,
}

/// Citation windows for 1, 2, 3 and 5 years. Windows with no papers are omitted.
#[must_use]
pub fn citation_windows(publications: &[Publication], current_year: i32) -> Vec<CitationWindow> {
    CITATION_WINDOWS
        .iter()
        .filter_map(|&years| {
            let cutoff = current_year - years;
            let citations: Vec<u32> = publications
                .iter()
                .filter(|p| p.effective_year().is_some_and(|y| y <= cutoff))
                .map(|p| p.citations)
                .collect();

            if citations.is_empty() {
                return None;
            }

            let label = if years == 1 { "1 Year".to_string() } else { format!("{years} Years") };
            Some(CitationWindow { label, years, papers: citations.len(), avg_citations: mean(&citations) })
        })
        .collect()
}

/// Publications and citations per year scaled to `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTrend {
    pub year: i32,
    pub publications: f64,
    pub citations: f64,
}

fn min_max_scale(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    values
        .iter()
        .map(|v| if range > 0.0 { (v - min) / range } else { 0.0 })
        .collect()
}

/// Min-max normalized publication and citation trends.
#[must_use]
pub fn normalized_trends(metrics: &[YearlyMetrics]) -> Vec<NormalizedTrend> {
    let publications: Vec<f64> = metrics.iter().map(|m| m.publications as f64).collect();
    let citations: Vec<f64> = metrics.iter().map(|m| m.total_citations as f64).collect();
    let publications = min_max_scale(&publications);
    let citations = min_max_scale(&citations);

    metrics
        .iter()
        .zip(publications.into_iter().zip(citations))
        .map(|(m, (publications, citations))| NormalizedTrend { year: m.year, publications, citations })
        .collect()
}
