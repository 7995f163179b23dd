//! Citation distribution: period filtering, grouping, percentiles and histograms.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::metrics::{mean, median, percentiles, std_dev, PercentilePoint};
use crate::models::{GroupBy, Publication, TimePeriod};

/// Journals need this many papers to form their own group.
pub const MIN_JOURNAL_PAPERS: usize = 3;

/// Groups need more than this many papers for grouped percentiles.
pub const MIN_PERCENTILE_GROUP: usize = 5;

/// Most and least cited papers listed.
pub const EXTREMES: usize = 5;

/// Publications inside a time period. Publications without a year are dropped.
#[must_use]
pub fn filter_by_period<'a>(
    publications: &'a [Publication],
    period: TimePeriod,
    custom_range: (i32, i32),
    current_year: i32,
) -> Vec<&'a Publication> {
    publications
        .iter()
        .filter(|p| {
            let Some(year) = p.effective_year() else { return false };
            match period {
                TimePeriod::Custom => year >= custom_range.0 && year <= custom_range.1,
                other => other.cutoff_year(current_year).is_none_or(|cutoff| year >= cutoff),
            }
        })
        .collect()
}

/// Citations split into named groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouping {
    /// Grouping actually applied. Falls back to `None` when no journal qualifies.
    pub applied: GroupBy,
    /// Group label to citations, in label order. One "All" group when ungrouped.
    pub groups: BTreeMap<String, Vec<u32>>,
}

fn group_key(publication: &Publication, group_by: GroupBy) -> String {
    match group_by {
        GroupBy::None => "All".to_string(),
        GroupBy::Journal => publication.source.clone(),
        GroupBy::Year => publication.effective_year().map(|y| y.to_string()).unwrap_or_default(),
        GroupBy::ArticleType => {
            if publication.work_type.is_empty() { "unknown".to_string() } else { publication.work_type.clone() }
        }
    }
}

/// Group publications' citations.
///
/// Journal grouping keeps only journals with at least [`MIN_JOURNAL_PAPERS`]
/// papers and falls back to no grouping when none does.
#[must_use]
pub fn group_citations(publications: &[&Publication], group_by: GroupBy) -> Grouping {
    let mut applied = group_by;
    let mut selected: Vec<&Publication> = publications.to_vec();

    if group_by == GroupBy::Journal {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for p in publications.iter().filter(|p| !p.source.is_empty()) {
            *counts.entry(p.source.as_str()).or_insert(0) += 1;
        }
        let journal_papers: Vec<&Publication> = publications
            .iter()
            .copied()
            .filter(|p| counts.get(p.source.as_str()).is_some_and(|&c| c >= MIN_JOURNAL_PAPERS))
            .collect();

        if journal_papers.is_empty() {
            tracing::debug!("not enough papers per journal, showing ungrouped distribution");
            applied = GroupBy::None;
        } else {
            selected = journal_papers;
        }
    }

    let mut groups: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for publication in selected {
        groups.entry(group_key(publication, applied)).or_default().push(publication.citations);
    }

    Grouping { applied, groups }
}

/// Percentile curve of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupPercentiles {
    pub group: String,
    pub points: Vec<PercentilePoint>,
}

/// Percentiles 0, 5, ..., 100.
fn every_fifth() -> Vec<f64> {
    (0..=20).map(|i| f64::from(i) * 5.0).collect()
}

/// Percentile curves per group with more than [`MIN_PERCENTILE_GROUP`] papers.
///
/// When no group qualifies (or the grouping is `None`) returns a single "All" curve.
#[must_use]
pub fn group_percentiles(grouping: &Grouping) -> Vec<GroupPercentiles> {
    let points = every_fifth();

    if grouping.applied != GroupBy::None {
        let grouped: Vec<GroupPercentiles> = grouping
            .groups
            .iter()
            .filter(|(_, citations)| citations.len() > MIN_PERCENTILE_GROUP)
            .map(|(group, citations)| GroupPercentiles { group: group.clone(), points: percentiles(citations, &points) })
            .collect();
        if !grouped.is_empty() {
            return grouped;
        }
    }

    let all: Vec<u32> = grouping.groups.values().flatten().copied().collect();
    if all.is_empty() {
        return Vec::new();
    }
    vec![GroupPercentiles { group: "All".to_string(), points: percentiles(&all, &points) }]
}

/// Summary statistics of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub group: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; `None` for a single paper.
    pub std_dev: Option<f64>,
    pub min: u32,
    pub max: u32,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Count, mean, median, std, min and max per group (rounded to 2 decimals).
#[must_use]
pub fn group_stats(grouping: &Grouping) -> Vec<GroupStats> {
    grouping
        .groups
        .iter()
        .filter(|(_, citations)| !citations.is_empty())
        .map(|(group, citations)| GroupStats {
            group: group.clone(),
            count: citations.len(),
            mean: round2(mean(citations)),
            median: round2(median(citations)),
            std_dev: std_dev(citations).map(round2),
            min: citations.iter().copied().min().unwrap_or(0),
            max: citations.iter().copied().max().unwrap_or(0),
        })
        .collect()
}

/// One histogram bin covering `[lower, upper)`, the last bin closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram of citations over `[min, max]`.
#[must_use]
pub fn histogram(citations: &[u32], bins: usize) -> Vec<HistogramBin> {
    let (Some(&min), Some(&max)) = (citations.iter().min(), citations.iter().max()) else {
        return Vec::new();
    };
    let bins = bins.max(1);
    let (lo, hi) = (f64::from(min), f64::from(max));
    let width = if hi > lo { (hi - lo) / bins as f64 } else { 1.0 };

    let mut counts = vec![0; bins];
    for &c in citations {
        let slot = ((f64::from(c) - lo) / width) as usize;
        counts[slot.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin { lower: lo + width * i as f64, upper: lo + width * (i + 1) as f64, count })
        .collect()
}

/// The most cited and least cited publications.
#[must_use]
pub fn extremes<'a>(publications: &[&'a Publication], n: usize) -> (Vec<&'a Publication>, Vec<&'a Publication>) {
    let mut sorted: Vec<&Publication> = publications.to_vec();
    sorted.sort_by(|a, b| b.citations.cmp(&a.citations));
    let top: Vec<&Publication> = sorted.iter().take(n).copied().collect();

    sorted.sort_by(|a, b| a.citations.cmp(&b.citations));
    let bottom: Vec<&Publication> = sorted.into_iter().take(n).collect();
    (top, bottom)
}
