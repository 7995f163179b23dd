//! Citation indices and summary statistics.

use serde::Serialize;

/// Percentiles reported with the impact metrics.
pub const IMPACT_PERCENTILES: [f64; 7] = [10.0, 25.0, 50.0, 75.0, 90.0, 95.0, 99.0];

/// Percentiles reported on the citation analytics page.
pub const ANALYTICS_PERCENTILES: [f64; 6] = [25.0, 50.0, 75.0, 90.0, 95.0, 99.0];

/// One percentile point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentilePoint {
    /// Percentile in `[0, 100]`.
    pub percentile: f64,
    /// Citation count at that percentile.
    pub value: f64,
}

/// Headline impact metrics for a set of publications.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImpactMetrics {
    /// Number of publications.
    pub total_publications: usize,
    /// Sum of citations.
    pub total_citations: u64,
    /// Mean citations per publication.
    pub avg_citations: f64,
    /// Median citations.
    pub median_citations: f64,
    /// h-index.
    pub h_index: usize,
    /// i10-index.
    pub i10_index: usize,
    /// g-index.
    pub g_index: usize,
    /// Citation percentiles at 10/25/50/75/90/95/99. Empty for an empty set.
    pub citation_percentiles: Vec<PercentilePoint>,
}

/// Compute every headline metric at once.
#[must_use]
pub fn impact_metrics(citations: &[u32]) -> ImpactMetrics {
    if citations.is_empty() {
        return ImpactMetrics::default();
    }

    ImpactMetrics {
        total_publications: citations.len(),
        total_citations: total(citations),
        avg_citations: mean(citations),
        median_citations: median(citations),
        h_index: h_index(citations),
        i10_index: i10_index(citations),
        g_index: g_index(citations),
        citation_percentiles: percentiles(citations, &IMPACT_PERCENTILES),
    }
}

fn sorted_desc(citations: &[u32]) -> Vec<u32> {
    let mut sorted = citations.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted
}

/// Sum of citations.
#[must_use]
pub fn total(citations: &[u32]) -> u64 {
    citations.iter().map(|&c| u64::from(c)).sum()
}

/// Largest h such that h papers have at least h citations each.
#[must_use]
pub fn h_index(citations: &[u32]) -> usize {
    sorted_desc(citations)
        .iter()
        .enumerate()
        .take_while(|&(i, &c)| c as usize > i)
        .count()
}

/// Number of papers with at least 10 citations.
#[must_use]
pub fn i10_index(citations: &[u32]) -> usize {
    citations.iter().filter(|&&c| c >= 10).count()
}

/// Largest g such that the top g papers together have at least g² citations.
///
/// Stops at the first rank where the cumulative count falls short.
#[must_use]
pub fn g_index(citations: &[u32]) -> usize {
    let mut cumulative: u64 = 0;
    let mut g = 0;
    for (i, &c) in sorted_desc(citations).iter().enumerate() {
        let rank = (i + 1) as u64;
        cumulative += u64::from(c);
        if cumulative >= rank * rank {
            g = i + 1;
        } else {
            break;
        }
    }
    g
}

/// Arithmetic mean, 0 for an empty slice.
#[must_use]
pub fn mean(citations: &[u32]) -> f64 {
    if citations.is_empty() {
        return 0.0;
    }
    total(citations) as f64 / citations.len() as f64
}

/// Median, 0 for an empty slice.
#[must_use]
pub fn median(citations: &[u32]) -> f64 {
    percentile(citations, 50.0)
}

/// Sample standard deviation (n − 1); `None` with fewer than two values.
#[must_use]
pub fn std_dev(citations: &[u32]) -> Option<f64> {
    if citations.len() < 2 {
        return None;
    }
    let m = mean(citations);
    let ss: f64 = citations.iter().map(|&c| (f64::from(c) - m).powi(2)).sum();
    Some((ss / (citations.len() - 1) as f64).sqrt())
}

/// Percentile with linear interpolation between closest ranks.
///
/// `p` is clamped to `[0, 100]`; an empty slice yields 0.
#[must_use]
pub fn percentile(citations: &[u32], p: f64) -> f64 {
    if citations.is_empty() {
        return 0.0;
    }
    let mut sorted = citations.to_vec();
    sorted.sort_unstable();
    percentile_sorted(&sorted, p)
}

fn percentile_sorted(sorted: &[u32], p: f64) -> f64 {
    let rank = p.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let lo_value = f64::from(sorted[lo]);
    let hi_value = f64::from(sorted[hi]);
    lo_value + (hi_value - lo_value) * (rank - lo as f64)
}

/// Several percentiles over one sort.
#[must_use]
pub fn percentiles(citations: &[u32], points: &[f64]) -> Vec<PercentilePoint> {
    if citations.is_empty() {
        return Vec::new();
    }
    let mut sorted = citations.to_vec();
    sorted.sort_unstable();
    points
        .iter()
        .map(|&p| PercentilePoint { percentile: p, value: percentile_sorted(&sorted, p) })
        .collect()
}

/// Count of papers in one citation bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeCount {
    /// Bucket label ("0", "1-5", ..., "100+").
    pub label: &'static str,
    /// Papers in the bucket.
    pub count: usize,
}

const CITATION_RANGES: [(&str, u32, u32); 7] = [
    ("0", 0, 0),
    ("1-5", 1, 5),
    ("6-10", 6, 10),
    ("11-25", 11, 25),
    ("26-50", 26, 50),
    ("51-100", 51, 100),
    ("100+", 101, u32::MAX),
];

/// Bucket papers into the fixed citation ranges.
#[must_use]
pub fn citation_ranges(citations: &[u32]) -> Vec<RangeCount> {
    CITATION_RANGES
        .iter()
        .map(|&(label, lo, hi)| RangeCount {
            label,
            count: citations.iter().filter(|&&c| c >= lo && c <= hi).count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_h_index() {
        assert_eq!(h_index(&[]), 0);
        assert_eq!(h_index(&[0, 0]), 0);
        assert_eq!(h_index(&[10, 8, 5, 4, 3]), 4);
        assert_eq!(h_index(&[25, 8, 5, 3, 3]), 3);
        assert_eq!(h_index(&[1, 1, 1]), 1);
    }

    #[test]
    fn test_g_index() {
        // cumulative: 10, 18, 23, 27, 30 vs 1, 4, 9, 16, 25
        assert_eq!(g_index(&[10, 8, 5, 4, 3]), 5);
        assert_eq!(g_index(&[3, 0, 0]), 1);
        assert_eq!(g_index(&[0]), 0);
    }

    #[test]
    fn test_i10_index() {
        assert_eq!(i10_index(&[10, 9, 11, 100]), 3);
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        let data = [1, 2, 3, 4];
        assert!((percentile(&data, 50.0) - 2.5).abs() < 1e-9);
        assert!((percentile(&data, 25.0) - 1.75).abs() < 1e-9);
        assert!((percentile(&data, 0.0) - 1.0).abs() < 1e-9);
        assert!((percentile(&data, 100.0) - 4.0).abs() < 1e-9);
        assert!((percentile(&[7], 90.0) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_median_std() {
        let data = [2, 4, 4, 4, 5, 5, 7, 9];
        assert!((mean(&data) - 5.0).abs() < 1e-9);
        assert!((median(&data) - 4.5).abs() < 1e-9);
        let sd = std_dev(&data).unwrap();
        assert!((sd - 2.138_089_935).abs() < 1e-6);
        assert!(std_dev(&[3]).is_none());
    }

    #[test]
    fn test_impact_metrics_empty() {
        let m = impact_metrics(&[]);
        assert_eq!(m, ImpactMetrics::default());
        assert!(m.citation_percentiles.is_empty());
    }

    #[test]
    fn test_impact_metrics() {
        let m = impact_metrics(&[10, 8, 5, 4, 3]);
        assert_eq!(m.total_publications, 5);
        assert_eq!(m.total_citations, 30);
        assert!((m.avg_citations - 6.0).abs() < 1e-9);
        assert_eq!(m.h_index, 4);
        assert_eq!(m.i10_index, 1);
        assert_eq!(m.g_index, 5);
        assert_eq!(m.citation_percentiles.len(), 7);
    }

    #[test]
    fn test_citation_ranges() {
        let ranges = citation_ranges(&[0, 0, 3, 7, 20, 30, 75, 100, 101, 5000]);
        let counts: Vec<usize> = ranges.iter().map(|r| r.count).collect();
        assert_eq!(counts, vec![2, 1, 1, 1, 1, 2, 2]);
        assert_eq!(ranges[6].label, "100+");
    }
}
