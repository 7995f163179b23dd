//! Author-level impact and collaboration.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use super::metrics::h_index;
use crate::models::{AuthorSortKey, Publication};

/// Authors listed in the author table.
pub const TOP_AUTHORS: usize = 20;

/// Authors included in the co-authorship matrix.
pub const MATRIX_AUTHORS: usize = 10;

/// Institution list length cap in the author table.
const INSTITUTIONS_MAX_CHARS: usize = 100;

/// Aggregated impact of one author across a publication set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorImpact {
    pub name: String,
    /// Institutions of the papers this author appears on, joined by ", ".
    pub institutions: String,
    pub publications: usize,
    pub citations: u64,
    pub avg_citations: f64,
    pub h_index: usize,
}

struct AuthorAccumulator<'a> {
    citations: Vec<u32>,
    institutions: BTreeSet<&'a str>,
    first_seen: usize,
}

fn accumulate(publications: &[Publication]) -> HashMap<&str, AuthorAccumulator<'_>> {
    let mut authors: HashMap<&str, AuthorAccumulator<'_>> = HashMap::new();
    let mut order = 0;

    for publication in publications {
        for name in &publication.authors {
            let entry = authors.entry(name.as_str()).or_insert_with(|| {
                order += 1;
                AuthorAccumulator { citations: Vec::new(), institutions: BTreeSet::new(), first_seen: order }
            });
            entry.citations.push(publication.citations);
            entry.institutions.extend(publication.institutions.iter().map(String::as_str));
        }
    }

    authors
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Per-author impact for every author with at least `min_papers` papers.
///
/// Sorted by publication count, then citations, then first appearance.
#[must_use]
pub fn author_impact(publications: &[Publication], min_papers: usize) -> Vec<AuthorImpact> {
    let mut rows: Vec<(usize, AuthorImpact)> = accumulate(publications)
        .into_iter()
        .filter(|(_, acc)| acc.citations.len() >= min_papers)
        .map(|(name, acc)| {
            let institutions = acc.institutions.iter().copied().collect::<Vec<_>>().join(", ");
            let impact = AuthorImpact {
                name: name.to_string(),
                institutions: truncate_chars(&institutions, INSTITUTIONS_MAX_CHARS),
                publications: acc.citations.len(),
                citations: super::metrics::total(&acc.citations),
                avg_citations: super::metrics::mean(&acc.citations),
                h_index: h_index(&acc.citations),
            };
            (acc.first_seen, impact)
        })
        .collect();

    rows.sort_by(|(a_seen, a), (b_seen, b)| {
        b.publications
            .cmp(&a.publications)
            .then(b.citations.cmp(&a.citations))
            .then(a_seen.cmp(b_seen))
    });
    rows.into_iter().map(|(_, impact)| impact).collect()
}

/// The most prolific authors, re-sorted by `sort_by` (descending).
#[must_use]
pub fn top_authors(publications: &[Publication], sort_by: AuthorSortKey, limit: usize) -> Vec<AuthorImpact> {
    let mut rows = author_impact(publications, 1);
    rows.truncate(limit);
    sort_authors(&mut rows, sort_by);
    rows
}

/// Stable descending sort of author rows.
pub fn sort_authors(rows: &mut [AuthorImpact], sort_by: AuthorSortKey) {
    match sort_by {
        AuthorSortKey::Publications => rows.sort_by(|a, b| b.publications.cmp(&a.publications)),
        AuthorSortKey::Citations => rows.sort_by(|a, b| b.citations.cmp(&a.citations)),
        AuthorSortKey::AvgCitations => rows.sort_by(|a, b| b.avg_citations.total_cmp(&a.avg_citations)),
        AuthorSortKey::HIndex => rows.sort_by(|a, b| b.h_index.cmp(&a.h_index)),
    }
}

/// Count of publications per author, most prolific first.
#[must_use]
pub fn author_counts(publications: &[Publication], limit: usize) -> Vec<(String, usize)> {
    author_impact(publications, 1)
        .into_iter()
        .take(limit)
        .map(|a| (a.name, a.publications))
        .collect()
}

/// Symmetric co-authorship counts among `authors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoauthorshipMatrix {
    pub authors: Vec<String>,
    /// `counts[i][j]` is the number of papers listing both `authors[i]` and `authors[j]`.
    /// The diagonal is zero.
    pub counts: Vec<Vec<usize>>,
}

/// Count shared papers for every pair of `authors`.
#[must_use]
pub fn coauthorship_matrix(publications: &[Publication], authors: &[String]) -> CoauthorshipMatrix {
    let index: HashMap<&str, usize> = authors.iter().enumerate().map(|(i, a)| (a.as_str(), i)).collect();
    let mut counts = vec![vec![0; authors.len()]; authors.len()];

    for publication in publications {
        let present: BTreeSet<usize> =
            publication.authors.iter().filter_map(|a| index.get(a.as_str()).copied()).collect();
        let present: Vec<usize> = present.into_iter().collect();

        for (n, &i) in present.iter().enumerate() {
            for &j in &present[n + 1..] {
                counts[i][j] += 1;
                counts[j][i] += 1;
            }
        }
    }

    CoauthorshipMatrix { authors: authors.to_vec(), counts }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(authors: &[&str], citations: u32, institution: &str) -> Publication {
        Publication {
            authors: authors.iter().map(|a| (*a).to_string()).collect(),
            citations,
            institutions: vec![institution.to_string()],
            ..Default::default()
        }
    }

    fn sample() -> Vec<Publication> {
        vec![
            paper(&["Ada", "Alan"], 10, "UCL"),
            paper(&["Ada", "Grace"], 4, "Yale"),
            paper(&["Ada"], 1, "UCL"),
            paper(&["Alan", "Grace"], 30, "Cambridge"),
            paper(&["Linus"], 100, "Helsinki"),
        ]
    }

    #[test]
    fn test_author_impact_min_papers() {
        let rows = author_impact(&sample(), 2);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Alan", "Grace"]);

        let ada = &rows[0];
        assert_eq!(ada.publications, 3);
        assert_eq!(ada.citations, 15);
        assert!((ada.avg_citations - 5.0).abs() < 1e-9);
        assert_eq!(ada.h_index, 2);
        assert_eq!(ada.institutions, "UCL, Yale");
    }

    #[test]
    fn test_top_authors_sorting() {
        let rows = top_authors(&sample(), AuthorSortKey::Citations, 20);
        assert_eq!(rows[0].name, "Linus");

        let rows = top_authors(&sample(), AuthorSortKey::Publications, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Ada");
    }

    #[test]
    fn test_institutions_truncated() {
        let long = "x".repeat(150);
        let rows = author_impact(&[paper(&["Solo"], 1, &long)], 1);
        assert_eq!(rows[0].institutions.chars().count(), 100);
    }

    #[test]
    fn test_coauthorship_matrix_symmetric() {
        let authors: Vec<String> = ["Ada", "Alan", "Grace"].iter().map(|s| (*s).to_string()).collect();
        let matrix = coauthorship_matrix(&sample(), &authors);
        assert_eq!(matrix.counts[0][1], 1);
        assert_eq!(matrix.counts[1][0], 1);
        assert_eq!(matrix.counts[1][2], 1);
        for i in 0..3 {
            assert_eq!(matrix.counts[i][i], 0);
        }
    }

    #[test]
    fn test_author_counts() {
        let counts = author_counts(&sample(), 10);
        assert_eq!(counts[0], ("Ada".to_string(), 3));
        assert_eq!(counts.len(), 4);
    }
}
