//! Keyword frequency, impact and trends.
//!
//! Uses the publications' own keywords when any are present, otherwise
//! frequent title terms.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use super::text::{term_counts, tokenize, unigrams_and_bigrams};
use crate::models::Publication;

/// Keywords need this many papers to be ranked by impact.
pub const MIN_KEYWORD_PAPERS: usize = 3;

/// Title terms must appear in this many titles to be counted.
pub const MIN_TERM_DOCUMENTS: usize = 3;

/// Keywords whose yearly trend is computed.
pub const TREND_KEYWORDS: usize = 20;

/// Keywords in the co-occurrence matrix.
pub const COOCCURRENCE_KEYWORDS: usize = 10;

/// Keywords shown in the impact ranking.
pub const IMPACT_KEYWORDS: usize = 15;

/// Keywords offered for trend lines, and how many are selected by default.
pub const TREND_OPTIONS: usize = 5;
pub const DEFAULT_TREND_SELECTION: usize = 3;

/// Where the counted terms came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordSource {
    Keywords,
    TitleTerms,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordFrequency {
    pub keyword: String,
    pub frequency: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordImpact {
    pub keyword: String,
    pub paper_count: usize,
    pub total_citations: u64,
    pub avg_citations: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordTrend {
    pub keyword: String,
    pub year: i32,
    pub count: usize,
}

/// Result of [`keyword_analysis`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordAnalysis {
    pub source: KeywordSource,
    /// Most frequent first.
    pub frequency: Vec<KeywordFrequency>,
    /// Highest average citations first. Empty for title terms.
    pub impact: Vec<KeywordImpact>,
    /// Per-year paper counts of the most frequent keywords. Empty for title terms.
    pub trends: Vec<KeywordTrend>,
}

fn clean_keywords(publication: &Publication) -> impl Iterator<Item = &str> {
    publication.keywords.iter().map(|k| k.trim()).filter(|k| !k.is_empty())
}

/// Sort `(term, count)` pairs by count descending, then by first appearance.
fn rank_by_count(counts: HashMap<String, (usize, usize)>) -> Vec<KeywordFrequency> {
    let mut ranked: Vec<(String, usize, usize)> =
        counts.into_iter().map(|(k, (count, seen))| (k, count, seen)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.into_iter().map(|(keyword, frequency, _)| KeywordFrequency { keyword, frequency }).collect()
}

/// Keyword frequency, impact and trend analysis.
#[must_use]
pub fn keyword_analysis(publications: &[Publication]) -> KeywordAnalysis {
    let has_keywords = publications.iter().any(|p| clean_keywords(p).next().is_some());
    if has_keywords { explicit_keywords(publications) } else { title_terms(publications) }
}

fn explicit_keywords(publications: &[Publication]) -> KeywordAnalysis {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut papers: HashMap<&str, Vec<&Publication>> = HashMap::new();
    let mut order = 0;

    for publication in publications {
        for keyword in clean_keywords(publication) {
            let entry = counts.entry(keyword.to_string()).or_insert_with(|| {
                order += 1;
                (0, order)
            });
            entry.0 += 1;
            papers.entry(keyword).or_default().push(publication);
        }
    }

    let frequency = rank_by_count(counts);

    let mut impact: Vec<KeywordImpact> = frequency
        .iter()
        .filter_map(|f| {
            let list = papers.get(f.keyword.as_str())?;
            if list.len() < MIN_KEYWORD_PAPERS {
                return None;
            }
            let citations: Vec<u32> = list.iter().map(|p| p.citations).collect();
            Some(KeywordImpact {
                keyword: f.keyword.clone(),
                paper_count: list.len(),
                total_citations: super::metrics::total(&citations),
                avg_citations: super::metrics::mean(&citations),
            })
        })
        .collect();
    impact.sort_by(|a, b| b.avg_citations.total_cmp(&a.avg_citations));

    let top: Vec<String> = frequency.iter().take(TREND_KEYWORDS).map(|f| f.keyword.clone()).collect();
    let trends = keyword_trends(publications, &top);

    KeywordAnalysis { source: KeywordSource::Keywords, frequency, impact, trends }
}

fn title_terms(publications: &[Publication]) -> KeywordAnalysis {
    let mut totals: BTreeMap<String, (usize, usize)> = BTreeMap::new();

    for publication in publications {
        let tokens = tokenize(&publication.title);
        for (term, count) in term_counts(&unigrams_and_bigrams(&tokens)) {
            let entry = totals.entry(term).or_insert((0, 0));
            entry.0 += count;
            entry.1 += 1;
        }
    }

    let mut frequency: Vec<KeywordFrequency> = totals
        .into_iter()
        .filter(|(_, (_, documents))| *documents >= MIN_TERM_DOCUMENTS)
        .map(|(keyword, (frequency, _))| KeywordFrequency { keyword, frequency })
        .collect();
    // Stable: ties stay alphabetical.
    frequency.sort_by(|a, b| b.frequency.cmp(&a.frequency));

    KeywordAnalysis { source: KeywordSource::TitleTerms, frequency, impact: Vec::new(), trends: Vec::new() }
}

/// Papers per year carrying each of `keywords`, in keyword order then year order.
#[must_use]
pub fn keyword_trends(publications: &[Publication], keywords: &[String]) -> Vec<KeywordTrend> {
    keywords
        .iter()
        .flat_map(|keyword| {
            let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();
            for publication in publications {
                let Some(year) = publication.effective_year() else { continue };
                if clean_keywords(publication).any(|k| k == keyword) {
                    *by_year.entry(year).or_insert(0) += 1;
                }
            }
            by_year
                .into_iter()
                .map(|(year, count)| KeywordTrend { keyword: keyword.clone(), year, count })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Symmetric keyword co-occurrence counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CooccurrenceMatrix {
    pub keywords: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

/// Count papers sharing each pair of `keywords`.
#[must_use]
pub fn keyword_cooccurrence(publications: &[Publication], keywords: &[String]) -> CooccurrenceMatrix {
    let index: HashMap<&str, usize> = keywords.iter().enumerate().map(|(i, k)| (k.as_str(), i)).collect();
    let mut counts = vec![vec![0; keywords.len()]; keywords.len()];

    for publication in publications {
        let present: Vec<usize> = clean_keywords(publication)
            .filter_map(|k| index.get(k).copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        for (n, &i) in present.iter().enumerate() {
            for &j in &present[n + 1..] {
                counts[i][j] += 1;
                counts[j][i] += 1;
            }
        }
    }

    CooccurrenceMatrix { keywords: keywords.to_vec(), counts }
}
