//! Content similarity between publications of one result set.

use serde::Serialize;

use super::text::{cosine, term_counts, tokenize};
use crate::models::Publication;

/// A publication similar to the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarPublication {
    /// Index in the result set.
    pub index: usize,
    /// Cosine similarity in `[0, 1]`.
    pub similarity: f64,
}

fn document(publication: &Publication) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(2 + publication.keywords.len());
    if let Some(abstract_text) = publication.abstract_text.as_deref() {
        parts.push(abstract_text);
    }
    parts.push(&publication.title);
    parts.extend(publication.keywords.iter().map(String::as_str));
    parts.join(" ")
}

/// The `n` publications most similar to `publications[target]`.
///
/// Bag-of-words cosine similarity over abstract, title and keywords. The target
/// itself is never returned; fewer than two publications or an out-of-range
/// target yield nothing.
#[must_use]
pub fn similar_publications(publications: &[Publication], target: usize, n: usize) -> Vec<SimilarPublication> {
    if publications.len() < 2 || target >= publications.len() {
        return Vec::new();
    }

    let vectors: Vec<_> = publications.iter().map(|p| term_counts(&tokenize(&document(p)))).collect();
    let target_vector = &vectors[target];

    let mut scored: Vec<SimilarPublication> = vectors
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != target)
        .map(|(index, vector)| SimilarPublication { index, similarity: cosine(target_vector, vector) })
        .collect();

    scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    scored.truncate(n);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(title: &str, abstract_text: Option<&str>) -> Publication {
        Publication {
            title: title.to_string(),
            abstract_text: abstract_text.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_most_similar_first() {
        let pubs = vec![
            paper("Graph neural networks", Some("message passing on graphs")),
            paper("Protein folding", Some("structure prediction")),
            paper("Neural networks on graphs", Some("graph message passing")),
        ];

        let similar = similar_publications(&pubs, 0, 5);
        assert_eq!(similar.len(), 2);
        assert_eq!(similar[0].index, 2);
        assert!(similar[0].similarity > similar[1].similarity);
        assert!(similar.iter().all(|s| s.index != 0));
    }

    #[test]
    fn test_limits() {
        let pubs = vec![paper("a b", None), paper("c d", None), paper("e f", None)];
        assert_eq!(similar_publications(&pubs, 1, 1).len(), 1);
        assert!(similar_publications(&pubs[..1], 0, 5).is_empty());
        assert!(similar_publications(&pubs, 9, 5).is_empty());
    }
}
