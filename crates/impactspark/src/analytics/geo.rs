//! Citations aggregated by institution country.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::Publication;

/// Countries shown on the main page.
pub const TOP_COUNTRIES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryCitations {
    /// ISO 3166-1 alpha-2 code, uppercase.
    pub country: String,
    pub citations: u64,
    pub publications: usize,
}

/// Sum citations per country code, highest first.
///
/// Each valid code on a paper receives the paper's full citation count.
/// Codes that are not two ASCII letters are skipped.
#[must_use]
pub fn country_citations(publications: &[Publication]) -> Vec<CountryCitations> {
    let mut totals: HashMap<String, (u64, usize)> = HashMap::new();

    for publication in publications {
        for code in &publication.country_codes {
            let code = code.trim().to_ascii_uppercase();
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                tracing::debug!(%code, "skipping invalid country code");
                continue;
            }
            let entry = totals.entry(code).or_insert((0, 0));
            entry.0 += u64::from(publication.citations);
            entry.1 += 1;
        }
    }

    let mut rows: Vec<CountryCitations> = totals
        .into_iter()
        .map(|(country, (citations, publications))| CountryCitations { country, citations, publications })
        .collect();
    rows.sort_by(|a, b| b.citations.cmp(&a.citations).then_with(|| a.country.cmp(&b.country)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(codes: &[&str], citations: u32) -> Publication {
        Publication {
            country_codes: codes.iter().map(|c| (*c).to_string()).collect(),
            citations,
            ..Default::default()
        }
    }

    #[test]
    fn test_country_citations() {
        let pubs = vec![paper(&["us", "GB"], 10), paper(&["US"], 5), paper(&["XYZ", "1A", ""], 99)];
        let rows = country_citations(&pubs);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], CountryCitations { country: "US".into(), citations: 15, publications: 2 });
        assert_eq!(rows[1].country, "GB");
    }
}
