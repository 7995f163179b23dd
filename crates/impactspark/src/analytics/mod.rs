//! Impact analytics over a set of publications.
//!
//! Everything here is a pure function of its inputs. Functions that depend on
//! "now" take the current year as a parameter so results are reproducible.

pub mod authors;
pub mod distribution;
pub mod geo;
pub mod keywords;
pub mod metrics;
pub mod similarity;
pub mod temporal;
pub mod text;
pub mod tracker;

use chrono::Datelike;

pub use metrics::{ImpactMetrics, impact_metrics};

use crate::models::Publication;

/// The current calendar year in local time.
#[must_use]
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Citation counts of `publications`, in order.
#[must_use]
pub fn citations_of<'a, I>(publications: I) -> Vec<u32>
where
    I: IntoIterator<Item = &'a Publication>,
{
    publications.into_iter().map(|p| p.citations).collect()
}

/// The `n` most cited publications, ties in input order.
#[must_use]
pub fn most_cited(publications: &[Publication], n: usize) -> Vec<&Publication> {
    let mut sorted: Vec<&Publication> = publications.iter().collect();
    sorted.sort_by(|a, b| b.citations.cmp(&a.citations));
    sorted.truncate(n);
    sorted
}
