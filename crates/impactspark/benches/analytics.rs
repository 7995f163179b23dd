//! Benchmarks for the analytics run on every dashboard page.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use impactspark::analytics::authors::{author_counts, coauthorship_matrix};
use impactspark::analytics::impact_metrics;
use impactspark::analytics::keywords::keyword_analysis;
use impactspark::analytics::similarity::similar_publications;
use impactspark::models::Publication;

const AUTHORS: [&str; 8] = ["Ada", "Alan", "Grace", "Edsger", "Barbara", "Donald", "Frances", "John"];
const WORDS: [&str; 10] =
    ["graph", "neural", "network", "learning", "quantum", "protein", "climate", "model", "sparse", "kernel"];

fn synthetic_publications(n: usize) -> Vec<Publication> {
    (0..n)
        .map(|i| Publication {
            id: format!("W{i}"),
            title: format!("{} {} {}", WORDS[i % 10], WORDS[(i * 3) % 10], WORDS[(i * 7) % 10]),
            authors: vec![AUTHORS[i % 8].to_string(), AUTHORS[(i + 3) % 8].to_string()],
            year: Some(2000 + (i % 24) as i32),
            citations: ((i * 37) % 500) as u32,
            keywords: vec![WORDS[i % 10].to_string(), WORDS[(i + 1) % 10].to_string()],
            abstract_text: Some(format!("We study {} with {} methods.", WORDS[i % 10], WORDS[(i + 5) % 10])),
            ..Default::default()
        })
        .collect()
}

fn bench_metrics(c: &mut Criterion) {
    let citations: Vec<u32> = (0..1_000u32).map(|i| (i * 37) % 500).collect();
    c.bench_function("impact_metrics_1000", |b| b.iter(|| impact_metrics(black_box(&citations))));
}

fn bench_authors(c: &mut Criterion) {
    let publications = synthetic_publications(500);
    c.bench_function("coauthorship_matrix_500", |b| {
        b.iter(|| {
            let authors: Vec<String> = author_counts(&publications, 10).into_iter().map(|(a, _)| a).collect();
            coauthorship_matrix(black_box(&publications), &authors)
        });
    });
}

fn bench_keywords(c: &mut Criterion) {
    let publications = synthetic_publications(500);
    c.bench_function("keyword_analysis_500", |b| b.iter(|| keyword_analysis(black_box(&publications))));
}

fn bench_similarity(c: &mut Criterion) {
    let publications = synthetic_publications(200);
    c.bench_function("similar_publications_200", |b| {
        b.iter(|| similar_publications(black_box(&publications), 0, 5));
    });
}

criterion_group!(benches, bench_metrics, bench_authors, bench_keywords, bench_similarity);
criterion_main!(benches);
