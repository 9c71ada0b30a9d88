use criterion::{criterion_group, criterion_main, Criterion};
use filmdex_core::vector::rank_all;
use filmdex_core::{build, Document, Normalizer};

const WORDS: &[&str] = &[
    "storm", "harbor", "keeper", "desert", "caravan", "night", "city", "family", "monster", "hero",
    "villain", "journey", "river", "mountain", "detective", "murder", "love", "war", "island", "secret",
];

fn synthetic_corpus(n: u32) -> Vec<Document> {
    (1..=n)
        .map(|id| {
            let text: Vec<&str> = (0..40).map(|i| WORDS[((id * 7 + i * 13) as usize) % WORDS.len()]).collect();
            Document::new(id, format!("Film {id}"), text.join(" "))
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let normalizer = Normalizer::default();
    let text = "A deaf family fights silent monsters while the heroes of the city race across the desert. ".repeat(20);
    c.bench_function("normalize_paragraph", |b| b.iter(|| normalizer.normalize(&text)));
}

fn bench_rank(c: &mut Criterion) {
    let docs = synthetic_corpus(2_000);
    let index = build(Normalizer::default(), &docs);
    c.bench_function("rank_three_terms", |b| b.iter(|| rank_all(&["storm", "detect", "island"], &index)));
}

criterion_group!(benches, bench_normalize, bench_rank);
criterion_main!(benches);
