//! Benchmarks for the keyword and similarity matchers.
//!
//! The store is synthesized with `TOPIC_COUNT` entries of three sentences
//! each. Topic keys are zero-padded so none is a prefix of another. Set
//! `BENCH_FULL_SCALE=1` to run against a ten times larger store:
//!
//! ```bash
//! BENCH_FULL_SCALE=1 cargo bench -p solx-knowledge
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use solx_core::types::KnowledgeEntry;
use solx_knowledge::{KeywordMatcher, KnowledgeStore, QueryMatcher, VectorSimilarityMatcher};

const TOPIC_COUNT: usize = 500;

fn topic_count() -> usize {
    if std::env::var("BENCH_FULL_SCALE").is_ok() {
        TOPIC_COUNT * 10
    } else {
        TOPIC_COUNT
    }
}

fn build_store(count: usize) -> KnowledgeStore {
    KnowledgeStore::from_entries((0..count).map(|i| {
        KnowledgeEntry::new(
            format!("component {:05}", i),
            format!(
                "Component {i} is a piece of computer hardware. \
                 It talks to the motherboard over bus {i}. \
                 Drivers for component {i} ship with the operating system."
            ),
        )
    }))
}

fn bench_keyword(c: &mut Criterion) {
    let store = build_store(topic_count());
    let matcher = KeywordMatcher::new();

    c.bench_function("keyword_hit_last_topic", |b| {
        let query = format!("tell me about component {:05}", topic_count() - 1);
        b.iter(|| matcher.match_query(black_box(&query), &store))
    });

    c.bench_function("keyword_miss", |b| {
        b.iter(|| matcher.match_query(black_box("how do graphics shaders work"), &store))
    });
}

fn bench_similarity(c: &mut Criterion) {
    let count = topic_count();

    c.bench_function("similarity_fit", |b| {
        b.iter(|| build_store(count).with_sentence_index().unwrap())
    });

    let store = build_store(count)
        .with_sentence_index()
        .expect("synthetic corpus is never empty");
    let matcher = VectorSimilarityMatcher::new(&store).expect("store is indexed");

    c.bench_function("similarity_query", |b| {
        b.iter(|| matcher.match_query(black_box("which bus does the motherboard use"), &store))
    });
}

criterion_group!(benches, bench_keyword, bench_similarity);
criterion_main!(benches);
