//! Performance benchmarks for sentence annotation
//!
//! Measures:
//! - Tokenization of long texts
//! - Collocation edits (tag, join, remove) with connection remapping
//! - Atomic saves into a SQLite store
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use ling_core::{
    config::DEFAULT_SEMANTIC_GROUPS,
    db::DbConnection,
    morph::{DictionaryAnalyzer, Normalizer},
    properties::{PartOfSpeech, SemanticGroupId},
    sentence::Sentence,
    sync::save_sentence,
    tokenizer::tokenize,
};
use std::sync::Arc;
use tempfile::TempDir;

const PREDICATE: SemanticGroupId = SemanticGroupId(1);
const OBJECT: SemanticGroupId = SemanticGroupId(2);
const AGENT: SemanticGroupId = SemanticGroupId(3);

const PILOT: &str = "Летчик пилотировал самолет, штурман вел самолет по маршруту.";

fn normalizer() -> Normalizer {
    let mut dict = DictionaryAnalyzer::new();
    for (form, lemma, pos) in [
        ("летчик", "летчик", PartOfSpeech::Noun),
        ("пилотировал", "пилотировать", PartOfSpeech::Verb),
        ("самолет", "самолет", PartOfSpeech::Noun),
        ("штурман", "штурман", PartOfSpeech::Noun),
        ("вел", "вести", PartOfSpeech::Verb),
        ("по", "по", PartOfSpeech::Preposition),
        ("маршруту", "маршрут", PartOfSpeech::Noun),
    ] {
        dict.insert(form, lemma, pos);
    }
    Normalizer::new(Arc::new(dict))
}

/// One collocation per word: agent, predicate, object, repeated.
fn fully_tagged(text: &str) -> Sentence {
    let mut sentence = Sentence::new(text, PREDICATE);
    let roles = [AGENT, PREDICATE, OBJECT];
    for idx in 0..sentence.words().len() {
        sentence.tag(&[idx], roles[idx % roles.len()]).unwrap();
    }
    sentence
}

// Benchmark: Tokenizing a long multi-sentence text
fn bench_tokenize(c: &mut Criterion) {
    let text = PILOT.repeat(200);
    c.bench_function("tokenize_long_text", |b| b.iter(|| tokenize(&text).words.len()));
}

// Benchmark: Tagging every word of a long sentence and connecting the first predicate
fn bench_tag_and_connect(c: &mut Criterion) {
    let text = PILOT.repeat(20);
    c.bench_function("tag_and_connect", |b| {
        b.iter(|| {
            let mut sentence = fully_tagged(&text);
            for actant in (0..sentence.collocations().len()).filter(|i| i % 3 != 1) {
                sentence.make_connection(1, actant).unwrap();
            }
            sentence.connections().len()
        })
    });
}

// Benchmark: Join and remove with connection remapping
fn bench_join_and_remove(c: &mut Criterion) {
    let text = PILOT.repeat(20);
    let mut base = fully_tagged(&text);
    for actant in (0..base.collocations().len()).filter(|i| i % 3 != 1) {
        base.make_connection(1, actant).unwrap();
    }

    c.bench_function("join_and_remove", |b| {
        b.iter_batched(
            || base.clone(),
            |mut sentence| {
                while sentence.collocations().len() > 4 {
                    sentence.join(&[2, 3], OBJECT).unwrap();
                    let last = sentence.collocations().len() - 1;
                    sentence.remove(&[last]).unwrap();
                }
                sentence.connections().len()
            },
            BatchSize::SmallInput,
        )
    });
}

// Benchmark: Re-saving a sentence whose rows all exist already
fn bench_save(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let tempdir = TempDir::new().unwrap();
    let normalizer = normalizer();
    let db = rt.block_on(async {
        let db = DbConnection::open(&tempdir.path().join("bench.sqlite"))
            .await
            .unwrap();
        db.seed_semantic_groups(&DEFAULT_SEMANTIC_GROUPS)
            .await
            .unwrap();
        db
    });
    let mut sentence = fully_tagged("Летчик пилотировал самолет");
    sentence.make_default_connections();
    let (db, sentence, normalizer) = (&db, &sentence, &normalizer);

    c.bench_function("save_deduplicated_sentence", |b| {
        b.to_async(&rt).iter(|| async move {
            save_sentence(db.begin().await.unwrap(), sentence, normalizer)
                .await
                .unwrap()
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(50)  // SQLite writes dominate the save benchmark
        .measurement_time(std::time::Duration::from_secs(10));
    targets =
        bench_tokenize,
        bench_tag_and_connect,
        bench_join_and_remove,
        bench_save
}

criterion_main!(benches);
