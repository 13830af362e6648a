//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use ling_core::{
    config::LingConfig,
    db::DbConnection,
    morph::{DictionaryAnalyzer, Normalizer},
    properties::PartOfSpeech,
};
use std::sync::Arc;
use tempfile::TempDir;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// A small aviation vocabulary in the dictionary analyzer's TOML format.
pub const AVIATION_DICTIONARY: &str = r#"
[forms]
"летчик" = { lemma = "летчик", pos = "NOUN" }
"летчики" = { lemma = "летчик", pos = "NOUN" }
"пилотировал" = { lemma = "пилотировать", pos = "VERB" }
"пилотировали" = { lemma = "пилотировать", pos = "VERB" }
"самолет" = { lemma = "самолет", pos = "NOUN" }
"самолеты" = { lemma = "самолет", pos = "NOUN" }
"штурман" = { lemma = "штурман", pos = "NOUN" }
"вел" = { lemma = "вести", pos = "VERB" }
"#;

#[allow(dead_code)]
pub fn aviation_dictionary() -> DictionaryAnalyzer {
    DictionaryAnalyzer::from_toml_str(AVIATION_DICTIONARY).unwrap()
}

#[allow(dead_code)]
pub fn aviation_normalizer() -> Normalizer {
    let mut dict = aviation_dictionary();
    dict.insert("маршрут", "маршрут", PartOfSpeech::Noun);
    Normalizer::new(Arc::new(dict))
}

/// Default config pointing at a database inside `temp_dir`.
#[allow(dead_code)]
pub fn temp_config(temp_dir: &TempDir) -> LingConfig {
    LingConfig {
        database: temp_dir.path().join("ling.sqlite"),
        ..Default::default()
    }
}

/// Fresh database with the default groups seeded.
#[allow(dead_code)]
pub async fn temp_db(temp_dir: &TempDir) -> DbConnection {
    let config = temp_config(temp_dir);
    let db = DbConnection::open(&config.database).await.unwrap();
    db.seed_semantic_groups(&config.semantic_groups)
        .await
        .unwrap();
    db
}
