//! Shared fixtures for unit tests

use crate::{
    morph::{DictionaryAnalyzer, Normalizer},
    properties::{PartOfSpeech, SemanticGroup, SemanticGroupId, SemanticGroups},
    sentence::Sentence,
};
use std::sync::Arc;

pub const PREDICATE: SemanticGroupId = SemanticGroupId(1);
pub const OBJECT: SemanticGroupId = SemanticGroupId(2);
pub const AGENT: SemanticGroupId = SemanticGroupId(3);
pub const INSTRUMENT: SemanticGroupId = SemanticGroupId(4);

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

pub fn test_groups() -> SemanticGroups {
    SemanticGroups::new(
        [
            (PREDICATE, "Предикат"),
            (OBJECT, "Объект"),
            (AGENT, "Агент"),
            (INSTRUMENT, "Инструмент"),
        ]
        .into_iter()
        .map(|(id, name)| SemanticGroup {
            id,
            name: name.to_string(),
        }),
    )
    .unwrap()
}

pub fn aviation_normalizer() -> Normalizer {
    let mut dict = DictionaryAnalyzer::new();
    dict.insert("летчик", "летчик", PartOfSpeech::Noun);
    dict.insert("пилотировал", "пилотировать", PartOfSpeech::Verb);
    dict.insert("самолет", "самолет", PartOfSpeech::Noun);
    dict.insert("самолетом", "самолет", PartOfSpeech::Noun);
    dict.insert("управлял", "управлять", PartOfSpeech::Verb);
    dict.insert("с", "с", PartOfSpeech::Preposition);
    dict.insert("помощью", "помощь", PartOfSpeech::Noun);
    dict.insert("автопилота", "автопилот", PartOfSpeech::Noun);
    Normalizer::new(Arc::new(dict))
}

/// "Летчик пилотировал самолет" with agent, predicate and object tagged in that order.
pub fn pilot_sentence() -> Sentence {
    init_logging();
    let mut sentence = Sentence::new("Летчик пилотировал самолет", PREDICATE);
    sentence.tag(&[0], AGENT).unwrap();
    sentence.tag(&[1], PREDICATE).unwrap();
    sentence.tag(&[2], OBJECT).unwrap();
    sentence
}
