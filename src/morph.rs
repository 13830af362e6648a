//! Word normalization on top of an external morphological analyzer.
//!
//! The analyzer itself is a black box ([`MorphAnalyzer`]). [`Normalizer`] adds the numeral
//! shortcut, memoization and the surface-as-lemma fallback.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    fs::read_to_string,
    path::Path,
    sync::Arc,
};
use unicode_normalization::UnicodeNormalization;

use crate::{error::LingError, properties::PartOfSpeech};

/// `analyze(word) -> Option<(lemma, part_of_speech)>`. Must be pure: results are cached.
pub trait MorphAnalyzer: Send + Sync {
    fn analyze(&self, word: &str) -> Option<(String, PartOfSpeech)>;
}

impl<F> MorphAnalyzer for F
where
    F: Fn(&str) -> Option<(String, PartOfSpeech)> + Send + Sync,
{
    fn analyze(&self, word: &str) -> Option<(String, PartOfSpeech)> {
        self(word)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedWord {
    pub surface: String,
    /// Dictionary form, or `None` when the word is its own lemma.
    pub initial_form: Option<String>,
    pub pos: PartOfSpeech,
}

impl NormalizedWord {
    /// Treat the surface form as its own lemma.
    pub fn own_lemma(surface: &str, pos: PartOfSpeech) -> Self {
        NormalizedWord {
            surface: surface.to_string(),
            initial_form: None,
            pos,
        }
    }

    pub fn lemma(&self) -> &str {
        self.initial_form.as_deref().unwrap_or(&self.surface)
    }
}

type CacheEntry = Result<NormalizedWord, LingError>;

/// Memoizing wrapper around a [`MorphAnalyzer`].
///
/// The analyzer runs outside the cache lock; concurrent misses on the same word may both call
/// the analyzer, which is harmless since it is pure.
#[derive(Clone)]
pub struct Normalizer {
    analyzer: Arc<dyn MorphAnalyzer>,
    cache: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("cached", &self.cache.read().len())
            .finish()
    }
}

impl Normalizer {
    pub fn new(analyzer: Arc<dyn MorphAnalyzer>) -> Self {
        Normalizer {
            analyzer,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn cache_key(word: &str) -> String {
        word.nfc().collect::<String>().to_lowercase()
    }

    /// Normalize one word. Fails with [`LingError::Analysis`] when the analyzer has no candidate.
    pub fn normalize(&self, word: &str) -> Result<NormalizedWord, LingError> {
        let key = Self::cache_key(word);
        if let Some(hit) = self.cache.read().get(&key) {
            return hit.clone();
        }

        let result = self.analyze_uncached(&key);
        self.cache.write().insert(key, result.clone());
        result
    }

    fn analyze_uncached(&self, surface: &str) -> CacheEntry {
        if !surface.is_empty() && surface.chars().all(char::is_numeric) {
            return Ok(NormalizedWord::own_lemma(surface, PartOfSpeech::Numeral));
        }
        match self.analyzer.analyze(surface) {
            Some((lemma, pos)) => {
                let lemma = Self::cache_key(&lemma);
                let initial_form = if lemma.is_empty() || lemma == surface {
                    None
                } else {
                    Some(lemma)
                };
                Ok(NormalizedWord {
                    surface: surface.to_string(),
                    initial_form,
                    pos,
                })
            }
            None => Err(LingError::Analysis(format!("no analysis for '{surface}'"))),
        }
    }

    /// Normalize, falling back to surface-as-lemma (part of speech `None`) when analysis fails.
    pub fn normalize_or_fallback(&self, word: &str) -> NormalizedWord {
        match self.normalize(word) {
            Ok(normalized) => normalized,
            Err(e) => {
                tracing::warn!("[Normalizer] {e}; using the surface form as its own lemma");
                NormalizedWord::own_lemma(&Self::cache_key(word), PartOfSpeech::None)
            }
        }
    }

    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub lemma: String,
    /// OpenCorpora part-of-speech grammeme, e.g. `NOUN`, `INFN`.
    pub pos: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct DictionaryFile {
    #[serde(default)]
    forms: BTreeMap<String, DictionaryEntry>,
}

/// Form table analyzer, for curated vocabularies and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryAnalyzer {
    forms: BTreeMap<String, (String, PartOfSpeech)>,
}

impl DictionaryAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, form: &str, lemma: &str, pos: PartOfSpeech) {
        self.forms.insert(
            Normalizer::cache_key(form),
            (Normalizer::cache_key(lemma), pos),
        );
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Parse a TOML table of the form
    ///
    /// ```toml
    /// [forms]
    /// "пилотировал" = { lemma = "пилотировать", pos = "VERB" }
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, LingError> {
        let file: DictionaryFile = toml::from_str(content)?;
        let mut dict = DictionaryAnalyzer::new();
        for (form, entry) in file.forms {
            dict.insert(
                &form,
                &entry.lemma,
                PartOfSpeech::from_opencorpora_tag(&entry.pos),
            );
        }
        Ok(dict)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LingError> {
        tracing::debug!("Reading dictionary {:?}", path.as_ref());
        let content = read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

impl MorphAnalyzer for DictionaryAnalyzer {
    fn analyze(&self, word: &str) -> Option<(String, PartOfSpeech)> {
        self.forms.get(word).cloned()
    }
}

/// Snowball stemmer standing in for a lemmatizer: the "lemma" is the stem.
#[cfg(feature = "stemming")]
pub struct StemmingAnalyzer {
    stemmer: rust_stemmers::Stemmer,
}

#[cfg(feature = "stemming")]
impl StemmingAnalyzer {
    pub fn new(algorithm: rust_stemmers::Algorithm) -> Self {
        StemmingAnalyzer {
            stemmer: rust_stemmers::Stemmer::create(algorithm),
        }
    }

    pub fn russian() -> Self {
        Self::new(rust_stemmers::Algorithm::Russian)
    }
}

#[cfg(feature = "stemming")]
impl MorphAnalyzer for StemmingAnalyzer {
    fn analyze(&self, word: &str) -> Option<(String, PartOfSpeech)> {
        let stem = self.stemmer.stem(word);
        if stem.is_empty() {
            None
        } else {
            Some((stem.into_owned(), PartOfSpeech::None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use test_log::test;

    fn aviation_dictionary() -> DictionaryAnalyzer {
        DictionaryAnalyzer::from_toml_str(
            r#"
[forms]
"пилотировал" = { lemma = "пилотировать", pos = "VERB" }
"самолет" = { lemma = "самолет", pos = "NOUN" }
"летчик" = { lemma = "летчик", pos = "NOUN" }
"#,
        )
        .unwrap()
    }

    #[test]
    fn derivative_form_has_initial_form() {
        let normalizer = Normalizer::new(Arc::new(aviation_dictionary()));
        let word = normalizer.normalize("Пилотировал").unwrap();
        assert_eq!(word.surface, "пилотировал");
        assert_eq!(word.initial_form.as_deref(), Some("пилотировать"));
        assert_eq!(word.pos, PartOfSpeech::Verb);
        assert_eq!(word.lemma(), "пилотировать");
    }

    #[test]
    fn lemma_equal_to_surface_is_none() {
        let normalizer = Normalizer::new(Arc::new(aviation_dictionary()));
        let word = normalizer.normalize("самолет").unwrap();
        assert_eq!(word.initial_form, None);
        assert_eq!(word.lemma(), "самолет");
    }

    #[test]
    fn numerals_skip_the_analyzer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let normalizer = Normalizer::new(Arc::new(move |_: &str| -> Option<(String, PartOfSpeech)> {
            counter.fetch_add(1, Ordering::SeqCst);
            None
        }));
        let word = normalizer.normalize("380").unwrap();
        assert_eq!(word.pos, PartOfSpeech::Numeral);
        assert_eq!(word.initial_form, None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failures_are_reported_and_fallback_is_explicit() {
        let normalizer = Normalizer::new(Arc::new(aviation_dictionary()));
        assert!(matches!(
            normalizer.normalize("эшелона"),
            Err(LingError::Analysis(_))
        ));
        let fallback = normalizer.normalize_or_fallback("эшелона");
        assert_eq!(fallback.lemma(), "эшелона");
        assert_eq!(fallback.pos, PartOfSpeech::None);
    }

    #[test]
    fn analyzer_runs_once_per_surface_form() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let normalizer = Normalizer::new(Arc::new(move |w: &str| -> Option<(String, PartOfSpeech)> {
            counter.fetch_add(1, Ordering::SeqCst);
            Some((w.to_string(), PartOfSpeech::Noun))
        }));
        for _ in 0..3 {
            normalizer.normalize("погоду").unwrap();
            normalizer.normalize("ПОГОДУ").unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(normalizer.cached_len(), 1);
    }

    #[test]
    fn composed_and_decomposed_forms_share_a_cache_entry() {
        let normalizer = Normalizer::new(Arc::new(aviation_dictionary()));
        // "й" as и + combining breve.
        normalizer.normalize_or_fallback("бои\u{306}");
        normalizer.normalize_or_fallback("бой");
        assert_eq!(normalizer.cached_len(), 1);
    }

    #[cfg(feature = "stemming")]
    #[test]
    fn stemming_analyzer_shares_stems() {
        let normalizer = Normalizer::new(Arc::new(StemmingAnalyzer::russian()));
        let a = normalizer.normalize("самолеты").unwrap();
        let b = normalizer.normalize("самолетом").unwrap();
        assert_eq!(a.lemma(), b.lemma());
    }
}
