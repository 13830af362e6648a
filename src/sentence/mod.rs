//! The in-memory annotation model of one sentence.
//!
//! A [`Sentence`] is tokenized once at construction. After that it changes only through the
//! collocation operations (see [`collocation`]) and the connection operations (see
//! [`connection`]), which keep two invariants:
//!
//! - every word index belongs to at most one [`Collocation`], so collocations partition a
//!   subset of the words;
//! - every [`Connection`] runs from a collocation in the predicate group to a collocation
//!   outside it, and no pair appears twice.
//!
//! Word offsets are char offsets into the lowercased text (see [`crate::tokenizer`]).
//!
//! # Module Organization
//!
//! - [`collocation`]: tag, retag, remove, join and word membership queries
//! - [`connection`]: predicate -> actant edges and the default connection heuristic

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{
    error::LingError,
    morph::Normalizer,
    properties::{
        color_for_group, CollocationIndex, PartOfSpeech, SemanticGroupId, WordIndex,
    },
    tokenizer::{tokenize, Fragment},
};

pub mod collocation;
pub mod connection;


pub use collocation::TagOutcome;
pub use connection::DefaultConnections;

/// Rendered in place of skipped words when a collocation is not contiguous.
pub const GAP_MARKER: &str = " ... ";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Word {
    /// Lowercased surface form.
    pub surface: String,
    /// Char offset into the lowercased sentence text.
    pub start: usize,
    pub pos: PartOfSpeech,
}

impl Word {
    pub fn end(&self) -> usize {
        self.start + self.surface.chars().count()
    }
}

/// A non-empty, strictly increasing set of word indices tagged with one semantic group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Collocation {
    word_idxs: Vec<WordIndex>,
    pub semantic_group: SemanticGroupId,
}

impl Collocation {
    /// Sorts and deduplicates `word_idxs`. An empty set is rejected.
    pub fn new<I>(word_idxs: I, semantic_group: SemanticGroupId) -> Result<Self, LingError>
    where
        I: IntoIterator<Item = WordIndex>,
    {
        let word_idxs: Vec<WordIndex> = word_idxs
            .into_iter()
            .collect::<BTreeSet<WordIndex>>()
            .into_iter()
            .collect();
        if word_idxs.is_empty() {
            return Err(LingError::Validation(
                "a collocation needs at least one word".to_string(),
            ));
        }
        Ok(Collocation {
            word_idxs,
            semantic_group,
        })
    }

    pub fn word_idxs(&self) -> &[WordIndex] {
        &self.word_idxs
    }

    pub fn contains(&self, word_idx: WordIndex) -> bool {
        self.word_idxs.binary_search(&word_idx).is_ok()
    }

    pub fn len(&self) -> usize {
        self.word_idxs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_idxs.is_empty()
    }
}

/// Directed edge from a predicate collocation to an actant collocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Connection {
    pub predicate_idx: CollocationIndex,
    pub actant_idx: CollocationIndex,
}

impl Connection {
    pub fn new(predicate_idx: CollocationIndex, actant_idx: CollocationIndex) -> Self {
        Connection {
            predicate_idx,
            actant_idx,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    text: String,
    predicate: SemanticGroupId,
    words: Vec<Word>,
    non_words: Vec<Fragment>,
    collocations: Vec<Collocation>,
    connections: Vec<Connection>,
}

impl Sentence {
    /// Tokenize `text`. `predicate` is the id of the distinguished predicate group; parts of
    /// speech are left as [`PartOfSpeech::None`].
    pub fn new(text: &str, predicate: SemanticGroupId) -> Sentence {
        let tokens = tokenize(text);
        let words = tokens
            .words
            .into_iter()
            .map(|fragment| Word {
                surface: fragment.text,
                start: fragment.start,
                pos: PartOfSpeech::None,
            })
            .collect();
        Sentence {
            text: text.to_string(),
            predicate,
            words,
            non_words: tokens.non_words,
            collocations: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Like [`Sentence::new`], with parts of speech filled in by `normalizer`.
    pub fn analyzed(text: &str, predicate: SemanticGroupId, normalizer: &Normalizer) -> Sentence {
        let mut sentence = Sentence::new(text, predicate);
        sentence.analyze(normalizer);
        sentence
    }

    /// Fill in every word's part of speech.
    pub fn analyze(&mut self, normalizer: &Normalizer) {
        for word in self.words.iter_mut() {
            word.pos = normalizer.normalize_or_fallback(&word.surface).pos;
        }
    }

    /// Rebuild a sentence from stored annotations. Fails if they break either invariant.
    pub fn from_parts(
        text: &str,
        predicate: SemanticGroupId,
        collocations: Vec<Collocation>,
        connections: Vec<Connection>,
    ) -> Result<Sentence, LingError> {
        let mut sentence = Sentence::new(text, predicate);
        sentence.collocations = collocations;
        sentence.connections = connections;
        sentence.check_invariants()?;
        Ok(sentence)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn predicate_group(&self) -> SemanticGroupId {
        self.predicate
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn non_words(&self) -> &[Fragment] {
        &self.non_words
    }

    pub fn collocations(&self) -> &[Collocation] {
        &self.collocations
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn collocation(&self, idx: CollocationIndex) -> Result<&Collocation, LingError> {
        self.collocations
            .get(idx)
            .ok_or_else(|| LingError::out_of_range("collocation", idx, self.collocations.len()))
    }

    /// First word whose surface equals `word` (compared lowercased).
    pub fn find_word(&self, word: &str) -> Option<WordIndex> {
        let needle = word.to_lowercase();
        self.words.iter().position(|w| w.surface == needle)
    }

    /// Words whose span `[start, end)` overlaps the half-open char range `[start, end)`.
    pub fn word_idxs_in_range(&self, start: usize, end: usize) -> Vec<WordIndex> {
        self.words
            .iter()
            .enumerate()
            .filter(|(_, word)| word.end() > start && word.start < end)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// The collocation's words in order. Neighbouring words are glued with the text between
    /// them; skipped words become [`GAP_MARKER`].
    pub fn collocation_text(&self, idx: CollocationIndex) -> Result<String, LingError> {
        let collocation = self.collocation(idx)?;
        let mut out = String::new();
        let mut previous: Option<WordIndex> = None;
        for &word_idx in collocation.word_idxs() {
            let word = &self.words[word_idx];
            if let Some(prev) = previous {
                if word_idx == prev + 1 {
                    let glue = self
                        .non_words
                        .iter()
                        .find(|f| f.start == self.words[prev].end())
                        .map(|f| f.text.as_str())
                        .unwrap_or(" ");
                    out.push_str(glue);
                } else {
                    out.push_str(GAP_MARKER);
                }
            }
            out.push_str(&word.surface);
            previous = Some(word_idx);
        }
        Ok(out)
    }

    /// Reconstruct the lowercased text, wrapping every tagged word in
    /// `<font color=C>..</font>` with `C = palette[group mod palette.len()]`.
    pub fn to_html<S: AsRef<str>>(&self, palette: &[S]) -> String {
        let mut out = String::new();
        let mut glue = self.non_words.iter().peekable();
        for (idx, word) in self.words.iter().enumerate() {
            while let Some(fragment) = glue.next_if(|f| f.start < word.start) {
                push_escaped(&mut out, &fragment.text);
            }
            let color = self
                .collocation_of_word(idx)
                .and_then(|c| color_for_group(self.collocations[c].semantic_group, palette));
            match color {
                Some(color) => {
                    out.push_str("<font color=");
                    out.push_str(color);
                    out.push('>');
                    push_escaped(&mut out, &word.surface);
                    out.push_str("</font>");
                }
                None => push_escaped(&mut out, &word.surface),
            }
        }
        for fragment in glue {
            push_escaped(&mut out, &fragment.text);
        }
        out
    }

    /// Verify both sentence invariants.
    pub fn check_invariants(&self) -> Result<(), LingError> {
        let mut claimed = BTreeSet::new();
        for (idx, collocation) in self.collocations.iter().enumerate() {
            if collocation.is_empty() {
                return Err(LingError::Validation(format!("collocation {idx} is empty")));
            }
            for &word_idx in collocation.word_idxs() {
                if word_idx >= self.words.len() {
                    return Err(LingError::out_of_range("word", word_idx, self.words.len()));
                }
                if !claimed.insert(word_idx) {
                    return Err(LingError::Validation(format!(
                        "word {word_idx} belongs to more than one collocation"
                    )));
                }
            }
        }
        let mut seen = BTreeSet::new();
        for connection in self.connections.iter() {
            self.check_connection(connection)?;
            if !seen.insert(*connection) {
                return Err(LingError::Validation(format!(
                    "connection {} -> {} appears twice",
                    connection.predicate_idx, connection.actant_idx
                )));
            }
        }
        Ok(())
    }

    fn check_word_idxs(&self, idxs: &[WordIndex]) -> Result<(), LingError> {
        match idxs.iter().find(|&&idx| idx >= self.words.len()) {
            Some(&idx) => Err(LingError::out_of_range("word", idx, self.words.len())),
            None => Ok(()),
        }
    }

    fn check_collocation_idxs(&self, idxs: &[CollocationIndex]) -> Result<(), LingError> {
        match idxs.iter().find(|&&idx| idx >= self.collocations.len()) {
            Some(&idx) => Err(LingError::out_of_range(
                "collocation",
                idx,
                self.collocations.len(),
            )),
            None => Ok(()),
        }
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
}
