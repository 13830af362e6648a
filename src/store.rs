//! Persisted rows and the two seams to the relational store.
//!
//! [`SentenceWriter`] is the write side used by [`crate::sync::save_sentence`]: every call runs
//! inside one transaction that [`SentenceWriter::commit`] finishes. [`AnnotationSource`] is the
//! read side used by loading and by navigation views.

use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, Row};
use std::future::Future;

use crate::{
    error::LingError,
    properties::{
        CollocationId, CollocationIndex, ConnectionId, PartOfSpeech, SemanticGroup,
        SemanticGroupId, SentenceId, WordId, WordIndex,
    },
    sentence::Connection,
};

/// A word form, unique by `(word, pos, initial_form_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersistedWord {
    pub id: WordId,
    pub word: String,
    pub pos: PartOfSpeech,
    /// The lemma row, or `None` if this row is its own lemma.
    pub initial_form_id: Option<WordId>,
}

impl FromRow<'_, SqliteRow> for PersistedWord {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let pos_code: i64 = row.try_get("part_of_speech")?;
        Ok(PersistedWord {
            id: WordId(row.try_get("id")?),
            word: row.try_get("word")?,
            pos: PartOfSpeech::try_from(pos_code)?,
            initial_form_id: row.try_get::<Option<i64>, _>("initial_form_id")?.map(WordId),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersistedSentence {
    pub id: SentenceId,
    pub contents: String,
}

impl FromRow<'_, SqliteRow> for PersistedSentence {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(PersistedSentence {
            id: SentenceId(row.try_get("id")?),
            contents: row.try_get("contents")?,
        })
    }
}

/// A collocation shared by every sentence whose collocation hashes to `words_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersistedCollocation {
    pub id: CollocationId,
    pub semantic_group: SemanticGroupId,
    pub words_hash: String,
    /// Rendered text of the collocation as first saved.
    pub words_text: String,
}

impl FromRow<'_, SqliteRow> for PersistedCollocation {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(PersistedCollocation {
            id: CollocationId(row.try_get("id")?),
            semantic_group: SemanticGroupId(row.try_get("semantic_group_id")?),
            words_hash: row.try_get("words_hash")?,
            words_text: row.try_get("words_text")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersistedConnection {
    pub id: ConnectionId,
    pub predicate_id: CollocationId,
    pub actant_id: CollocationId,
}

impl FromRow<'_, SqliteRow> for PersistedConnection {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(PersistedConnection {
            id: ConnectionId(row.try_get("id")?),
            predicate_id: CollocationId(row.try_get("predicate_id")?),
            actant_id: CollocationId(row.try_get("actant_id")?),
        })
    }
}

/// One collocation of a saved sentence, as positioned in that sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceCollocation {
    pub idx: CollocationIndex,
    pub collocation_id: CollocationId,
    pub semantic_group: SemanticGroupId,
    pub word_idxs: Vec<WordIndex>,
}

/// `word_idxs` is stored as `.`-separated indices.
pub(crate) fn encode_word_idxs(word_idxs: &[WordIndex]) -> String {
    word_idxs
        .iter()
        .map(|idx| idx.to_string())
        .collect::<Vec<String>>()
        .join(".")
}

pub(crate) fn decode_word_idxs(encoded: &str) -> Result<Vec<WordIndex>, LingError> {
    encoded
        .split('.')
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<WordIndex>().map_err(|e| {
                LingError::Serialization(format!("bad word index list '{encoded}': {e}"))
            })
        })
        .collect()
}

impl FromRow<'_, SqliteRow> for SentenceCollocation {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let idx: i64 = row.try_get("idx")?;
        let word_idxs: &str = row.try_get("word_idxs")?;
        Ok(SentenceCollocation {
            idx: idx as CollocationIndex,
            collocation_id: CollocationId(row.try_get("collocation_id")?),
            semantic_group: SemanticGroupId(row.try_get("semantic_group_id")?),
            word_idxs: decode_word_idxs(word_idxs)?,
        })
    }
}

/// One connection of a saved sentence, in sentence-local collocation indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceConnection {
    pub idx: usize,
    pub connection_id: ConnectionId,
    pub connection: Connection,
}

impl FromRow<'_, SqliteRow> for SentenceConnection {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let idx: i64 = row.try_get("idx")?;
        let predicate_idx: i64 = row.try_get("predicate_idx")?;
        let actant_idx: i64 = row.try_get("actant_idx")?;
        Ok(SentenceConnection {
            idx: idx as usize,
            connection_id: ConnectionId(row.try_get("connection_id")?),
            connection: Connection::new(predicate_idx as usize, actant_idx as usize),
        })
    }
}

/// Write side of the store, scoped to one transaction.
///
/// Nothing written through a writer is visible to other readers until [`commit`]; dropping
/// the writer without committing discards everything.
///
/// [`commit`]: SentenceWriter::commit
pub trait SentenceWriter: Send {
    /// Insert the word form if absent and return its id.
    fn upsert_word(
        &mut self,
        word: &str,
        pos: PartOfSpeech,
        initial_form: Option<WordId>,
    ) -> impl Future<Output = Result<WordId, LingError>> + Send;

    /// Insert-if-absent keyed by the exact text.
    fn get_or_create_sentence(
        &mut self,
        text: &str,
    ) -> impl Future<Output = Result<SentenceId, LingError>> + Send;

    /// Delete every word, collocation and connection junction row of the sentence.
    fn clear_sentence_junctions(
        &mut self,
        sentence: SentenceId,
    ) -> impl Future<Output = Result<(), LingError>> + Send;

    fn insert_sentence_word(
        &mut self,
        sentence: SentenceId,
        word: WordId,
        idx: WordIndex,
        text_idx: usize,
    ) -> impl Future<Output = Result<(), LingError>> + Send;

    fn find_collocation_by_hash(
        &mut self,
        hash: &str,
    ) -> impl Future<Output = Result<Option<CollocationId>, LingError>> + Send;

    /// Insert a collocation row and its membership rows, one per word in `words` order.
    fn insert_collocation(
        &mut self,
        group: SemanticGroupId,
        hash: &str,
        words_text: &str,
        words: &[WordId],
    ) -> impl Future<Output = Result<CollocationId, LingError>> + Send;

    fn link_sentence_collocation(
        &mut self,
        sentence: SentenceId,
        collocation: CollocationId,
        idx: CollocationIndex,
        word_idxs: &[WordIndex],
    ) -> impl Future<Output = Result<(), LingError>> + Send;

    /// Insert the connection between two persisted collocations if absent and return its id.
    fn insert_connection(
        &mut self,
        predicate: CollocationId,
        actant: CollocationId,
    ) -> impl Future<Output = Result<ConnectionId, LingError>> + Send;

    fn link_sentence_connection(
        &mut self,
        sentence: SentenceId,
        connection_id: ConnectionId,
        idx: usize,
        connection: Connection,
    ) -> impl Future<Output = Result<(), LingError>> + Send;

    fn commit(self) -> impl Future<Output = Result<(), LingError>> + Send;
}

/// Read side of the store.
pub trait AnnotationSource: Sync {
    fn get_all_semantic_groups(
        &self,
    ) -> impl Future<Output = Result<Vec<SemanticGroup>, LingError>> + Send;

    fn get_all_sentences(
        &self,
    ) -> impl Future<Output = Result<Vec<PersistedSentence>, LingError>> + Send;

    fn get_sentence(
        &self,
        id: SentenceId,
    ) -> impl Future<Output = Result<PersistedSentence, LingError>> + Send;

    /// Collocations of a saved sentence, ordered by their sentence-local index.
    fn get_sentence_collocations(
        &self,
        id: SentenceId,
    ) -> impl Future<Output = Result<Vec<SentenceCollocation>, LingError>> + Send;

    /// Connections of a saved sentence, ordered by their sentence-local index.
    fn get_sentence_connections(
        &self,
        id: SentenceId,
    ) -> impl Future<Output = Result<Vec<SentenceConnection>, LingError>> + Send;

    /// Sentences whose text contains `fragment`.
    fn find_sentences_containing(
        &self,
        fragment: &str,
    ) -> impl Future<Output = Result<Vec<PersistedSentence>, LingError>> + Send;

    fn get_sentence_ids_with_word(
        &self,
        word: WordId,
    ) -> impl Future<Output = Result<Vec<SentenceId>, LingError>> + Send;

    fn get_all_words(&self) -> impl Future<Output = Result<Vec<PersistedWord>, LingError>> + Send;

    fn get_word(&self, id: WordId)
        -> impl Future<Output = Result<PersistedWord, LingError>> + Send;

    /// The stored form `word` with part of speech `pos`, matched case-insensitively.
    fn get_word_by_text(
        &self,
        word: &str,
        pos: PartOfSpeech,
    ) -> impl Future<Output = Result<PersistedWord, LingError>> + Send;

    /// Words containing `fragment`, ignoring case.
    fn find_words(
        &self,
        fragment: &str,
    ) -> impl Future<Output = Result<Vec<PersistedWord>, LingError>> + Send;

    /// The lemma row of a word; the word itself when it is its own lemma.
    fn get_initial_form(
        &self,
        id: WordId,
    ) -> impl Future<Output = Result<PersistedWord, LingError>> + Send;

    /// Derivative forms pointing at a lemma.
    fn get_words_with_initial_form(
        &self,
        lemma: WordId,
    ) -> impl Future<Output = Result<Vec<PersistedWord>, LingError>> + Send;

    /// Member words of every collocation in the group, in collocation order.
    fn get_words_of_semantic_group(
        &self,
        group: SemanticGroupId,
    ) -> impl Future<Output = Result<Vec<PersistedWord>, LingError>> + Send;

    fn get_all_collocations(
        &self,
    ) -> impl Future<Output = Result<Vec<PersistedCollocation>, LingError>> + Send;

    fn get_collocation(
        &self,
        id: CollocationId,
    ) -> impl Future<Output = Result<PersistedCollocation, LingError>> + Send;

    /// Member words of a collocation, in order.
    fn get_collocation_words(
        &self,
        id: CollocationId,
    ) -> impl Future<Output = Result<Vec<PersistedWord>, LingError>> + Send;

    fn get_collocations_of_semantic_group(
        &self,
        group: SemanticGroupId,
    ) -> impl Future<Output = Result<Vec<PersistedCollocation>, LingError>> + Send;

    fn get_collocation_ids_with_word(
        &self,
        word: WordId,
    ) -> impl Future<Output = Result<Vec<CollocationId>, LingError>> + Send;

    fn get_all_connections(
        &self,
    ) -> impl Future<Output = Result<Vec<PersistedConnection>, LingError>> + Send;

    fn get_connection(
        &self,
        id: ConnectionId,
    ) -> impl Future<Output = Result<PersistedConnection, LingError>> + Send;

    /// Connections with the collocation on either side.
    fn get_connection_ids_with_collocation(
        &self,
        collocation: CollocationId,
    ) -> impl Future<Output = Result<Vec<ConnectionId>, LingError>> + Send;

    /// Connections touching any collocation that contains the word.
    fn get_connection_ids_with_word(
        &self,
        word: WordId,
    ) -> impl Future<Output = Result<Vec<ConnectionId>, LingError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn word_index_lists_use_dots() {
        assert_eq!(encode_word_idxs(&[0, 4, 12]), "0.4.12");
        assert_eq!(decode_word_idxs("0.4.12").unwrap(), vec![0, 4, 12]);
        assert_eq!(decode_word_idxs("").unwrap(), Vec::<WordIndex>::new());
        assert!(matches!(
            decode_word_idxs("1.x"),
            Err(LingError::Serialization(_))
        ));
    }
}
