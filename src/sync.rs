//! Mapping between the in-memory [`Sentence`] and the persisted rows.
//!
//! Saving is a full replace: the sentence's junction rows are deleted and written again inside
//! the writer's single transaction. Words are shared across sentences by normalized form and
//! collocations by [`collocation_hash`], so saving the same content twice adds no rows.

use sha2::{Digest, Sha256};

use crate::{
    error::LingError,
    morph::{NormalizedWord, Normalizer},
    properties::{CollocationId, SemanticGroupId, SentenceId, WordId},
    sentence::{Collocation, Connection, Sentence},
    store::{AnnotationSource, SentenceWriter},
};

/// Content address of a collocation: SHA-256 (hex) over its group and its ordered lemmas.
pub fn collocation_hash<S: AsRef<str>>(group: SemanticGroupId, lemmas: &[S]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(group.0.to_be_bytes());
    for lemma in lemmas {
        // Unit separator keeps ["ab", "c"] and ["a", "bc"] apart.
        hasher.update([0x1f]);
        hasher.update(lemma.as_ref().as_bytes());
    }
    hex::encode(hasher.finalize())
}

async fn upsert_normalized<W: SentenceWriter>(
    writer: &mut W,
    word: &NormalizedWord,
) -> Result<WordId, LingError> {
    let lemma_id = match &word.initial_form {
        Some(lemma) => Some(writer.upsert_word(lemma, word.pos, None).await?),
        None => None,
    };
    writer.upsert_word(&word.surface, word.pos, lemma_id).await
}

/// Persist `sentence` through `writer` and commit. The sentence itself is not modified, so a
/// failed save can be retried as is.
///
/// A sentence breaking either invariant is rejected before anything is written.
#[tracing::instrument(skip_all, fields(text = sentence.text()))]
pub async fn save_sentence<W: SentenceWriter>(
    mut writer: W,
    sentence: &Sentence,
    normalizer: &Normalizer,
) -> Result<SentenceId, LingError> {
    sentence.check_invariants()?;
    let normalized: Vec<NormalizedWord> = sentence
        .words()
        .iter()
        .map(|word| normalizer.normalize_or_fallback(&word.surface))
        .collect();

    let mut word_ids = Vec::with_capacity(normalized.len());
    for word in normalized.iter() {
        word_ids.push(upsert_normalized(&mut writer, word).await?);
    }

    let sentence_id = writer.get_or_create_sentence(sentence.text()).await?;
    writer.clear_sentence_junctions(sentence_id).await?;
    for (idx, (word, word_id)) in sentence.words().iter().zip(word_ids.iter()).enumerate() {
        writer
            .insert_sentence_word(sentence_id, *word_id, idx, word.start)
            .await?;
    }

    let mut collocation_ids: Vec<CollocationId> = Vec::with_capacity(sentence.collocations().len());
    let mut reused = 0;
    for (idx, collocation) in sentence.collocations().iter().enumerate() {
        let lemmas: Vec<&str> = collocation
            .word_idxs()
            .iter()
            .map(|&w| normalized[w].lemma())
            .collect();
        let hash = collocation_hash(collocation.semantic_group, &lemmas);
        let collocation_id = match writer.find_collocation_by_hash(&hash).await? {
            Some(existing) => {
                reused += 1;
                existing
            }
            None => {
                let words: Vec<WordId> = collocation
                    .word_idxs()
                    .iter()
                    .map(|&w| word_ids[w])
                    .collect();
                let words_text = sentence.collocation_text(idx)?;
                writer
                    .insert_collocation(collocation.semantic_group, &hash, &words_text, &words)
                    .await?
            }
        };
        writer
            .link_sentence_collocation(sentence_id, collocation_id, idx, collocation.word_idxs())
            .await?;
        collocation_ids.push(collocation_id);
    }

    for (idx, connection) in sentence.connections().iter().enumerate() {
        let connection_id = writer
            .insert_connection(
                collocation_ids[connection.predicate_idx],
                collocation_ids[connection.actant_idx],
            )
            .await?;
        writer
            .link_sentence_connection(sentence_id, connection_id, idx, *connection)
            .await?;
    }

    writer.commit().await?;
    tracing::info!(
        "Saved sentence {sentence_id}: {} words, {} collocations ({reused} shared), {} connections",
        word_ids.len(),
        collocation_ids.len(),
        sentence.connections().len()
    );
    Ok(sentence_id)
}

/// Rebuild a saved sentence. Words are re-tokenized from the stored text; collocations and
/// connections come back in their saved order.
#[tracing::instrument(skip(source))]
pub async fn load_sentence<S: AnnotationSource>(
    source: &S,
    id: SentenceId,
    predicate: SemanticGroupId,
) -> Result<Sentence, LingError> {
    let persisted = source.get_sentence(id).await?;
    let collocations = source
        .get_sentence_collocations(id)
        .await?
        .into_iter()
        .map(|row| Collocation::new(row.word_idxs, row.semantic_group))
        .collect::<Result<Vec<Collocation>, LingError>>()?;
    let connections: Vec<Connection> = source
        .get_sentence_connections(id)
        .await?
        .into_iter()
        .map(|row| row.connection)
        .collect();
    Sentence::from_parts(&persisted.contents, predicate, collocations, connections)
}
