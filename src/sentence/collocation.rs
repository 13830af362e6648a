use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Collocation, Connection, Sentence};
use crate::{
    error::LingError,
    properties::{CollocationIndex, SemanticGroupId, WordIndex},
};

/// Result of a soft tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagOutcome {
    Created(CollocationIndex),
    /// Every requested word already belongs to a collocation; nothing changed.
    NoUnassignedWords,
}

impl TagOutcome {
    pub fn created(&self) -> Option<CollocationIndex> {
        match self {
            TagOutcome::Created(idx) => Some(*idx),
            TagOutcome::NoUnassignedWords => None,
        }
    }
}

impl Sentence {
    /// Index of the collocation holding `word_idx`, if any.
    pub fn collocation_of_word(&self, word_idx: WordIndex) -> Option<CollocationIndex> {
        self.collocations.iter().position(|c| c.contains(word_idx))
    }

    /// Group the still unclaimed words among `word_idxs` into a new collocation.
    ///
    /// Words that already belong to a collocation are filtered out, never re-tagged.
    pub fn tag(
        &mut self,
        word_idxs: &[WordIndex],
        group: SemanticGroupId,
    ) -> Result<TagOutcome, LingError> {
        self.check_word_idxs(word_idxs)?;
        let free: BTreeSet<WordIndex> = word_idxs
            .iter()
            .copied()
            .filter(|&idx| self.collocation_of_word(idx).is_none())
            .collect();
        if free.is_empty() {
            tracing::warn!(
                "[Sentence.tag] words {word_idxs:?} are already assigned; nothing to tag"
            );
            return Ok(TagOutcome::NoUnassignedWords);
        }
        self.collocations.push(Collocation::new(free, group)?);
        let idx = self.collocations.len() - 1;
        tracing::debug!("[Sentence.tag] created collocation {idx} in group {group}");
        Ok(TagOutcome::Created(idx))
    }

    /// Tag the words overlapping the char range `[start, end)`.
    pub fn tag_text_range(
        &mut self,
        start: usize,
        end: usize,
        group: SemanticGroupId,
    ) -> Result<TagOutcome, LingError> {
        if start > end {
            return Err(LingError::Validation(format!(
                "text range start {start} is past its end {end}"
            )));
        }
        let word_idxs = self.word_idxs_in_range(start, end);
        self.tag(&word_idxs, group)
    }

    /// Replace the group of one collocation. Word membership and connections are untouched.
    ///
    /// Refused when a connection of the collocation would no longer link a predicate to an
    /// actant under the new group; delete those connections first.
    pub fn retag(&mut self, idx: CollocationIndex, group: SemanticGroupId) -> Result<(), LingError> {
        self.check_collocation_idxs(&[idx])?;
        let previous = std::mem::replace(&mut self.collocations[idx].semantic_group, group);
        let broken = self
            .connections
            .iter()
            .filter(|c| c.predicate_idx == idx || c.actant_idx == idx)
            .find_map(|c| self.check_connection(c).err());
        if let Some(e) = broken {
            self.collocations[idx].semantic_group = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Remove collocations, drop the connections that touched them and compact the rest.
    ///
    /// Surviving connections are remapped to the compacted positions.
    pub fn remove(&mut self, idxs: &[CollocationIndex]) -> Result<(), LingError> {
        self.check_collocation_idxs(idxs)?;
        let removed: BTreeSet<CollocationIndex> = idxs.iter().copied().collect();

        let mut next = 0;
        let mapping: Vec<Option<CollocationIndex>> = (0..self.collocations.len())
            .map(|idx| {
                if removed.contains(&idx) {
                    None
                } else {
                    next += 1;
                    Some(next - 1)
                }
            })
            .collect();

        let before = self.connections.len();
        self.connections = self
            .connections
            .iter()
            .filter_map(|c| {
                Some(Connection::new(
                    mapping[c.predicate_idx]?,
                    mapping[c.actant_idx]?,
                ))
            })
            .collect();

        self.collocations = std::mem::take(&mut self.collocations)
            .into_iter()
            .zip(mapping.iter())
            .filter_map(|(collocation, new_idx)| new_idx.map(|_| collocation))
            .collect();

        tracing::debug!(
            "[Sentence.remove] removed collocations {removed:?}, dropped {} connections",
            before - self.connections.len()
        );
        Ok(())
    }

    /// Merge two or more collocations into a new one in `new_group`.
    ///
    /// A connection touching exactly one merged collocation is redirected to the new one, a
    /// connection between two merged collocations is dropped, and so is a redirected
    /// connection that the new group would make invalid. Returns the new collocation's index.
    pub fn join(
        &mut self,
        idxs: &[CollocationIndex],
        new_group: SemanticGroupId,
    ) -> Result<CollocationIndex, LingError> {
        self.check_collocation_idxs(idxs)?;
        let joined: BTreeSet<CollocationIndex> = idxs.iter().copied().collect();
        if joined.len() < 2 {
            return Err(LingError::Validation(format!(
                "join needs at least two distinct collocations, got {idxs:?}"
            )));
        }

        let merged = Collocation::new(
            joined
                .iter()
                .flat_map(|&idx| self.collocations[idx].word_idxs().iter().copied()),
            new_group,
        )?;
        self.collocations.push(merged);
        let new_idx = self.collocations.len() - 1;

        // Rewrite while the old indices still mean something; `remove` compacts afterwards.
        let mut rewritten: Vec<Connection> = Vec::with_capacity(self.connections.len());
        for connection in std::mem::take(&mut self.connections) {
            let redirected = match (
                joined.contains(&connection.predicate_idx),
                joined.contains(&connection.actant_idx),
            ) {
                (true, true) => continue,
                (true, false) => Connection::new(new_idx, connection.actant_idx),
                (false, true) => Connection::new(connection.predicate_idx, new_idx),
                (false, false) => connection,
            };
            if let Err(e) = self.check_connection(&redirected) {
                tracing::warn!("[Sentence.join] dropping connection {connection:?}: {e}");
                continue;
            }
            if !rewritten.contains(&redirected) {
                rewritten.push(redirected);
            }
        }
        self.connections = rewritten;

        let originals: Vec<CollocationIndex> = joined.iter().copied().collect();
        self.remove(&originals)?;
        // Every removed index precedes `new_idx`.
        Ok(new_idx - originals.len())
    }

    /// Group of the collocation holding `word_idx`.
    pub fn word_semantic_group(
        &self,
        word_idx: WordIndex,
    ) -> Result<Option<SemanticGroupId>, LingError> {
        self.check_word_idxs(&[word_idx])?;
        Ok(self
            .collocation_of_word(word_idx)
            .map(|idx| self.collocations[idx].semantic_group))
    }

    /// Drop words from a collocation by their position in its word list.
    ///
    /// Removing every word removes the collocation itself, with the usual connection cascade.
    pub fn remove_words_from_collocation(
        &mut self,
        idx: CollocationIndex,
        positions: &[usize],
    ) -> Result<(), LingError> {
        let collocation = self.collocation(idx)?;
        if let Some(&pos) = positions.iter().find(|&&pos| pos >= collocation.len()) {
            return Err(LingError::out_of_range(
                "collocation word",
                pos,
                collocation.len(),
            ));
        }
        let kept: Vec<WordIndex> = collocation
            .word_idxs()
            .iter()
            .enumerate()
            .filter(|(pos, _)| !positions.contains(pos))
            .map(|(_, &word_idx)| word_idx)
            .collect();
        if kept.is_empty() {
            return self.remove(&[idx]);
        }
        self.collocations[idx].word_idxs = kept;
        Ok(())
    }
}
