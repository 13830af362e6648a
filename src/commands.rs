use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{
    error::LingError,
    properties::{CollocationIndex, ConnectionIndex, SemanticGroupId, WordIndex},
    sentence::{DefaultConnections, Sentence, TagOutcome},
};

/// Edit command interface between an annotation front end and a [`Sentence`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    /// Group the unassigned words among the given indices
    Tag(Vec<WordIndex>, SemanticGroupId),
    /// Group the unassigned words overlapping a `[start, end)` char range
    TagRange(usize, usize, SemanticGroupId),
    Retag(CollocationIndex, SemanticGroupId),
    Remove(Vec<CollocationIndex>),
    Join(Vec<CollocationIndex>, SemanticGroupId),
    /// Drop words from a collocation by their position inside it
    RemoveWords(CollocationIndex, Vec<usize>),
    Connect(CollocationIndex, CollocationIndex),
    DefaultConnections,
    DeleteConnections(Vec<ConnectionIndex>),
}

fn join_idxs(idxs: &[usize]) -> String {
    idxs.iter()
        .map(|idx| idx.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

impl Display for Op {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Op::Tag(words, group) => write!(f, "Tag([{}] as {})", join_idxs(words), group),
            Op::TagRange(start, end, group) => {
                write!(f, "TagRange({}..{} as {})", start, end, group)
            }
            Op::Retag(idx, group) => write!(f, "Retag({} as {})", idx, group),
            Op::Remove(idxs) => write!(f, "Remove([{}])", join_idxs(idxs)),
            Op::Join(idxs, group) => write!(f, "Join([{}] as {})", join_idxs(idxs), group),
            Op::RemoveWords(idx, positions) => {
                write!(f, "RemoveWords({}: [{}])", idx, join_idxs(positions))
            }
            Op::Connect(p, a) => write!(f, "Connect({} -> {})", p, a),
            Op::DefaultConnections => write!(f, "DefaultConnections"),
            Op::DeleteConnections(idxs) => write!(f, "DeleteConnections([{}])", join_idxs(idxs)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpResult {
    Ok,
    Tagged(TagOutcome),
    Joined(CollocationIndex),
    Connected(ConnectionIndex),
    DefaultConnections(DefaultConnections),
}

impl Sentence {
    /// Dispatch one edit command.
    pub fn apply(&mut self, op: &Op) -> Result<OpResult, LingError> {
        tracing::debug!("[Sentence.apply] {op}");
        let result = match op {
            Op::Tag(words, group) => OpResult::Tagged(self.tag(words, *group)?),
            Op::TagRange(start, end, group) => {
                OpResult::Tagged(self.tag_text_range(*start, *end, *group)?)
            }
            Op::Retag(idx, group) => {
                self.retag(*idx, *group)?;
                OpResult::Ok
            }
            Op::Remove(idxs) => {
                self.remove(idxs)?;
                OpResult::Ok
            }
            Op::Join(idxs, group) => OpResult::Joined(self.join(idxs, *group)?),
            Op::RemoveWords(idx, positions) => {
                self.remove_words_from_collocation(*idx, positions)?;
                OpResult::Ok
            }
            Op::Connect(p, a) => OpResult::Connected(self.make_connection(*p, *a)?),
            Op::DefaultConnections => {
                OpResult::DefaultConnections(self.make_default_connections())
            }
            Op::DeleteConnections(idxs) => {
                self.delete_connections(idxs)?;
                OpResult::Ok
            }
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::helpers::{pilot_sentence, INSTRUMENT, OBJECT, PREDICATE};
    use test_log::test;

    #[test]
    fn ops_dispatch_to_sentence_edits() {
        let mut sentence = Sentence::new("Летчик пилотировал самолет", PREDICATE);
        let script = vec![
            Op::TagRange(7, 18, PREDICATE),
            Op::Tag(vec![2], OBJECT),
            Op::DefaultConnections,
            Op::Tag(vec![0], INSTRUMENT),
            Op::Connect(0, 2),
            Op::Retag(2, OBJECT),
            Op::Join(vec![1, 2], OBJECT),
        ];
        let results: Vec<OpResult> = script
            .iter()
            .map(|op| sentence.apply(op).unwrap())
            .collect();
        assert_eq!(
            results,
            vec![
                OpResult::Tagged(TagOutcome::Created(0)),
                OpResult::Tagged(TagOutcome::Created(1)),
                OpResult::DefaultConnections(DefaultConnections::Created(1)),
                OpResult::Tagged(TagOutcome::Created(2)),
                OpResult::Connected(1),
                OpResult::Ok,
                OpResult::Joined(1),
            ]
        );
        assert_eq!(sentence.connections().len(), 1);
        sentence.check_invariants().unwrap();
    }

    #[test]
    fn failed_ops_surface_errors() {
        let mut sentence = pilot_sentence();
        assert!(sentence.apply(&Op::Join(vec![0], OBJECT)).is_err());
        assert!(sentence.apply(&Op::DeleteConnections(vec![0])).is_err());
        assert_eq!(
            sentence.apply(&Op::RemoveWords(0, vec![0])).unwrap(),
            OpResult::Ok
        );
        assert_eq!(sentence.collocations().len(), 2);
    }

    #[test]
    fn ops_serialize_and_display() {
        let op = Op::Join(vec![0, 2], OBJECT);
        let json = serde_json::to_string(&op).unwrap();
        assert_eq!(serde_json::from_str::<Op>(&json).unwrap(), op);
        assert_eq!(op.to_string(), "Join([0, 2] as 2)");
    }
}
