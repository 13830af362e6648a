/// [crate::properties] contains the basic building blocks shared by the sentence model, the
/// normalizer and the store: identifiers, parts of speech and the semantic group registry.
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
};

use crate::error::LingError;

/// Position of a word inside [`crate::sentence::Sentence::words`].
pub type WordIndex = usize;
/// Position of a collocation inside [`crate::sentence::Sentence::collocations`].
pub type CollocationIndex = usize;
/// Position of a connection inside [`crate::sentence::Sentence::connections`].
pub type ConnectionIndex = usize;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub const fn new(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(SemanticGroupId, "Row id of a semantic group.");
define_id!(WordId, "Row id of a persisted word form.");
define_id!(CollocationId, "Row id of a persisted (possibly shared) collocation.");
define_id!(ConnectionId, "Row id of a persisted predicate -> actant connection.");
define_id!(SentenceId, "Row id of a persisted sentence.");

/// Part of speech as reported by the morphological analyzer.
///
/// The discriminants are the values stored in the `word.part_of_speech` column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PartOfSpeech {
    #[default]
    None = 0x0,
    Noun = 0x1,
    Adjective = 0x2,
    Comparative = 0x3,
    Verb = 0x4,
    Participle = 0x5,
    Gerund = 0x6,
    Numeral = 0x7,
    Pronoun = 0x8,
    Predicative = 0x9,
    Preposition = 0xA,
    Conjunction = 0xB,
    Particle = 0xC,
    Interjection = 0xD,
    Adverb = 0xE,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 15] = [
        PartOfSpeech::None,
        PartOfSpeech::Noun,
        PartOfSpeech::Adjective,
        PartOfSpeech::Comparative,
        PartOfSpeech::Verb,
        PartOfSpeech::Participle,
        PartOfSpeech::Gerund,
        PartOfSpeech::Numeral,
        PartOfSpeech::Pronoun,
        PartOfSpeech::Predicative,
        PartOfSpeech::Preposition,
        PartOfSpeech::Conjunction,
        PartOfSpeech::Particle,
        PartOfSpeech::Interjection,
        PartOfSpeech::Adverb,
    ];

    /// Map an OpenCorpora grammeme (the tag set used by Russian analyzers such as pymorphy) to
    /// a part of speech. Unknown tags map to [`PartOfSpeech::None`].
    pub fn from_opencorpora_tag(tag: &str) -> PartOfSpeech {
        match tag {
            "NOUN" => PartOfSpeech::Noun,
            "ADJF" | "ADJS" => PartOfSpeech::Adjective,
            "COMP" => PartOfSpeech::Comparative,
            "VERB" | "INFN" => PartOfSpeech::Verb,
            "PRTF" | "PRTS" => PartOfSpeech::Participle,
            "GRND" => PartOfSpeech::Gerund,
            "NUMR" => PartOfSpeech::Numeral,
            "ADVB" => PartOfSpeech::Adverb,
            "NPRO" => PartOfSpeech::Pronoun,
            "PRED" => PartOfSpeech::Predicative,
            "PREP" => PartOfSpeech::Preposition,
            "CONJ" => PartOfSpeech::Conjunction,
            "PRCL" => PartOfSpeech::Particle,
            "INTJ" => PartOfSpeech::Interjection,
            _ => PartOfSpeech::None,
        }
    }

    pub fn as_code(&self) -> i64 {
        *self as u8 as i64
    }
}

impl TryFrom<i64> for PartOfSpeech {
    type Error = LingError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        PartOfSpeech::ALL
            .iter()
            .find(|pos| pos.as_code() == code)
            .copied()
            .ok_or_else(|| LingError::Serialization(format!("Unknown part of speech code {code}")))
    }
}

impl Display for PartOfSpeech {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// An entry of the open, persisted enumeration of semantic roles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SemanticGroup {
    pub id: SemanticGroupId,
    pub name: String,
}

/// In-memory snapshot of the semantic group table. Names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticGroups {
    groups: BTreeMap<SemanticGroupId, SemanticGroup>,
}

impl SemanticGroups {
    pub fn new<I: IntoIterator<Item = SemanticGroup>>(groups: I) -> Result<Self, LingError> {
        let mut set = SemanticGroups::default();
        for group in groups {
            if set.id_by_name(&group.name).is_some() {
                return Err(LingError::Validation(format!(
                    "Semantic group name '{}' is used more than once",
                    group.name
                )));
            }
            set.groups.insert(group.id, group);
        }
        Ok(set)
    }

    pub fn get(&self, id: SemanticGroupId) -> Option<&SemanticGroup> {
        self.groups.get(&id)
    }

    pub fn id_by_name(&self, name: &str) -> Option<SemanticGroupId> {
        self.groups
            .values()
            .find(|group| group.name == name)
            .map(|group| group.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SemanticGroup> {
        self.groups.values()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// <https://en.wikipedia.org/wiki/Web_colors#HTML_color_names>
pub const DEFAULT_PALETTE: [&str; 14] = [
    "silver", "gray", "red", "maroon", "yellow", "olive", "lime", "green", "aqua", "teal", "blue",
    "navy", "fuchsia", "purple",
];

/// Colour for a semantic group: `palette[group_id mod palette.len()]`.
pub fn color_for_group<S: AsRef<str>>(group: SemanticGroupId, palette: &[S]) -> Option<&str> {
    if palette.is_empty() {
        return None;
    }
    let idx = group.0.rem_euclid(palette.len() as i64) as usize;
    Some(palette[idx].as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn part_of_speech_codes_round_trip() {
        for pos in PartOfSpeech::ALL {
            assert_eq!(PartOfSpeech::try_from(pos.as_code()).unwrap(), pos);
        }
        assert!(PartOfSpeech::try_from(0x42).is_err());
    }

    #[test]
    fn opencorpora_tags() {
        assert_eq!(PartOfSpeech::from_opencorpora_tag("INFN"), PartOfSpeech::Verb);
        assert_eq!(PartOfSpeech::from_opencorpora_tag("ADJS"), PartOfSpeech::Adjective);
        assert_eq!(PartOfSpeech::from_opencorpora_tag("LATN"), PartOfSpeech::None);
    }

    #[test]
    fn duplicate_group_names_are_rejected() {
        let groups = vec![
            SemanticGroup { id: SemanticGroupId(1), name: "Предикат".into() },
            SemanticGroup { id: SemanticGroupId(2), name: "Предикат".into() },
        ];
        assert!(matches!(
            SemanticGroups::new(groups),
            Err(LingError::Validation(_))
        ));
    }

    #[test]
    fn palette_wraps_by_group_id() {
        assert_eq!(color_for_group(SemanticGroupId(2), &DEFAULT_PALETTE), Some("red"));
        assert_eq!(color_for_group(SemanticGroupId(16), &DEFAULT_PALETTE), Some("red"));
        assert_eq!(color_for_group::<&str>(SemanticGroupId(1), &[]), None);
    }
}
