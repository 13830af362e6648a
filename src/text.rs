//! Splitting a free text into the sentences that get annotated one at a time.

use serde::{Deserialize, Serialize};

pub const SENTENCE_END_MARKERS: [char; 3] = ['.', '!', '?'];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSentence {
    /// Trimmed sentence text with whitespace runs collapsed to single spaces.
    pub text: String,
    /// Char offset in the source text where the sentence's slice begins.
    pub start: usize,
}

/// Cut `text` at sentence end markers. The marker itself is dropped; empty pieces are skipped.
pub fn split_sentences(text: &str) -> Vec<TextSentence> {
    let mut sentences = Vec::new();
    let mut piece = String::new();
    let mut piece_start = 0usize;

    for (offset, c) in text.chars().enumerate() {
        if SENTENCE_END_MARKERS.contains(&c) {
            push_piece(&mut sentences, &piece, piece_start);
            piece.clear();
            piece_start = offset + 1;
        } else {
            piece.push(c);
        }
    }
    push_piece(&mut sentences, &piece, piece_start);
    sentences
}

fn push_piece(sentences: &mut Vec<TextSentence>, piece: &str, start: usize) {
    let collapsed = piece.split_whitespace().collect::<Vec<&str>>().join(" ");
    if !collapsed.is_empty() {
        sentences.push(TextSentence {
            text: collapsed,
            start,
        });
    }
}

/// Index of the sentence a cursor (char offset into the source text) falls into.
pub fn sentence_index_at(sentences: &[TextSentence], cursor: usize) -> Option<usize> {
    if sentences.is_empty() {
        tracing::warn!("[sentence_index_at] no sentences to search");
        return None;
    }
    let idx = sentences
        .windows(2)
        .position(|pair| pair[0].start <= cursor && cursor < pair[1].start)
        .unwrap_or(sentences.len() - 1);
    Some(idx)
}
