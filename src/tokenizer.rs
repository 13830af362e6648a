//! Splits sentence text into alternating word / non-word runs.
//!
//! Offsets count Unicode scalar values (chars) from the start of the *lowercased* text, so a
//! Cyrillic letter advances the offset by one just like an ASCII letter. Interleaving
//! [`Tokens::words`] and [`Tokens::non_words`] by offset reproduces that lowercased text exactly.

use serde::{Deserialize, Serialize};

/// A run of text and the char offset it starts at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub start: usize,
}

impl Fragment {
    /// Char offset one past the last char of the run.
    pub fn end(&self) -> usize {
        self.start + self.text.chars().count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    /// Alphanumeric runs.
    pub words: Vec<Fragment>,
    /// Everything between words: whitespace, punctuation, symbols.
    pub non_words: Vec<Fragment>,
}

impl Tokens {
    /// Interleave words and non-words in offset order.
    pub fn reconstruct(&self) -> String {
        let mut out = String::new();
        for fragment in self.in_order() {
            out.push_str(&fragment.text);
        }
        out
    }

    /// All fragments, words and non-words merged, in text order.
    pub fn in_order(&self) -> impl Iterator<Item = &Fragment> {
        interleave(&self.words, &self.non_words).map(|(_, fragment)| fragment)
    }
}

/// Merge two offset-sorted fragment lists. Yields `(is_word, fragment)`.
pub(crate) fn interleave<'a>(
    words: &'a [Fragment],
    non_words: &'a [Fragment],
) -> impl Iterator<Item = (bool, &'a Fragment)> {
    let mut w = words.iter().peekable();
    let mut n = non_words.iter().peekable();
    std::iter::from_fn(move || match (w.peek(), n.peek()) {
        (Some(word), Some(non_word)) => {
            if word.start < non_word.start {
                w.next().map(|f| (true, f))
            } else {
                n.next().map(|f| (false, f))
            }
        }
        (Some(_), None) => w.next().map(|f| (true, f)),
        (None, Some(_)) => n.next().map(|f| (false, f)),
        (None, None) => None,
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Tokenize `text`. Any input is valid; text without alphanumeric characters yields no words.
pub fn tokenize(text: &str) -> Tokens {
    let lowered = text.to_lowercase();
    let mut tokens = Tokens::default();

    let mut run = String::new();
    let mut run_start = 0usize;
    let mut run_is_word: Option<bool> = None;
    for (offset, c) in lowered.chars().enumerate() {
        let is_word = is_word_char(c);
        if let Some(current) = run_is_word {
            if current != is_word {
                push_run(&mut tokens, std::mem::take(&mut run), run_start, current);
                run_start = offset;
            }
        }
        run_is_word = Some(is_word);
        run.push(c);
    }
    if let Some(current) = run_is_word {
        push_run(&mut tokens, run, run_start, current);
    }

    tracing::debug!(
        "[tokenize] {} words, {} non-word fragments",
        tokens.words.len(),
        tokens.non_words.len()
    );
    tokens
}

fn push_run(tokens: &mut Tokens, text: String, start: usize, is_word: bool) {
    let fragment = Fragment { text, start };
    if is_word {
        tokens.words.push(fragment);
    } else {
        tokens.non_words.push(fragment);
    }
}


#[cfg(test)]
mod proptests {
    use crate::tokenizer::{interleave, tokenize};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn reconstructs_lowercased_text(text in "\\PC{0,64}") {
            let tokens = tokenize(&text);
            prop_assert_eq!(tokens.reconstruct(), text.to_lowercase());
        }

        #[test]
        fn runs_alternate(text in "[a-zA-Zа-яА-Я0-9 ,.!?-]{0,48}") {
            let tokens = tokenize(&text);
            let kinds: Vec<bool> = interleave(&tokens.words, &tokens.non_words)
                .map(|(is_word, _)| is_word)
                .collect();
            for pair in kinds.windows(2) {
                prop_assert_ne!(pair[0], pair[1]);
            }
        }
    }
}
