// ============================================================
// Layer 4 — Vocabulary and Sequence Decoding
// ============================================================
// Turns batches of token-id sequences produced by a sequence
// model back into readable sentences.
//
// Sequence layout:  [BOS] w_1 … w_n [EOS] [PAD] …
//
// Everything after the first EOS is ignored. BOS and EOS are
// dropped and the remaining ids are mapped to words and joined
// with single spaces.

use anyhow::{Context, Result};
use std::collections::HashMap;

/// Token id that terminates a sequence
pub const EOS_ID: usize = 1;

/// Id ↔ word mapping
#[derive(Debug, Clone, Default)]
pub struct Vocab {
    words: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocab {
    /// Build a vocabulary where word `i` of `words` has id `i`.
    pub fn new(words: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        let index = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i))
            .collect();
        Self { words, index }
    }

    /// Word for an id
    pub fn itow(&self, id: usize) -> Option<&str> {
        self.words.get(id).map(String::as_str)
    }

    /// Id for a word
    pub fn wtoi(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Decode every sequence in `batch` into a sentence.
pub fn seq_to_sentences(batch: &[Vec<usize>], vocab: &Vocab) -> Result<Vec<String>> {
    batch
        .iter()
        .enumerate()
        .map(|(n, seq)| -> Result<String> {
            let eos = seq
                .iter()
                .position(|&t| t == EOS_ID)
                .with_context(|| format!("sequence {n} has no end-of-sequence token"))?;

            // Skip BOS at 0, stop before EOS
            let body = if eos == 0 { &[][..] } else { &seq[1..eos] };

            let words = body
                .iter()
                .map(|&id| {
                    vocab
                        .itow(id)
                        .with_context(|| format!("sequence {n}: token {id} is not in the vocabulary"))
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(words.join(" "))
        })
        .collect()
}
