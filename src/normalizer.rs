use crate::linguistics::Linguistics;
use std::sync::Arc;

/// Turns free text into the canonical token sequence the vector model is built on.
#[derive(Clone)]
pub struct Normalizer {
    linguistics: Arc<dyn Linguistics>,
    min_token_len: usize,
}

impl Normalizer {
    pub fn new(linguistics: Arc<dyn Linguistics>, min_token_len: usize) -> Self {
        Self {
            linguistics,
            min_token_len,
        }
    }

    /// Lowercase, strip everything but ASCII letters and whitespace, tokenize, drop
    /// stop-words and short tokens, then lemmatize. Repeated tokens are kept so term
    /// frequency survives. Never fails; the worst case is an empty sequence.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let cleaned = strip_non_letters(&text.to_lowercase());

        self.linguistics
            .tokenize(&cleaned)
            .into_iter()
            .filter(|token| {
                token.len() >= self.min_token_len && !self.linguistics.is_stopword(token)
            })
            .map(|token| self.linguistics.lemmatize(&token))
            .collect()
    }

    /// Normalized tokens joined by single spaces.
    pub fn normalize_to_text(&self, text: &str) -> String {
        self.normalize(text).join(" ")
    }
}

fn strip_non_letters(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect()
}
