//! Tokenization, stop-word classification and lemmatization.
//!
//! The engine only talks to the [`Linguistics`] trait. [`EnglishLinguistics`] is the
//! built-in implementation: Unicode word segmentation, the NLTK English stop-word list
//! and a suffix-rule noun lemmatizer backed by an irregular-plural table.

use crate::error::{FaqError, Result};
use log::info;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

/// Linguistic capability consumed by the normalizer.
///
/// Holding a value of this type is the precondition for normalizing text: resources are
/// loaded once up front and never fetched lazily.
pub trait Linguistics: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
    fn lemmatize(&self, token: &str) -> String;
    fn is_stopword(&self, token: &str) -> bool;
}

/// NLTK English stop-word list. Contracted forms are omitted because apostrophes are
/// stripped before lookup.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("people", "person"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("series", "series"),
    ("species", "species"),
    ("news", "news"),
];

/// Endings that look plural but belong to singular nouns.
const SINGULAR_ENDINGS: &[&str] = &["ss", "us", "is", "ous"];

const MIN_LEMMA_LEN: usize = 3;

pub struct EnglishLinguistics {
    stopwords: HashSet<String>,
    irregular: HashMap<&'static str, &'static str>,
}

impl EnglishLinguistics {
    /// Built-in resources only.
    pub fn new() -> Self {
        Self {
            stopwords: ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect(),
            irregular: IRREGULAR_PLURALS.iter().copied().collect(),
        }
    }

    /// Built-in resources plus an optional stop-word file (one word per line, `#` comments).
    pub fn load(extra_stopwords: Option<&Path>) -> Result<Self> {
        let mut linguistics = Self::new();
        if let Some(path) = extra_stopwords {
            let contents = fs::read_to_string(path).map_err(|e| {
                FaqError::Linguistics(format!(
                    "failed to read stop-word file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            let before = linguistics.stopwords.len();
            linguistics.stopwords.extend(
                contents
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty() && !line.starts_with('#'))
                    .map(str::to_lowercase),
            );
            info!(
                "Loaded {} additional stop-words from {}",
                linguistics.stopwords.len() - before,
                path.display()
            );
        }
        Ok(linguistics)
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    fn strip_plural(token: &str) -> Option<String> {
        if SINGULAR_ENDINGS.iter().any(|ending| token.ends_with(ending)) {
            return None;
        }
        if let Some(stem) = token.strip_suffix("ies") {
            if stem.len() >= 2 {
                return Some(format!("{}y", stem));
            }
        }
        for (suffix, replacement) in [
            ("sses", "ss"),
            ("ches", "ch"),
            ("shes", "sh"),
            ("xes", "x"),
        ] {
            if let Some(stem) = token.strip_suffix(suffix) {
                if stem.len() + replacement.len() >= MIN_LEMMA_LEN {
                    return Some(format!("{}{}", stem, replacement));
                }
            }
        }
        token
            .strip_suffix('s')
            .filter(|stem| stem.len() >= MIN_LEMMA_LEN)
            .map(str::to_string)
    }
}

impl Default for EnglishLinguistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Linguistics for EnglishLinguistics {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words().map(str::to_string).collect()
    }

    fn lemmatize(&self, token: &str) -> String {
        if let Some(lemma) = self.irregular.get(token) {
            return (*lemma).to_string();
        }
        // A lemma that lands on a function word ("whats" -> "what") is not a noun plural.
        match Self::strip_plural(token).filter(|stem| !self.is_stopword(stem)) {
            // Possessive irregulars ("childrens") strip down to another irregular form.
            Some(stem) => match self.irregular.get(stem.as_str()) {
                Some(lemma) => (*lemma).to_string(),
                None => stem,
            },
            None => token.to_string(),
        }
    }

    fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn tokenizes_on_word_boundaries() {
        let linguistics = EnglishLinguistics::new();
        assert_eq!(
            linguistics.tokenize("how long  does\tshipping\ntake"),
            vec!["how", "long", "does", "shipping", "take"]
        );
        assert!(linguistics.tokenize("   ").is_empty());
    }

    #[test]
    fn lemmatizes_regular_plurals() {
        let linguistics = EnglishLinguistics::new();
        assert_eq!(linguistics.lemmatize("products"), "product");
        assert_eq!(linguistics.lemmatize("policies"), "policy");
        assert_eq!(linguistics.lemmatize("addresses"), "address");
        assert_eq!(linguistics.lemmatize("boxes"), "box");
        assert_eq!(linguistics.lemmatize("churches"), "church");
        assert_eq!(linguistics.lemmatize("cases"), "case");
        assert_eq!(linguistics.lemmatize("sizes"), "size");
        assert_eq!(linguistics.lemmatize("prizes"), "prize");
    }

    #[test]
    fn keeps_singular_lookalikes() {
        let linguistics = EnglishLinguistics::new();
        assert_eq!(linguistics.lemmatize("address"), "address");
        assert_eq!(linguistics.lemmatize("status"), "status");
        assert_eq!(linguistics.lemmatize("analysis"), "analysis");
        assert_eq!(linguistics.lemmatize("generous"), "generous");
        assert_eq!(linguistics.lemmatize("yes"), "yes");
        assert_eq!(linguistics.lemmatize("shipping"), "shipping");
    }

    #[test]
    fn lemmatizes_irregular_plurals() {
        let linguistics = EnglishLinguistics::new();
        assert_eq!(linguistics.lemmatize("children"), "child");
        assert_eq!(linguistics.lemmatize("people"), "person");
        assert_eq!(linguistics.lemmatize("news"), "news");
    }

    #[test]
    fn lemmatizes_possessive_irregular_plurals() {
        let linguistics = EnglishLinguistics::new();
        assert_eq!(linguistics.lemmatize("childrens"), "child");
        assert_eq!(linguistics.lemmatize("womens"), "woman");
        assert_eq!(linguistics.lemmatize("mens"), "man");
        assert_eq!(linguistics.lemmatize("peoples"), "person");
    }

    #[test]
    fn never_lemmatizes_into_a_stopword() {
        let linguistics = EnglishLinguistics::new();
        assert_eq!(linguistics.lemmatize("whats"), "whats");
        assert_eq!(linguistics.lemmatize("thems"), "thems");
    }

    #[test]
    fn lemmas_are_fixed_points() {
        let linguistics = EnglishLinguistics::new();
        for word in [
            "products", "policies", "addresses", "discounts", "methods", "warranties",
            "students", "items", "children", "glasses", "ties", "childrens", "womens",
            "mens", "peoples", "feets",
        ] {
            let lemma = linguistics.lemmatize(word);
            assert_eq!(linguistics.lemmatize(&lemma), lemma, "lemma of {word}");
        }
    }

    #[test]
    fn recognizes_stopwords() {
        let linguistics = EnglishLinguistics::new();
        for word in ["what", "is", "your", "how", "does", "the"] {
            assert!(linguistics.is_stopword(word), "{word} should be a stop-word");
        }
        assert!(!linguistics.is_stopword("return"));
        assert!(!linguistics.is_stopword("like"));
    }

    #[test]
    fn loads_extra_stopwords_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "# store specific\nplease\n\n  Kindly  ").expect("write stop-words");

        let linguistics = EnglishLinguistics::load(Some(file.path())).expect("load stop-words");
        assert!(linguistics.is_stopword("please"));
        assert!(linguistics.is_stopword("kindly"));
        assert!(!linguistics.is_stopword("# store specific"));
        assert_eq!(linguistics.stopword_count(), ENGLISH_STOPWORDS.len() + 2);
    }

    #[test]
    fn missing_stopword_file_is_a_startup_failure() {
        let result = EnglishLinguistics::load(Some(Path::new("/nonexistent/stopwords.txt")));
        assert!(matches!(result, Err(FaqError::Linguistics(_))));
    }
}
