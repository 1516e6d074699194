use crate::corpus::CorpusIndex;
use crate::vectorizer::DocumentVector;
use log::debug;
use rayon::prelude::*;

/// Raw outcome of scoring one query against the corpus.
///
/// `confidence` is the best cosine similarity even when the match was rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub answer: Option<String>,
    pub confidence: f64,
    pub matched_question: Option<String>,
    pub matched_category: Option<String>,
}

impl MatchResult {
    pub fn fallback(confidence: f64) -> Self {
        Self {
            answer: None,
            confidence,
            matched_question: None,
            matched_category: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.answer.is_some()
    }
}

pub struct Matcher;

impl Matcher {
    /// Cosine similarity of `query` against every corpus vector, in corpus order.
    pub fn score_all(corpus: &CorpusIndex, query: &DocumentVector) -> Vec<f64> {
        corpus
            .vectors()
            .par_iter()
            .map(|vector| query.cosine(vector))
            .collect()
    }

    /// Index and score of the highest similarity. The earliest entry wins ties.
    pub fn best(scores: &[f64]) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (index, &score) in scores.iter().enumerate() {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((index, score)),
            }
        }
        best
    }

    /// Accept the best-scoring entry if it reaches `threshold`, otherwise fall back while
    /// still reporting the near-miss score.
    pub fn match_vector(
        corpus: &CorpusIndex,
        query: &DocumentVector,
        threshold: f64,
    ) -> MatchResult {
        let scores = Self::score_all(corpus, query);
        let Some((index, score)) = Self::best(&scores) else {
            return MatchResult::fallback(0.0);
        };

        match corpus.entry(index) {
            Some(entry) if score >= threshold => {
                debug!(
                    "Accepted entry {} ({:?}) with similarity {:.4} >= {:.4}",
                    index, entry.question, score, threshold
                );
                MatchResult {
                    answer: Some(entry.answer.clone()),
                    confidence: score,
                    matched_question: Some(entry.question.clone()),
                    matched_category: entry.category.clone(),
                }
            }
            _ => {
                debug!(
                    "Best similarity {:.4} (entry {}) below threshold {:.4}",
                    score, index, threshold
                );
                MatchResult::fallback(score)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeEntry;
    use crate::linguistics::EnglishLinguistics;
    use crate::normalizer::Normalizer;
    use std::sync::Arc;

    fn normalizer() -> Normalizer {
        Normalizer::new(Arc::new(EnglishLinguistics::new()), 3)
    }

    #[test]
    fn best_prefers_lowest_index_on_ties() {
        assert_eq!(Matcher::best(&[0.5, 0.9, 0.9, 0.1]), Some((1, 0.9)));
        assert_eq!(Matcher::best(&[0.0, 0.0]), Some((0, 0.0)));
        assert_eq!(Matcher::best(&[]), None);
    }

    #[test]
    fn duplicate_questions_resolve_to_first_entry() {
        let normalizer = normalizer();
        let corpus = CorpusIndex::build(
            vec![
                KnowledgeEntry::new("Track my order", "first"),
                KnowledgeEntry::new("Track my order", "second"),
            ],
            &normalizer,
        )
        .expect("index builds");
        let query = corpus.model().vectorize(&normalizer.normalize("track order"));

        let result = Matcher::match_vector(&corpus, &query, 0.3);
        assert_eq!(result.answer.as_deref(), Some("first"));
    }

    #[test]
    fn rejected_match_keeps_near_miss_score() {
        let normalizer = normalizer();
        let corpus = CorpusIndex::build(
            vec![
                KnowledgeEntry::new("What is your return policy?", "30 days."),
                KnowledgeEntry::new("How long does shipping take?", "5-7 days."),
            ],
            &normalizer,
        )
        .expect("index builds");
        let query = corpus
            .model()
            .vectorize(&normalizer.normalize("How do I return a product?"));

        let result = Matcher::match_vector(&corpus, &query, 0.9);
        assert!(!result.is_match());
        assert!(result.matched_question.is_none());
        assert!(result.matched_category.is_none());
        assert!((result.confidence - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn zero_query_never_matches_positive_threshold() {
        let normalizer = normalizer();
        let corpus = CorpusIndex::build(
            vec![KnowledgeEntry::new("What is your return policy?", "30 days.")],
            &normalizer,
        )
        .expect("index builds");
        let query = DocumentVector::zero(corpus.model().term_count());

        let result = Matcher::match_vector(&corpus, &query, 0.01);
        assert_eq!(result, MatchResult::fallback(0.0));
    }
}
