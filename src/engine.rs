//! The question-answering engine: normalizer, vector model, corpus index and matcher
//! wired together behind `ask`.
//!
//! An engine is built once from a knowledge base and is read-only afterwards, so a single
//! instance can be shared across threads and queried concurrently without locking.

use crate::config::{validate_threshold, EngineConfig};
use crate::corpus::CorpusIndex;
use crate::error::Result;
use crate::knowledge::{builtin_knowledge_base, KnowledgeEntry};
use crate::knowledge_loader::KnowledgeLoader;
use crate::linguistics::Linguistics;
use crate::matcher::{MatchResult, Matcher};
use crate::normalizer::Normalizer;
use crate::response::{Response, ResponseAssembler};
use crate::vectorizer::VocabularyModel;
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;

pub struct FaqEngine {
    normalizer: Normalizer,
    corpus: CorpusIndex,
    assembler: ResponseAssembler,
    similarity_threshold: f64,
}

impl FaqEngine {
    /// Build the vocabulary and corpus vectors for `knowledge_base`.
    ///
    /// `linguistics` must already be loaded; the engine never fetches resources itself.
    pub fn new(
        knowledge_base: Vec<KnowledgeEntry>,
        config: EngineConfig,
        linguistics: Arc<dyn Linguistics>,
    ) -> Result<Self> {
        config.validate()?;

        let normalizer = Normalizer::new(linguistics, config.min_token_len);
        let corpus = CorpusIndex::build(knowledge_base, &normalizer)?;

        Ok(Self {
            normalizer,
            corpus,
            assembler: ResponseAssembler::new(config.fallback_message),
            similarity_threshold: config.similarity_threshold,
        })
    }

    /// Build from a knowledge base file, or from the built-in FAQ when `knowledge_path` is
    /// `None`.
    pub fn from_source(
        knowledge_path: Option<&Path>,
        config: EngineConfig,
        linguistics: Arc<dyn Linguistics>,
    ) -> Result<Self> {
        let entries = match knowledge_path {
            Some(path) => KnowledgeLoader::new().load_from_path(path)?.entries,
            None => {
                info!("Using built-in knowledge base");
                builtin_knowledge_base()
            }
        };
        Self::new(entries, config, linguistics)
    }

    /// Answer `question` using the configured threshold.
    pub fn ask(&self, question: &str) -> Response {
        self.assembler
            .assemble(self.find_best_match(question, self.similarity_threshold))
    }

    /// Answer `question` with a one-off threshold. Invalid thresholds are clamped into
    /// `[0, 1]`; NaN is treated as the configured threshold.
    pub fn ask_with_threshold(&self, question: &str, threshold: f64) -> Response {
        let threshold = if validate_threshold(threshold).is_ok() {
            threshold
        } else if threshold.is_nan() {
            self.similarity_threshold
        } else {
            threshold.clamp(0.0, 1.0)
        };
        self.assembler
            .assemble(self.find_best_match(question, threshold))
    }

    pub fn find_best_match(&self, question: &str, threshold: f64) -> MatchResult {
        let tokens = self.normalizer.normalize(question);
        let query = self.corpus.model().vectorize(&tokens);
        debug!(
            "Query {:?} normalized to {:?} ({} of {} tokens in vocabulary)",
            question,
            tokens,
            query.entries().len(),
            tokens.len()
        );
        Matcher::match_vector(&self.corpus, &query, threshold)
    }

    pub fn normalize(&self, text: &str) -> Vec<String> {
        self.normalizer.normalize(text)
    }

    pub fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold
    }

    pub fn fallback_message(&self) -> &str {
        self.assembler.fallback_message()
    }

    pub fn knowledge_base(&self) -> &[KnowledgeEntry] {
        self.corpus.entries()
    }

    pub fn vocabulary(&self) -> &VocabularyModel {
        self.corpus.model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FaqError;
    use crate::linguistics::EnglishLinguistics;
    use std::path::PathBuf;

    fn linguistics() -> Arc<dyn Linguistics> {
        Arc::new(EnglishLinguistics::new())
    }

    fn two_entry_base() -> Vec<KnowledgeEntry> {
        vec![
            KnowledgeEntry::new(
                "What is your return policy?",
                "We offer a 30-day return policy.",
            )
            .with_category("returns"),
            KnowledgeEntry::new(
                "How long does shipping take?",
                "Standard shipping takes 5-7 business days.",
            )
            .with_category("shipping"),
        ]
    }

    fn builtin_engine() -> FaqEngine {
        FaqEngine::new(builtin_knowledge_base(), EngineConfig::default(), linguistics())
            .expect("engine builds")
    }

    fn engine_with_threshold(threshold: f64) -> FaqEngine {
        FaqEngine::new(
            two_entry_base(),
            EngineConfig::default().with_threshold(threshold),
            linguistics(),
        )
        .expect("engine builds")
    }

    #[test]
    fn exact_question_matches_with_high_confidence() {
        let response = engine_with_threshold(0.3).ask("What is your return policy?");
        assert!(!response.is_fallback);
        assert_eq!(
            response.matched_question.as_deref(),
            Some("What is your return policy?")
        );
        assert_eq!(response.matched_category.as_deref(), Some("returns"));
        assert!(response.confidence_percent >= 90.0);
    }

    #[test]
    fn shared_lemma_matches_with_partial_confidence() {
        let response = engine_with_threshold(0.3).ask("How do I return a product?");
        assert_eq!(
            response.matched_question.as_deref(),
            Some("What is your return policy?")
        );
        assert!(response.confidence_percent > 30.0);
        assert!(response.confidence_percent < 90.0);
        assert_eq!(response.confidence_percent, 70.71);
    }

    #[test]
    fn unrelated_question_falls_back() {
        let engine = engine_with_threshold(0.3);
        let response = engine.ask("What's the weather like?");
        assert!(response.is_fallback);
        assert_eq!(response.answer, engine.fallback_message());
        assert!(response.matched_question.is_none());
        assert!(response.matched_category.is_none());
        assert!(response.confidence_percent < 1.0);
    }

    #[test]
    fn empty_question_falls_back_with_zero_confidence() {
        let engine = engine_with_threshold(0.3);
        for question in ["", "   ", "\n\t", "?!"] {
            let response = engine.ask(question);
            assert!(response.is_fallback);
            assert_eq!(response.confidence_percent, 0.0);
        }
    }

    #[test]
    fn non_ascii_and_oversized_questions_fall_back() {
        let engine = engine_with_threshold(0.3);
        let long_question = "lorem ipsum dolor ".repeat(20_000);
        for question in [
            "¿Dónde está mi pedido?",
            "配送にはどのくらい時間がかかりますか",
            "🚚📦❓",
            "\u{200B}\u{FEFF}",
            long_question.as_str(),
        ] {
            let response = engine.ask(question);
            let preview: String = question.chars().take(40).collect();
            assert!(response.is_fallback, "{preview:?} should fall back");
            assert_eq!(response.answer, engine.fallback_message());
            assert_eq!(response.confidence_percent, 0.0);
        }
    }

    #[test]
    fn possessive_plural_matches_the_plain_question() {
        let engine = FaqEngine::new(
            vec![
                KnowledgeEntry::new("Do you sell children shoes?", "Yes, sizes 1 to 13."),
                KnowledgeEntry::new("How do I track my order?", "Use the tracking link."),
            ],
            EngineConfig::default(),
            linguistics(),
        )
        .expect("engine builds");

        let response = engine.ask("children's");
        assert!(!response.is_fallback);
        assert_eq!(
            response.matched_question.as_deref(),
            Some("Do you sell children shoes?")
        );
        assert_eq!(engine.ask("children's shoes"), engine.ask("children shoes"));
    }

    #[test]
    fn raising_threshold_flips_partial_match_to_fallback() {
        let question = "How do I return a product?";
        assert!(!engine_with_threshold(0.3).ask(question).is_fallback);

        let strict = engine_with_threshold(0.9).ask(question);
        assert!(strict.is_fallback);
        assert_eq!(strict.confidence_percent, 70.71);
    }

    #[test]
    fn threshold_is_monotonic() {
        let engine = builtin_engine();
        let thresholds = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];
        for question in [
            "How can I send back my order?",
            "payment",
            "Where is my package?",
            "Tell me a joke",
        ] {
            let mut rejected = false;
            for threshold in thresholds {
                let response = engine.ask_with_threshold(question, threshold);
                if rejected {
                    assert!(response.is_fallback, "{question:?} re-accepted at {threshold}");
                }
                rejected |= response.is_fallback;
            }
        }
    }

    #[test]
    fn every_entry_matches_itself() {
        let engine = builtin_engine();
        for entry in builtin_knowledge_base() {
            let response = engine.ask(&entry.question);
            assert_eq!(
                response.matched_question.as_deref(),
                Some(entry.question.as_str())
            );
            assert_eq!(response.confidence_percent, 100.0);
            assert_eq!(response.matched_category, entry.category);
        }
    }

    #[test]
    fn answers_are_deterministic() {
        let engine = builtin_engine();
        for question in ["Do you ship to Canada?", "warranty", "", "reset password please"] {
            let first = engine.ask(question);
            let second = engine.ask(question);
            assert_eq!(first, second);
            assert_eq!(
                first.confidence_percent.to_bits(),
                second.confidence_percent.to_bits()
            );
        }
    }

    #[test]
    fn concurrent_queries_agree_with_sequential_ones() {
        let engine = builtin_engine();
        let questions = [
            "How long does shipping take?",
            "Can I get a discount as a student?",
            "What is machine learning?",
        ];
        let expected: Vec<Response> = questions.iter().map(|q| engine.ask(q)).collect();

        let engine = &engine;
        std::thread::scope(|scope| {
            let handles: Vec<_> = questions
                .iter()
                .map(|q| scope.spawn(move || engine.ask(q)))
                .collect();
            for (handle, expected) in handles.into_iter().zip(&expected) {
                assert_eq!(&handle.join().expect("query thread"), expected);
            }
        });
    }

    #[test]
    fn out_of_vocabulary_tokens_do_not_change_scores() {
        let engine = engine_with_threshold(0.3);
        let plain = engine.ask("return policy");
        let noisy = engine.ask("return policy zebra quantum");
        assert_eq!(plain, noisy);
        assert_eq!(engine.vocabulary().term_count(), 5);
    }

    #[test]
    fn invalid_thresholds_are_clamped_per_query() {
        let engine = engine_with_threshold(0.3);
        assert!(engine
            .ask_with_threshold("How do I return a product?", 7.0)
            .is_fallback);
        assert!(!engine
            .ask_with_threshold("How do I return a product?", f64::NAN)
            .is_fallback);
    }

    #[test]
    fn construction_failures_are_reported() {
        assert!(matches!(
            FaqEngine::new(Vec::new(), EngineConfig::default(), linguistics()),
            Err(FaqError::EmptyKnowledgeBase)
        ));
        assert!(matches!(
            FaqEngine::new(
                vec![KnowledgeEntry::new("Is it?", "Yes.")],
                EngineConfig::default(),
                linguistics()
            ),
            Err(FaqError::EmptyVocabulary { .. })
        ));
        assert!(matches!(
            FaqEngine::new(
                two_entry_base(),
                EngineConfig::default().with_threshold(1.2),
                linguistics()
            ),
            Err(FaqError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn builds_from_file_or_builtin_source() {
        let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test_data")
            .join("faq.json");
        let from_file =
            FaqEngine::from_source(Some(fixture.as_path()), EngineConfig::default(), linguistics())
                .expect("engine builds from fixture");
        assert_eq!(from_file.knowledge_base().len(), 10);

        let builtin = FaqEngine::from_source(None, EngineConfig::default(), linguistics())
            .expect("engine builds from built-in data");
        assert_eq!(builtin.knowledge_base().len(), 15);
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FaqEngine>();
    }
}
