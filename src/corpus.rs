use crate::error::{FaqError, Result};
use crate::knowledge::KnowledgeEntry;
use crate::normalizer::Normalizer;
use crate::vectorizer::{DocumentVector, VocabularyModel};
use log::{info, warn};
use rayon::prelude::*;

/// Knowledge entries paired with their precomputed question vectors, in knowledge-base order.
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    entries: Vec<KnowledgeEntry>,
    vectors: Vec<DocumentVector>,
    model: VocabularyModel,
}

impl CorpusIndex {
    /// Normalize every question, fit the vocabulary on them and vectorize each one.
    ///
    /// Fails when there is nothing to match against: no entries, or no entry leaves a
    /// single usable term after normalization.
    pub fn build(entries: Vec<KnowledgeEntry>, normalizer: &Normalizer) -> Result<Self> {
        if entries.is_empty() {
            return Err(FaqError::EmptyKnowledgeBase);
        }

        let documents: Vec<Vec<String>> = entries
            .par_iter()
            .map(|entry| normalizer.normalize(&entry.question))
            .collect();

        for (entry, tokens) in entries.iter().zip(&documents) {
            if tokens.is_empty() {
                warn!(
                    "Knowledge entry {:?} has no usable terms and can never be matched",
                    entry.question
                );
            }
        }

        let model = VocabularyModel::build(&documents);
        if model.term_count() == 0 {
            return Err(FaqError::EmptyVocabulary {
                entries: entries.len(),
            });
        }

        let vectors: Vec<DocumentVector> = documents
            .par_iter()
            .map(|tokens| model.vectorize(tokens))
            .collect();

        info!(
            "Indexed {} knowledge entries over {} terms",
            entries.len(),
            model.term_count()
        );

        Ok(Self {
            entries,
            vectors,
            model,
        })
    }

    pub fn model(&self) -> &VocabularyModel {
        &self.model
    }

    pub fn entry(&self, index: usize) -> Option<&KnowledgeEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn vectors(&self) -> &[DocumentVector] {
        &self.vectors
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KnowledgeEntry, &DocumentVector)> {
        self.entries.iter().zip(self.vectors.iter())
    }
}
