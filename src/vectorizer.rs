//! Sparse TF-IDF vector space built over the knowledge-base questions.

use std::collections::{BTreeMap, HashMap, HashSet};

/// Term → dimension mapping with one smoothed IDF weight per dimension.
///
/// Built once from the corpus and never mutated; query terms that are not part of it are
/// ignored rather than added.
#[derive(Debug, Clone, Default)]
pub struct VocabularyModel {
    index: HashMap<String, usize>,
    idf: Vec<f64>,
    document_count: usize,
}

impl VocabularyModel {
    /// Dimensions are assigned in first-occurrence order across `documents`, so the same
    /// input always yields the same layout.
    pub fn build<D, T>(documents: &[D]) -> Self
    where
        D: AsRef<[T]>,
        T: AsRef<str>,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        for document in documents {
            let mut seen: HashSet<usize> = HashSet::new();
            for token in document.as_ref() {
                let token = token.as_ref();
                let dimension = match index.get(token) {
                    Some(&dimension) => dimension,
                    None => {
                        let dimension = index.len();
                        index.insert(token.to_string(), dimension);
                        document_frequency.push(0);
                        dimension
                    }
                };
                if seen.insert(dimension) {
                    document_frequency[dimension] += 1;
                }
            }
        }

        let n = documents.len() as f64;
        let idf = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        Self {
            index,
            idf,
            document_count: documents.len(),
        }
    }

    pub fn term_count(&self) -> usize {
        self.idf.len()
    }

    pub fn document_count(&self) -> usize {
        self.document_count
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn idf(&self, dimension: usize) -> Option<f64> {
        self.idf.get(dimension).copied()
    }

    /// Raw term count × idf for every in-vocabulary token, scaled to unit length.
    pub fn vectorize<T: AsRef<str>>(&self, tokens: &[T]) -> DocumentVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokens {
            if let Some(dimension) = self.index_of(token.as_ref()) {
                *counts.entry(dimension).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(dimension, tf)| (dimension, tf * self.idf[dimension]))
            .collect();
        normalize_vector(&mut entries);

        DocumentVector {
            dimension: self.term_count(),
            entries,
        }
    }
}

/// Sparse vector with entries sorted by dimension. Either unit length or all zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl DocumentVector {
    pub fn zero(dimension: usize) -> Self {
        Self {
            dimension,
            entries: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn weight(&self, dimension: usize) -> f64 {
        self.entries
            .binary_search_by_key(&dimension, |&(d, _)| d)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Cosine similarity of two unit vectors; 0 whenever either side is zero.
    pub fn cosine(&self, other: &DocumentVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut dot = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_dim, a_weight) = self.entries[i];
            let (b_dim, b_weight) = other.entries[j];
            if a_dim == b_dim {
                dot += a_weight * b_weight;
                i += 1;
                j += 1;
            } else if a_dim < b_dim {
                i += 1;
            } else {
                j += 1;
            }
        }
        dot.clamp(0.0, 1.0)
    }
}

fn normalize_vector(entries: &mut Vec<(usize, f64)>) {
    entries.retain(|(_, weight)| *weight != 0.0);
    let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, weight) in entries.iter_mut() {
            *weight /= norm;
        }
    }
}
