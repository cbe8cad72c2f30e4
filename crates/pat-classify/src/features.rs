//! TF-IDF feature extraction over column search text.
//!
//! Vocabulary terms are word unigrams and (optionally) bigrams. IDF uses the
//! smoothed form `ln((1 + n) / (1 + df)) + 1` and vectors are L2-normalized,
//! so every non-empty document maps onto the unit sphere.

use std::collections::{BTreeMap, HashMap, HashSet};

/// Split text into lowercase alphanumeric tokens of at least two characters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_lowercase)
        .collect()
}

/// Unigrams followed by n-grams up to `ngram_max`, joined with single spaces.
pub fn terms(text: &str, ngram_max: usize) -> Vec<String> {
    let tokens = tokenize(text);
    let mut out = tokens.clone();
    for n in 2..=ngram_max.max(1) {
        if tokens.len() < n {
            break;
        }
        out.extend(tokens.windows(n).map(|window| window.join(" ")));
    }
    out
}

/// Vocabulary pruning settings used when fitting.
#[derive(Debug, Clone, Copy)]
pub struct VocabularyOptions {
    /// Keep at most this many terms, by corpus frequency.
    pub max_features: usize,
    /// Drop terms present in more than this fraction of documents.
    pub max_df: f32,
    pub ngram_max: usize,
}

/// Fixed vocabulary with IDF weights.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureExtractor {
    vocabulary: Vec<String>,
    idf: Vec<f32>,
    ngram_max: usize,
    index: HashMap<String, usize>,
}

impl FeatureExtractor {
    /// Assemble an extractor from a stored vocabulary.
    ///
    /// Returns `None` if `vocabulary` and `idf` lengths differ or the
    /// vocabulary has duplicate terms.
    pub fn new(vocabulary: Vec<String>, idf: Vec<f32>, ngram_max: usize) -> Option<Self> {
        if vocabulary.len() != idf.len() {
            return None;
        }
        let index: HashMap<String, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();
        if index.len() != vocabulary.len() {
            return None;
        }
        Some(Self {
            vocabulary,
            idf,
            ngram_max: ngram_max.max(1),
            index,
        })
    }

    /// Learn vocabulary and IDF weights from a corpus.
    ///
    /// `max_df` pruning is skipped when it would remove every term, which
    /// happens for single-document corpora.
    pub fn fit(documents: &[String], options: VocabularyOptions) -> Self {
        let n_docs = documents.len();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut corpus_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let doc_terms = terms(doc, options.ngram_max);
            let unique: HashSet<&String> = doc_terms.iter().collect();
            for term in unique {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            for term in doc_terms {
                *corpus_freq.entry(term).or_insert(0) += 1;
            }
        }

        let max_doc_count = options.max_df * n_docs as f32;
        let mut candidates: Vec<(&String, usize)> = corpus_freq
            .iter()
            .filter(|(term, _)| doc_freq.get(*term).copied().unwrap_or(0) as f32 <= max_doc_count)
            .map(|(term, count)| (term, *count))
            .collect();
        if candidates.is_empty() {
            candidates = corpus_freq.iter().map(|(term, count)| (term, *count)).collect();
        }

        // Most frequent first, alphabetical among equals.
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        candidates.truncate(options.max_features);

        let selected: BTreeMap<String, f32> = candidates
            .into_iter()
            .map(|(term, _)| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f32;
                let idf = ((1.0 + n_docs as f32) / (1.0 + df)).ln() + 1.0;
                (term.clone(), idf)
            })
            .collect();

        let (vocabulary, idf): (Vec<String>, Vec<f32>) = selected.into_iter().unzip();
        let index = vocabulary
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();

        Self {
            vocabulary,
            idf,
            ngram_max: options.ngram_max.max(1),
            index,
        }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn idf(&self) -> &[f32] {
        &self.idf
    }

    pub fn ngram_max(&self) -> usize {
        self.ngram_max
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// Map text to a dense, L2-normalized TF-IDF vector of length [`len`](Self::len).
    pub fn transform(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.vocabulary.len()];
        for term in terms(text, self.ngram_max) {
            if let Some(&idx) = self.index.get(&term) {
                vector[idx] += 1.0;
            }
        }
        for (value, idf) in vector.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}
