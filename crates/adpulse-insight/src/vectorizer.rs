// Text vectorization for campaign retrieval
// The corpus only needs fit + transform, so any embedding can stand in for TF-IDF

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

// words of two or more characters
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

pub trait Vectorizer {
    /// Learn the vocabulary from `documents` and return one row per document
    fn fit_transform(&mut self, documents: &[String]) -> Vec<Vec<f64>>;

    /// Vector for new text in the fitted space. Unseen words are ignored.
    fn transform(&self, text: &str) -> Vec<f64>;
}

/// Smoothed TF-IDF with L2-normalized rows.
///
/// Tokens are lowercased words of at least two characters. Term frequency
/// is the raw count and `idf = ln((1 + n) / (1 + df)) + 1`, so a term that
/// appears in every document still carries weight 1.
pub struct TfidfVectorizer {
    token_pattern: Regex,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self {
            token_pattern: Regex::new(TOKEN_PATTERN).expect("token pattern is valid"),
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
        }
    }

    /// Fitted terms and their column index, alphabetical
    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&column| self.idf[column])
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.token_pattern
            .find_iter(&lower)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn weigh<'t>(&self, tokens: impl Iterator<Item = &'t str>) -> Vec<f64> {
        let mut row = vec![0.0; self.idf.len()];
        for token in tokens {
            if let Some(&column) = self.vocabulary.get(token) {
                row[column] += 1.0;
            }
        }
        for (weight, idf) in row.iter_mut().zip(&self.idf) {
            *weight *= idf;
        }
        l2_normalize(&mut row);
        row
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Vectorizer for TfidfVectorizer {
    fn fit_transform(&mut self, documents: &[String]) -> Vec<Vec<f64>> {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|doc| self.tokenize(doc)).collect();

        let terms: BTreeSet<&str> = tokenized.iter().flatten().map(String::as_str).collect();
        self.vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(column, term)| (term.to_string(), column))
            .collect();

        let mut document_frequency = vec![0usize; self.vocabulary.len()];
        for tokens in &tokenized {
            let distinct: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in distinct {
                document_frequency[self.vocabulary[term]] += 1;
            }
        }

        let n = documents.len() as f64;
        self.idf = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        tokenized
            .iter()
            .map(|tokens| self.weigh(tokens.iter().map(String::as_str)))
            .collect()
    }

    fn transform(&self, text: &str) -> Vec<f64> {
        let tokens = self.tokenize(text);
        self.weigh(tokens.iter().map(String::as_str))
    }
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        row.iter_mut().for_each(|v| *v /= norm);
    }
}

/// Cosine of the angle between two vectors, 0 when either is all zeros
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
