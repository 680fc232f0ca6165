use std::collections::{BTreeMap, HashMap};

use super::tokenize::tokenize;

/// Sparse vector as (term index, weight) pairs sorted by term index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ti, wi) = self.entries[i];
            let (tj, wj) = other.entries[j];
            if ti == tj {
                sum += wi * wj;
                i += 1;
                j += 1;
            } else if ti < tj {
                i += 1;
            } else {
                j += 1;
            }
        }
        sum
    }

    fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
    }
}

/// TF-IDF weighting with smoothed idf and L2-normalised rows.
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary and idf weights from `documents`.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();
        Self::fit_tokens(&tokenized)
    }

    fn fit_tokens(tokenized: &[Vec<String>]) -> Self {
        // Vocabulary indices follow the sorted term order.
        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in tokenized {
            let mut unique: Vec<&str> = tokens.iter().map(String::as_str).collect();
            unique.sort_unstable();
            unique.dedup();
            for term in unique {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let n = tokenized.len() as f64;
        let mut vocabulary = HashMap::with_capacity(df.len());
        let mut idf = Vec::with_capacity(df.len());
        for (idx, (term, count)) in df.into_iter().enumerate() {
            vocabulary.insert(term.to_string(), idx);
            idf.push(((1.0 + n) / (1.0 + count as f64)).ln() + 1.0);
        }

        Self { vocabulary, idf }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.idf.len()
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.term_index(term).map(|i| self.idf[i])
    }

    /// Weight one document. Terms outside the vocabulary are ignored.
    pub fn transform(&self, document: &str) -> SparseVector {
        self.transform_tokens(&tokenize(document))
    }

    fn transform_tokens(&self, tokens: &[String]) -> SparseVector {
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for token in tokens {
            if let Some(&idx) = self.vocabulary.get(token) {
                *counts.entry(idx).or_insert(0) += 1;
            }
        }

        let mut vector = SparseVector {
            entries: counts
                .into_iter()
                .map(|(idx, tf)| (idx, tf as f64 * self.idf[idx]))
                .collect(),
        };
        vector.normalize();
        vector
    }

    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> (Self, Vec<SparseVector>) {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();
        let vectorizer = Self::fit_tokens(&tokenized);
        let vectors = tokenized.iter().map(|t| vectorizer.transform_tokens(t)).collect();
        (vectorizer, vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_smoothed_idf() {
        let v = TfidfVectorizer::fit(&["matrix reloaded", "matrix revolutions", "speed"]);
        assert_eq!(v.vocabulary_len(), 4);
        // df(matrix) = 2, n = 3
        assert!(approx(v.idf("matrix").unwrap(), (4.0f64 / 3.0).ln() + 1.0));
        // df(speed) = 1
        assert!(approx(v.idf("speed").unwrap(), 2.0f64.ln() + 1.0));
        assert!(v.idf("the").is_none());
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let (_, vectors) = TfidfVectorizer::fit_transform(&["heat scarface heat", "taxi driver"]);
        for v in &vectors {
            assert!(approx(v.norm(), 1.0));
            assert!(approx(v.dot(v), 1.0));
        }
    }

    #[test]
    fn test_term_frequency_counts() {
        let (v, vectors) = TfidfVectorizer::fit_transform(&["heat heat scarface"]);
        let heat = v.term_index("heat").unwrap();
        let scarface = v.term_index("scarface").unwrap();
        let weight = |idx| {
            vectors[0]
                .entries()
                .iter()
                .find(|(i, _)| *i == idx)
                .map(|(_, w)| *w)
                .unwrap()
        };
        // Equal idf, so weights are proportional to counts.
        assert!(approx(weight(heat), 2.0 * weight(scarface)));
    }

    #[test]
    fn test_empty_document_is_zero_vector() {
        let (_, vectors) = TfidfVectorizer::fit_transform(&["the of and", "heat"]);
        assert!(vectors[0].is_zero());
        assert_eq!(vectors[0].dot(&vectors[1]), 0.0);
    }

    #[test]
    fn test_dot_disjoint() {
        let (_, vectors) = TfidfVectorizer::fit_transform(&["heat", "speed"]);
        assert_eq!(vectors[0].dot(&vectors[1]), 0.0);
    }
}
