use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use super::tfidf::{SparseVector, TfidfVectorizer};
use super::RecommendError;
use crate::dataset::Dataset;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarActor {
    pub rank: usize,
    pub actor: String,
    pub score: f64,
}

/// TF-IDF vectors of every actor's filmography, with an inverted index so a
/// single row of the cosine similarity matrix can be computed without
/// materialising the whole matrix.
#[derive(Debug, Clone, Default)]
pub struct SimilarityModel {
    actors: Vec<String>,
    index: HashMap<String, usize>,
    vectors: Vec<SparseVector>,
    postings: Vec<Vec<(usize, f64)>>,
}

/// One document per actor: their film titles joined by a space, actors in name order.
pub fn actor_documents(dataset: &Dataset) -> Vec<(String, String)> {
    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for r in &dataset.records {
        grouped.entry(r.actor.as_str()).or_default().push(r.film.as_str());
    }
    grouped
        .into_iter()
        .map(|(actor, films)| (actor.to_string(), films.join(" ")))
        .collect()
}

impl SimilarityModel {
    pub fn build(dataset: &Dataset) -> Self {
        let (actors, documents): (Vec<String>, Vec<String>) =
            actor_documents(dataset).into_iter().unzip();

        let (vectorizer, vectors) = TfidfVectorizer::fit_transform(&documents);

        let mut postings = vec![Vec::new(); vectorizer.vocabulary_len()];
        for (doc, vector) in vectors.iter().enumerate() {
            for &(term, weight) in vector.entries() {
                postings[term].push((doc, weight));
            }
        }

        let index = actors
            .iter()
            .enumerate()
            .map(|(i, a)| (a.clone(), i))
            .collect();

        debug!(
            "Built similarity model: {} actors, {} terms, {} without indexable titles",
            actors.len(),
            vectorizer.vocabulary_len(),
            vectors.iter().filter(|v| v.is_zero()).count()
        );

        Self {
            actors,
            index,
            vectors,
            postings,
        }
    }

    pub fn actors(&self) -> &[String] {
        &self.actors
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn contains(&self, actor: &str) -> bool {
        self.index.contains_key(actor)
    }

    /// Cosine similarity of two actors; vectors are unit length so this is a dot product.
    pub fn similarity(&self, a: &str, b: &str) -> Result<f64, RecommendError> {
        let ia = self.position(a)?;
        let ib = self.position(b)?;
        Ok(self.vectors[ia].dot(&self.vectors[ib]))
    }

    /// Similarity of `actor` against every actor, in `actors()` order.
    pub fn row(&self, actor: &str) -> Result<Vec<f64>, RecommendError> {
        let idx = self.position(actor)?;
        let mut scores = vec![0.0; self.actors.len()];
        for &(term, weight) in self.vectors[idx].entries() {
            for &(doc, other) in &self.postings[term] {
                scores[doc] += weight * other;
            }
        }
        Ok(scores)
    }

    /// The full n×n similarity matrix, rows and columns in `actors()` order.
    pub fn pairwise(&self) -> Vec<Vec<f64>> {
        self.vectors
            .iter()
            .map(|a| self.vectors.iter().map(|b| a.dot(b)).collect())
            .collect()
    }

    /// The `k` actors most similar to `actor`, best first, the actor itself excluded.
    /// Equal scores are ordered by name.
    pub fn similar_to(&self, actor: &str, k: usize) -> Result<Vec<SimilarActor>, RecommendError> {
        let idx = self.position(actor)?;
        let scores = self.row(actor)?;

        let mut candidates: Vec<(usize, f64)> = scores
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .collect();

        candidates.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| self.actors[a.0].cmp(&self.actors[b.0]))
        });

        Ok(candidates
            .into_iter()
            .take(k)
            .enumerate()
            .map(|(rank, (i, score))| SimilarActor {
                rank: rank + 1,
                actor: self.actors[i].clone(),
                score,
            })
            .collect())
    }

    fn position(&self, actor: &str) -> Result<usize, RecommendError> {
        self.index
            .get(actor)
            .copied()
            .ok_or_else(|| RecommendError::UnknownActor(actor.to_string()))
    }
}
