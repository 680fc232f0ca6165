pub mod engine;
pub mod similarity;
pub mod tfidf;
pub mod tokenize;

pub use engine::{recommend, Recommendation, RecommendedFilm};
pub use similarity::{actor_documents, SimilarActor, SimilarityModel};
pub use tfidf::{SparseVector, TfidfVectorizer};
pub use tokenize::tokenize;

#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    #[error("Unknown actor: {0}")]
    UnknownActor(String),
}
