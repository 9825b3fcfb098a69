//! reelmatch-similarity
//!
//! Content-based "more like this" over the catalog: TF-IDF vectors built from
//! title, director, cast and genres, ranked by cosine similarity.
pub mod handle;
pub mod index;
pub mod tfidf;
pub mod tokenize;

pub use handle::IndexHandle;
pub use index::{MatrixMode, RecommendSettings, SimilarityIndex, SimilarityMatrix};
pub use tfidf::{DocumentVector, TfidfVectorizer, Vocabulary};
