use crate::types::{ExternalCandidate, MatchResult, Recommendations, TitleQuery};

pub trait Recommender: Send + Sync {
    fn recommend(&self, query: &str, k: usize) -> Recommendations;
}

/// Normalized string similarity in `[0, 1]`, `1.0` for identical inputs.
pub trait TitleSimilarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

pub trait PosterResolver: Send + Sync {
    fn resolve(&self, query: &TitleQuery, candidates: &[ExternalCandidate]) -> MatchResult;
}
