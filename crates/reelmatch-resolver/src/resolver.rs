use rayon::prelude::*;
use serde::Serialize;

use reelmatch_core::traits::{PosterResolver, TitleSimilarity};
use reelmatch_core::types::{clean_popularity, ExternalCandidate, MatchResult, TitleQuery};
use reelmatch_core::Result;

use crate::policy::ResolverPolicy;
use crate::ratio::SequenceRatio;

/// Sub-scores and composite for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub title: f64,
    pub year: f64,
    pub popularity: f64,
    pub total: f64,
}

/// Stateless scorer; one instance can serve concurrent callers.
pub struct CandidateResolver<S = SequenceRatio>
where
    S: TitleSimilarity,
{
    policy: ResolverPolicy,
    similarity: S,
}

impl CandidateResolver<SequenceRatio> {
    pub fn new(policy: ResolverPolicy) -> Result<Self> { Self::with_similarity(policy, SequenceRatio) }
}

impl Default for CandidateResolver<SequenceRatio> {
    fn default() -> Self { Self { policy: ResolverPolicy::default(), similarity: SequenceRatio } }
}

impl<S> CandidateResolver<S>
where
    S: TitleSimilarity,
{
    pub fn with_similarity(policy: ResolverPolicy, similarity: S) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy, similarity })
    }

    pub fn policy(&self) -> &ResolverPolicy { &self.policy }

    /// Scores every candidate against `query`. Fields are public, so popularity
    /// is cleaned again here; a NaN or infinite value scores as 0.
    pub fn score_all(&self, query: &TitleQuery, candidates: &[ExternalCandidate]) -> Vec<ScoreBreakdown> {
        let title = query.title.trim().to_lowercase();
        let has_year = query.year.is_some();
        let max_popularity = candidates.iter().map(|c| clean_popularity(c.popularity)).fold(0.0f64, f64::max);
        candidates
            .iter()
            .map(|c| {
                let title_score = self.similarity.similarity(&title, &c.display_name.to_lowercase());
                let year = if has_year { self.policy.year_score(query.year, c.release_year()) } else { 0.0 };
                let popularity = if max_popularity > 0.0 { clean_popularity(c.popularity) / max_popularity } else { 0.0 };
                let total = self.policy.composite(has_year, title_score, year, popularity);
                ScoreBreakdown { title: title_score, year, popularity, total }
            })
            .collect()
    }

    /// The accepted winner and its scores, or `None` when nothing clears the
    /// threshold. Ties go to the earliest candidate.
    pub fn resolve_scored<'a>(&self, query: &TitleQuery, candidates: &'a [ExternalCandidate]) -> Option<(&'a ExternalCandidate, ScoreBreakdown)> {
        if query.title.trim().is_empty() || candidates.is_empty() { return None; }

        let scores = self.score_all(query, candidates);
        let mut best: Option<(usize, ScoreBreakdown)> = None;
        for (i, s) in scores.into_iter().enumerate() {
            tracing::debug!(candidate = %candidates[i].display_name, title = s.title, year = s.year, popularity = s.popularity, total = s.total, "candidate scored");
            if !s.total.is_finite() { continue; }
            if best.map_or(true, |(_, b)| s.total > b.total) { best = Some((i, s)); }
        }

        let (i, score) = best?;
        let threshold = self.policy.threshold(query.year.is_some());
        if score.total < threshold {
            tracing::debug!(query = %query.title, best = score.total, threshold, "best candidate below threshold");
            return None;
        }
        Some((&candidates[i], score))
    }

    pub fn resolve(&self, query: &TitleQuery, candidates: &[ExternalCandidate]) -> MatchResult {
        match self.resolve_scored(query, candidates).and_then(|(c, _)| c.image_path.clone()) {
            Some(path) => MatchResult::Found(path),
            None => MatchResult::NotFound,
        }
    }

    /// Resolves independent queries in parallel, results in input order.
    pub fn resolve_many(&self, batch: &[(TitleQuery, Vec<ExternalCandidate>)]) -> Vec<MatchResult> {
        batch.par_iter().map(|(query, candidates)| self.resolve(query, candidates)).collect()
    }
}

impl<S> PosterResolver for CandidateResolver<S>
where
    S: TitleSimilarity,
{
    fn resolve(&self, query: &TitleQuery, candidates: &[ExternalCandidate]) -> MatchResult { Self::resolve(self, query, candidates) }
}
