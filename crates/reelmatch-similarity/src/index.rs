use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::Instant;

use reelmatch_core::traits::Recommender;
use reelmatch_core::types::{Recommendation, Recommendations, RowId};
use reelmatch_core::{Catalog, Error, Result};

use crate::tfidf::{DocumentVector, TfidfVectorizer, Vocabulary};

/// Whether the full pairwise matrix is materialized at build time or each
/// query row is computed on demand from the term postings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixMode {
    #[default]
    Dense,
    OnDemand,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendSettings {
    pub top_k: usize,
    pub matrix: MatrixMode,
}

impl Default for RecommendSettings {
    fn default() -> Self { Self { top_k: 5, matrix: MatrixMode::Dense } }
}

/// Square, symmetric cosine similarities in row-major order.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f32>,
}

impl SimilarityMatrix {
    pub fn len(&self) -> usize { self.n }
    pub fn is_empty(&self) -> bool { self.n == 0 }
    pub fn row(&self, i: usize) -> Option<&[f32]> { (i < self.n).then(|| &self.data[i * self.n..(i + 1) * self.n]) }
    pub fn get(&self, i: usize, j: usize) -> Option<f32> { (i < self.n && j < self.n).then(|| self.data[i * self.n + j]) }
}

/// Immutable after [`SimilarityIndex::build`]; a new catalog means a new index.
pub struct SimilarityIndex {
    catalog: Catalog,
    vocabulary: Vocabulary,
    vectors: Vec<DocumentVector>,
    /// Per term: the rows containing it and their weight.
    postings: Vec<Vec<(RowId, f32)>>,
    matrix: Option<SimilarityMatrix>,
}

impl SimilarityIndex {
    pub fn build(catalog: Catalog) -> Result<Self> { Self::build_with(catalog, MatrixMode::Dense) }

    pub fn build_with(catalog: Catalog, mode: MatrixMode) -> Result<Self> {
        if catalog.is_empty() { return Err(Error::EmptyCatalog); }
        let start = Instant::now();

        let documents = catalog
            .items()
            .iter()
            .enumerate()
            .map(|(row, item)| item.combined_text().ok_or_else(|| Error::data(row, "missing genres (listed_in)")))
            .collect::<Result<Vec<String>>>()?;

        let (vocabulary, vectors) = TfidfVectorizer::new().fit_transform(&documents);

        let mut postings: Vec<Vec<(RowId, f32)>> = vec![Vec::new(); vocabulary.len()];
        for (row, v) in vectors.iter().enumerate() {
            for &(term, w) in v.terms() { postings[term as usize].push((row, w)); }
        }

        let mut index = Self { catalog, vocabulary, vectors, postings, matrix: None };
        if mode == MatrixMode::Dense {
            let n = index.vectors.len();
            let mut data = vec![0.0f32; n * n];
            data.par_chunks_mut(n).enumerate().for_each(|(i, out)| index.fill_row(i, out));
            index.matrix = Some(SimilarityMatrix { n, data });
        }

        tracing::info!(
            rows = index.vectors.len(),
            vocabulary = index.vocabulary.len(),
            mode = ?mode,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "similarity index built"
        );
        Ok(index)
    }

    pub fn catalog(&self) -> &Catalog { &self.catalog }
    pub fn vocabulary(&self) -> &Vocabulary { &self.vocabulary }
    pub fn vector(&self, row: RowId) -> Option<&DocumentVector> { self.vectors.get(row) }
    pub fn matrix(&self) -> Option<&SimilarityMatrix> { self.matrix.as_ref() }
    pub fn len(&self) -> usize { self.vectors.len() }
    pub fn is_empty(&self) -> bool { self.vectors.is_empty() }

    /// Cosine similarity of two rows, in either matrix mode.
    pub fn similarity(&self, i: RowId, j: RowId) -> Option<f32> {
        if i >= self.len() || j >= self.len() { return None; }
        match &self.matrix {
            Some(m) => m.get(i, j),
            None => Some(self.compute_row(i)[j]),
        }
    }

    /// Writes the scores of `row` against every row into `out` (zeroed, one
    /// slot per row): accumulates weight products through the postings of
    /// the row's terms, in ascending term order.
    fn fill_row(&self, row: RowId, out: &mut [f32]) {
        for &(term, w) in self.vectors[row].terms() {
            for &(other, w_other) in &self.postings[term as usize] { out[other] += w * w_other; }
        }
        for s in out.iter_mut() { *s = s.clamp(0.0, 1.0); }
        out[row] = 1.0;
    }

    fn compute_row(&self, row: RowId) -> Vec<f32> {
        let mut scores = vec![0.0f32; self.vectors.len()];
        self.fill_row(row, &mut scores);
        scores
    }

    fn row_scores(&self, row: RowId) -> Cow<'_, [f32]> {
        match self.matrix.as_ref().and_then(|m| m.row(row)) {
            Some(scores) => Cow::Borrowed(scores),
            None => Cow::Owned(self.compute_row(row)),
        }
    }

    /// Top `k` titles most similar to `query`. The title match is exact and
    /// case-insensitive; duplicate titles use the first row in catalog order.
    pub fn recommend(&self, query: &str, k: usize) -> Recommendations {
        match self.catalog.position_of(query) {
            Some(row) => self.recommend_row(row, k),
            None => {
                tracing::debug!(query, "title not found");
                Recommendations::TitleNotFound
            }
        }
    }

    /// Ranks every other row against `row`, best first, ties in catalog order.
    pub fn recommend_row(&self, row: RowId, k: usize) -> Recommendations {
        if row >= self.len() { return Recommendations::TitleNotFound; }
        let scores = self.row_scores(row);
        let mut ranked: Vec<(RowId, f32)> = scores.iter().copied().enumerate().filter(|(j, _)| *j != row).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);
        let items = ranked
            .into_iter()
            .filter_map(|(j, score)| self.catalog.get(j).map(|item| Recommendation { row: j, title: item.title.clone(), score }))
            .collect();
        Recommendations::Ranked(items)
    }
}

impl Recommender for SimilarityIndex {
    fn recommend(&self, query: &str, k: usize) -> Recommendations { Self::recommend(self, query, k) }
}
