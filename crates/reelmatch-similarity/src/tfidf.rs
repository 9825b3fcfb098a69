//! TF-IDF weighting over a fixed document collection.
//!
//! Raw term counts times smoothed inverse document frequency,
//! `idf(t) = ln((1 + n) / (1 + df(t))) + 1`, then L2-normalized per document.
//! Normalized vectors make cosine similarity a plain dot product.
use std::collections::{BTreeSet, HashMap};

use crate::tokenize::tokenize;

pub type TermId = u32;

/// Sorted term ids with their weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentVector {
    terms: Vec<(TermId, f32)>,
}

impl DocumentVector {
    pub fn terms(&self) -> &[(TermId, f32)] { &self.terms }
    pub fn is_empty(&self) -> bool { self.terms.is_empty() }
    pub fn norm(&self) -> f32 { self.terms.iter().map(|(_, w)| w * w).sum::<f32>().sqrt() }

    /// Dot product by merge-join over the sorted term ids.
    pub fn dot(&self, other: &DocumentVector) -> f32 {
        let (mut i, mut j, mut sum) = (0, 0, 0.0f32);
        while i < self.terms.len() && j < other.terms.len() {
            let (a, wa) = self.terms[i];
            let (b, wb) = other.terms[j];
            match a.cmp(&b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => { sum += wa * wb; i += 1; j += 1; }
            }
        }
        sum
    }
}

/// Alphabetically ordered terms with their idf weights.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    ids: HashMap<String, TermId>,
    idf: Vec<f32>,
}

impl Vocabulary {
    pub fn len(&self) -> usize { self.terms.len() }
    pub fn is_empty(&self) -> bool { self.terms.is_empty() }
    pub fn id(&self, term: &str) -> Option<TermId> { self.ids.get(term).copied() }
    pub fn term(&self, id: TermId) -> Option<&str> { self.terms.get(id as usize).map(String::as_str) }
    pub fn idf(&self, id: TermId) -> Option<f32> { self.idf.get(id as usize).copied() }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TfidfVectorizer;

impl TfidfVectorizer {
    pub fn new() -> Self { Self }

    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> (Vocabulary, Vec<DocumentVector>) {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

        let terms: Vec<String> = tokenized.iter().flatten().cloned().collect::<BTreeSet<_>>().into_iter().collect();
        let ids: HashMap<String, TermId> = terms.iter().enumerate().map(|(i, t)| (t.clone(), i as TermId)).collect();

        let counts: Vec<HashMap<TermId, u32>> = tokenized
            .iter()
            .map(|tokens| {
                let mut tf = HashMap::new();
                for t in tokens { *tf.entry(ids[t.as_str()]).or_insert(0u32) += 1; }
                tf
            })
            .collect();

        let mut df = vec![0u32; terms.len()];
        for tf in &counts { for id in tf.keys() { df[*id as usize] += 1; } }
        let n = documents.len() as f64;
        let idf: Vec<f32> = df.iter().map(|&d| (((1.0 + n) / (1.0 + f64::from(d))).ln() + 1.0) as f32).collect();

        let vectors = counts
            .into_iter()
            .map(|tf| {
                let mut weighted: Vec<(TermId, f32)> = tf.into_iter().map(|(id, c)| (id, c as f32 * idf[id as usize])).collect();
                weighted.sort_unstable_by_key(|(id, _)| *id);
                let norm = weighted.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
                if norm > 0.0 { for (_, w) in &mut weighted { *w /= norm; } }
                DocumentVector { terms: weighted }
            })
            .collect();

        (Vocabulary { terms, ids, idf }, vectors)
    }
}
