use std::sync::{Arc, PoisonError, RwLock};

use crate::index::SimilarityIndex;

/// Shared reference to the current index. Readers clone the `Arc` and keep
/// using it while a rebuilt index is swapped in.
#[derive(Clone)]
pub struct IndexHandle {
    inner: Arc<RwLock<Arc<SimilarityIndex>>>,
}

impl IndexHandle {
    pub fn new(index: SimilarityIndex) -> Self { Self { inner: Arc::new(RwLock::new(Arc::new(index))) } }

    pub fn current(&self) -> Arc<SimilarityIndex> {
        Arc::clone(&self.inner.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Installs `index` and returns the one it replaced.
    pub fn replace(&self, index: SimilarityIndex) -> Arc<SimilarityIndex> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(index))
    }
}
